//! HTTP client for the centers search backend.
//!
//! Wraps `reqwest` with the backend's URL layout and error contract: every
//! non-2xx response carries a `{"message": ...}` body, surfaced as
//! [`ClientError::Api`]. Anything that prevents reading a response at all is
//! [`ClientError::Http`].

use std::time::Duration;

use centerfind_core::{GeocodeResults, SearchResults};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::types::{CenterQuery, ErrorBody, ProblemReport};

/// Client for the centers REST API.
///
/// Cheap to clone: clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct CentersClient {
    client: Client,
    base_url: Url,
}

impl CentersClient {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise to exactly one trailing slash so path segments are
        // appended below any prefix the backend is mounted under.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .ok()
            .filter(|u| !u.cannot_be_a_base() && matches!(u.scheme(), "http" | "https"))
            .ok_or_else(|| ClientError::InvalidBaseUrl(base_url.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Searches centers around a point.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] if the backend rejects the search.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if a body does not match the contract.
    pub async fn find_centers(&self, query: &CenterQuery) -> Result<SearchResults, ClientError> {
        let url = self.build_url(&["api", "centers"], &query.query_pairs());
        tracing::debug!(%url, "searching centers");
        let response = self.client.get(url.clone()).send().await?;
        Self::decode(response, &url).await
    }

    /// Resolves a free-text address to its canonical form and bounds.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] if the address cannot be resolved (for example
    ///   `"no results"` or `"too many results"`).
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if a body does not match the contract.
    pub async fn geocode(&self, address: &str) -> Result<GeocodeResults, ClientError> {
        let url = self.build_url(
            &["api", "centers", "bounds"],
            &[("address", address.to_string())],
        );
        tracing::debug!(%url, "resolving address");
        let response = self.client.get(url.clone()).send().await?;
        Self::decode(response, &url).await
    }

    /// Reports a problem with a center's data. The response body is ignored.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] on a non-2xx status.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if a non-2xx body is not an error body.
    pub async fn submit_report(
        &self,
        center_id: &str,
        report: &ProblemReport,
    ) -> Result<(), ClientError> {
        let url = self.build_url(&["api", "centers", center_id, "report"], &[]);
        let response = self.client.post(url.clone()).json(report).send().await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::api_error(response, &url).await)
    }

    /// Builds a request URL below the base URL. Path segments and query
    /// values are percent-encoded.
    fn build_url(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T, ClientError> {
        if !response.status().is_success() {
            return Err(Self::api_error(response, url).await);
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Turns a non-2xx response into [`ClientError::Api`]. A body that is not
    /// an error body yields [`ClientError::Deserialize`] instead.
    async fn api_error(response: Response, url: &Url) -> ClientError {
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return ClientError::Http(e),
        };
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error) => ClientError::Api {
                status,
                message: error.message,
            },
            Err(e) => ClientError::Deserialize {
                context: format!("error body ({status}) from {url}"),
                source: e,
            },
        }
    }
}
