//! Turns search intents into backend requests and posts the outcomes back to
//! the widget.
//!
//! Every request runs in its own task and is never cancelled; only the wait
//! before a viewport search is. Errors are classified here, so the widget
//! only ever sees results to apply or messages to show.

use std::time::Duration;

use centerfind_client::{CenterQuery, CentersClient, ClientError, ProblemReport};
use centerfind_core::{Bounds, Coordinates, SearchFilters, SearchResults};
use tokio::sync::mpsc::UnboundedSender;

use crate::debounce::Debouncer;
use crate::error::SearchError;
use crate::widget::{Message, Outcome};

/// Search radius for an explicit location search when the map has no
/// viewport to derive one from.
pub const DEFAULT_LOCATION_RADIUS_KM: f64 = 2.0;

pub struct QueryDispatcher {
    client: CentersClient,
    outcomes: UnboundedSender<Message>,
    viewport_timer: Debouncer,
}

impl QueryDispatcher {
    pub(crate) fn new(client: CentersClient, outcomes: UnboundedSender<Message>) -> Self {
        Self {
            client,
            outcomes,
            viewport_timer: Debouncer::new("viewport-search"),
        }
    }

    /// Searches the visible area after `delay`, replacing any search that is
    /// still waiting. The query is fixed now; later filter changes do not
    /// affect it.
    pub fn by_viewport(&mut self, area: Bounds, filters: SearchFilters, delay: Duration) {
        let query = CenterQuery {
            location: area.center(),
            distance_km: area.radius_km(),
            filters,
        };
        let client = self.client.clone();
        let outcomes = self.outcomes.clone();
        self.viewport_timer.schedule(delay, move || {
            tokio::spawn(async move {
                let result = client.find_centers(&query).await;
                deliver_search(&outcomes, result, query.location, None, false);
            });
        });
    }

    /// Resolves `address` and searches around it, dropping any viewport
    /// search that is still waiting. Returns `false` without sending
    /// anything when the address is blank.
    pub fn by_address(&mut self, address: &str, filters: SearchFilters) -> bool {
        let address = address.trim();
        if address.is_empty() {
            tracing::debug!("ignoring blank address search");
            return false;
        }
        if self.viewport_timer.cancel() {
            tracing::debug!("dropping pending viewport search");
        }
        let address = address.to_string();
        let client = self.client.clone();
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let geocode = match client.geocode(&address).await {
                Ok(geocode) => geocode,
                Err(e) => {
                    report_failure(&outcomes, SearchError::from_geocode(&e), &e);
                    return;
                }
            };
            tracing::debug!(%address, resolved = %geocode.address, "address resolved");
            post(&outcomes, Outcome::AddressResolved(geocode.address));

            let query = CenterQuery {
                location: geocode.bounds.center(),
                distance_km: geocode.bounds.radius_km(),
                filters,
            };
            let result = client.find_centers(&query).await;
            deliver_search(&outcomes, result, query.location, Some(geocode.bounds), true);
        });
        true
    }

    /// Searches `radius_km` around `location` with zero delay and recenters
    /// the map on it.
    pub fn by_location(&mut self, location: Coordinates, radius_km: f64, filters: SearchFilters) {
        let query = CenterQuery {
            location,
            distance_km: radius_km,
            filters,
        };
        let client = self.client.clone();
        let outcomes = self.outcomes.clone();
        self.viewport_timer.schedule(Duration::ZERO, move || {
            tokio::spawn(async move {
                let result = client.find_centers(&query).await;
                deliver_search(&outcomes, result, location, None, true);
            });
        });
    }

    /// Sends a problem report for `center_id`. Only success is posted back;
    /// failures are logged.
    pub fn submit_report(&self, center_id: &str, report: ProblemReport) {
        let center_id = center_id.to_string();
        let client = self.client.clone();
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            match client.submit_report(&center_id, &report).await {
                Ok(()) => {
                    tracing::info!(%center_id, subject = %report.subject, "problem report submitted");
                    post(&outcomes, Outcome::ReportSubmitted);
                }
                Err(e) => tracing::warn!(%center_id, error = %e, "problem report failed"),
            }
        });
    }
}

/// Annotates a successful response with the query point (and the geocoded
/// bounds for address searches) and posts it, or classifies the failure.
fn deliver_search(
    outcomes: &UnboundedSender<Message>,
    result: Result<SearchResults, ClientError>,
    location: Coordinates,
    bounds: Option<Bounds>,
    recenter: bool,
) {
    let mut results = match result {
        Ok(results) => results,
        Err(e) => {
            report_failure(outcomes, SearchError::from_search(&e), &e);
            return;
        }
    };

    if let Some(message) = results.error.take().filter(|m| !m.trim().is_empty()) {
        report_failure(
            outcomes,
            SearchError::SearchRequest(message.clone()),
            &message,
        );
        return;
    }

    if recenter {
        results.location = Some(location);
        results.bounds = bounds;
    } else {
        results.location.get_or_insert(location);
    }
    post(outcomes, Outcome::Results { results, recenter });
}

fn report_failure(
    outcomes: &UnboundedSender<Message>,
    error: SearchError,
    cause: &dyn std::fmt::Display,
) {
    if error.user_message().is_none() {
        tracing::debug!(error = %cause, "search failed without a response; ignoring");
        return;
    }
    tracing::warn!(error = %cause, "search rejected by backend");
    post(outcomes, Outcome::Failed(error));
}

fn post(outcomes: &UnboundedSender<Message>, outcome: Outcome) {
    if outcomes.send(Message::Outcome(outcome)).is_err() {
        tracing::debug!("widget stopped; dropping search outcome");
    }
}
