//! Request types for the centers API.

use centerfind_core::{Coordinates, SearchFilters};
use serde::{Deserialize, Serialize};

/// Parameters of a `GET /api/centers` search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterQuery {
    /// Point to search around.
    pub location: Coordinates,
    /// Search radius in kilometres.
    pub distance_km: f64,
    pub filters: SearchFilters,
}

impl CenterQuery {
    /// Query parameters in wire order: location, distance, then the
    /// constrained filters.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("lat", self.location.latitude.to_string()),
            ("lng", self.location.longitude.to_string()),
            ("distance", self.distance_km.to_string()),
        ];
        pairs.extend(self.filters.query_pairs());
        pairs
    }
}

/// Body of `POST /api/centers/{id}/report`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemReport {
    pub subject: String,
    pub message: String,
}

/// Error body the backend sends with non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
