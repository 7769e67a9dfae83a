//! Search filter selections and their query-parameter encoding.

use crate::centers::{AppointmentPolicy, TestKind};
use crate::ConfigError;

/// Current filter selections. `None` in any field means "no constraint".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub appointment_policy: Option<AppointmentPolicy>,
    pub test_kind: Option<TestKind>,
    pub require_digital_certificate: Option<bool>,
}

impl SearchFilters {
    /// Query parameters for the constrained fields only.
    ///
    /// Unconstrained filters are omitted entirely; an explicit `dcc=false` is
    /// still sent because absence and `false` mean different things.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(dcc) = self.require_digital_certificate {
            pairs.push(("dcc", dcc.to_string()));
        }
        if let Some(kind) = self.test_kind {
            pairs.push(("kind", kind.as_str().to_string()));
        }
        if let Some(policy) = self.appointment_policy.and_then(AppointmentPolicy::as_str) {
            pairs.push(("appointment", policy.to_string()));
        }
        pairs
    }
}

/// Parse an appointment dropdown value. `"All"` and the empty string clear
/// the filter.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidFilter`] for anything that is not a known
/// appointment policy.
pub fn parse_appointment_filter(value: &str) -> Result<Option<AppointmentPolicy>, ConfigError> {
    match value.trim() {
        "" | "All" => Ok(None),
        other => other.parse().map(Some),
    }
}

/// Parse a test-kind dropdown value. `"All"` and the empty string clear the
/// filter.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidFilter`] for anything that is not a known
/// test kind.
pub fn parse_test_kind_filter(value: &str) -> Result<Option<TestKind>, ConfigError> {
    match value.trim() {
        "" | "All" => Ok(None),
        other => other.parse().map(Some),
    }
}

/// Parse the digital-certificate checkbox value.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidFilter`] unless the value is `true`,
/// `false`, `any` or empty.
pub fn parse_certificate_filter(value: &str) -> Result<Option<bool>, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "any" => Ok(None),
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidFilter {
            filter: "dcc".to_string(),
            value: value.to_string(),
        }),
    }
}
