//! Display strings shown next to center data and in the error region.

use crate::centers::{AppointmentPolicy, TestKind};

pub const UNKNOWN_LABEL: &str = "Unknown";

/// Label of the catch-all entry in the filter dropdowns.
pub const ALL_LABEL: &str = "All";

/// Appointment dropdown entries in display order; `None` is the "All" entry.
pub const APPOINTMENT_OPTIONS: [Option<AppointmentPolicy>; 4] = [
    None,
    Some(AppointmentPolicy::Required),
    Some(AppointmentPolicy::Possible),
    Some(AppointmentPolicy::NotRequired),
];

/// Test-kind dropdown entries in display order; `None` is the "All" entry.
pub const TEST_KIND_OPTIONS: [Option<TestKind>; 4] = [
    None,
    Some(TestKind::Antigen),
    Some(TestKind::Pcr),
    Some(TestKind::Vaccination),
];

#[must_use]
pub fn appointment_label(policy: AppointmentPolicy) -> &'static str {
    match policy {
        AppointmentPolicy::Required => "Required",
        AppointmentPolicy::Possible => "Possible",
        AppointmentPolicy::NotRequired => "Not required",
        AppointmentPolicy::Unknown => UNKNOWN_LABEL,
    }
}

#[must_use]
pub fn test_kind_label(kind: TestKind) -> &'static str {
    match kind {
        TestKind::Antigen => "Antigen test",
        TestKind::Pcr => "PCR test",
        TestKind::Vaccination => "Vaccination",
    }
}

/// Comma-separated kind labels, or [`UNKNOWN_LABEL`] for an empty list.
#[must_use]
pub fn test_kinds_label(kinds: &[TestKind]) -> String {
    if kinds.is_empty() {
        return UNKNOWN_LABEL.to_string();
    }
    kinds
        .iter()
        .map(|k| test_kind_label(*k))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Translate a backend error message into the text shown to the user.
///
/// Messages the backend is known to send have a fixed translation; anything
/// else passes through verbatim.
#[must_use]
pub fn error_message(message: &str) -> String {
    match message {
        "no search parameters given" => "Missing search parameters".to_string(),
        "no results" => "The address could not be found".to_string(),
        "too many results" => "Too many results, please refine your search".to_string(),
        other => other.to_string(),
    }
}
