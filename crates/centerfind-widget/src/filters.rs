//! Current filter selection and partial updates to it.

use centerfind_core::filters::{
    parse_appointment_filter, parse_certificate_filter, parse_test_kind_filter,
};
use centerfind_core::{AppointmentPolicy, ConfigError, SearchFilters, TestKind};

/// Partial filter update. `None` leaves a field unchanged; `Some(None)` resets
/// it to "no constraint".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterUpdate {
    pub appointment_policy: Option<Option<AppointmentPolicy>>,
    pub test_kind: Option<Option<TestKind>>,
    pub require_digital_certificate: Option<Option<bool>>,
}

impl FilterUpdate {
    #[must_use]
    pub fn appointment(policy: Option<AppointmentPolicy>) -> Self {
        Self {
            appointment_policy: Some(policy),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn test_kind(kind: Option<TestKind>) -> Self {
        Self {
            test_kind: Some(kind),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn certificate(required: Option<bool>) -> Self {
        Self {
            require_digital_certificate: Some(required),
            ..Self::default()
        }
    }

    /// Builds an update from raw dropdown or flag values. Absent values leave
    /// their field unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFilter`] for an unrecognised value.
    pub fn parse(
        appointment: Option<&str>,
        test_kind: Option<&str>,
        certificate: Option<&str>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            appointment_policy: appointment.map(parse_appointment_filter).transpose()?,
            test_kind: test_kind.map(parse_test_kind_filter).transpose()?,
            require_digital_certificate: certificate.map(parse_certificate_filter).transpose()?,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The filter selection shared by every search the widget starts.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterState {
    current: SearchFilters,
}

impl FilterState {
    #[must_use]
    pub fn new(initial: SearchFilters) -> Self {
        Self { current: initial }
    }

    #[must_use]
    pub fn get(&self) -> SearchFilters {
        self.current
    }

    /// Merges `update` and returns whether any field changed.
    pub fn set(&mut self, update: FilterUpdate) -> bool {
        let before = self.current;
        if let Some(policy) = update.appointment_policy {
            self.current.appointment_policy = policy;
        }
        if let Some(kind) = update.test_kind {
            self.current.test_kind = kind;
        }
        if let Some(required) = update.require_digital_certificate {
            self.current.require_digital_certificate = required;
        }
        before != self.current
    }
}
