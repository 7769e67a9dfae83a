//! Wire and domain types for test/vaccination centers.
//!
//! Field names follow the backend JSON contract (`uuid`, `appointment`,
//! `dcc`, `logo`, `marker`); the Rust names describe what the field means.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::geo;
use crate::ConfigError;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A rectangular map region given by its north-east and south-west corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub north_east: Coordinates,
    pub south_west: Coordinates,
}

impl Bounds {
    #[must_use]
    pub const fn new(north_east: Coordinates, south_west: Coordinates) -> Self {
        Self {
            north_east,
            south_west,
        }
    }

    /// Midpoint of the two corners.
    #[must_use]
    pub fn center(&self) -> Coordinates {
        Coordinates::new(
            (self.north_east.latitude + self.south_west.latitude) / 2.0,
            (self.north_east.longitude + self.south_west.longitude) / 2.0,
        )
    }

    /// Great-circle distance in kilometres from [`Bounds::center`] to the
    /// north-east corner. Used as the search distance for a viewport.
    #[must_use]
    pub fn radius_km(&self) -> f64 {
        geo::distance(self.center(), self.north_east)
    }
}

/// Whether a center expects visitors to book an appointment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentPolicy {
    Required,
    Possible,
    NotRequired,
    #[default]
    Unknown,
}

impl AppointmentPolicy {
    /// Wire value used in query parameters. `Unknown` has no wire form.
    #[must_use]
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            AppointmentPolicy::Required => Some("Required"),
            AppointmentPolicy::Possible => Some("Possible"),
            AppointmentPolicy::NotRequired => Some("NotRequired"),
            AppointmentPolicy::Unknown => None,
        }
    }
}

impl FromStr for AppointmentPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Required" => Ok(AppointmentPolicy::Required),
            "Possible" => Ok(AppointmentPolicy::Possible),
            "NotRequired" => Ok(AppointmentPolicy::NotRequired),
            other => Err(ConfigError::InvalidFilter {
                filter: "appointment".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Kind of test (or vaccination) a center offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestKind {
    Antigen,
    #[serde(rename = "PCR")]
    Pcr,
    Vaccination,
}

impl TestKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TestKind::Antigen => "Antigen",
            TestKind::Pcr => "PCR",
            TestKind::Vaccination => "Vaccination",
        }
    }
}

impl FromStr for TestKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Antigen" => Ok(TestKind::Antigen),
            "PCR" => Ok(TestKind::Pcr),
            "Vaccination" => Ok(TestKind::Vaccination),
            other => Err(ConfigError::InvalidFilter {
                filter: "kind".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// A test/vaccination location as returned by the centers search.
///
/// `id` is the only identity key: two values with the same id are the same
/// center, whatever their other fields say.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Center {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub address_note: Option<String>,
    #[serde(rename = "appointment", default, deserialize_with = "appointment_or_unknown")]
    pub appointment_policy: AppointmentPolicy,
    #[serde(default, deserialize_with = "known_test_kinds")]
    pub test_kinds: Vec<TestKind>,
    #[serde(default)]
    pub website: Option<String>,
    /// Display lines in backend order; `None` means the hours are unknown.
    #[serde(default)]
    pub opening_hours: Option<Vec<String>>,
    #[serde(rename = "dcc", default, deserialize_with = "null_as_default")]
    pub has_digital_certificate: bool,
    #[serde(rename = "logo", default)]
    pub logo_url: Option<String>,
    #[serde(rename = "marker", default)]
    pub custom_marker_url: Option<String>,
    pub coordinates: Coordinates,
    /// Distance in km as computed by the backend, if it sent one.
    #[serde(default)]
    pub distance: Option<f64>,
}

/// Body of a successful `GET /api/centers` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResults {
    #[serde(default, deserialize_with = "null_as_default")]
    pub centers: Vec<Center>,
    #[serde(default)]
    pub error: Option<String>,
    /// Query point the results were searched around.
    #[serde(default)]
    pub location: Option<Coordinates>,
    #[serde(default)]
    pub bounds: Option<Bounds>,
}

/// Body of a successful `GET /api/centers/bounds` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeResults {
    /// Canonical form of the searched address.
    pub address: String,
    pub bounds: Bounds,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn appointment_or_unknown<'de, D>(deserializer: D) -> Result<AppointmentPolicy, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| s.parse::<AppointmentPolicy>().ok())
        .unwrap_or_default())
}

fn known_test_kinds<'de, D>(deserializer: D) -> Result<Vec<TestKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    let mut kinds: Vec<TestKind> = Vec::with_capacity(raw.len());
    for kind in raw.iter().filter_map(|s| s.parse::<TestKind>().ok()) {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}
