pub mod app_config;
pub mod centers;
pub mod config;
pub mod filters;
pub mod geo;
pub mod labels;

use thiserror::Error;

pub use app_config::{AppConfig, PanelLayout};
pub use centers::{
    AppointmentPolicy, Bounds, Center, Coordinates, GeocodeResults, SearchResults, TestKind,
};
pub use config::{load_app_config, load_app_config_from_env, load_app_config_with_base_url};
pub use filters::SearchFilters;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid {filter} filter value '{value}'")]
    InvalidFilter { filter: String, value: String },
}
