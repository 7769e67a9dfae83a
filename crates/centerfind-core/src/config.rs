use crate::app_config::{AppConfig, PanelLayout};
use crate::centers::Coordinates;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load configuration from the process environment with an explicit backend
/// URL taking precedence over `CENTERFIND_API_BASE_URL`.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_with_base_url(api_base_url: Option<&str>) -> Result<AppConfig, ConfigError> {
    build_app_config(|key| match api_base_url {
        Some(url) if key == "CENTERFIND_API_BASE_URL" => Ok(url.to_string()),
        _ => std::env::var(key),
    })
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let api_base_url = require("CENTERFIND_API_BASE_URL")?;
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(invalid(
            "CENTERFIND_API_BASE_URL",
            format!("'{api_base_url}' is not an http(s) URL"),
        ));
    }

    let log_level = or_default("CENTERFIND_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("CENTERFIND_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("CENTERFIND_USER_AGENT", "centerfind/0.1 (center-search)");
    let viewport_debounce_ms = parse_u64("CENTERFIND_VIEWPORT_DEBOUNCE_MS", "500")?;

    let default_zoom = or_default("CENTERFIND_DEFAULT_ZOOM", "15")
        .parse::<u8>()
        .map_err(|e| invalid("CENTERFIND_DEFAULT_ZOOM", e.to_string()))?;
    if default_zoom > 22 {
        return Err(invalid(
            "CENTERFIND_DEFAULT_ZOOM",
            format!("zoom level {default_zoom} is above the maximum of 22"),
        ));
    }

    let panel_layout = parse_panel_layout(&or_default("CENTERFIND_PANEL_LAYOUT", "nearest"))?;
    let report_close_delay_ms = parse_u64("CENTERFIND_REPORT_CLOSE_DELAY_MS", "3000")?;

    let latitude = parse_f64("CENTERFIND_INITIAL_LATITUDE", "52.516321")?;
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(invalid(
            "CENTERFIND_INITIAL_LATITUDE",
            format!("{latitude} is outside [-90, 90]"),
        ));
    }
    let longitude = parse_f64("CENTERFIND_INITIAL_LONGITUDE", "13.377702")?;
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(invalid(
            "CENTERFIND_INITIAL_LONGITUDE",
            format!("{longitude} is outside [-180, 180]"),
        ));
    }

    Ok(AppConfig {
        api_base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        viewport_debounce_ms,
        default_zoom,
        panel_layout,
        report_close_delay_ms,
        initial_center: Coordinates::new(latitude, longitude),
    })
}

/// Parse a string into a `PanelLayout` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for values other than `nearest` and
/// `selected`.
pub fn parse_panel_layout(s: &str) -> Result<PanelLayout, ConfigError> {
    match s.trim() {
        "nearest" => Ok(PanelLayout::NearestFirst),
        "selected" => Ok(PanelLayout::SelectedOnly),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CENTERFIND_PANEL_LAYOUT".to_string(),
            reason: format!("unknown panel layout '{other}'; expected 'nearest' or 'selected'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
