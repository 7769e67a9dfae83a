use crate::centers::Coordinates;

/// How the detail-panel list is populated after each result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanelLayout {
    /// Only the selected center, or nothing.
    SelectedOnly,
    /// Every current center, nearest first, with the selection pinned on top.
    #[default]
    NearestFirst,
}

impl std::fmt::Display for PanelLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PanelLayout::SelectedOnly => write!(f, "selected"),
            PanelLayout::NearestFirst => write!(f, "nearest"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub viewport_debounce_ms: u64,
    pub default_zoom: u8,
    pub panel_layout: PanelLayout,
    pub report_close_delay_ms: u64,
    /// Where the map starts before geolocation or a search moves it.
    pub initial_center: Coordinates,
}
