//! Panel view model and the renderer boundary.

use centerfind_core::labels::{appointment_label, test_kinds_label};
use centerfind_core::Center;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

pub const SELECTED_MARKER_ICON: &str = "https://maps.google.com/mapfiles/ms/icons/green-dot.png";
pub const CERTIFICATE_MARKER_ICON: &str = "/img/eu_marker.png";
pub const DEFAULT_MARKER_ICON: &str = "https://maps.google.com/mapfiles/ms/icons/blue-dot.png";

const ROUTE_BASE_URL: &str = "https://www.google.com/maps/dir/?api=1&travelmode=walking&destination=";

/// Icon for a center's marker.
///
/// Precedence: selection highlight, the center's own marker, the
/// digital-certificate marker, the default marker.
#[must_use]
pub fn marker_icon(center: &Center, is_selected: bool) -> &str {
    if is_selected {
        return SELECTED_MARKER_ICON;
    }
    if let Some(custom) = non_empty(center.custom_marker_url.as_deref()) {
        return custom;
    }
    if center.has_digital_certificate {
        return CERTIFICATE_MARKER_ICON;
    }
    DEFAULT_MARKER_ICON
}

/// Walking directions link to `address`.
#[must_use]
pub fn route_url(address: &str) -> String {
    format!(
        "{ROUTE_BASE_URL}{}",
        utf8_percent_encode(address, NON_ALPHANUMERIC)
    )
}

/// Element id of a center's panel.
#[must_use]
pub fn panel_dom_id(center_id: &str) -> String {
    format!("center_{center_id}")
}

/// Everything a renderer needs to draw one center's detail panel.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterPanel {
    pub dom_id: String,
    pub center_id: String,
    pub name: String,
    pub address: String,
    pub address_note: Option<String>,
    pub appointment: &'static str,
    pub test_kinds: String,
    pub logo_url: Option<String>,
    pub certificate_badge: bool,
    pub website: Option<String>,
    /// `None` renders the "no opening hours" affordance.
    pub opening_hours: Option<Vec<String>>,
    pub route_url: String,
    /// Kilometres from the last query point, when known.
    pub distance_km: Option<f64>,
}

impl CenterPanel {
    #[must_use]
    pub fn new(center: &Center, distance_km: Option<f64>) -> Self {
        Self {
            dom_id: panel_dom_id(&center.id),
            center_id: center.id.clone(),
            name: center.name.clone(),
            address: center.address.clone(),
            address_note: owned_non_empty(center.address_note.as_deref()),
            appointment: appointment_label(center.appointment_policy),
            test_kinds: test_kinds_label(&center.test_kinds),
            logo_url: owned_non_empty(center.logo_url.as_deref()),
            certificate_badge: center.has_digital_certificate,
            website: owned_non_empty(center.website.as_deref()),
            opening_hours: center
                .opening_hours
                .clone()
                .filter(|hours| !hours.is_empty()),
            route_url: route_url(&center.address),
            distance_km,
        }
    }
}

/// State of the problem-report panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportPanelState {
    #[default]
    Hidden,
    Editing,
    Submitted,
}

/// Host-side rendering of the panel list, the error region, the search input,
/// and the report panel.
pub trait PanelRenderer: Send {
    fn render_panel(&mut self, panel: &CenterPanel, is_selected: bool);

    fn clear_panels(&mut self);

    /// Scrolls the panel with `dom_id` into view.
    fn reveal_panel(&mut self, dom_id: &str);

    /// Replaces the content of the single error region.
    fn show_error(&mut self, message: &str);

    fn clear_error(&mut self);

    fn set_search_text(&mut self, text: &str);

    fn set_report_panel(&mut self, state: ReportPanelState);
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn owned_non_empty(value: Option<&str>) -> Option<String> {
    non_empty(value).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use centerfind_core::{AppointmentPolicy, Coordinates, TestKind};

    use super::*;

    fn center() -> Center {
        Center {
            id: "c-1".to_string(),
            name: "Testzentrum Mitte".to_string(),
            address: "Unter den Linden 1, Berlin".to_string(),
            address_note: Some(String::new()),
            appointment_policy: AppointmentPolicy::Unknown,
            test_kinds: vec![],
            website: Some("https://example.org".to_string()),
            opening_hours: None,
            has_digital_certificate: false,
            logo_url: None,
            custom_marker_url: None,
            coordinates: Coordinates::new(52.517, 13.388),
            distance: None,
        }
    }

    #[test]
    fn selected_icon_wins_over_everything() {
        let mut c = center();
        c.custom_marker_url = Some("https://cdn.example.org/m.png".to_string());
        c.has_digital_certificate = true;
        assert_eq!(marker_icon(&c, true), SELECTED_MARKER_ICON);
    }

    #[test]
    fn custom_marker_beats_certificate_marker() {
        let mut c = center();
        c.custom_marker_url = Some("https://cdn.example.org/m.png".to_string());
        c.has_digital_certificate = true;
        assert_eq!(marker_icon(&c, false), "https://cdn.example.org/m.png");
    }

    #[test]
    fn empty_custom_marker_is_ignored() {
        let mut c = center();
        c.custom_marker_url = Some(String::new());
        assert_eq!(marker_icon(&c, false), DEFAULT_MARKER_ICON);
        c.has_digital_certificate = true;
        assert_eq!(marker_icon(&c, false), CERTIFICATE_MARKER_ICON);
    }

    #[test]
    fn panel_uses_unknown_labels_and_drops_empty_fields() {
        let panel = CenterPanel::new(&center(), Some(1.5));
        assert_eq!(panel.dom_id, "center_c-1");
        assert_eq!(panel.appointment, "Unknown");
        assert_eq!(panel.test_kinds, "Unknown");
        assert_eq!(panel.address_note, None);
        assert_eq!(panel.opening_hours, None);
        assert_eq!(panel.website.as_deref(), Some("https://example.org"));
    }

    #[test]
    fn panel_lists_kinds() {
        let mut c = center();
        c.test_kinds = vec![TestKind::Antigen, TestKind::Vaccination];
        c.opening_hours = Some(vec!["Mo-Fr 08:00-18:00".to_string()]);
        let panel = CenterPanel::new(&c, None);
        assert_eq!(panel.test_kinds, "Antigen test, Vaccination");
        assert_eq!(panel.opening_hours.map(|h| h.len()), Some(1));
    }

    #[test]
    fn route_url_encodes_address() {
        assert_eq!(
            route_url("Unter den Linden 1, Berlin"),
            "https://www.google.com/maps/dir/?api=1&travelmode=walking&destination=Unter%20den%20Linden%201%2C%20Berlin"
        );
    }
}
