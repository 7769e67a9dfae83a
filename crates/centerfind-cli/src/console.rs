//! Terminal stand-ins for the map, the panel list and device geolocation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use centerfind_core::{Bounds, Coordinates};
use centerfind_widget::{
    CenterPanel, Geolocator, MapAdapter, MarkerHandle, PanelRenderer, ReportPanelState,
    WidgetEvent, WidgetHandle,
};

/// Visible area around `center` at `zoom`, using the web-map convention that
/// each zoom level halves the span.
pub(crate) fn viewport_around(center: Coordinates, zoom: u8) -> Bounds {
    let half_span = 180.0 / 2f64.powi(i32::from(zoom));
    Bounds::new(
        Coordinates::new(
            (center.latitude + half_span / 2.0).min(90.0),
            center.longitude + half_span,
        ),
        Coordinates::new(
            (center.latitude - half_span / 2.0).max(-90.0),
            center.longitude - half_span,
        ),
    )
}

/// Simulated map. Programmatic moves update the viewport and are reported
/// back to the widget like a real map's bounds-changed event.
pub(crate) struct ConsoleMap {
    viewport: Bounds,
    next_marker: u64,
    markers: HashMap<MarkerHandle, String>,
    events: WidgetHandle,
}

impl ConsoleMap {
    pub(crate) fn new(initial_center: Coordinates, zoom: u8, events: WidgetHandle) -> Self {
        Self {
            viewport: viewport_around(initial_center, zoom),
            next_marker: 0,
            markers: HashMap::new(),
            events,
        }
    }

    fn moved(&self) {
        if !self.events.send(WidgetEvent::ViewportChanged) {
            tracing::debug!("widget gone; viewport change dropped");
        }
    }
}

impl MapAdapter for ConsoleMap {
    fn place_marker(
        &mut self,
        id: &str,
        coordinates: Coordinates,
        title: &str,
        icon_url: &str,
    ) -> MarkerHandle {
        self.next_marker += 1;
        let handle = MarkerHandle(self.next_marker);
        tracing::debug!(
            id,
            title,
            icon_url,
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "marker placed"
        );
        self.markers.insert(handle, id.to_string());
        handle
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        if let Some(id) = self.markers.remove(&marker) {
            tracing::debug!(id, "marker removed");
        }
    }

    fn set_marker_icon(&mut self, marker: MarkerHandle, icon_url: &str) {
        if let Some(id) = self.markers.get(&marker) {
            tracing::trace!(id, icon_url, "marker icon set");
        }
    }

    fn recenter(&mut self, coordinates: Coordinates, zoom: u8) {
        self.viewport = viewport_around(coordinates, zoom);
        self.moved();
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.viewport = bounds;
        self.moved();
    }

    fn viewport(&self) -> Option<Bounds> {
        Some(self.viewport)
    }
}

/// What the console renderer would currently show.
#[derive(Debug, Clone, Default)]
pub(crate) struct ConsoleView {
    pub panels: Vec<(CenterPanel, bool)>,
    pub error: Option<String>,
    pub search_text: Option<String>,
    pub report_panel: ReportPanelState,
}

/// Renderer that records into a shared [`ConsoleView`] for printing once the
/// command is done.
#[derive(Clone, Default)]
pub(crate) struct ConsoleRenderer {
    view: Arc<Mutex<ConsoleView>>,
}

impl ConsoleRenderer {
    pub(crate) fn snapshot(&self) -> ConsoleView {
        self.view().clone()
    }

    fn view(&self) -> MutexGuard<'_, ConsoleView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PanelRenderer for ConsoleRenderer {
    fn render_panel(&mut self, panel: &CenterPanel, is_selected: bool) {
        self.view().panels.push((panel.clone(), is_selected));
    }

    fn clear_panels(&mut self) {
        self.view().panels.clear();
    }

    fn reveal_panel(&mut self, dom_id: &str) {
        tracing::debug!(dom_id, "panel revealed");
    }

    fn show_error(&mut self, message: &str) {
        self.view().error = Some(message.to_string());
    }

    fn clear_error(&mut self) {
        self.view().error = None;
    }

    fn set_search_text(&mut self, text: &str) {
        self.view().search_text = Some(text.to_string());
    }

    fn set_report_panel(&mut self, state: ReportPanelState) {
        self.view().report_panel = state;
    }
}

/// Geolocation that always reports the same position.
pub(crate) struct FixedPosition(pub Coordinates);

impl Geolocator for FixedPosition {
    fn current_position(&mut self) -> Option<Coordinates> {
        Some(self.0)
    }
}

/// Prints the search input, the panel list and the error region.
pub(crate) fn print_view(view: &ConsoleView) {
    if let Some(text) = view.search_text.as_deref().filter(|t| !t.is_empty()) {
        println!("Search: {text}");
    }
    if let Some(error) = &view.error {
        println!("Error: {error}");
    }
    if view.panels.is_empty() {
        println!("no centers found");
        return;
    }
    println!("{} center(s)", view.panels.len());
    for (n, (panel, is_selected)) in view.panels.iter().enumerate() {
        println!();
        print_panel(n + 1, panel, *is_selected);
    }
}

fn print_panel(position: usize, panel: &CenterPanel, is_selected: bool) {
    let distance = panel
        .distance_km
        .map(|d| format!("  ({d:.1} km)"))
        .unwrap_or_default();
    let marker = if is_selected { "  [selected]" } else { "" };
    println!("{position:>3}. {}{distance}{marker}", panel.name);
    println!("     id: {}", panel.center_id);
    println!("     {}", panel.address);
    if let Some(note) = &panel.address_note {
        println!("     {note}");
    }
    let certificate = if panel.certificate_badge {
        " | EU digital certificate"
    } else {
        ""
    };
    println!(
        "     Appointment: {} | Offers: {}{certificate}",
        panel.appointment, panel.test_kinds
    );
    match &panel.opening_hours {
        Some(hours) => println!("     Hours: {}", hours.join("; ")),
        None => println!("     Hours: not available"),
    }
    if let Some(website) = &panel.website {
        println!("     Website: {website}");
    }
    println!("     Route: {}", panel.route_url);
}
