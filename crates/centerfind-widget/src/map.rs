//! Boundary to the host's map widget and geolocation API.

use centerfind_core::{Bounds, Coordinates};

/// Opaque reference to a marker placed on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

/// Viewport and marker primitives of the host map.
///
/// Implementations report user and programmatic viewport changes by sending
/// [`crate::WidgetEvent::ViewportChanged`] through a [`crate::WidgetHandle`],
/// and marker clicks as [`crate::WidgetEvent::MarkerClicked`] with the handle
/// returned from [`MapAdapter::place_marker`].
pub trait MapAdapter: Send {
    fn place_marker(
        &mut self,
        id: &str,
        coordinates: Coordinates,
        title: &str,
        icon_url: &str,
    ) -> MarkerHandle;

    /// Removes the marker and drops every listener attached to it.
    fn remove_marker(&mut self, marker: MarkerHandle);

    fn set_marker_icon(&mut self, marker: MarkerHandle, icon_url: &str);

    fn recenter(&mut self, coordinates: Coordinates, zoom: u8);

    fn fit_bounds(&mut self, bounds: Bounds);

    /// Currently visible region, or `None` before the map has a viewport.
    fn viewport(&self) -> Option<Bounds>;
}

/// Device position lookup. A failed or denied lookup yields `None`.
pub trait Geolocator: Send {
    fn current_position(&mut self) -> Option<Coordinates>;
}
