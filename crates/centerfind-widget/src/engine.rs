//! Keeps the map markers and the panel list in sync with the latest results.
//!
//! The engine is the only writer of the id → center and id → marker maps.
//! Everything it knows about a center is keyed by the center's id, and the
//! two maps always hold the same key set.

use std::collections::{HashMap, HashSet};

use centerfind_core::{geo, Center, Coordinates, PanelLayout, SearchResults};

use crate::map::{MapAdapter, MarkerHandle};
use crate::render::{marker_icon, panel_dom_id, CenterPanel, PanelRenderer};

/// What one [`ReconciliationEngine::apply`] call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub added: usize,
    pub removed: usize,
    pub kept: usize,
    /// The selected center disappeared and the selection was cleared.
    pub selection_cleared: bool,
    /// The map was repositioned and the next viewport event will be ignored.
    pub repositioned: bool,
}

pub struct ReconciliationEngine<M, R> {
    map: M,
    renderer: R,
    layout: PanelLayout,
    default_zoom: u8,
    centers: HashMap<String, Center>,
    markers: HashMap<String, MarkerHandle>,
    marker_ids: HashMap<MarkerHandle, String>,
    /// Ids of the latest result set, in response order.
    order: Vec<String>,
    distances: HashMap<String, f64>,
    selected: Option<String>,
    suppress_next_viewport_event: bool,
}

impl<M: MapAdapter, R: PanelRenderer> ReconciliationEngine<M, R> {
    pub fn new(map: M, renderer: R, layout: PanelLayout, default_zoom: u8) -> Self {
        Self {
            map,
            renderer,
            layout,
            default_zoom,
            centers: HashMap::new(),
            markers: HashMap::new(),
            marker_ids: HashMap::new(),
            order: Vec::new(),
            distances: HashMap::new(),
            selected: None,
            suppress_next_viewport_event: false,
        }
    }

    /// Reconciles the tracked centers with `results`.
    ///
    /// Centers already on the map keep their marker and their stored data.
    /// Centers missing from `results` lose both. With `recenter`, the map is
    /// fitted to the result bounds (or centered on the result location) and
    /// the viewport event this causes is suppressed.
    pub fn apply(&mut self, results: &SearchResults, recenter: bool) -> ApplySummary {
        let mut summary = ApplySummary::default();

        let mut incoming = HashSet::with_capacity(results.centers.len());
        self.order.clear();
        for center in &results.centers {
            // First occurrence wins when the backend repeats an id.
            if !incoming.insert(center.id.as_str()) {
                continue;
            }
            self.order.push(center.id.clone());

            if self.centers.contains_key(&center.id) {
                summary.kept += 1;
                continue;
            }
            let handle = self.map.place_marker(
                &center.id,
                center.coordinates,
                &center.name,
                marker_icon(center, false),
            );
            self.marker_ids.insert(handle, center.id.clone());
            self.markers.insert(center.id.clone(), handle);
            self.centers.insert(center.id.clone(), center.clone());
            summary.added += 1;
        }

        let stale: Vec<String> = self
            .centers
            .keys()
            .filter(|id| !incoming.contains(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            if let Some(handle) = self.markers.remove(&id) {
                self.map.remove_marker(handle);
                self.marker_ids.remove(&handle);
            }
            self.centers.remove(&id);
            summary.removed += 1;
        }

        if self
            .selected
            .as_ref()
            .is_some_and(|id| !self.centers.contains_key(id))
        {
            self.selected = None;
            summary.selection_cleared = true;
        }

        self.distances.clear();
        for center in &results.centers {
            let Some(tracked) = self.centers.get(&center.id) else {
                continue;
            };
            let distance = results
                .location
                .map(|origin| geo::distance(origin, tracked.coordinates))
                .or(center.distance);
            if let Some(distance) = distance {
                self.distances.entry(center.id.clone()).or_insert(distance);
            }
        }

        if recenter {
            summary.repositioned = self.reposition(results);
        }

        self.render_panels();

        tracing::info!(
            added = summary.added,
            removed = summary.removed,
            kept = summary.kept,
            selection_cleared = summary.selection_cleared,
            "applied search results"
        );
        summary
    }

    fn reposition(&mut self, results: &SearchResults) -> bool {
        if let Some(bounds) = results.bounds {
            self.suppress_next_viewport_event = true;
            self.map.fit_bounds(bounds);
            true
        } else if let Some(location) = results.location {
            self.suppress_next_viewport_event = true;
            self.map.recenter(location, self.default_zoom);
            true
        } else {
            false
        }
    }

    /// Handles a click on a marker. Returns the id of the clicked center, or
    /// `None` for a handle the engine no longer tracks.
    pub fn route_marker_click(&mut self, marker: MarkerHandle) -> Option<String> {
        let id = self.marker_ids.get(&marker)?.clone();
        self.select(&id, false, true);
        Some(id)
    }

    /// Toggles the selection of `id`: selects it, or clears the selection if
    /// it was already selected. Unknown ids are ignored.
    ///
    /// `recenter_map` moves the map onto the center. That move is an ordinary
    /// viewport change and triggers a regular search.
    pub fn select(&mut self, id: &str, recenter_map: bool, reveal_panel: bool) -> bool {
        if !self.centers.contains_key(id) {
            tracing::debug!(id, "ignoring selection of unknown center");
            return false;
        }
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        } else {
            self.selected = Some(id.to_string());
        }
        self.show_selection(recenter_map, reveal_panel);
        true
    }

    /// Selects `id` without toggling and moves the map onto it. Used when the
    /// user picks a center from the panel list.
    pub fn focus(&mut self, id: &str) -> bool {
        if !self.centers.contains_key(id) {
            tracing::debug!(id, "ignoring focus on unknown center");
            return false;
        }
        self.selected = Some(id.to_string());
        self.show_selection(true, false);
        true
    }

    pub fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.refresh_marker_icons();
            self.render_panels();
        }
    }

    fn show_selection(&mut self, recenter_map: bool, reveal_panel: bool) {
        self.refresh_marker_icons();
        if let Some(center) = self.selected() {
            let coordinates = center.coordinates;
            let dom_id = panel_dom_id(&center.id);
            if recenter_map {
                self.map.recenter(coordinates, self.default_zoom);
            }
            self.render_panels();
            if reveal_panel {
                self.renderer.reveal_panel(&dom_id);
            }
        } else {
            self.render_panels();
        }
    }

    fn refresh_marker_icons(&mut self) {
        for (id, handle) in &self.markers {
            if let Some(center) = self.centers.get(id) {
                let is_selected = self.selected.as_deref() == Some(id.as_str());
                self.map
                    .set_marker_icon(*handle, marker_icon(center, is_selected));
            }
        }
    }

    fn render_panels(&mut self) {
        self.renderer.clear_panels();
        for id in self.displayed_order() {
            if let Some(center) = self.centers.get(&id) {
                let panel = CenterPanel::new(center, self.distances.get(&id).copied());
                let is_selected = self.selected.as_deref() == Some(id.as_str());
                self.renderer.render_panel(&panel, is_selected);
            }
        }
    }

    /// Ids of the panels currently shown, top to bottom.
    #[must_use]
    pub fn displayed_order(&self) -> Vec<String> {
        match self.layout {
            PanelLayout::SelectedOnly => self.selected.iter().cloned().collect(),
            PanelLayout::NearestFirst => {
                let mut ids: Vec<String> = self
                    .order
                    .iter()
                    .filter(|id| self.centers.contains_key(*id))
                    .cloned()
                    .collect();
                // Stable: equal distances keep response order. Unknown
                // distances go last.
                ids.sort_by(|a, b| {
                    let da = self.distances.get(a).copied().unwrap_or(f64::INFINITY);
                    let db = self.distances.get(b).copied().unwrap_or(f64::INFINITY);
                    da.total_cmp(&db)
                });
                if let Some(selected) = &self.selected {
                    if let Some(pos) = ids.iter().position(|id| id == selected) {
                        let id = ids.remove(pos);
                        ids.insert(0, id);
                    }
                }
                ids
            }
        }
    }

    /// Consumes the one-shot flag set by a programmatic reposition. Returns
    /// `true` if the current viewport event must not trigger a search.
    pub fn take_viewport_suppression(&mut self) -> bool {
        std::mem::take(&mut self.suppress_next_viewport_event)
    }

    /// Moves the map without arming the suppression flag.
    pub fn recenter_map(&mut self, coordinates: Coordinates) {
        self.map.recenter(coordinates, self.default_zoom);
    }

    pub fn centers(&self) -> impl Iterator<Item = &Center> {
        self.centers.values()
    }

    #[must_use]
    pub fn center(&self, id: &str) -> Option<&Center> {
        self.centers.get(id)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Center> {
        self.selected.as_deref().and_then(|id| self.centers.get(id))
    }

    #[must_use]
    pub fn distance_km(&self, id: &str) -> Option<f64> {
        self.distances.get(id).copied()
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn marker_for(&self, id: &str) -> Option<MarkerHandle> {
        self.markers.get(id).copied()
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
