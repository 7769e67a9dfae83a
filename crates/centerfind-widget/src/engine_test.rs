use centerfind_core::{AppointmentPolicy, Bounds, Coordinates};

use super::*;
use crate::render::{ReportPanelState, DEFAULT_MARKER_ICON, SELECTED_MARKER_ICON};

#[derive(Debug, Clone, PartialEq)]
enum MapCall {
    Place(String),
    Remove(MarkerHandle),
    Icon(MarkerHandle, String),
    Recenter(Coordinates, u8),
    Fit(Bounds),
}

#[derive(Default)]
struct FakeMap {
    next_handle: u64,
    calls: Vec<MapCall>,
}

impl FakeMap {
    fn places(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, MapCall::Place(_))).count()
    }

    fn removes(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, MapCall::Remove(_))).count()
    }

    fn moves(&self) -> Vec<&MapCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, MapCall::Recenter(..) | MapCall::Fit(_)))
            .collect()
    }

    fn last_icon(&self, marker: MarkerHandle) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            MapCall::Icon(h, icon) if *h == marker => Some(icon.as_str()),
            _ => None,
        })
    }
}

impl MapAdapter for FakeMap {
    fn place_marker(&mut self, id: &str, _: Coordinates, _: &str, _: &str) -> MarkerHandle {
        self.next_handle += 1;
        self.calls.push(MapCall::Place(id.to_string()));
        MarkerHandle(self.next_handle)
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        self.calls.push(MapCall::Remove(marker));
    }

    fn set_marker_icon(&mut self, marker: MarkerHandle, icon_url: &str) {
        self.calls.push(MapCall::Icon(marker, icon_url.to_string()));
    }

    fn recenter(&mut self, coordinates: Coordinates, zoom: u8) {
        self.calls.push(MapCall::Recenter(coordinates, zoom));
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.calls.push(MapCall::Fit(bounds));
    }

    fn viewport(&self) -> Option<Bounds> {
        None
    }
}

#[derive(Default)]
struct FakeRenderer {
    /// Panels of the latest render, top to bottom.
    panels: Vec<(String, bool)>,
    revealed: Vec<String>,
}

impl PanelRenderer for FakeRenderer {
    fn render_panel(&mut self, panel: &CenterPanel, is_selected: bool) {
        self.panels.push((panel.center_id.clone(), is_selected));
    }

    fn clear_panels(&mut self) {
        self.panels.clear();
    }

    fn reveal_panel(&mut self, dom_id: &str) {
        self.revealed.push(dom_id.to_string());
    }

    fn show_error(&mut self, _: &str) {}

    fn clear_error(&mut self) {}

    fn set_search_text(&mut self, _: &str) {}

    fn set_report_panel(&mut self, _: ReportPanelState) {}
}

type TestEngine = ReconciliationEngine<FakeMap, FakeRenderer>;

fn engine(layout: PanelLayout) -> TestEngine {
    ReconciliationEngine::new(FakeMap::default(), FakeRenderer::default(), layout, 15)
}

fn center(id: &str, latitude: f64, longitude: f64) -> Center {
    Center {
        id: id.to_string(),
        name: format!("Center {id}"),
        address: format!("{id} Street 1"),
        address_note: None,
        appointment_policy: AppointmentPolicy::Unknown,
        test_kinds: vec![],
        website: None,
        opening_hours: None,
        has_digital_certificate: false,
        logo_url: None,
        custom_marker_url: None,
        coordinates: Coordinates::new(latitude, longitude),
        distance: None,
    }
}

fn results(centers: Vec<Center>) -> SearchResults {
    SearchResults {
        centers,
        ..SearchResults::default()
    }
}

fn ids(engine: &TestEngine) -> Vec<String> {
    let mut ids: Vec<String> = engine.centers().map(|c| c.id.clone()).collect();
    ids.sort();
    ids
}

fn panel_ids(engine: &mut TestEngine) -> Vec<String> {
    engine
        .renderer_mut()
        .panels
        .iter()
        .map(|(id, _)| id.clone())
        .collect()
}

#[test]
fn first_apply_places_one_marker_per_center() {
    let mut engine = engine(PanelLayout::NearestFirst);
    let summary = engine.apply(
        &results(vec![center("a", 52.5, 13.4), center("b", 52.6, 13.4)]),
        false,
    );

    assert_eq!(summary.added, 2);
    assert_eq!(engine.marker_count(), 2);
    assert_eq!(ids(&engine), vec!["a", "b"]);
}

#[test]
fn applying_the_same_results_twice_changes_nothing() {
    let mut engine = engine(PanelLayout::NearestFirst);
    let r = results(vec![center("a", 52.5, 13.4), center("b", 52.6, 13.4)]);
    engine.apply(&r, false);
    let calls_after_first = engine.map().calls.len();

    let summary = engine.apply(&r, false);

    assert_eq!(summary.added, 0);
    assert_eq!(summary.removed, 0);
    assert_eq!(summary.kept, 2);
    assert_eq!(engine.map().calls.len(), calls_after_first);
    assert_eq!(engine.marker_count(), 2);
}

#[test]
fn overlapping_results_only_touch_the_difference() {
    let mut engine = engine(PanelLayout::NearestFirst);
    engine.apply(
        &results(vec![center("a", 52.5, 13.4), center("b", 52.6, 13.4)]),
        false,
    );
    let b_marker = engine.marker_for("b").unwrap();

    let summary = engine.apply(
        &results(vec![center("b", 52.6, 13.4), center("c", 52.7, 13.4)]),
        false,
    );

    assert_eq!((summary.added, summary.removed, summary.kept), (1, 1, 1));
    assert_eq!(ids(&engine), vec!["b", "c"]);
    assert_eq!(engine.marker_for("b"), Some(b_marker));
    assert_eq!(engine.map().places(), 3);
    assert_eq!(engine.map().removes(), 1);
}

#[test]
fn known_centers_keep_their_stored_data() {
    let mut engine = engine(PanelLayout::NearestFirst);
    engine.apply(&results(vec![center("a", 52.5, 13.4)]), false);

    let mut renamed = center("a", 52.5, 13.4);
    renamed.name = "Renamed".to_string();
    engine.apply(&results(vec![renamed]), false);

    assert_eq!(engine.center("a").unwrap().name, "Center a");
}

#[test]
fn empty_results_remove_everything() {
    let mut engine = engine(PanelLayout::NearestFirst);
    engine.apply(
        &results(vec![center("a", 52.5, 13.4), center("b", 52.6, 13.4)]),
        false,
    );
    engine.select("a", false, false);

    let summary = engine.apply(&SearchResults::default(), false);

    assert_eq!(summary.removed, 2);
    assert!(summary.selection_cleared);
    assert_eq!(engine.marker_count(), 0);
    assert!(engine.selected().is_none());
    assert!(panel_ids(&mut engine).is_empty());
}

#[test]
fn duplicate_ids_in_a_response_get_one_marker() {
    let mut engine = engine(PanelLayout::NearestFirst);
    engine.apply(
        &results(vec![center("a", 52.5, 13.4), center("a", 52.9, 13.9)]),
        false,
    );
    assert_eq!(engine.marker_count(), 1);
    assert_eq!(engine.center("a").unwrap().coordinates.latitude, 52.5);
}

#[test]
fn selection_survives_refresh_while_center_is_present() {
    let mut engine = engine(PanelLayout::NearestFirst);
    engine.apply(
        &results(vec![center("a", 52.5, 13.4), center("b", 52.6, 13.4)]),
        false,
    );
    engine.select("b", false, false);

    let summary = engine.apply(
        &results(vec![center("b", 52.6, 13.4), center("c", 52.7, 13.4)]),
        false,
    );

    assert!(!summary.selection_cleared);
    assert_eq!(engine.selected().map(|c| c.id.as_str()), Some("b"));
}

#[test]
fn selection_is_cleared_when_center_disappears() {
    let mut engine = engine(PanelLayout::SelectedOnly);
    engine.apply(
        &results(vec![center("a", 52.5, 13.4), center("b", 52.6, 13.4)]),
        false,
    );
    engine.select("a", false, false);
    assert_eq!(panel_ids(&mut engine), vec!["a"]);

    let summary = engine.apply(&results(vec![center("b", 52.6, 13.4)]), false);

    assert!(summary.selection_cleared);
    assert!(engine.selected().is_none());
    assert!(panel_ids(&mut engine).is_empty());
}

#[test]
fn select_toggles_and_updates_icons() {
    let mut engine = engine(PanelLayout::NearestFirst);
    engine.apply(
        &results(vec![center("a", 52.5, 13.4), center("b", 52.6, 13.4)]),
        false,
    );
    let a = engine.marker_for("a").unwrap();
    let b = engine.marker_for("b").unwrap();

    assert!(engine.select("a", false, false));
    assert_eq!(engine.map().last_icon(a), Some(SELECTED_MARKER_ICON));
    assert_eq!(engine.map().last_icon(b), Some(DEFAULT_MARKER_ICON));

    assert!(engine.select("a", false, false));
    assert!(engine.selected().is_none());
    assert_eq!(engine.map().last_icon(a), Some(DEFAULT_MARKER_ICON));
}

#[test]
fn selecting_another_center_moves_the_highlight() {
    let mut engine = engine(PanelLayout::NearestFirst);
    engine.apply(
        &results(vec![center("a", 52.5, 13.4), center("b", 52.6, 13.4)]),
        false,
    );
    let a = engine.marker_for("a").unwrap();
    let b = engine.marker_for("b").unwrap();

    engine.select("a", false, false);
    engine.select("b", false, false);

    assert_eq!(engine.selected().map(|c| c.id.as_str()), Some("b"));
    assert_eq!(engine.map().last_icon(a), Some(DEFAULT_MARKER_ICON));
    assert_eq!(engine.map().last_icon(b), Some(SELECTED_MARKER_ICON));
}

#[test]
fn selecting_unknown_id_is_ignored() {
    let mut engine = engine(PanelLayout::NearestFirst);
    engine.apply(&results(vec![center("a", 52.5, 13.4)]), false);
    assert!(!engine.select("zzz", true, true));
    assert!(engine.selected().is_none());
    assert!(engine.map().moves().is_empty());
}

#[test]
fn marker_click_selects_and_reveals_panel() {
    let mut engine = engine(PanelLayout::NearestFirst);
    engine.apply(&results(vec![center("a", 52.5, 13.4)]), false);
    let a = engine.marker_for("a").unwrap();

    assert_eq!(engine.route_marker_click(a).as_deref(), Some("a"));
    assert_eq!(engine.selected().map(|c| c.id.as_str()), Some("a"));
    assert_eq!(engine.renderer_mut().revealed, vec!["center_a"]);
    assert!(engine.map().moves().is_empty());
}

#[test]
fn click_on_removed_marker_is_ignored() {
    let mut engine = engine(PanelLayout::NearestFirst);
    engine.apply(&results(vec![center("a", 52.5, 13.4)]), false);
    let a = engine.marker_for("a").unwrap();
    engine.apply(&SearchResults::default(), false);

    assert_eq!(engine.route_marker_click(a), None);
}

#[test]
fn select_with_recenter_moves_map_without_suppression() {
    let mut engine = engine(PanelLayout::NearestFirst);
    engine.apply(&results(vec![center("a", 52.5, 13.4)]), false);

    engine.select("a", true, false);

    assert_eq!(
        engine.map().moves(),
        vec![&MapCall::Recenter(Coordinates::new(52.5, 13.4), 15)]
    );
    assert!(!engine.take_viewport_suppression());
}

#[test]
fn focus_never_deselects() {
    let mut engine = engine(PanelLayout::NearestFirst);
    engine.apply(&results(vec![center("a", 52.5, 13.4)]), false);

    engine.focus("a");
    engine.focus("a");

    assert_eq!(engine.selected().map(|c| c.id.as_str()), Some("a"));
    assert_eq!(engine.map().moves().len(), 2);
}

#[test]
fn clear_selection_resets_icons() {
    let mut engine = engine(PanelLayout::NearestFirst);
    engine.apply(&results(vec![center("a", 52.5, 13.4)]), false);
    let a = engine.marker_for("a").unwrap();
    engine.select("a", false, false);

    engine.clear_selection();

    assert!(engine.selected().is_none());
    assert_eq!(engine.map().last_icon(a), Some(DEFAULT_MARKER_ICON));
}

#[test]
fn recenter_prefers_bounds_and_arms_suppression_once() {
    let mut engine = engine(PanelLayout::NearestFirst);
    let bounds = Bounds::new(Coordinates::new(52.6, 13.5), Coordinates::new(52.4, 13.3));
    let r = SearchResults {
        centers: vec![center("a", 52.5, 13.4)],
        location: Some(Coordinates::new(52.5, 13.4)),
        bounds: Some(bounds),
        ..SearchResults::default()
    };

    let summary = engine.apply(&r, true);

    assert!(summary.repositioned);
    assert_eq!(engine.map().moves(), vec![&MapCall::Fit(bounds)]);
    assert!(engine.take_viewport_suppression());
    assert!(!engine.take_viewport_suppression());
}

#[test]
fn recenter_falls_back_to_location() {
    let mut engine = engine(PanelLayout::NearestFirst);
    let r = SearchResults {
        location: Some(Coordinates::new(48.1, 11.5)),
        ..SearchResults::default()
    };

    engine.apply(&r, true);

    assert_eq!(
        engine.map().moves(),
        vec![&MapCall::Recenter(Coordinates::new(48.1, 11.5), 15)]
    );
    assert!(engine.take_viewport_suppression());
}

#[test]
fn recenter_without_location_or_bounds_does_nothing() {
    let mut engine = engine(PanelLayout::NearestFirst);
    let summary = engine.apply(&results(vec![center("a", 52.5, 13.4)]), true);

    assert!(!summary.repositioned);
    assert!(engine.map().moves().is_empty());
    assert!(!engine.take_viewport_suppression());
}

#[test]
fn organic_apply_does_not_move_the_map() {
    let mut engine = engine(PanelLayout::NearestFirst);
    let r = SearchResults {
        centers: vec![center("a", 52.5, 13.4)],
        location: Some(Coordinates::new(52.5, 13.4)),
        ..SearchResults::default()
    };
    engine.apply(&r, false);
    assert!(engine.map().moves().is_empty());
    assert!(!engine.take_viewport_suppression());
}

#[test]
fn nearest_first_sorts_by_distance_from_query_point() {
    let mut engine = engine(PanelLayout::NearestFirst);
    // a is ~5.6 km north of the query point, b ~2.2 km.
    let r = SearchResults {
        centers: vec![center("a", 52.55, 13.4), center("b", 52.52, 13.4)],
        location: Some(Coordinates::new(52.5, 13.4)),
        ..SearchResults::default()
    };

    engine.apply(&r, false);

    assert_eq!(engine.displayed_order(), vec!["b", "a"]);
    assert_eq!(panel_ids(&mut engine), vec!["b", "a"]);
}

#[test]
fn server_distance_is_used_without_query_point() {
    let mut engine = engine(PanelLayout::NearestFirst);
    let mut a = center("a", 52.55, 13.4);
    a.distance = Some(5.0);
    let mut b = center("b", 52.52, 13.4);
    b.distance = Some(2.0);

    engine.apply(&results(vec![a, b]), false);

    assert_eq!(engine.displayed_order(), vec!["b", "a"]);
    assert_eq!(engine.distance_km("a"), Some(5.0));
}

#[test]
fn equal_distances_keep_response_order() {
    let mut engine = engine(PanelLayout::NearestFirst);
    let centers: Vec<Center> = ["d", "a", "c", "b"]
        .iter()
        .map(|id| {
            let mut c = center(id, 52.5, 13.4);
            c.distance = Some(1.0);
            c
        })
        .collect();

    engine.apply(&results(centers), false);

    assert_eq!(engine.displayed_order(), vec!["d", "a", "c", "b"]);
}

#[test]
fn distances_are_recomputed_from_the_latest_query_point() {
    let mut engine = engine(PanelLayout::NearestFirst);
    let a = center("a", 52.55, 13.4);
    let b = center("b", 52.45, 13.4);
    let first = SearchResults {
        centers: vec![a.clone(), b.clone()],
        location: Some(Coordinates::new(52.56, 13.4)),
        ..SearchResults::default()
    };
    engine.apply(&first, false);
    assert_eq!(engine.displayed_order(), vec!["a", "b"]);

    let second = SearchResults {
        centers: vec![a, b],
        location: Some(Coordinates::new(52.44, 13.4)),
        ..SearchResults::default()
    };
    engine.apply(&second, false);
    assert_eq!(engine.displayed_order(), vec!["b", "a"]);
}

#[test]
fn selected_center_is_pinned_to_the_top() {
    let mut engine = engine(PanelLayout::NearestFirst);
    let r = SearchResults {
        centers: vec![center("a", 52.55, 13.4), center("b", 52.52, 13.4)],
        location: Some(Coordinates::new(52.5, 13.4)),
        ..SearchResults::default()
    };
    engine.apply(&r, false);

    engine.select("a", false, false);

    assert_eq!(engine.displayed_order(), vec!["a", "b"]);
    assert_eq!(
        engine.renderer_mut().panels,
        vec![("a".to_string(), true), ("b".to_string(), false)]
    );
}

#[test]
fn selected_only_layout_shows_just_the_selection() {
    let mut engine = engine(PanelLayout::SelectedOnly);
    engine.apply(
        &results(vec![center("a", 52.5, 13.4), center("b", 52.6, 13.4)]),
        false,
    );
    assert!(engine.displayed_order().is_empty());

    engine.select("b", false, false);
    assert_eq!(
        engine.renderer_mut().panels,
        vec![("b".to_string(), true)]
    );
}
