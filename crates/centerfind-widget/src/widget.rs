//! The widget's event loop.
//!
//! All state changes happen on the task running [`SearchWidget::run`], one
//! event at a time. Hosts, map adapters and finished requests talk to it
//! through the same channel.

use std::time::Duration;

use centerfind_client::{CentersClient, ProblemReport};
use centerfind_core::{AppConfig, Coordinates, PanelLayout, SearchFilters, SearchResults};
use tokio::sync::{mpsc, watch};

use crate::debounce::Debouncer;
use crate::dispatch::{QueryDispatcher, DEFAULT_LOCATION_RADIUS_KM};
use crate::engine::ReconciliationEngine;
use crate::error::SearchError;
use crate::filters::{FilterState, FilterUpdate};
use crate::map::{Geolocator, MapAdapter, MarkerHandle};
use crate::render::{PanelRenderer, ReportPanelState};

/// Input to the widget from the host, the user or the map.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// The visible map area changed, by the user or programmatically.
    ViewportChanged,
    AddressSubmitted(String),
    LocationSubmitted(Coordinates),
    /// The user asked to search around the device position.
    LocateRequested,
    FiltersChanged(FilterUpdate),
    MarkerClicked(MarkerHandle),
    /// A center was picked from the panel list.
    PanelSelected(String),
    ClearSelection,
    OpenReportPanel,
    CloseReportPanel,
    SubmitReport(ProblemReport),
    Shutdown,
}

/// Completions posted back by spawned tasks.
#[derive(Debug)]
pub(crate) enum Outcome {
    AddressResolved(String),
    Results {
        results: SearchResults,
        recenter: bool,
    },
    Failed(SearchError),
    ReportSubmitted,
    ReportPanelExpired,
}

#[derive(Debug)]
pub(crate) enum Message {
    Event(WidgetEvent),
    Outcome(Outcome),
}

/// Cloneable sender for [`WidgetEvent`]s.
#[derive(Debug, Clone)]
pub struct WidgetHandle {
    tx: mpsc::UnboundedSender<Message>,
}

impl WidgetHandle {
    /// Queues `event`. Returns `false` once the widget has stopped.
    pub fn send(&self, event: WidgetEvent) -> bool {
        self.tx.send(Message::Event(event)).is_ok()
    }

    pub fn shutdown(&self) {
        self.send(WidgetEvent::Shutdown);
    }
}

/// Receiving end of the widget channel, consumed by [`SearchWidget::new`].
#[derive(Debug)]
pub struct WidgetInbox {
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
}

/// Creates the widget channel. The handle can be given to map adapters
/// before the widget itself exists.
#[must_use]
pub fn channel() -> (WidgetHandle, WidgetInbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (WidgetHandle { tx: tx.clone() }, WidgetInbox { tx, rx })
}

/// Progress counters published after every handled message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetStatus {
    pub results_applied: u64,
    pub errors_shown: u64,
    pub last_error: Option<String>,
    pub center_count: usize,
    pub selected: Option<String>,
    /// Panel order, top to bottom.
    pub displayed: Vec<String>,
    pub report_panel: ReportPanelState,
    pub reports_submitted: u64,
}

/// Timing and presentation settings of a widget.
#[derive(Debug, Clone, Copy)]
pub struct WidgetSettings {
    pub viewport_debounce: Duration,
    pub default_zoom: u8,
    pub panel_layout: PanelLayout,
    pub report_close_delay: Duration,
    pub initial_filters: SearchFilters,
}

impl WidgetSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            viewport_debounce: Duration::from_millis(config.viewport_debounce_ms),
            default_zoom: config.default_zoom,
            panel_layout: config.panel_layout,
            report_close_delay: Duration::from_millis(config.report_close_delay_ms),
            initial_filters: SearchFilters::default(),
        }
    }
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            viewport_debounce: Duration::from_millis(500),
            default_zoom: 15,
            panel_layout: PanelLayout::default(),
            report_close_delay: Duration::from_millis(3000),
            initial_filters: SearchFilters::default(),
        }
    }
}

pub struct SearchWidget<M, R> {
    engine: ReconciliationEngine<M, R>,
    filters: FilterState,
    dispatcher: QueryDispatcher,
    geolocator: Option<Box<dyn Geolocator>>,
    settings: WidgetSettings,
    inbox: WidgetInbox,
    status: watch::Sender<WidgetStatus>,
    map_initialized: bool,
    report_timer: Debouncer,
    counters: WidgetStatus,
}

impl<M: MapAdapter, R: PanelRenderer> SearchWidget<M, R> {
    pub fn new(
        settings: WidgetSettings,
        client: CentersClient,
        map: M,
        renderer: R,
        inbox: WidgetInbox,
    ) -> Self {
        let engine =
            ReconciliationEngine::new(map, renderer, settings.panel_layout, settings.default_zoom);
        let dispatcher = QueryDispatcher::new(client, inbox.tx.clone());
        let (status, _) = watch::channel(WidgetStatus::default());
        Self {
            engine,
            filters: FilterState::new(settings.initial_filters),
            dispatcher,
            geolocator: None,
            settings,
            inbox,
            status,
            map_initialized: false,
            report_timer: Debouncer::new("report-panel-close"),
            counters: WidgetStatus::default(),
        }
    }

    /// Device position source used when the map first reports a viewport and
    /// on [`WidgetEvent::LocateRequested`].
    #[must_use]
    pub fn with_geolocator(mut self, geolocator: impl Geolocator + 'static) -> Self {
        self.geolocator = Some(Box::new(geolocator));
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<WidgetStatus> {
        self.status.subscribe()
    }

    /// Handles events until [`WidgetEvent::Shutdown`].
    pub async fn run(mut self) {
        tracing::debug!(layout = %self.settings.panel_layout, "search widget started");
        while let Some(message) = self.inbox.rx.recv().await {
            let keep_running = match message {
                Message::Event(event) => self.handle_event(event),
                Message::Outcome(outcome) => {
                    self.handle_outcome(outcome);
                    true
                }
            };
            self.publish_status();
            if !keep_running {
                break;
            }
        }
        tracing::debug!("search widget stopped");
    }

    fn handle_event(&mut self, event: WidgetEvent) -> bool {
        match event {
            WidgetEvent::ViewportChanged => self.on_viewport_changed(),
            WidgetEvent::AddressSubmitted(address) => {
                self.clear_error();
                self.dispatcher.by_address(&address, self.filters.get());
            }
            WidgetEvent::LocationSubmitted(location) => {
                self.clear_error();
                let radius = self
                    .engine
                    .map()
                    .viewport()
                    .map_or(DEFAULT_LOCATION_RADIUS_KM, |v| v.radius_km());
                self.dispatcher
                    .by_location(location, radius, self.filters.get());
            }
            WidgetEvent::LocateRequested => self.locate(),
            WidgetEvent::FiltersChanged(update) => {
                let changed = self.filters.set(update);
                tracing::debug!(changed, filters = ?self.filters.get(), "filters updated");
                self.search_viewport(Duration::ZERO);
            }
            WidgetEvent::MarkerClicked(marker) => {
                if self.engine.route_marker_click(marker).is_none() {
                    tracing::debug!(?marker, "click on untracked marker");
                }
            }
            WidgetEvent::PanelSelected(id) => {
                self.engine.focus(&id);
            }
            WidgetEvent::ClearSelection => self.engine.clear_selection(),
            WidgetEvent::OpenReportPanel => self.set_report_panel(ReportPanelState::Editing),
            WidgetEvent::CloseReportPanel => self.set_report_panel(ReportPanelState::Hidden),
            WidgetEvent::SubmitReport(report) => match self.engine.selected() {
                Some(center) => {
                    let id = center.id.clone();
                    self.dispatcher.submit_report(&id, report);
                }
                None => tracing::debug!("no center selected; report not sent"),
            },
            WidgetEvent::Shutdown => return false,
        }
        true
    }

    fn handle_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::AddressResolved(address) => {
                self.engine.renderer_mut().set_search_text(&address);
            }
            Outcome::Results { results, recenter } => {
                self.engine.apply(&results, recenter);
                self.counters.results_applied += 1;
            }
            Outcome::Failed(error) => {
                if let Some(message) = error.user_message() {
                    self.engine.renderer_mut().show_error(&message);
                    self.counters.errors_shown += 1;
                    self.counters.last_error = Some(message);
                }
            }
            Outcome::ReportSubmitted => {
                self.counters.reports_submitted += 1;
                self.set_report_panel(ReportPanelState::Submitted);
                let tx = self.inbox.tx.clone();
                self.report_timer
                    .schedule(self.settings.report_close_delay, move || {
                        // A closed channel means the widget is gone.
                        let _ = tx.send(Message::Outcome(Outcome::ReportPanelExpired));
                    });
            }
            Outcome::ReportPanelExpired => {
                if self.counters.report_panel == ReportPanelState::Submitted {
                    self.apply_report_panel(ReportPanelState::Hidden);
                }
            }
        }
    }

    fn on_viewport_changed(&mut self) {
        if !self.map_initialized {
            self.map_initialized = true;
            // Results may have moved the map before it reported anything.
            self.engine.take_viewport_suppression();
            self.locate();
            return;
        }
        if self.engine.take_viewport_suppression() {
            tracing::debug!("viewport change caused by results; not searching");
            return;
        }
        self.search_viewport(self.settings.viewport_debounce);
    }

    fn search_viewport(&mut self, delay: Duration) {
        match self.engine.map().viewport() {
            Some(area) => self.dispatcher.by_viewport(area, self.filters.get(), delay),
            None => tracing::debug!("map has no viewport yet; not searching"),
        }
    }

    fn locate(&mut self) {
        self.engine.renderer_mut().set_search_text("");
        let position = self
            .geolocator
            .as_mut()
            .and_then(|geolocator| geolocator.current_position());
        match position {
            Some(position) => {
                tracing::info!(
                    latitude = position.latitude,
                    longitude = position.longitude,
                    "centering on device position"
                );
                self.engine.recenter_map(position);
            }
            None => tracing::info!("device position unavailable"),
        }
    }

    fn clear_error(&mut self) {
        self.engine.renderer_mut().clear_error();
        self.counters.last_error = None;
    }

    /// User-driven report panel changes cancel a pending auto-close.
    fn set_report_panel(&mut self, state: ReportPanelState) {
        self.report_timer.cancel();
        self.apply_report_panel(state);
    }

    fn apply_report_panel(&mut self, state: ReportPanelState) {
        self.counters.report_panel = state;
        self.engine.renderer_mut().set_report_panel(state);
    }

    fn publish_status(&mut self) {
        let mut next = self.counters.clone();
        next.center_count = self.engine.marker_count();
        next.selected = self.engine.selected().map(|c| c.id.clone());
        next.displayed = self.engine.displayed_order();
        self.status.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
