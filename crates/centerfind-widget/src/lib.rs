//! Headless search widget for test/vaccination centers.
//!
//! The widget keeps two views in sync with an asynchronous stream of search
//! results: the markers on a map and a list of detail panels. The map and the
//! panel list are host-provided ([`MapAdapter`], [`PanelRenderer`]); the widget
//! decides what they show.

pub mod debounce;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod filters;
pub mod map;
pub mod render;
pub mod widget;

pub use engine::{ApplySummary, ReconciliationEngine};
pub use error::SearchError;
pub use filters::{FilterState, FilterUpdate};
pub use map::{Geolocator, MapAdapter, MarkerHandle};
pub use render::{CenterPanel, PanelRenderer, ReportPanelState};
pub use widget::{channel, SearchWidget, WidgetEvent, WidgetHandle, WidgetInbox, WidgetSettings, WidgetStatus};
