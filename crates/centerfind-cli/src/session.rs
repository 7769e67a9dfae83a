//! Drives a widget from a one-shot command.

use std::time::Duration;

use anyhow::Context;
use centerfind_client::CentersClient;
use centerfind_core::{AppConfig, Coordinates, SearchFilters};
use centerfind_widget::{channel, SearchWidget, WidgetEvent, WidgetHandle, WidgetSettings, WidgetStatus};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::console::{ConsoleMap, ConsoleRenderer, ConsoleView, FixedPosition};

pub(crate) struct Session {
    handle: WidgetHandle,
    status: watch::Receiver<WidgetStatus>,
    renderer: ConsoleRenderer,
    task: JoinHandle<()>,
    timeout: Duration,
}

impl Session {
    /// Starts a widget on a console map. The map reports its first viewport
    /// right away; with a `position` that triggers the geolocation flow.
    pub(crate) fn start(
        config: &AppConfig,
        filters: SearchFilters,
        position: Option<Coordinates>,
    ) -> anyhow::Result<Self> {
        let client = CentersClient::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
        .context("failed to build centers client")?;

        let (handle, inbox) = channel();
        let map = ConsoleMap::new(config.initial_center, config.default_zoom, handle.clone());
        let renderer = ConsoleRenderer::default();
        let settings = WidgetSettings {
            initial_filters: filters,
            ..WidgetSettings::from_app_config(config)
        };

        let mut widget = SearchWidget::new(settings, client, map, renderer.clone(), inbox);
        if let Some(position) = position {
            widget = widget.with_geolocator(FixedPosition(position));
        }
        let status = widget.subscribe();
        let task = tokio::spawn(widget.run());

        let session = Self {
            handle,
            status,
            renderer,
            task,
            // Debounce plus an address lookup and a search, each bounded by
            // the request timeout.
            timeout: Duration::from_millis(config.viewport_debounce_ms)
                + Duration::from_secs(2 * config.request_timeout_secs + 1),
        };
        session.send(WidgetEvent::ViewportChanged)?;
        Ok(session)
    }

    pub(crate) fn send(&self, event: WidgetEvent) -> anyhow::Result<()> {
        anyhow::ensure!(self.handle.send(event), "search widget stopped unexpectedly");
        Ok(())
    }

    /// Waits until the published status satisfies `pred`.
    ///
    /// # Errors
    ///
    /// Fails if the widget stops or nothing happens within the session
    /// timeout. Transport failures are not reported by the widget, so they
    /// end up here.
    pub(crate) async fn wait_for(
        &mut self,
        what: &str,
        pred: impl FnMut(&WidgetStatus) -> bool,
    ) -> anyhow::Result<WidgetStatus> {
        let outcome = tokio::time::timeout(self.timeout, self.status.wait_for(pred))
            .await
            .map(|r| r.map(|status| WidgetStatus::clone(&status)));
        match outcome {
            Ok(Ok(status)) => Ok(status),
            Ok(Err(_)) => anyhow::bail!("search widget stopped while waiting for {what}"),
            Err(_) => anyhow::bail!(
                "no {what} within {}s; is the backend reachable? (RUST_LOG=debug shows transport errors)",
                self.timeout.as_secs()
            ),
        }
    }

    /// Waits for the next applied result set or surfaced error after `since`.
    pub(crate) async fn wait_for_response(
        &mut self,
        since: &WidgetStatus,
    ) -> anyhow::Result<WidgetStatus> {
        let (applied, errors) = (since.results_applied, since.errors_shown);
        self.wait_for("search results", |s| {
            s.results_applied > applied || s.errors_shown > errors
        })
        .await
    }

    pub(crate) fn status(&self) -> WidgetStatus {
        self.status.borrow().clone()
    }

    /// Stops the widget and returns what it last rendered.
    pub(crate) async fn finish(self) -> anyhow::Result<ConsoleView> {
        self.handle.shutdown();
        self.task.await.context("search widget task failed")?;
        Ok(self.renderer.snapshot())
    }
}
