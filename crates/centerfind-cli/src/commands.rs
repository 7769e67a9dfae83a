//! Command handlers. Each one runs a single widget session against the
//! configured backend and prints what the widget ends up showing.

use centerfind_client::ProblemReport;
use centerfind_core::labels::{
    appointment_label, test_kind_label, ALL_LABEL, APPOINTMENT_OPTIONS, TEST_KIND_OPTIONS,
};
use centerfind_core::{AppConfig, Coordinates, SearchFilters};
use centerfind_widget::{WidgetEvent, WidgetStatus};

use crate::console::print_view;
use crate::session::Session;

/// Explicit address search.
pub(crate) async fn run_address(
    config: &AppConfig,
    filters: SearchFilters,
    address: &str,
) -> anyhow::Result<()> {
    anyhow::ensure!(!address.trim().is_empty(), "address must not be empty");

    let mut session = Session::start(config, filters, None)?;
    let before = session.status();
    session.send(WidgetEvent::AddressSubmitted(address.to_string()))?;
    session.wait_for_response(&before).await?;

    print_view(&session.finish().await?);
    Ok(())
}

/// Explicit search around a point.
pub(crate) async fn run_nearby(
    config: &AppConfig,
    filters: SearchFilters,
    location: Coordinates,
) -> anyhow::Result<()> {
    let mut session = Session::start(config, filters, None)?;
    let before = session.status();
    session.send(WidgetEvent::LocationSubmitted(location))?;
    session.wait_for_response(&before).await?;

    print_view(&session.finish().await?);
    Ok(())
}

/// Map start-up with a known device position: the widget centers on it and
/// the resulting viewport change runs an ordinary search.
pub(crate) async fn run_locate(
    config: &AppConfig,
    filters: SearchFilters,
    position: Coordinates,
) -> anyhow::Result<()> {
    let mut session = Session::start(config, filters, Some(position))?;
    session.wait_for_response(&WidgetStatus::default()).await?;

    print_view(&session.finish().await?);
    Ok(())
}

/// Searches `address`, selects `center_id` from the results and reports a
/// problem with it.
pub(crate) async fn run_report(
    config: &AppConfig,
    filters: SearchFilters,
    address: &str,
    center_id: &str,
    report: ProblemReport,
) -> anyhow::Result<()> {
    let mut session = Session::start(config, filters, None)?;
    let before = session.status();
    session.send(WidgetEvent::AddressSubmitted(address.to_string()))?;
    let status = session.wait_for_response(&before).await?;
    if let Some(error) = status.last_error {
        anyhow::bail!("search failed: {error}");
    }
    anyhow::ensure!(
        status.displayed.iter().any(|id| id == center_id),
        "center {center_id} is not among the {} result(s) for '{address}'",
        status.center_count
    );

    session.send(WidgetEvent::PanelSelected(center_id.to_string()))?;
    session
        .wait_for("selection", |s| s.selected.as_deref() == Some(center_id))
        .await?;

    session.send(WidgetEvent::OpenReportPanel)?;
    session.send(WidgetEvent::SubmitReport(report))?;
    session
        .wait_for("report confirmation", |s| s.reports_submitted > 0)
        .await?;

    session.finish().await?;
    println!("report for {center_id} submitted");
    Ok(())
}

/// Lists the values accepted by the filter flags.
pub(crate) fn print_filter_options() {
    println!("--appointment");
    for option in APPOINTMENT_OPTIONS {
        match option {
            None => println!("  {ALL_LABEL:<14}{ALL_LABEL}"),
            Some(policy) => println!(
                "  {:<14}{}",
                policy.as_str().unwrap_or_default(),
                appointment_label(policy)
            ),
        }
    }
    println!("--kind");
    for option in TEST_KIND_OPTIONS {
        match option {
            None => println!("  {ALL_LABEL:<14}{ALL_LABEL}"),
            Some(kind) => println!("  {:<14}{}", kind.as_str(), test_kind_label(kind)),
        }
    }
    println!("--dcc");
    println!("  {:<14}any", "any");
    println!("  {:<14}only centers issuing EU digital certificates", "true");
    println!("  {:<14}only centers without", "false");
}
