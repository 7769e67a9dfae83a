use centerfind_core::{AppointmentPolicy, TestKind};

use super::*;
use crate::console::viewport_around;

#[test]
fn parses_address_command() {
    let cli = Cli::try_parse_from(["centerfind", "address", "Alexanderplatz, Berlin"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Address { ref address } if address == "Alexanderplatz, Berlin"
    ));
}

#[test]
fn parses_nearby_with_negative_longitude() {
    let cli = Cli::try_parse_from(["centerfind", "nearby", "--lat", "40.4", "--lng", "-3.7"])
        .expect("expected valid cli args");

    assert!(matches!(cli.command, Commands::Nearby { lat, lng } if lat == 40.4 && lng == -3.7));
}

#[test]
fn global_filter_flags_follow_the_subcommand() {
    let cli = Cli::try_parse_from([
        "centerfind",
        "address",
        "Berlin",
        "--kind",
        "PCR",
        "--appointment",
        "NotRequired",
        "--dcc",
        "true",
    ])
    .expect("expected valid cli args");

    let filters = cli.search_filters().expect("valid filters");
    assert_eq!(filters.test_kind, Some(TestKind::Pcr));
    assert_eq!(
        filters.appointment_policy,
        Some(AppointmentPolicy::NotRequired)
    );
    assert_eq!(filters.require_digital_certificate, Some(true));
}

#[test]
fn no_filter_flags_means_no_constraints() {
    let cli = Cli::try_parse_from(["centerfind", "filters"]).expect("expected valid cli args");
    assert_eq!(cli.search_filters().unwrap(), SearchFilters::default());
}

#[test]
fn invalid_filter_value_is_rejected() {
    let cli = Cli::try_parse_from(["centerfind", "address", "Berlin", "--kind", "Blood"])
        .expect("flag values are checked later");
    assert!(cli.search_filters().is_err());
}

#[test]
fn report_requires_center_and_subject() {
    let result = Cli::try_parse_from(["centerfind", "report", "--address", "Berlin"]);
    assert!(result.is_err());
}

#[test]
fn report_message_defaults_to_empty() {
    let cli = Cli::try_parse_from([
        "centerfind",
        "report",
        "--address",
        "Berlin",
        "--center",
        "c-1",
        "--subject",
        "Closed",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Report { ref message, ref center, .. } if message.is_empty() && center == "c-1"
    ));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["centerfind"]).is_err());
}

#[test]
fn coordinates_out_of_range_are_rejected() {
    assert!(validate_coordinates(91.0, 0.0).is_err());
    assert!(validate_coordinates(0.0, -181.0).is_err());
    assert!(validate_coordinates(52.5, 13.4).is_ok());
}

#[test]
fn viewport_is_centered_and_shrinks_with_zoom() {
    let center = Coordinates::new(52.5, 13.4);
    let wide = viewport_around(center, 10);
    let narrow = viewport_around(center, 15);

    let mid = narrow.center();
    assert!((mid.latitude - 52.5).abs() < 1e-9);
    assert!((mid.longitude - 13.4).abs() < 1e-9);
    assert!(narrow.radius_km() < wide.radius_km());
}
