mod commands;
mod console;
mod session;

use centerfind_client::ProblemReport;
use centerfind_core::{Coordinates, SearchFilters};
use centerfind_widget::{FilterState, FilterUpdate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "centerfind")]
#[command(about = "Find test and vaccination centers near an address or a point")]
struct Cli {
    /// Base URL of the centers backend (overrides CENTERFIND_API_BASE_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Appointment filter: All, Required, Possible or NotRequired
    #[arg(long, global = true)]
    appointment: Option<String>,
    /// Test kind filter: All, Antigen, PCR or Vaccination
    #[arg(long, global = true)]
    kind: Option<String>,
    /// Digital certificate filter: any, true or false
    #[arg(long, global = true)]
    dcc: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search centers around an address
    Address {
        /// Free-text address, resolved by the backend
        address: String,
    },
    /// Search centers around a point
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
    /// Start the map at a device position and show what it finds
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
    /// Report a problem with a center found by an address search
    Report {
        /// Address to search for the center
        #[arg(long)]
        address: String,
        /// Id of the center to report
        #[arg(long)]
        center: String,
        /// Problem category
        #[arg(long)]
        subject: String,
        /// Free-text description
        #[arg(long, default_value = "")]
        message: String,
    },
    /// List the accepted filter values
    Filters,
}

impl Cli {
    fn search_filters(&self) -> anyhow::Result<SearchFilters> {
        let update = FilterUpdate::parse(
            self.appointment.as_deref(),
            self.kind.as_deref(),
            self.dcc.as_deref(),
        )?;
        let mut state = FilterState::default();
        state.set(update);
        Ok(state.get())
    }
}

fn validate_coordinates(lat: f64, lng: f64) -> anyhow::Result<Coordinates> {
    anyhow::ensure!(
        (-90.0..=90.0).contains(&lat),
        "latitude {lat} is outside [-90, 90]"
    );
    anyhow::ensure!(
        (-180.0..=180.0).contains(&lng),
        "longitude {lng} is outside [-180, 180]"
    );
    Ok(Coordinates::new(lat, lng))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Filters) {
        commands::print_filter_options();
        return Ok(());
    }

    let config = centerfind_core::load_app_config_with_base_url(cli.api_url.as_deref())?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let filters = cli.search_filters()?;
    tracing::debug!(?filters, api = %config.api_base_url, "starting");

    match cli.command {
        Commands::Address { address } => commands::run_address(&config, filters, &address).await,
        Commands::Nearby { lat, lng } => {
            let location = validate_coordinates(lat, lng)?;
            commands::run_nearby(&config, filters, location).await
        }
        Commands::Locate { lat, lng } => {
            let position = validate_coordinates(lat, lng)?;
            commands::run_locate(&config, filters, position).await
        }
        Commands::Report {
            address,
            center,
            subject,
            message,
        } => {
            let report = ProblemReport { subject, message };
            commands::run_report(&config, filters, &address, &center, report).await
        }
        Commands::Filters => Ok(()),
    }
}

#[cfg(test)]
mod tests;
