#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front-end for the parking finder API.
//!
//! ```text
//! parking_finder nearby "Flinders Street Station" [--max-walk-time 10]
//! parking_finder predict "Flinders Street Station" [--at 2025-08-20T09:00:00Z]
//! parking_finder spots
//! parking_finder top-segments [--start-date ..] [--end-date ..] [--limit 10]
//! parking_finder history <id> [--bay] [--start-date ..] [--end-date ..]
//! parking_finder summary <id> [--bay] [--min-samples 10] [--top-n 3]
//! parking_finder car-ownership [VIC] [--start-year 2016] [--end-year 2021]
//! parking_finder cbd-population [CBD_MEL] [--start-year 2001] [--end-year 2021]
//! ```
//!
//! Running with no subcommand enters interactive mode. Pass `--json` to
//! print raw responses instead of tables.

mod interactive;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use parking_finder_client::insights::YearRange;
use parking_finder_client::parking_models::history::{
    HistoryQuery, HistorySummaryQuery, TopSegmentsQuery,
};
use parking_finder_client::{ApiError, ClientConfig, LocationQuery, ParkingClient};

#[derive(Parser)]
#[command(
    name = "parking_finder",
    about = "Find nearby parking and browse occupancy insights"
)]
struct Cli {
    /// Backend base URL (overrides the environment and --config)
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// TOML file with `base_url` and `timeout_secs`
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print raw JSON responses
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find bays within walking distance of an address
    Nearby {
        /// Street address or landmark
        address: String,
        /// Maximum walking time in minutes (server default: 5)
        #[arg(long)]
        max_walk_time: Option<f64>,
    },
    /// Predict which nearby bays will be free at a given time
    Predict {
        /// Street address or landmark
        address: String,
        /// Maximum walking time in minutes (server default: 5)
        #[arg(long)]
        max_walk_time: Option<f64>,
        /// Arrival time, sent to the server as given (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
    /// List every sensor bay with its latest status
    Spots,
    /// Rank street segments by observation volume
    TopSegments {
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Hourly occupancy history for a segment or bay
    History {
        /// Segment id (or bay id with --bay)
        id: String,
        /// Treat the id as a bay id
        #[arg(long)]
        bay: bool,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
    },
    /// Weekly heatmap and best arrival windows for a segment or bay
    Summary {
        /// Segment id (or bay id with --bay)
        id: String,
        /// Treat the id as a bay id
        #[arg(long)]
        bay: bool,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        /// Minimum samples for a slot to be suggested
        #[arg(long)]
        min_samples: Option<u32>,
        /// Number of arrival windows to suggest
        #[arg(long)]
        top_n: Option<u32>,
    },
    /// Registered vehicles per year for a state
    CarOwnership {
        #[arg(default_value = "VIC")]
        state_code: String,
        #[arg(long)]
        start_year: Option<i32>,
        #[arg(long)]
        end_year: Option<i32>,
    },
    /// Resident population per year for a CBD region
    CbdPopulation {
        #[arg(default_value = "CBD_MEL")]
        region_id: String,
        #[arg(long)]
        start_year: Option<i32>,
        #[arg(long)]
        end_year: Option<i32>,
    },
}

fn history_query(
    id: String,
    bay: bool,
    start_date: Option<String>,
    end_date: Option<String>,
) -> HistoryQuery {
    let mut query = if bay {
        HistoryQuery::bay(id)
    } else {
        HistoryQuery::segment(id)
    };
    query.start_date = start_date;
    query.end_date = end_date;
    query
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig, ApiError> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::from_env()?,
    };
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone())?;
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs))?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    log::info!(
        "Using {} (timeout {}s)",
        config.base_url(),
        config.timeout().as_secs()
    );
    let client = ParkingClient::new(config)?;

    let Some(command) = cli.command else {
        return interactive::run(&client).await;
    };

    let json = cli.json;

    match command {
        Commands::Nearby {
            address,
            max_walk_time,
        } => {
            let mut query = LocationQuery::new(address);
            query.max_walk_time = max_walk_time;
            let envelope = client.fetch_nearby_envelope(&query).await?;
            output::nearby(&envelope, json)?;
        }
        Commands::Predict {
            address,
            max_walk_time,
            at,
        } => {
            let mut query = LocationQuery::new(address);
            query.max_walk_time = max_walk_time;
            if let Some(at) = at {
                query = query.at(at);
            }
            let envelope = client.fetch_nearby_predict_envelope(&query).await?;
            output::nearby(&envelope, json)?;
        }
        Commands::Spots => {
            let spots = client.list_spots().await?;
            output::spots(&spots, json)?;
        }
        Commands::TopSegments {
            start_date,
            end_date,
            limit,
        } => {
            let response = client
                .top_segments(&TopSegmentsQuery {
                    start_date,
                    end_date,
                    limit,
                })
                .await?;
            output::top_segments(&response, json)?;
        }
        Commands::History {
            id,
            bay,
            start_date,
            end_date,
        } => {
            let query = history_query(id, bay, start_date, end_date);
            let response = client.history(&query).await?;
            output::history(&response, json)?;
        }
        Commands::Summary {
            id,
            bay,
            start_date,
            end_date,
            min_samples,
            top_n,
        } => {
            let query = HistorySummaryQuery {
                min_samples_per_bucket: min_samples,
                top_n,
                ..HistorySummaryQuery::from(history_query(id, bay, start_date, end_date))
            };
            let response = client.history_summary(&query).await?;
            output::heatmap(&response, json)?;
        }
        Commands::CarOwnership {
            state_code,
            start_year,
            end_year,
        } => {
            let response = client
                .car_ownership(&state_code, YearRange::new(start_year, end_year))
                .await?;
            if json {
                output::print_json(&response)?;
            } else {
                output::series(
                    &format!("Registered vehicles, {state_code}"),
                    &response.values,
                    &response.yearly_change_or_computed(),
                    response.growth_rate_or_computed(),
                );
            }
        }
        Commands::CbdPopulation {
            region_id,
            start_year,
            end_year,
        } => {
            let response = client
                .cbd_population(&region_id, YearRange::new(start_year, end_year))
                .await?;
            if json {
                output::print_json(&response)?;
            } else {
                output::series(
                    &format!("Population, {region_id}"),
                    &response.values,
                    &response.yearly_change_or_computed(),
                    response.growth_rate_or_computed(),
                );
            }
        }
    }

    Ok(())
}
