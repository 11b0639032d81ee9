use std::time::Duration;

use anyhow::{Context, Result, bail};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use log::{error, info};

use tourmap::matrix::DistanceMatrix;
use tourmap::model::CitySet;
use tourmap::solver::channel::DEFAULT_SOLVER_URL;
use tourmap::solver::{SolveRequest, SolverChannel, SolverConfig, SolverEvent, SolverLink, SolverParams};

#[derive(Parser, Debug)]
#[command(author, version, about = "Distance matrices and tours for city maps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the rounded distance matrix of a city file as JSON
    Matrix {
        /// JSON file with `[{"x": .., "y": ..}, ...]`
        #[arg(value_name = "CITIES_FILE")]
        cities: Utf8PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Send a city file to the solver and print the first tour it returns
    Solve {
        #[arg(value_name = "CITIES_FILE")]
        cities: Utf8PathBuf,
        #[arg(long, env = "TOURMAP_SOLVER_URL", default_value = DEFAULT_SOLVER_URL)]
        url: String,
        #[arg(long, default_value_t = 1.0)]
        alpha: f64,
        #[arg(long, default_value_t = 2.0)]
        beta: f64,
        #[arg(long, default_value_t = 0.5)]
        rho: f64,
        /// Give up after this many seconds without a tour
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    match cli.command {
        Command::Matrix { cities, pretty } => {
            let set = CitySet::load_json(&cities)?;
            let matrix = DistanceMatrix::build(&set);
            let json = if pretty {
                serde_json::to_string_pretty(&matrix)?
            } else {
                serde_json::to_string(&matrix)?
            };
            println!("{}", json);
        }
        Command::Solve {
            cities,
            url,
            alpha,
            beta,
            rho,
            timeout_secs,
        } => {
            let set = CitySet::load_json(&cities)?;
            if set.is_empty() {
                bail!("{} contains no cities", cities);
            }
            let params = SolverParams::new(alpha, beta, rho);
            params.validate()?;

            let request = SolveRequest::new(DistanceMatrix::build(&set), Some(params));
            let mut channel = SolverChannel::connect(SolverConfig::new(url))
                .context("Failed to start the solver channel")?;
            channel.submit(request)?;
            info!("waiting for a tour over {} cities", set.len());

            let wait = async {
                while let Some(event) = channel.next_event().await {
                    if let SolverEvent::Tour(update) = event {
                        return Some(update);
                    }
                }
                None
            };
            let update = tokio::time::timeout(Duration::from_secs(timeout_secs), wait)
                .await
                .with_context(|| format!("No tour received within {timeout_secs}s"))?;
            channel.shutdown().await;

            let Some(update) = update else {
                bail!("solver channel closed before a tour arrived");
            };
            if !update.tour.fits(set.len()) {
                bail!("solver returned indices outside 0..{}", set.len());
            }
            println!("{}", serde_json::to_string(&update.tour)?);
        }
    }
    Ok(())
}
