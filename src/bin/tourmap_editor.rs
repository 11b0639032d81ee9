//! Interactive city map editor (requires `--features egui`).
//!
//! Usage:
//!   cargo run --features egui --bin tourmap-editor -- [cities.json] [--url ws://host:port]

use std::sync::Arc;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use eframe::egui;
use log::info;

use tourmap::config::{EditorConfig, StaleTourPolicy};
use tourmap::editor::{EditorSession, EditorState};
use tourmap::egui_app::TourMapApp;
use tourmap::model::CitySet;
use tourmap::solver::channel::DEFAULT_SOLVER_URL;
use tourmap::solver::{Notifier, SendPolicy, SolverChannel, SolverConfig, SolverParams};

#[derive(Parser, Debug)]
#[command(author, version, about = "Place cities and watch the solver's tour", long_about = None)]
struct Args {
    /// Optional JSON city file to start from
    #[arg(value_name = "CITIES_FILE")]
    file: Option<Utf8PathBuf>,

    #[arg(long, env = "TOURMAP_SOLVER_URL", default_value = DEFAULT_SOLVER_URL)]
    url: String,

    /// Drop solve requests while the solver is unreachable instead of queueing
    #[arg(long)]
    drop_offline: bool,

    /// Show tours even if the cities changed after the request
    #[arg(long)]
    accept_stale: bool,

    #[arg(long, default_value_t = 1.0)]
    alpha: f64,
    #[arg(long, default_value_t = 2.0)]
    beta: f64,
    #[arg(long, default_value_t = 0.5)]
    rho: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let params = SolverParams::new(args.alpha, args.beta, args.rho);
    params.validate()?;

    let mut config = EditorConfig::default().with_solver_params(Some(params));
    if args.accept_stale {
        config = config.with_stale_tours(StaleTourPolicy::Accept);
    }
    let state = match &args.file {
        Some(path) if path.exists() => {
            let cities = CitySet::load_json(path)?;
            info!("opened {path} with {} cities", cities.len());
            EditorState::with_cities(config, cities)
        }
        _ => EditorState::new(config),
    };

    let mut solver = SolverConfig::new(args.url);
    if args.drop_offline {
        solver = solver.with_send_policy(SendPolicy::Drop);
    }
    solver.parsed_url().context("Invalid solver URL")?;

    // The solver channel lives on this runtime while eframe owns the main thread.
    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    let _guard = runtime.enter();

    println!("Mouse and keyboard:");
    println!("  Click        — Add a city / remove the city under the pointer");
    println!("  Drag         — Pan");
    println!("  Wheel        — Zoom at pointer");
    println!("  Ctrl+Z       — Undo");
    println!("  Ctrl+Y       — Redo");
    println!("  Enter        — Solve");
    println!("  Home / 0     — Reset view");

    let file = args.file;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1024.0, 768.0]),
        ..Default::default()
    };
    eframe::run_native(
        "tourmap editor",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            let ctx = cc.egui_ctx.clone();
            let notifier: Notifier = Arc::new(move || ctx.request_repaint());
            let channel = SolverChannel::connect_with_notifier(solver, Some(notifier))?;
            Ok(Box::new(TourMapApp::new(EditorSession::new(state, channel), file)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
