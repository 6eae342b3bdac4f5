//! CardioTwin command-line entry point.
//!
//! Usage:
//!   cargo run -p cardiotwin -- serve
//!   cargo run -p cardiotwin -- serve --config cardiotwin.toml --bind 127.0.0.1:8080
//!   cargo run -p cardiotwin -- check-model --model models/heart_model.toml

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cardiotwin_contracts::{
    error::{CardioError, CardioResult},
    vitals::{FeatureVector, RiskLabel, Snapshot, StaticAttributes},
};
use cardiotwin_core::{traits::Classifier, Simulator, StateStore};
use cardiotwin_model::LinearClassifier;
use cardiotwin_server::{serve, AppConfig};

// ── CLI definition ────────────────────────────────────────────────────────────

/// CardioTwin: a simulated cardiac patient with risk classification.
#[derive(Parser)]
#[command(
    name = "cardiotwin",
    about = "CardioTwin vital-sign simulator",
    long_about = "Simulates a cardiac patient's vital signs, classifies heart-disease risk,\n\
                  projects forecasts, raises threshold alerts, and serves it all over HTTP."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the simulation loop and the HTTP API.
    Serve {
        /// TOML configuration file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Listen address, overriding `[server] bind`.
        #[arg(long)]
        bind: Option<String>,
        /// Model artifact, overriding `[model] path`.
        #[arg(long)]
        model: Option<PathBuf>,
    },
    /// Load a model artifact and classify the default patient once.
    CheckModel {
        #[arg(long, default_value = "models/heart_model.toml")]
        model: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for per-tick output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Serve {
            config,
            bind,
            model,
        } => run_serve(config.as_deref(), bind, model),
        Command::CheckModel { model } => run_check_model(&model),
    };

    if let Err(e) = result {
        error!(error = %e, "cardiotwin exited with an error");
        eprintln!("cardiotwin error: {}", e);
        std::process::exit(1);
    }
}

// ── serve ─────────────────────────────────────────────────────────────────────

fn run_serve(
    config_path: Option<&Path>,
    bind: Option<String>,
    model: Option<PathBuf>,
) -> CardioResult<()> {
    let mut config = match config_path {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(model) = model {
        config.model.path = model;
    }
    let addr = config.bind_addr()?;

    // A missing or corrupt model is fatal: nothing is served without it.
    let classifier = LinearClassifier::from_file(&config.model.path)?;

    let store = Arc::new(StateStore::new(config.thresholds));
    let simulation = config.simulation_config();
    info!(
        tick_interval_ms = simulation.tick_interval_ms,
        alerts = simulation.features.alerts,
        forecasting = simulation.features.forecasting,
        "starting simulation loop"
    );
    Simulator::new(store.clone(), Arc::new(classifier), simulation)
        .spawn()
        .map_err(|e| CardioError::ConfigError {
            reason: format!("failed to spawn simulation thread: {}", e),
        })?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CardioError::ConfigError {
            reason: format!("failed to build async runtime: {}", e),
        })?;
    runtime.block_on(serve(store, addr))
}

// ── check-model ───────────────────────────────────────────────────────────────

fn run_check_model(path: &Path) -> CardioResult<()> {
    let model = LinearClassifier::from_file(path)?;
    let features = FeatureVector::assemble(
        &StaticAttributes::default(),
        &Snapshot::default().dynamic_vitals(),
    );
    let probability = model.probability(&features)?;
    let label = RiskLabel::from_class(model.predict(&features)?);

    println!("model:       {}", model.name());
    println!("path:        {}", path.display());
    println!("probability: {:.3}", probability);
    println!("label:       {}", label);
    Ok(())
}
