mod app;
mod config;
mod driver;
mod headless;
mod tui;
mod ui;

use anyhow::{Context, Result};
use config::Config;
use sim::Simulation;
use std::fs::File;
use std::io;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    let headless = config.headless_ticks.is_some();

    // The TUI owns the terminal, so it logs to a file instead
    let file_layer = if headless {
        None
    } else {
        let file = File::create(&config.log_file)
            .with_context(|| format!("Failed to create log file {}", config.log_file.display()))?;
        Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
    };
    let stderr_layer = headless.then(|| fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "viewer=info,sim=info".into()))
        .with(file_layer)
        .with(stderr_layer)
        .init();

    tracing::info!("Starting foxes and rabbits");
    tracing::info!("Parameters: {:?}", config.params);

    let mut sim = match config.seed {
        Some(seed) => {
            tracing::info!("Using seed {}", seed);
            Simulation::with_seed(config.params.clone(), seed)
        }
        None => Simulation::new(config.params.clone()),
    }
    .context("Failed to create simulation")?;

    match config.headless_ticks {
        Some(ticks) => headless::run(&mut sim, ticks, io::stdout().lock()),
        None => {
            let mut app = app::App::new(sim);
            tui::run(&mut app).await
        }
    }
}
