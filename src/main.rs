use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use env_logger::Env;

use estuary_panels::app::EstuaryApp;
use estuary_panels::config::DashboardConfig;
use estuary_panels::dashboard::{export_all, DatasetId};
use estuary_panels::data::sources::Sources;
use estuary_panels::state::AppState;

/// Extreme water-level event dashboard.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory holding the source files (overrides the config file).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write every dataset's panels as JSON into this directory and exit.
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// Dataset shown at start-up.
    #[arg(long, value_enum, default_value_t = DatasetId::Coastal)]
    dataset: DatasetId,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = DashboardConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    let catalog = config.catalog()?;

    log::info!("Loading sources from {}", config.data_dir.display());
    let sources = Sources::load(&config.data_dir, &config.files);
    log::info!("{}", sources.summary());

    if let Some(out) = args.export {
        let written = export_all(&out, &sources, &catalog)
            .with_context(|| format!("exporting panels to {}", out.display()))?;
        for path in written {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let state = AppState::new(config, catalog, sources, args.dataset);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Estuary Panels",
        options,
        Box::new(|_cc| Ok(Box::new(EstuaryApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
