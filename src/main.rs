mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::RustyListingsApp;
use clap::{Parser, ValueEnum};
use data::export::DirectorySink;
use data::model::ListingStore;
use eframe::egui;
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "rusty-listings", about = "Browse, filter and export rental listings", version)]
struct Cli {
    /// Listings file to load at startup (.json, .csv or .parquet)
    #[arg(default_value = "data.json")]
    data: PathBuf,
    /// Export the loaded listings in this format and exit without opening a window
    #[arg(long, value_enum)]
    export: Option<ExportArg>,
    /// Directory receiving headless exports
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportArg {
    Csv,
    Json,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    // The window only opens once the store is loaded.
    let store = ListingStore::load_or_empty(&cli.data);
    let mut state = AppState::with_store(store);

    if let Some(format) = cli.export {
        let mut sink = DirectorySink::new(&cli.out_dir);
        match format {
            ExportArg::Csv => state.on_export_csv(&mut sink),
            ExportArg::Json => state.on_export_json(&mut sink),
        }
        if let Some(message) = state.notification.take() {
            eprintln!("{message}");
        }
        if let Some(message) = state.status_message.take() {
            eprintln!("{message}");
            std::process::exit(1);
        }
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Listings – Annonces",
        options,
        Box::new(|_cc| Ok(Box::new(RustyListingsApp::new(state)))),
    )
}
