mod app;
mod ui;

use std::sync::Arc;

use app::SafmrFinderApp;
use eframe::egui;
use safmr_finder::config::AppConfig;
use safmr_finder::data::cache::DatasetCache;
use safmr_finder::state::AppState;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    log::info!("Dataset source: {}", config.dataset_path.display());

    // Loaded once here; the UI only ever swaps in whole new snapshots.
    let cache = Arc::new(DatasetCache::new(&config.dataset_path));
    let state = AppState::new(cache, config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SAFMR Finder – Fair Market Rent",
        options,
        Box::new(move |_cc| Ok(Box::new(SafmrFinderApp::new(state)))),
    )
}
