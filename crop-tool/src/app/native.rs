use std::{io, path::PathBuf};

use eframe::egui;
use log::info;

use super::CropToolApp;
use crate::config::Config;

pub fn run_native() -> eframe::Result {
    env_logger::init();

    let config: Config = match std::fs::File::open("config.json") {
        Ok(f) => serde_json::from_reader(f).map_err(|e| eframe::Error::AppCreation(Box::new(e)))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Config::default(),
        Err(e) => Err(eframe::Error::AppCreation(Box::new(e)))?,
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(config.viewport),
        ..Default::default()
    };

    let image = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.image.clone());

    info!("Run with config: {config:?}");
    eframe::run_native(
        "Crop Tool",
        options,
        Box::new(move |cc| Ok(Box::new(CropToolApp::new(cc, &config, image)))),
    )
}
