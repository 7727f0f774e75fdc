use std::path::PathBuf;

use egui::Vec2;

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub viewport: Vec2,
    /// Fixed size of the selection canvas.
    pub canvas: Vec2,
    /// Image to load at startup; argv[1] takes precedence.
    pub image: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewport: [1280.0, 820.0].into(),
            canvas: [1200.0, 700.0].into(),
            image: None,
        }
    }
}
