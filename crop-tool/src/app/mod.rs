use std::{io, path::PathBuf};

use egui_lasso::{
    encode_png, export_selection, BoxFuture, ImageState, SelectionCanvas, SelectionState,
    ViewTransform,
};
use futures::FutureExt;
use log::{debug, info};

use crate::config::Config;

mod menu;
mod native;

pub use native::run_native;

const EXPORT_FILE_NAME: &str = "cropped-image.png";

pub(crate) struct CropToolApp {
    image_state: ImageState,
    selection: SelectionState,
    canvas: SelectionCanvas,
    export_error: Option<String>,
}

impl CropToolApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: &Config,
        image: Option<PathBuf>,
    ) -> Self {
        let mut image_state = ImageState::NotLoaded;
        if let Some(path) = image {
            image_state.begin_load(load_image(path));
        }
        Self {
            image_state,
            selection: SelectionState::default(),
            canvas: SelectionCanvas::new(config.canvas),
            export_error: None,
        }
    }

    /// Export the current selection as a PNG picked by the user.
    ///
    /// Anything short of a usable selection is a silent no-op; only encode
    /// and write failures surface in the toolbar.
    fn export(&mut self) {
        let ImageState::Loaded(image) = &self.image_state else {
            return;
        };
        let transform = ViewTransform::fit(image.size(), self.canvas.size());
        let Some(out) = export_selection(&self.selection, image.original(), transform) else {
            debug!("export skipped: no selection");
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(EXPORT_FILE_NAME)
            .save_file()
        else {
            return;
        };

        match encode_png(&out)
            .map_err(io::Error::other)
            .and_then(|bytes| std::fs::write(&path, bytes))
        {
            Ok(()) => {
                info!(
                    "exported {}x{} selection to {}",
                    out.width(),
                    out.height(),
                    path.display()
                );
                self.selection.clear();
                self.export_error = None;
            }
            Err(e) => self.export_error = Some(e.to_string()),
        }
    }
}

impl eframe::App for CropToolApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Image crop tool");
            self.menu_ui(ui);
            self.image_state.poll(ui.ctx());

            match &self.image_state {
                ImageState::NotLoaded => {
                    ui.label("Open an image to start a selection");
                }
                ImageState::Loading(_) => {
                    ui.spinner();
                }
                ImageState::Loaded(image) => {
                    self.canvas.ui(ui, image, &mut self.selection);
                }
                ImageState::Error(error) => {
                    ui.label(format!("Error: {error}"));
                }
            }
        });
    }
}

pub(crate) fn load_image(path: PathBuf) -> BoxFuture<'static, io::Result<image::DynamicImage>> {
    async move {
        let bytes = std::fs::read(&path)?;
        image::load_from_memory(&bytes).map_err(io::Error::other)
    }
    .boxed()
}
