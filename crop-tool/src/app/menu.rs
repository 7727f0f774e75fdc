use egui_lasso::{ImageState, Tool};

impl super::CropToolApp {
    pub(super) fn menu_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open\u{2026}").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("images", &["png", "jpg", "jpeg", "tif", "tiff"])
                    .pick_file()
                {
                    self.selection.clear();
                    self.export_error = None;
                    self.image_state.begin_load(super::load_image(path));
                }
            }

            for (tool, label) in [(Tool::Lasso, "Lasso"), (Tool::Square, "Rectangle")] {
                if ui
                    .selectable_label(self.selection.tool() == tool, label)
                    .clicked()
                {
                    self.selection.select_tool(tool);
                }
            }

            ui.scope(|ui| {
                if !matches!(self.image_state, ImageState::Loaded(_)) {
                    ui.disable();
                }
                if ui.button("Export Selection").clicked() {
                    self.export();
                }
            });

            if let Some(error) = &self.export_error {
                ui.label(format!("Export failed: {error}"));
            }
        });
    }
}
