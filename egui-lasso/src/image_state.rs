use std::io;

use egui::{
    load::SizedTexture, ColorImage, ImageSource, TextureHandle, TextureId, TextureOptions, Vec2,
};
use image::DynamicImage;
use log::info;

use crate::{AsyncTask, BoxFuture};

#[allow(clippy::large_enum_variant)]
pub enum ImageState {
    NotLoaded,
    Loading(AsyncTask<io::Result<DynamicImage>>),
    Loaded(LoadedImage),
    Error(String),
}

impl ImageState {
    /// Start loading a new image, replacing whatever was shown before.
    pub fn begin_load(&mut self, loader: BoxFuture<'static, io::Result<DynamicImage>>) {
        *self = ImageState::Loading(AsyncTask::new(loader));
    }

    /// Drive a pending load forward; call once per frame.
    pub fn poll(&mut self, ctx: &egui::Context) {
        if let ImageState::Loading(task) = self {
            if let Some(result) = task.poll_once() {
                *self = match result
                    .map_err(|e| format!("IO Error: {e}"))
                    .and_then(|i| LoadedImage::new(i, ctx).map_err(|e| e.to_string()))
                {
                    Ok(loaded) => {
                        info!(
                            "loaded {}x{} image",
                            loaded.original.width(),
                            loaded.original.height()
                        );
                        ImageState::Loaded(loaded)
                    }
                    Err(e) => ImageState::Error(e),
                };
            }
        }
    }
}

pub struct LoadedImage {
    /// Decoded source raster, kept at native resolution for export.
    original: DynamicImage,
    #[allow(
        dead_code,
        reason = "Acts as strong reference for the texture. The canvas could not render the image if the TextureHandle were dropped"
    )]
    texture: (TextureHandle, ImageSource<'static>),
}

impl LoadedImage {
    pub fn new(original: DynamicImage, ctx: &egui::Context) -> Result<Self, TextureExceedsLimit> {
        let (width, height) = (original.width(), original.height());
        let max_texture_side = ctx.input(|i| i.max_texture_side);
        if width as usize > max_texture_side || height as usize > max_texture_side {
            return Err(TextureExceedsLimit {
                width,
                height,
                max_texture_side,
            });
        }

        let rgba = original.to_rgba8();
        let handle = ctx.load_texture(
            "image",
            ColorImage::from_rgba_unmultiplied([width as usize, height as usize], rgba.as_raw()),
            TextureOptions {
                magnification: egui::TextureFilter::Nearest,
                ..Default::default()
            },
        );
        let source = ImageSource::Texture(SizedTexture::from_handle(&handle));

        Ok(Self {
            original,
            texture: (handle, source),
        })
    }

    pub fn original(&self) -> &DynamicImage {
        &self.original
    }

    pub fn texture_id(&self) -> TextureId {
        self.texture.0.id()
    }

    /// Natural image dimensions in pixels.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.original.width() as f32, self.original.height() as f32)
    }
}

#[derive(Debug, thiserror::Error)]
#[error(
    "Image too large: {}x{}, max texture side is {}",
    width,
    height,
    max_texture_side
)]
pub struct TextureExceedsLimit {
    width: u32,
    height: u32,
    max_texture_side: usize,
}
