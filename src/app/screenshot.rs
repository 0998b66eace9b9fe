use std::io::Cursor;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use eframe::egui::{ColorImage, Rect};
use image::{ImageFormat, RgbaImage};

pub(super) fn crop_to_canvas(image: &ColorImage, canvas: Rect, pixels_per_point: f32) -> ColorImage {
    image.region(&canvas, Some(pixels_per_point))
}

pub(super) fn encode_png_data_uri(image: &ColorImage) -> Result<String> {
    let [width, height] = image.size;
    let buffer = RgbaImage::from_raw(width as u32, height as u32, image.as_raw().to_vec())
        .context("screenshot pixel buffer does not match its size")?;

    let mut bytes = Vec::new();
    buffer
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("failed to encode screenshot as PNG")?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(bytes)))
}
