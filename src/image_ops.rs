//! Image processing operations.

use std::fs;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};

use crate::error::{NivasaError, Result};

/// Render a synthetic test frame.
///
/// A horizontal gradient whose base hue advances with `frame`, crossed by a
/// lighter diagonal band so consecutive frames are visually distinct.
pub fn render_frame(width: u32, height: u32, frame: u64) -> RgbImage {
    let base_hue = (frame * 47 % 360) as f32;
    let band = width.max(1) / 8 + 1;

    RgbImage::from_fn(width, height, |x, y| {
        let hue = (base_hue + 60.0 * x as f32 / width.max(1) as f32) % 360.0;
        let value = 0.35 + 0.55 * (1.0 - y as f32 / height.max(1) as f32);
        let on_band = (x + y) % (band * 4) < band;
        let saturation = if on_band { 0.25 } else { 0.85 };
        hsv_to_rgb(hue, saturation, value)
    })
}

/// Encode `img` as JPEG at `path`.
///
/// The file only appears once encoding has succeeded; a failed write
/// removes whatever was partially written.
///
/// # Arguments
///
/// * `quality` - JPEG quality, 1-100.
pub fn save_jpeg(img: &RgbImage, path: &Path, quality: u8) -> Result<()> {
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, quality)
        .encode_image(img)
        .map_err(|e| NivasaError::ImageProcessing(e.to_string()))?;

    if let Err(e) = fs::write(path, &encoded) {
        let _ = fs::remove_file(path);
        return Err(e.into());
    }
    Ok(())
}

/// Read an image's dimensions without decoding the pixels.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path).map_err(|e| NivasaError::ImageProcessing(e.to_string()))
}

#[allow(clippy::many_single_char_names)]
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb<u8> {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match h as u32 {
        0..60 => (c, x, 0.0),
        60..120 => (x, c, 0.0),
        120..180 => (0.0, c, x),
        180..240 => (0.0, x, c),
        240..300 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_u8 = |channel: f32| ((channel + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb([to_u8(r), to_u8(g), to_u8(b)])
}
