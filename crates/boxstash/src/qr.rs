//! QR code generation.
//!
//! Renders a URL into a black-on-white PNG: 10x10 pixels per module with
//! the standard 4-module quiet zone. Rendering is deterministic, so the
//! same URL always produces the same bytes.

use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use image::Luma;
use qrcode::QrCode;

use crate::error::Result;

/// Pixels per QR module.
const MODULE_PIXELS: u32 = 10;

/// Render `url` as PNG bytes.
///
/// # Errors
///
/// Returns an error if the QR encoder rejects the input (e.g. it exceeds
/// the symbol capacity) or PNG encoding fails.
pub fn generate(url: &str) -> Result<Vec<u8>> {
    let code = QrCode::new(url.as_bytes())?;
    let img = code
        .render::<Luma<u8>>()
        .module_dimensions(MODULE_PIXELS, MODULE_PIXELS)
        .quiet_zone(true)
        .build();

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

/// Render `url` as a base64-encoded PNG for inline `<img>` embedding.
///
/// # Errors
///
/// Same conditions as [`generate`].
pub fn generate_base64(url: &str) -> Result<String> {
    Ok(general_purpose::STANDARD.encode(generate(url)?))
}

/// Filename used when a box's QR code is downloaded.
#[must_use]
pub fn download_filename(box_id: &str) -> String {
    format!("{box_id}-qr.png")
}
