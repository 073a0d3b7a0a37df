//! PNG export for rendered color buffers.

use std::path::Path;

use crate::buffer::ColorBuffer;

#[derive(Debug)]
pub enum ExportError {
    EncodeError(image::ImageError),
}

impl From<image::ImageError> for ExportError {
    fn from(e: image::ImageError) -> Self {
        ExportError::EncodeError(e)
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::EncodeError(e) => write!(f, "Encode error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

/// Quantizes a color buffer to packed 8-bit RGBA, row major from the top
/// row. Channels clamp to [0, 1] before scaling; halves round away from
/// zero.
pub fn to_rgba8(buffer: &ColorBuffer) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(buffer.data().len() * 4);
    for color in buffer.data() {
        for channel in [color.x, color.y, color.z, color.w] {
            bytes.push((channel.clamp(0.0, 1.0) * 255.0).round() as u8);
        }
    }
    bytes
}

/// Save a color buffer as a PNG file
pub fn save_png<P: AsRef<Path>>(buffer: &ColorBuffer, path: P) -> Result<(), ExportError> {
    let dimensions = buffer.dimensions();
    let bytes = to_rgba8(buffer);
    image::save_buffer(
        path,
        &bytes,
        dimensions.x,
        dimensions.y,
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(())
}
