//! QR code rendering for registration ids.
//!
//! Codes use error-correction level H and are rendered black on white into
//! a 300x300 PNG.

use image::imageops::{self, FilterType};
use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;
use thiserror::Error;

/// Rendered edge length in pixels.
pub const QR_SIZE: u32 = 300;

/// QR rendering errors.
#[derive(Debug, Error)]
pub enum QrError {
    /// The payload does not fit in a QR code.
    #[error("Failed to encode QR payload: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// PNG encoding failed.
    #[error("Failed to encode QR image: {0}")]
    Image(#[from] image::ImageError),

    /// The blocking task panicked or was cancelled.
    #[error("QR task failed: {0}")]
    Task(String),
}

/// Render `payload` into PNG bytes.
///
/// # Errors
///
/// Returns error if the payload cannot be encoded or the PNG cannot be
/// written.
pub fn render_png(payload: &str) -> Result<Vec<u8>, QrError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)?;
    let rendered = code
        .render::<Luma<u8>>()
        .dark_color(Luma([0]))
        .light_color(Luma([255]))
        .max_dimensions(QR_SIZE, QR_SIZE)
        .build();
    let image = imageops::resize(&rendered, QR_SIZE, QR_SIZE, FilterType::Nearest);

    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Render `payload` on the blocking thread pool.
///
/// # Errors
///
/// See [`render_png`].
pub async fn encode(payload: String) -> Result<Vec<u8>, QrError> {
    tokio::task::spawn_blocking(move || render_png(&payload))
        .await
        .map_err(|e| QrError::Task(e.to_string()))?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_png_is_fixed_size_black_on_white() {
        let bytes = render_png("0b8f8d1e-3c55-4f7e-9a8e-2f5e1f0c6d7a").unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .to_luma8();
        assert_eq!(decoded.dimensions(), (QR_SIZE, QR_SIZE));
        assert!(decoded.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert!(decoded.pixels().any(|p| p.0[0] == 0));
        // Quiet zone
        assert_eq!(decoded.get_pixel(0, 0).0[0], 255);
    }

    #[tokio::test]
    async fn test_encode_runs_off_the_runtime() {
        let bytes = encode("registration-id".to_string()).await.unwrap();
        assert!(!bytes.is_empty());
    }
}
