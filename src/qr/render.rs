use image::RgbImage;
use qrcode::{Color, EcLevel, QrCode, Version, types::QrError};

use crate::foundation::{
    core::Rgb8,
    error::{PixooError, PixooResult},
};

/// Smallest symbol tried first: 57 modules plus the quiet zone fills a 64 px panel.
const PREFERRED_VERSION: i16 = 10;

/// Colors and quiet zone of a rendered code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QrStyle {
    /// Dark module color.
    pub fill: Rgb8,
    /// Light module and quiet zone color.
    pub back: Rgb8,
    /// Quiet zone width in modules.
    pub border: u32,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            fill: Rgb8::BLACK,
            back: Rgb8::WHITE,
            border: 3,
        }
    }
}

/// Render an already-encoded payload as a `side × side` bitmap, one pixel per
/// module, anchored top-left. Pixels past the code are background.
///
/// Low error correction keeps the symbol small. Payloads too long for the
/// preferred version get the smallest version that fits; if that still does
/// not fit the matrix the call fails.
pub fn render(payload: &str, side: u32, style: QrStyle) -> PixooResult<RgbImage> {
    let code = match QrCode::with_version(payload, Version::Normal(PREFERRED_VERSION), EcLevel::L) {
        Ok(code) => code,
        Err(QrError::DataTooLong) => QrCode::with_error_correction_level(payload, EcLevel::L)
            .map_err(|e| PixooError::validation(format!("qr payload: {e}")))?,
        Err(e) => return Err(PixooError::validation(format!("qr payload: {e}"))),
    };

    let modules = code.width() as u32;
    let needed = modules + 2 * style.border;
    if needed > side {
        return Err(PixooError::validation(format!(
            "qr code needs {needed} px but the matrix is {side} px wide"
        )));
    }
    tracing::debug!(modules, version = ?code.version(), "rendered qr code");

    let mut image = RgbImage::from_pixel(side, side, style.back.into());
    for (i, color) in code.to_colors().into_iter().enumerate() {
        if color == Color::Dark {
            let x = i as u32 % modules + style.border;
            let y = i as u32 / modules + style.border;
            image.put_pixel(x, y, style.fill.into());
        }
    }
    Ok(image)
}

#[cfg(test)]
#[path = "../../tests/unit/qr/render.rs"]
mod tests;
