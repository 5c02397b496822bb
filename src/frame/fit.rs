use image::{DynamicImage, RgbImage, imageops};

use crate::foundation::core::{MatrixSize, Rgb8};

/// Letterbox `frame` into a square, resample it to the matrix and apply the
/// device's orientation correction.
///
/// Steps, in order:
/// 1. convert to 3-channel RGB (alpha is dropped, not composited)
/// 2. paste centered on a `max(w, h)` square canvas filled with `fill`
/// 3. bilinear resample to `size × size`
/// 4. rotate 270° counter-clockwise, then mirror left/right
///
/// Step 4 is fixed: it matches how the device addresses its pixels. The net
/// effect is a transpose, which is what makes the codec's column-major walk
/// come out row-major on the panel.
pub fn fit(frame: &DynamicImage, size: MatrixSize, fill: Rgb8) -> RgbImage {
    fit_to_side(&frame.to_rgb8(), size.side(), fill)
}

pub(crate) fn fit_to_side(rgb: &RgbImage, target: u32, fill: Rgb8) -> RgbImage {
    let square = letterbox(rgb, fill);
    let resized = if square.dimensions() == (target, target) {
        square
    } else {
        imageops::resize(&square, target, target, imageops::FilterType::Triangle)
    };
    orient(&resized)
}

fn letterbox(rgb: &RgbImage, fill: Rgb8) -> RgbImage {
    let (width, height) = rgb.dimensions();
    let side = width.max(height);
    let mut canvas = RgbImage::from_pixel(side, side, fill.into());
    let x = (side - width) / 2;
    let y = (side - height) / 2;
    imageops::replace(&mut canvas, rgb, i64::from(x), i64::from(y));
    canvas
}

fn orient(square: &RgbImage) -> RgbImage {
    // PIL-style `rotate(270)` is counter-clockwise, i.e. one clockwise quarter turn.
    let rotated = imageops::rotate90(square);
    imageops::flip_horizontal(&rotated)
}

#[cfg(test)]
#[path = "../../tests/unit/frame/fit.rs"]
mod tests;
