use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::RgbImage;

use crate::foundation::error::{PixooError, PixooResult};

/// Flat RGB bytes for one square frame, in device order.
///
/// Either empty (nothing staged) or exactly `3 * side * side` bytes; never
/// partially filled.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MatrixBuffer {
    side: u32,
    bytes: Vec<u8>,
}

impl MatrixBuffer {
    /// The "nothing staged" buffer. Sending it is a no-op.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adopt raw device-order bytes, checking the length invariant.
    pub fn from_raw(side: u32, bytes: Vec<u8>) -> PixooResult<Self> {
        let expected = 3 * (side as usize) * (side as usize);
        if bytes.len() != expected {
            return Err(PixooError::validation(format!(
                "buffer for a {side}x{side} matrix must be {expected} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self { side, bytes })
    }

    /// Matrix side the bytes were laid out for; `0` when empty.
    pub fn side(&self) -> u32 {
        self.side
    }

    /// `true` for the "nothing staged" buffer.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw bytes in device order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte length, `0` or `3 * side * side`.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

/// Base64 text form of a [`MatrixBuffer`], as carried in `PicData`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EncodedBuffer(String);

impl EncodedBuffer {
    /// The base64 text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap the base64 text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EncodedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Flatten a square frame into device order: columns outer, rows inner,
/// `r, g, b` per pixel.
///
/// The walk order is part of the wire protocol. Frames coming out of
/// [`fit`](crate::fit) are already transposed to compensate, so the panel
/// ends up showing the source left-to-right, top-to-bottom.
pub fn to_buffer(frame: &RgbImage) -> PixooResult<MatrixBuffer> {
    let (width, height) = frame.dimensions();
    if width != height {
        return Err(PixooError::validation(format!(
            "matrix frames must be square, got {width}x{height}"
        )));
    }

    let mut bytes = Vec::with_capacity(3 * (width as usize) * (height as usize));
    for x in 0..width {
        for y in 0..height {
            bytes.extend_from_slice(&frame.get_pixel(x, y).0);
        }
    }

    Ok(MatrixBuffer { side: width, bytes })
}

/// Standard (padded) base64 of the buffer bytes.
pub fn encode(buffer: &MatrixBuffer) -> EncodedBuffer {
    EncodedBuffer(STANDARD.encode(&buffer.bytes))
}

#[cfg(test)]
#[path = "../../tests/unit/codec/buffer.rs"]
mod tests;
