use std::{io::Cursor, path::Path};

use anyhow::Context;
use image::{AnimationDecoder, DynamicImage, ImageFormat, codecs::gif::GifDecoder};

use crate::{
    device::transport::Transport,
    foundation::error::{PixooError, PixooResult},
};

/// Some image hosts reject requests without a user agent.
const FETCH_USER_AGENT: (&str, &str) = ("User-Agent", "null");

/// One decoded source frame plus the display time the decoder reported for it.
#[derive(Clone, Debug)]
pub struct SourceFrame {
    /// Decoded pixels, any color type.
    pub image: DynamicImage,
    /// `None` for still images, which carry no timing metadata.
    pub delay_ms: Option<u32>,
}

/// Random-access view over a decoded frame sequence.
///
/// `frame_at` returning `Ok(None)` is the end-of-sequence signal, the normal
/// way a streaming loop terminates.
pub trait FrameSource {
    /// Number of frames the decoder produced.
    fn frame_count(&self) -> usize;

    /// Decoder-reported display time of frame `index`, if any.
    fn delay_ms(&self, index: usize) -> Option<u32>;

    /// Frame at `index`, or `None` once `index` runs past the end.
    fn frame_at(&mut self, index: usize) -> PixooResult<Option<SourceFrame>>;
}

/// Fully decoded frames held in memory. GIFs must be decoded up front to learn
/// their frame count, so there is no lazy variant.
#[derive(Clone, Debug, Default)]
pub struct DecodedFrames {
    frames: Vec<SourceFrame>,
}

impl DecodedFrames {
    /// Wrap an already decoded still image (e.g. a rendered QR code).
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            frames: vec![SourceFrame {
                image,
                delay_ms: None,
            }],
        }
    }

    /// Wrap frames decoded elsewhere, in display order.
    pub fn from_frames(frames: Vec<SourceFrame>) -> Self {
        Self { frames }
    }

    /// Decode encoded bytes. GIFs yield every animation frame, anything else one frame.
    pub fn decode(bytes: &[u8]) -> PixooResult<Self> {
        let format = image::guess_format(bytes)
            .map_err(|e| PixooError::decode(format!("unrecognized image format: {e}")))?;

        if format == ImageFormat::Gif {
            return decode_gif(bytes);
        }

        let image = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| PixooError::decode(format!("decode {format:?} image: {e}")))?;
        Ok(Self::from_image(image))
    }

    /// Read and decode a local file.
    pub fn open(path: impl AsRef<Path>) -> PixooResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read image '{}'", path.display()))?;
        Self::decode(&bytes)
    }

    /// Download and decode a remote image or GIF.
    pub fn fetch(transport: &mut dyn Transport, url: &str) -> PixooResult<Self> {
        tracing::debug!(url, "fetching source image");
        let bytes = transport.get_bytes(url, &[FETCH_USER_AGENT])?;
        Self::decode(&bytes)
    }

    /// `true` when nothing was decoded.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// All frames in display order.
    pub fn frames(&self) -> &[SourceFrame] {
        &self.frames
    }
}

impl FrameSource for DecodedFrames {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn delay_ms(&self, index: usize) -> Option<u32> {
        self.frames.get(index).and_then(|f| f.delay_ms)
    }

    fn frame_at(&mut self, index: usize) -> PixooResult<Option<SourceFrame>> {
        Ok(self.frames.get(index).cloned())
    }
}

fn decode_gif(bytes: &[u8]) -> PixooResult<DecodedFrames> {
    let decoder = GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| PixooError::decode(format!("open gif: {e}")))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| PixooError::decode(format!("decode gif frames: {e}")))?;

    if frames.is_empty() {
        return Err(PixooError::decode("gif contains no frames"));
    }

    let frames = frames
        .into_iter()
        .map(|frame| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay_ms = if denom == 0 { numer } else { numer / denom };
            SourceFrame {
                image: DynamicImage::ImageRgba8(frame.into_buffer()),
                delay_ms: Some(delay_ms),
            }
        })
        .collect();

    Ok(DecodedFrames { frames })
}

#[cfg(test)]
#[path = "../../tests/unit/frame/source.rs"]
mod tests;
