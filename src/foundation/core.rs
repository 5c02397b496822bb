use crate::foundation::error::{PixooError, PixooResult};

/// Frames per animation must stay strictly below this cap.
pub const MAX_ANIMATION_FRAMES: u32 = 60;

/// Dwell time used for single-frame sends (static images carry no timing).
pub const STATIC_FRAME_DURATION_MS: u32 = 1000;

/// Text overlay ids live in `0..=MAX_TEXT_ID`; reusing an id replaces that overlay.
pub const MAX_TEXT_ID: u8 = 19;

/// Cloud discovery/metadata endpoint.
pub const DEFAULT_REMOTE_BASE: &str = "https://app.divoom-gz.com/";

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// `#000000`, the default letterbox fill.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// `#FFFFFF`.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB`, the form the device expects for text colors.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse `#RRGGBB` or `RRGGBB` (case-insensitive).
    pub fn parse_hex(s: &str) -> PixooResult<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(PixooError::validation(format!(
                "color '{s}' must be 6 hex digits"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| PixooError::validation(format!("color '{s}': {e}")))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl From<Rgb8> for image::Rgb<u8> {
    fn from(c: Rgb8) -> Self {
        image::Rgb([c.r, c.g, c.b])
    }
}

impl std::str::FromStr for Rgb8 {
    type Err = PixooError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

/// Side length of the device's square pixel matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum MatrixSize {
    /// 16×16 panel.
    S16,
    /// 32×32 panel.
    S32,
    /// 64×64 panel.
    #[default]
    S64,
}

impl MatrixSize {
    /// Map a side length in pixels to a supported size.
    pub fn new(side: u32) -> PixooResult<Self> {
        match side {
            16 => Ok(Self::S16),
            32 => Ok(Self::S32),
            64 => Ok(Self::S64),
            other => Err(PixooError::validation(format!(
                "matrix size {other} is not supported (expected 16, 32 or 64)"
            ))),
        }
    }

    /// Side length in pixels.
    pub fn side(self) -> u32 {
        match self {
            Self::S16 => 16,
            Self::S32 => 32,
            Self::S64 => 64,
        }
    }

    /// Byte length of one RGB frame for this matrix: `3 * side * side`.
    pub fn buffer_len(self) -> usize {
        let side = self.side() as usize;
        3 * side * side
    }
}

impl TryFrom<u32> for MatrixSize {
    type Error = PixooError;

    fn try_from(side: u32) -> Result<Self, Self::Error> {
        Self::new(side)
    }
}

impl From<MatrixSize> for u32 {
    fn from(size: MatrixSize) -> Self {
        size.side()
    }
}

/// Device-assigned id that ties the frames of one animation together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AnimationId(pub u32);

/// Text overlay slot, `0..=19`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextId(u8);

impl TextId {
    /// Validate `id` against [`MAX_TEXT_ID`].
    pub fn new(id: u8) -> PixooResult<Self> {
        if id > MAX_TEXT_ID {
            return Err(PixooError::validation(format!(
                "text id {id} is out of range (0..={MAX_TEXT_ID})"
            )));
        }
        Ok(Self(id))
    }

    /// Raw slot number.
    pub fn get(self) -> u8 {
        self.0
    }
}

/// Clamp an arbitrary integer into the device's `0..=100` percentage range.
pub fn clamp_percent(v: i64) -> u8 {
    v.clamp(0, 100) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
