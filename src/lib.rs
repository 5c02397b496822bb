//! Pixoo drives a networked RGB pixel-matrix display (16, 32 or 64 px square)
//! over its local HTTP command API.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: bytes, a path or a URL become a [`FrameSource`] (stills yield one frame, GIFs many)
//! 2. **Sample**: [`plan`] caps the frame count below [`MAX_ANIMATION_FRAMES`] and derives one dwell time
//! 3. **Fit**: [`fit`] letterboxes, resamples and orients each kept frame for the panel
//! 4. **Encode**: [`to_buffer`] + [`encode`] produce the base64 payload the device accepts
//! 5. **Stream**: [`DeviceSession::send_animation`] sends the frames under one animation identity
//!
//! A [`DeviceSession`] also exposes the rest of the device surface (text overlays,
//! channels, brightness, clock and tools) and the cloud catalogues (fonts, LAN devices,
//! clock faces). Device-reported error codes are logged and recorded in
//! [`SessionState`]; only transport, decode and validation failures become errors.
//!
//! # Getting started
//!
//! ```no_run
//! use pixoo::{DeviceSession, MatrixSize};
//!
//! let mut session = DeviceSession::connect("192.168.1.50", MatrixSize::S64);
//! session.set_brightness(60)?;
//! session.send_image_path("cat.gif")?;
//! # Ok::<(), pixoo::PixooError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod animation;
mod codec;
mod config;
mod device;
mod foundation;
mod frame;
mod hub;
mod qr;

pub use animation::sampler::{AnimationPlan, plan, representative_duration_ms};
pub use codec::buffer::{EncodedBuffer, MatrixBuffer, encode, to_buffer};
pub use config::{DeviceConfig, HubConfig, PixooConfig};
pub use device::controls::{Channel, CloudChannel, Rotation, StopwatchAction, TemperatureUnit, TfGif};
pub use device::protocol::{
    ChannelIndexResponse, ClockInfoResponse, DeviceSettings, DeviceTime, DialFace,
    DialListResponse, FontInfo, LanDevice, LocalCommand, LocalStatus, RemoteRequest,
    RemoteStatus, WeatherInfo, decode_response, normalize_key,
};
pub use device::session::{DeviceSession, TextAlign, TextDirection, TextOverlay};
pub use device::state::SessionState;
pub use device::stream::{StreamReport, preview_frame};
pub use device::transport::{HttpTransport, Transport};
pub use foundation::core::{
    AnimationId, DEFAULT_REMOTE_BASE, MAX_ANIMATION_FRAMES, MAX_TEXT_ID, MatrixSize, Rgb8,
    STATIC_FRAME_DURATION_MS, TextId, clamp_percent,
};
pub use foundation::error::{PixooError, PixooResult};
pub use frame::fit::fit;
pub use frame::source::{DecodedFrames, FrameSource, SourceFrame};
pub use hub::album::HubClient;
pub use qr::render::{QrStyle, render as render_qr};
