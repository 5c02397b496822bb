use serde_json::Value;
use url::Url;

use crate::{
    animation::sampler::{self, AnimationPlan},
    codec::buffer::{EncodedBuffer, MatrixBuffer, encode},
    config::DeviceConfig,
    device::{
        protocol::{
            DialListResponse, DialTypeResponse, FontInfo, FontListResponse, GifIdResponse,
            LanDevice, LanDeviceListResponse, LocalCommand, LocalStatus, RemoteRequest,
            RemoteStatus, decode_response,
        },
        state::SessionState,
        transport::{HttpTransport, Transport},
    },
    foundation::{
        core::{AnimationId, DEFAULT_REMOTE_BASE, MAX_ANIMATION_FRAMES, MatrixSize, Rgb8, TextId},
        error::{PixooError, PixooResult},
    },
};

/// Texts longer than this (in bytes) are rejected by the firmware.
const MAX_TEXT_BYTES: usize = 511;

/// Stateful client for one device.
///
/// Two channels share one [`Transport`]: the *local* channel posts
/// `{"Command": ...}` bodies to `http://<ip>:80/post`, the *remote* channel
/// posts to paths under the cloud base URL. Every response is ingested into
/// [`SessionState`] before the call returns, including error responses.
/// There are no retries and exactly one request is in flight at a time.
pub struct DeviceSession<T: Transport = HttpTransport> {
    local_url: String,
    remote_base: String,
    size: MatrixSize,
    fill: Rgb8,
    transport: T,
    state: SessionState,
}

impl DeviceSession<HttpTransport> {
    /// Session over HTTP with the default cloud endpoint.
    pub fn connect(ip: &str, size: MatrixSize) -> Self {
        Self::with_transport(ip, size, HttpTransport::new())
    }

    /// Session over HTTP from the `device` section of a config file.
    pub fn from_config(cfg: &DeviceConfig) -> PixooResult<Self> {
        Self::connect(&cfg.ip, cfg.size).with_remote_base(&cfg.remote_base)
    }
}

impl<T: Transport> DeviceSession<T> {
    /// Session for the device at `ip` over any [`Transport`].
    pub fn with_transport(ip: &str, size: MatrixSize, transport: T) -> Self {
        Self {
            local_url: format!("http://{ip}:80/post"),
            remote_base: DEFAULT_REMOTE_BASE.to_string(),
            size,
            fill: Rgb8::BLACK,
            transport,
            state: SessionState::new(),
        }
    }

    /// Point the remote channel at another base URL.
    pub fn with_remote_base(mut self, base: &str) -> PixooResult<Self> {
        Url::parse(base)
            .map_err(|e| PixooError::validation(format!("remote base '{base}': {e}")))?;
        self.remote_base = base.to_string();
        Ok(self)
    }

    /// Letterbox color used when fitting non-square sources.
    pub fn with_fill(mut self, fill: Rgb8) -> Self {
        self.fill = fill;
        self
    }

    /// Matrix size frames are fitted to.
    pub fn size(&self) -> MatrixSize {
        self.size
    }

    /// Current letterbox color.
    pub fn fill(&self) -> Rgb8 {
        self.fill
    }

    /// `http://<ip>:80/post`.
    pub fn local_url(&self) -> &str {
        &self.local_url
    }

    /// Base URL remote paths are joined onto.
    pub fn remote_base(&self) -> &str {
        &self.remote_base
    }

    /// Everything learned from responses so far.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The underlying transport, mutably (fetches share it).
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// End the session and take the transport back.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// One local round trip. A non-zero `error_code` is logged, not raised.
    pub fn local(&mut self, cmd: &LocalCommand) -> PixooResult<Value> {
        tracing::debug!(command = cmd.name(), "local command");
        let body = self.transport.post_json(&self.local_url, &cmd.to_json())?;
        self.state.ingest(&body);

        match body.get("error_code").and_then(Value::as_i64) {
            Some(0) => {}
            Some(code) => tracing::error!(command = cmd.name(), code, "device reported an error"),
            None => tracing::warn!(command = cmd.name(), "response carries no error_code"),
        }
        Ok(body)
    }

    /// [`Self::local`] decoded as the bare status every command returns.
    pub fn local_status(&mut self, cmd: &LocalCommand) -> PixooResult<LocalStatus> {
        let body = self.local(cmd)?;
        decode_response(cmd.name(), &body)
    }

    /// One remote round trip. A non-zero `ReturnCode` is logged, not raised.
    pub fn remote(&mut self, req: &RemoteRequest) -> PixooResult<Value> {
        let url = Url::parse(&self.remote_base)
            .and_then(|base| base.join(req.path()))
            .map_err(|e| PixooError::validation(format!("remote path '{}': {e}", req.path())))?;
        tracing::debug!(path = req.path(), "remote request");

        let body = self.transport.post_json(url.as_str(), &req.to_json())?;
        self.state.ingest(&body);

        match body.get("ReturnCode").and_then(Value::as_i64) {
            Some(0) => {}
            Some(code) => tracing::error!(path = req.path(), code, "cloud reported an error"),
            None => tracing::warn!(path = req.path(), "response carries no ReturnCode"),
        }
        Ok(body)
    }

    /// [`Self::remote`] decoded as the bare status.
    pub fn remote_status(&mut self, req: &RemoteRequest) -> PixooResult<RemoteStatus> {
        let body = self.remote(req)?;
        decode_response(req.path(), &body)
    }

    /// Ask the device for the next animation identity.
    ///
    /// Call once per animation and reuse the id for all of its frames. The
    /// device is not asked to confirm the id before frames follow. An error
    /// reply without `PicId` falls back to the last known id; with no id known
    /// yet the call fails validation.
    pub fn get_animation_identity(&mut self) -> PixooResult<AnimationId> {
        let cmd = LocalCommand::new("Draw/GetHttpGifId");
        let body = self.local(&cmd)?;
        let resp: GifIdResponse = decode_response(cmd.name(), &body)?;
        let Some(pic_id) = resp.pic_id else {
            let Some(last) = self.state.animation_id() else {
                return Err(PixooError::validation(format!(
                    "device returned no animation id (error_code {}) and none is known yet",
                    resp.error_code
                )));
            };
            tracing::error!(
                code = resp.error_code,
                id = last.0,
                "device returned no animation id; reusing the last one"
            );
            return Ok(last);
        };
        let id = AnimationId(pic_id);
        self.state.set_animation_id(id);
        Ok(id)
    }

    /// Restart identities at 1.
    pub fn reset_animation_identity(&mut self) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Draw/ResetHttpGifId"))
    }

    /// Send frame `ordinal` of the animation `identity`.
    ///
    /// Frames of one animation must go out in ascending ordinal order with no
    /// gaps; the device buffers them by offset.
    pub fn send_frame(
        &mut self,
        plan: &AnimationPlan,
        ordinal: u32,
        identity: AnimationId,
        duration_ms: u32,
        encoded: &EncodedBuffer,
    ) -> PixooResult<LocalStatus> {
        if ordinal >= plan.frame_count {
            return Err(PixooError::validation(format!(
                "frame ordinal {ordinal} is outside an animation of {} frames",
                plan.frame_count
            )));
        }
        if plan.frame_count >= MAX_ANIMATION_FRAMES {
            return Err(PixooError::validation(format!(
                "animations must have fewer than {MAX_ANIMATION_FRAMES} frames, plan has {}",
                plan.frame_count
            )));
        }

        tracing::debug!(ordinal, id = identity.0, duration_ms, "sending frame");
        let cmd = LocalCommand::new("Draw/SendHttpGif")
            .param("PicNum", plan.frame_count)
            .param("PicWidth", self.size.side())
            .param("PicOffset", ordinal)
            .param("PicID", identity.0)
            .param("PicSpeed", duration_ms)
            .param("PicData", encoded.as_str());
        self.local_status(&cmd)
    }

    /// Show one still frame: a one-frame animation with a fixed 1000 ms dwell.
    ///
    /// An empty buffer is a no-op: nothing goes over the network.
    pub fn send_static_image(&mut self, buffer: &MatrixBuffer) -> PixooResult<Option<AnimationId>> {
        if buffer.is_empty() {
            tracing::info!("buffer is empty, nothing to send");
            return Ok(None);
        }
        if buffer.side() != self.size.side() {
            tracing::warn!(
                buffer_side = buffer.side(),
                device_side = self.size.side(),
                "buffer does not match the device matrix; sending anyway"
            );
        }

        let plan = sampler::plan(1, MAX_ANIMATION_FRAMES)?;
        let identity = self.get_animation_identity()?;
        self.send_frame(&plan, 0, identity, plan.frame_duration_ms, &encode(buffer))?;
        Ok(Some(identity))
    }

    /// Add or replace a text overlay on the current animation.
    ///
    /// The font catalogue is loaded once per session first. An unknown font id
    /// only produces a warning; the device falls back to its default font.
    pub fn send_text(&mut self, text: &TextOverlay) -> PixooResult<LocalStatus> {
        if text.text.len() > MAX_TEXT_BYTES {
            return Err(PixooError::validation(format!(
                "text is {} bytes, the device accepts at most {MAX_TEXT_BYTES}",
                text.text.len()
            )));
        }

        if let Err(err) = self.ensure_fonts_loaded() {
            tracing::warn!(error = %err, "font catalogue unavailable; sending text anyway");
        }
        if self.state.has_font(text.font) == Some(false) {
            tracing::warn!(
                font = text.font,
                "font is not in the catalogue; the device will use its default"
            );
        }

        let cmd = LocalCommand::new("Draw/SendHttpText")
            .param("TextId", text.id.get())
            .param("x", text.x)
            .param("y", text.y)
            .param("dir", text.direction as u8)
            .param("font", text.font)
            .param("TextWidth", text.width.clamp(16, 64))
            .param("TextString", text.text.as_str())
            .param("speed", text.speed_ms)
            .param("color", text.color.to_hex())
            .param("align", text.align as u8);
        self.local_status(&cmd)
    }

    /// Remove every text overlay.
    pub fn clear_text(&mut self) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Draw/ClearHttpText"))
    }

    /// Fetch the font catalogue unless this session already has it.
    ///
    /// A cloud error leaves the catalogue unloaded (empty slice) so the next
    /// call retries.
    pub fn ensure_fonts_loaded(&mut self) -> PixooResult<&[FontInfo]> {
        if self.state.fonts().is_none() {
            let req = RemoteRequest::new("Device/GetTimeDialFontList");
            let body = self.remote(&req)?;
            let resp: FontListResponse = decode_response(req.path(), &body)?;
            if resp.return_code == 0 {
                tracing::debug!(fonts = resp.font_list.len(), "font catalogue loaded");
                self.state.set_fonts(resp.font_list);
            }
        }
        Ok(self.state.fonts().unwrap_or_default())
    }

    /// Drop the cached font catalogue and fetch it again.
    pub fn refresh_fonts(&mut self) -> PixooResult<&[FontInfo]> {
        self.state.clear_fonts();
        self.ensure_fonts_loaded()
    }

    /// Devices the cloud sees on this LAN, fetched once per session.
    pub fn ensure_devices_loaded(&mut self) -> PixooResult<&[LanDevice]> {
        if self.state.devices().is_none() {
            let req = RemoteRequest::new("Device/ReturnSameLANDevice");
            let body = self.remote(&req)?;
            let resp: LanDeviceListResponse = decode_response(req.path(), &body)?;
            if resp.return_code == 0 {
                self.state.set_devices(resp.device_list);
            }
        }
        Ok(self.state.devices().unwrap_or_default())
    }

    /// Drop the cached device list and fetch it again.
    pub fn refresh_devices(&mut self) -> PixooResult<&[LanDevice]> {
        self.state.clear_devices();
        self.ensure_devices_loaded()
    }

    /// Clock-face categories, fetched once per session.
    pub fn ensure_dial_types_loaded(&mut self) -> PixooResult<&[String]> {
        if self.state.dial_types().is_none() {
            let req = RemoteRequest::new("Channel/GetDialType");
            let body = self.remote(&req)?;
            let resp: DialTypeResponse = decode_response(req.path(), &body)?;
            if resp.return_code == 0 {
                self.state.set_dial_types(resp.dial_type_list);
            }
        }
        Ok(self.state.dial_types().unwrap_or_default())
    }

    /// One page (30 faces) of a dial category. Unknown categories are not
    /// requested; the call warns and returns `None`.
    pub fn dial_list(&mut self, dial_type: &str, page: u32) -> PixooResult<Option<DialListResponse>> {
        let known = self.ensure_dial_types_loaded()?;
        if !known.iter().any(|t| t == dial_type) {
            tracing::warn!(dial_type, available = ?known, "unknown dial type");
            return Ok(None);
        }

        let req = RemoteRequest::new("Channel/GetDialList")
            .param("DialType", dial_type)
            .param("Page", page);
        let body = self.remote(&req)?;
        decode_response(req.path(), &body).map(Some)
    }
}

/// Scroll direction of a text overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum TextDirection {
    /// Scroll right to left.
    #[default]
    Left = 0,
    /// Scroll left to right.
    Right = 1,
}

/// Horizontal alignment of a text overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum TextAlign {
    /// Flush left.
    Left = 1,
    /// Centered.
    #[default]
    Middle = 2,
    /// Flush right.
    Right = 3,
}

/// One line of device-rendered text (16 px high, scrolls if it overflows).
#[derive(Clone, Debug, PartialEq)]
pub struct TextOverlay {
    /// Overlay slot; reusing it replaces the text.
    pub id: TextId,
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Scroll direction when the text overflows.
    pub direction: TextDirection,
    /// Font id from the cloud catalogue.
    pub font: u32,
    /// Clamped to `16..=64` on send.
    pub width: u32,
    /// UTF-8 text, under 512 bytes.
    pub text: String,
    /// Milliseconds per scroll step.
    pub speed_ms: u32,
    /// Text color.
    pub color: Rgb8,
    /// Alignment inside the text box.
    pub align: TextAlign,
}

impl TextOverlay {
    /// Yellow, centered, full-width text at the top-left with the default font.
    pub fn new(id: TextId, text: impl Into<String>) -> Self {
        Self {
            id,
            x: 0,
            y: 0,
            direction: TextDirection::Left,
            font: 0,
            width: 64,
            text: text.into(),
            speed_ms: 100,
            color: Rgb8::new(255, 255, 0),
            align: TextAlign::Middle,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/device/session.rs"]
mod tests;
