use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    device::protocol::{DeviceSettings, FontInfo, LanDevice, flatten_fields},
    foundation::core::AnimationId,
};

/// Last-known device state, refreshed after every successful round trip.
///
/// Owned by one [`DeviceSession`](crate::DeviceSession). The typed fields are
/// set from decoded responses; `fields` keeps every top-level response field
/// (normalized to snake_case) for inspection. Catalogues are lazily filled
/// and can be dropped with [`SessionState::invalidate_catalogues`].
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    last_error_code: Option<i64>,
    last_return_code: Option<i64>,
    animation_id: Option<AnimationId>,
    settings: Option<DeviceSettings>,
    fonts: Option<Vec<FontInfo>>,
    devices: Option<Vec<LanDevice>>,
    dial_types: Option<Vec<String>>,
    fields: BTreeMap<String, Value>,
}

impl SessionState {
    /// Empty state: nothing known yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a response body into the field map and pick up status codes.
    pub fn ingest(&mut self, body: &Value) {
        for (key, value) in flatten_fields(body) {
            match key.as_str() {
                "error_code" => self.last_error_code = value.as_i64(),
                "return_code" => self.last_return_code = value.as_i64(),
                _ => {}
            }
            tracing::debug!(field = %key, value = %value, "session field");
            self.fields.insert(key, value);
        }
    }

    /// Raw field by normalized name, e.g. `"pic_id"`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Every field seen so far, latest value wins.
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// `error_code` of the most recent local command.
    pub fn last_error_code(&self) -> Option<i64> {
        self.last_error_code
    }

    /// `ReturnCode` of the most recent remote call.
    pub fn last_return_code(&self) -> Option<i64> {
        self.last_return_code
    }

    /// Identity handed out by the last `Draw/GetHttpGifId`.
    pub fn animation_id(&self) -> Option<AnimationId> {
        self.animation_id
    }

    /// Settings from the last `Channel/GetAllConf`.
    pub fn settings(&self) -> Option<&DeviceSettings> {
        self.settings.as_ref()
    }

    /// Font catalogue, `None` until loaded.
    pub fn fonts(&self) -> Option<&[FontInfo]> {
        self.fonts.as_deref()
    }

    /// LAN device list, `None` until loaded.
    pub fn devices(&self) -> Option<&[LanDevice]> {
        self.devices.as_deref()
    }

    /// Clock-face categories, `None` until loaded.
    pub fn dial_types(&self) -> Option<&[String]> {
        self.dial_types.as_deref()
    }

    /// `None` until the font catalogue has been loaded.
    pub fn has_font(&self, id: u32) -> Option<bool> {
        self.fonts
            .as_ref()
            .map(|fonts| fonts.iter().any(|f| f.id == id))
    }

    /// Forget every lazily loaded catalogue so the next use refetches it.
    pub fn invalidate_catalogues(&mut self) {
        self.fonts = None;
        self.devices = None;
        self.dial_types = None;
    }

    pub(crate) fn set_animation_id(&mut self, id: AnimationId) {
        self.animation_id = Some(id);
    }

    pub(crate) fn set_settings(&mut self, settings: DeviceSettings) {
        self.settings = Some(settings);
    }

    pub(crate) fn set_fonts(&mut self, fonts: Vec<FontInfo>) {
        self.fonts = Some(fonts);
    }

    pub(crate) fn clear_fonts(&mut self) {
        self.fonts = None;
    }

    pub(crate) fn set_devices(&mut self, devices: Vec<LanDevice>) {
        self.devices = Some(devices);
    }

    pub(crate) fn clear_devices(&mut self) {
        self.devices = None;
    }

    pub(crate) fn set_dial_types(&mut self, dial_types: Vec<String>) {
        self.dial_types = Some(dial_types);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/device/state.rs"]
mod tests;
