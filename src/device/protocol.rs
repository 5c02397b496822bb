//! Wire shapes for the device's local command endpoint and the cloud endpoint.
//!
//! Every response has its own struct. Only declared fields are decoded; any
//! other field the firmware adds is ignored here and only shows up in the
//! session's flattened field map.

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::foundation::error::{PixooError, PixooResult};

/// `{"Command": "<Namespace/Verb>", <Param>: <value>, ...}`
#[derive(Clone, Debug, PartialEq)]
pub struct LocalCommand {
    name: &'static str,
    params: Map<String, Value>,
}

impl LocalCommand {
    /// Command without parameters, e.g. `"Channel/GetIndex"`.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            params: Map::new(),
        }
    }

    /// Add or replace one parameter.
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// `Namespace/Verb` sent as `Command`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parameters in insertion-independent (sorted) order.
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Request body: `Command` plus every parameter at the top level.
    pub fn to_json(&self) -> Value {
        let mut body = Map::with_capacity(self.params.len() + 1);
        body.insert("Command".to_string(), Value::from(self.name));
        for (k, v) in &self.params {
            body.insert(k.clone(), v.clone());
        }
        Value::Object(body)
    }
}

/// Cloud call: a path relative to the remote base plus a flat body.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteRequest {
    path: &'static str,
    params: Map<String, Value>,
}

impl RemoteRequest {
    /// Request without parameters, e.g. `"Device/ReturnSameLANDevice"`.
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            params: Map::new(),
        }
    }

    /// Add or replace one body field.
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Path relative to the remote base.
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Request body: the parameters as a flat object.
    pub fn to_json(&self) -> Value {
        Value::Object(self.params.clone())
    }
}

/// Decode a response into its declared schema.
pub fn decode_response<T: DeserializeOwned>(what: &str, body: &Value) -> PixooResult<T> {
    T::deserialize(body)
        .map_err(|e| PixooError::serde(format!("unexpected '{what}' response: {e}")))
}

/// `PicId` → `pic_id`, `ReturnCode` → `return_code`; snake_case passes through.
pub fn normalize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Top-level fields of a JSON object with normalized keys.
pub fn flatten_fields(body: &Value) -> Vec<(String, Value)> {
    match body {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (normalize_key(k), v.clone()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Minimal local response: every command reports `error_code`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct LocalStatus {
    /// `0` on success.
    pub error_code: i64,
}

impl LocalStatus {
    /// `true` when the device reported success.
    pub fn is_ok(&self) -> bool {
        self.error_code == 0
    }
}

/// Minimal remote response: every call reports `ReturnCode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct RemoteStatus {
    /// `0` on success.
    #[serde(rename = "ReturnCode")]
    pub return_code: i64,
}

/// `Draw/GetHttpGifId`. Error replies may omit `PicId`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct GifIdResponse {
    /// Device status, `0` on success.
    pub error_code: i64,
    /// Next animation id, when the device handed one out.
    #[serde(rename = "PicId", default)]
    pub pic_id: Option<u32>,
}

/// `Channel/GetIndex`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct ChannelIndexResponse {
    /// Device status, `0` on success.
    pub error_code: i64,
    /// Active channel, see [`Channel`](crate::Channel).
    #[serde(rename = "SelectIndex")]
    pub select_index: u8,
}

/// `Channel/GetClockInfo`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct ClockInfoResponse {
    /// Device status, `0` on success.
    pub error_code: i64,
    /// Active clock face.
    #[serde(rename = "ClockId")]
    pub clock_id: i64,
    /// Brightness, reported by newer firmware only.
    #[serde(rename = "Brightness", default)]
    pub brightness: Option<i64>,
}

/// `Channel/GetAllConf`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Device status, `0` on success.
    pub error_code: i64,
    /// Percent, `0..=100`.
    #[serde(rename = "Brightness")]
    pub brightness: i64,
    /// 1: alternate between faces and gallery.
    #[serde(rename = "RotationFlag")]
    pub rotation_flag: i64,
    /// Seconds a face stays up while alternating.
    #[serde(rename = "ClockTime")]
    pub clock_time: i64,
    /// Seconds the gallery stays up while alternating.
    #[serde(rename = "GalleryTime")]
    pub gallery_time: i64,
    /// Seconds per gallery image. Firmware spells it `SingleGalleyTime`.
    #[serde(rename = "SingleGalleyTime")]
    pub single_gallery_time: i64,
    /// Channel shown after power-on.
    #[serde(rename = "PowerOnChannelId")]
    pub power_on_channel_id: i64,
    /// 1: overlay the time on gallery images.
    #[serde(rename = "GalleryShowTimeFlag")]
    pub gallery_show_time_flag: i64,
    /// Selected clock face.
    #[serde(rename = "CurClockId")]
    pub cur_clock_id: i64,
    /// 1: 24-hour clock.
    #[serde(rename = "Time24Flag")]
    pub time_24_flag: i64,
    /// 0: Celsius, 1: Fahrenheit.
    #[serde(rename = "TemperatureMode")]
    pub temperature_mode: i64,
    /// 0: normal, 1: 90, 2: 180, 3: 270.
    #[serde(rename = "GyrateAngle")]
    pub gyrate_angle: i64,
    /// 1: mirrored output.
    #[serde(rename = "MirrorFlag")]
    pub mirror_flag: i64,
    /// 1: screen on.
    #[serde(rename = "LightSwitch")]
    pub light_switch: i64,
}

/// `Device/GetDeviceTime`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DeviceTime {
    /// Device status, `0` on success.
    pub error_code: i64,
    /// Unix seconds.
    #[serde(rename = "UTCTime")]
    pub utc_time: i64,
    /// Wall-clock time in the device's zone, `YYYY-MM-DD hh:mm:ss`.
    #[serde(rename = "LocalTime")]
    pub local_time: String,
}

/// `Device/GetWeatherInfo`. Fields are absent until the device has synced.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeatherInfo {
    /// Device status, `0` on success.
    pub error_code: i64,
    /// Condition name, e.g. `"Cloudy"`.
    #[serde(rename = "Weather")]
    pub weather: Option<String>,
    /// Current temperature in the configured unit.
    #[serde(rename = "CurTemp")]
    pub cur_temp: Option<f64>,
    /// Forecast low.
    #[serde(rename = "MinTemp")]
    pub min_temp: Option<f64>,
    /// Forecast high.
    #[serde(rename = "MaxTemp")]
    pub max_temp: Option<f64>,
    /// Air pressure, hPa.
    #[serde(rename = "Pressure")]
    pub pressure: Option<f64>,
    /// Relative humidity, percent.
    #[serde(rename = "Humidity")]
    pub humidity: Option<f64>,
    /// Visibility, metres.
    #[serde(rename = "Visibility")]
    pub visibility: Option<f64>,
    /// Wind speed, m/s.
    #[serde(rename = "WindSpeed")]
    pub wind_speed: Option<f64>,
}

/// One entry of `Device/GetTimeDialFontList`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FontInfo {
    /// Value for a text overlay's `font`.
    pub id: u32,
    /// Display name, empty when the cloud omits it.
    #[serde(default)]
    pub name: String,
}

/// `Device/GetTimeDialFontList`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FontListResponse {
    /// Cloud status, `0` on success.
    #[serde(rename = "ReturnCode")]
    pub return_code: i64,
    /// Available fonts.
    #[serde(rename = "FontList", default)]
    pub font_list: Vec<FontInfo>,
}

/// One entry of `Device/ReturnSameLANDevice`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LanDevice {
    /// User-visible name.
    #[serde(rename = "DeviceName", default)]
    pub device_name: String,
    /// Cloud device id.
    #[serde(rename = "DeviceId")]
    pub device_id: u64,
    /// LAN address to build a session against.
    #[serde(rename = "DevicePrivateIP")]
    pub device_private_ip: String,
    /// Hardware address.
    #[serde(rename = "DeviceMac", default)]
    pub device_mac: String,
}

/// `Device/ReturnSameLANDevice`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LanDeviceListResponse {
    /// Cloud status, `0` on success.
    #[serde(rename = "ReturnCode")]
    pub return_code: i64,
    /// Devices seen behind the caller's public address.
    #[serde(rename = "DeviceList", default)]
    pub device_list: Vec<LanDevice>,
}

/// `Channel/GetDialType`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DialTypeResponse {
    /// Cloud status, `0` on success.
    #[serde(rename = "ReturnCode")]
    pub return_code: i64,
    /// Category names accepted by `Channel/GetDialList`.
    #[serde(rename = "DialTypeList", default)]
    pub dial_type_list: Vec<String>,
}

/// One clock face of `Channel/GetDialList`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DialFace {
    /// Value for `Channel/SetClockSelectId`.
    #[serde(rename = "ClockId")]
    pub clock_id: i64,
    /// Display name.
    #[serde(rename = "Name", default)]
    pub name: String,
}

/// `Channel/GetDialList`
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DialListResponse {
    /// Cloud status, `0` on success.
    #[serde(rename = "ReturnCode")]
    pub return_code: i64,
    /// Faces in the category across all pages.
    #[serde(rename = "TotalNum", default)]
    pub total_num: Option<u32>,
    /// Faces on the requested page.
    #[serde(rename = "DialList", default)]
    pub dial_list: Vec<DialFace>,
}

#[cfg(test)]
#[path = "../../tests/unit/device/protocol.rs"]
mod tests;
