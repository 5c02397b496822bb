use std::path::Path;

use anyhow::Context;
use url::Url;

use crate::foundation::{
    core::{DEFAULT_REMOTE_BASE, MatrixSize},
    error::{PixooError, PixooResult},
};

/// On-disk configuration, JSON:
///
/// ```json
/// {
///   "device": { "ip": "192.168.1.50", "size": 64 },
///   "homeassistant": {
///     "token": "...",
///     "interface": "http://hass.local:8123",
///     "entity_id": "media_player.living_room"
///   }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PixooConfig {
    /// The display to drive.
    pub device: DeviceConfig,
    /// Optional Home Assistant link for album art.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homeassistant: Option<HubConfig>,
}

/// Where the display lives and how big it is.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// LAN address, no scheme.
    pub ip: String,
    /// Panel side; defaults to 64.
    #[serde(default)]
    pub size: MatrixSize,
    /// Divoom cloud endpoint.
    #[serde(default = "default_remote_base")]
    pub remote_base: String,
}

/// Home Assistant connection.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HubConfig {
    /// Long-lived access token.
    pub token: String,
    /// Base URL, e.g. `http://hass.local:8123`.
    pub interface: String,
    /// Media player entity whose artwork is shown.
    pub entity_id: String,
}

fn default_remote_base() -> String {
    DEFAULT_REMOTE_BASE.to_string()
}

impl DeviceConfig {
    /// Device at `ip` using the default cloud endpoint.
    pub fn new(ip: impl Into<String>, size: MatrixSize) -> Self {
        Self {
            ip: ip.into(),
            size,
            remote_base: default_remote_base(),
        }
    }
}

impl PixooConfig {
    /// Read, parse and validate a config file.
    pub fn from_path(path: impl AsRef<Path>) -> PixooResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse and validate.
    pub fn from_json_str(s: &str) -> PixooResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| PixooError::serde(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject empty addresses, unparsable URLs and a blank hub token or entity.
    pub fn validate(&self) -> PixooResult<()> {
        if self.device.ip.trim().is_empty() {
            return Err(PixooError::validation("device.ip must not be empty"));
        }
        check_url("device.remote_base", &self.device.remote_base)?;

        if let Some(hub) = &self.homeassistant {
            check_url("homeassistant.interface", &hub.interface)?;
            if hub.token.trim().is_empty() {
                return Err(PixooError::validation("homeassistant.token must not be empty"));
            }
            if hub.entity_id.trim().is_empty() {
                return Err(PixooError::validation(
                    "homeassistant.entity_id must not be empty",
                ));
            }
        }
        Ok(())
    }
}

fn check_url(field: &str, value: &str) -> PixooResult<()> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| PixooError::validation(format!("{field} '{value}': {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
