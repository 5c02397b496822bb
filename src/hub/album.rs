use serde::Deserialize;
use url::Url;

use crate::{
    config::HubConfig,
    device::transport::Transport,
    foundation::error::{PixooError, PixooResult},
};

/// Reads the cover art of a media-player entity from a home-automation hub's
/// REST API (`GET <interface>/api/states/<entity_id>`).
#[derive(Clone, Debug)]
pub struct HubClient {
    interface: Url,
    state_url: Url,
    entity_id: String,
    token: String,
}

#[derive(Debug, Default, Deserialize)]
struct EntityState {
    #[serde(default)]
    attributes: EntityAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct EntityAttributes {
    #[serde(default)]
    entity_picture: Option<String>,
}

impl HubClient {
    /// Client for `entity_id` on the instance at `interface`, authenticated with a long-lived token.
    pub fn new(interface: &str, token: impl Into<String>, entity_id: &str) -> PixooResult<Self> {
        let interface = Url::parse(interface)
            .map_err(|e| PixooError::validation(format!("hub interface '{interface}': {e}")))?;
        let state_url = interface
            .join("api/states/")
            .and_then(|u| u.join(entity_id))
            .map_err(|e| PixooError::validation(format!("hub entity '{entity_id}': {e}")))?;
        Ok(Self {
            interface,
            state_url,
            entity_id: entity_id.to_string(),
            token: token.into(),
        })
    }

    /// [`Self::new`] from the config file section.
    pub fn from_config(cfg: &HubConfig) -> PixooResult<Self> {
        Self::new(&cfg.interface, cfg.token.clone(), &cfg.entity_id)
    }

    /// Watched media player entity.
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Full `/api/states/<entity>` URL.
    pub fn state_url(&self) -> &str {
        self.state_url.as_str()
    }

    /// Absolute URL of the entity's current picture, `None` when the entity
    /// has none (player idle, nothing queued).
    pub fn album_cover_url(&self, transport: &mut dyn Transport) -> PixooResult<Option<String>> {
        let auth = format!("Bearer {}", self.token);
        let bytes = transport.get_bytes(
            self.state_url.as_str(),
            &[("Authorization", auth.as_str()), ("content-type", "application/json")],
        )?;
        let state: EntityState = serde_json::from_slice(&bytes)
            .map_err(|e| PixooError::serde(format!("hub state of '{}': {e}", self.entity_id)))?;

        let Some(picture) = state.attributes.entity_picture else {
            tracing::debug!(entity = %self.entity_id, "entity has no picture");
            return Ok(None);
        };
        let url = self
            .interface
            .join(&picture)
            .map_err(|e| PixooError::validation(format!("entity picture '{picture}': {e}")))?;
        Ok(Some(url.into()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/hub/album.rs"]
mod tests;
