use serde_json::json;

use super::*;
use crate::device::mock::ScriptedTransport;

const STATE_URL: &str = "http://hass.local:8123/api/states/media_player.kitchen";

#[test]
fn state_url_is_joined_from_the_interface() {
    let hub = HubClient::new("http://hass.local:8123", "tok", "media_player.kitchen").unwrap();
    assert_eq!(hub.state_url(), STATE_URL);
    assert_eq!(hub.entity_id(), "media_player.kitchen");
}

#[test]
fn relative_pictures_resolve_against_the_interface() {
    let body = json!({
        "state": "playing",
        "attributes": {"entity_picture": "/api/media_player_proxy/media_player.kitchen?token=abc"}
    });
    let mut transport = ScriptedTransport::new().serve(STATE_URL, serde_json::to_vec(&body).unwrap());
    let hub = HubClient::new("http://hass.local:8123/", "secret", "media_player.kitchen").unwrap();

    let url = hub.album_cover_url(&mut transport).unwrap();
    assert_eq!(
        url.as_deref(),
        Some("http://hass.local:8123/api/media_player_proxy/media_player.kitchen?token=abc")
    );

    let (_, headers) = &transport.gets[0];
    assert!(headers.contains(&("Authorization".to_string(), "Bearer secret".to_string())));
}

#[test]
fn missing_picture_is_none() {
    let body = json!({"state": "idle", "attributes": {}});
    let mut transport = ScriptedTransport::new().serve(STATE_URL, serde_json::to_vec(&body).unwrap());
    let hub = HubClient::new("http://hass.local:8123", "t", "media_player.kitchen").unwrap();
    assert_eq!(hub.album_cover_url(&mut transport).unwrap(), None);
}

#[test]
fn non_json_state_is_a_serde_error() {
    let mut transport = ScriptedTransport::new().serve(STATE_URL, b"<html>".to_vec());
    let hub = HubClient::new("http://hass.local:8123", "t", "media_player.kitchen").unwrap();
    assert!(matches!(
        hub.album_cover_url(&mut transport),
        Err(PixooError::Serde(_))
    ));
}

#[test]
fn bad_interface_is_rejected() {
    assert!(HubClient::new("hass.local", "t", "media_player.kitchen").is_err());
}
