//! Scripted in-memory transport shared by the device unit tests.

use std::collections::HashMap;

use serde_json::{Value, json};

use crate::{
    device::transport::Transport,
    foundation::{
        core::DEFAULT_REMOTE_BASE,
        error::{PixooError, PixooResult},
    },
};

/// Records every request. Local replies are keyed by command name, remote
/// replies by path. Unscripted `Draw/GetHttpGifId` calls hand out 1, 2, 3...
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    pub posts: Vec<(String, Value)>,
    pub gets: Vec<(String, Vec<(String, String)>)>,
    replies: HashMap<String, Value>,
    bodies: HashMap<String, Vec<u8>>,
    failing: Option<String>,
    next_pic_id: u32,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, key: &str, body: Value) -> Self {
        self.replies.insert(key.to_string(), body);
        self
    }

    /// Change a scripted reply mid-test.
    pub fn set_reply(&mut self, key: &str, body: Value) {
        self.replies.insert(key.to_string(), body);
    }

    pub fn serve(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.bodies.insert(url.to_string(), bytes);
        self
    }

    /// Make every request for `key` fail at the transport level.
    pub fn fail(mut self, key: &str) -> Self {
        self.failing = Some(key.to_string());
        self
    }

    /// Command names (local) or paths (remote), in request order.
    pub fn keys(&self) -> Vec<String> {
        self.posts.iter().map(|(url, body)| key_of(url, body)).collect()
    }

    pub fn bodies_for(&self, key: &str) -> Vec<&Value> {
        self.posts
            .iter()
            .filter(|(url, body)| key_of(url, body) == key)
            .map(|(_, body)| body)
            .collect()
    }
}

fn key_of(url: &str, body: &Value) -> String {
    match body.get("Command").and_then(Value::as_str) {
        Some(cmd) => cmd.to_string(),
        None => url.strip_prefix(DEFAULT_REMOTE_BASE).unwrap_or(url).to_string(),
    }
}

impl Transport for ScriptedTransport {
    fn post_json(&mut self, url: &str, body: &Value) -> PixooResult<Value> {
        self.posts.push((url.to_string(), body.clone()));
        let key = key_of(url, body);
        if self.failing.as_deref() == Some(key.as_str()) {
            return Err(PixooError::transport(format!("'{url}': connection refused")));
        }
        if let Some(reply) = self.replies.get(&key) {
            return Ok(reply.clone());
        }
        if key == "Draw/GetHttpGifId" {
            self.next_pic_id += 1;
            return Ok(json!({"error_code": 0, "PicId": self.next_pic_id}));
        }
        if body.get("Command").is_some() {
            Ok(json!({"error_code": 0}))
        } else {
            Ok(json!({"ReturnCode": 0}))
        }
    }

    fn get_bytes(&mut self, url: &str, headers: &[(&str, &str)]) -> PixooResult<Vec<u8>> {
        self.gets.push((
            url.to_string(),
            headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| PixooError::transport(format!("'{url}' answered HTTP 404")))
    }
}
