use std::io::Read as _;

use crate::foundation::error::{PixooError, PixooResult};

/// Blocking request/response seam between the session and the network.
///
/// Implementations must surface connection failures and non-2xx statuses as
/// [`PixooError::Transport`]. Device-level error codes inside a 2xx body are
/// not the transport's concern.
pub trait Transport {
    /// POST `body` as JSON and parse the response body as JSON.
    fn post_json(&mut self, url: &str, body: &serde_json::Value)
    -> PixooResult<serde_json::Value>;

    /// GET `url` with extra request headers and return the raw body.
    fn get_bytes(&mut self, url: &str, headers: &[(&str, &str)]) -> PixooResult<Vec<u8>>;
}

/// [`Transport`] over a shared `ureq` agent. No retries; timeouts are the agent defaults.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Transport over a fresh agent with default settings.
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    /// Transport over a caller-configured agent (timeouts, proxy).
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn post_json(
        &mut self,
        url: &str,
        body: &serde_json::Value,
    ) -> PixooResult<serde_json::Value> {
        let response = self
            .agent
            .post(url)
            .send_json(body)
            .map_err(|e| map_ureq_error(url, e))?;

        response
            .into_json::<serde_json::Value>()
            .map_err(|e| PixooError::serde(format!("response from '{url}' is not JSON: {e}")))
    }

    fn get_bytes(&mut self, url: &str, headers: &[(&str, &str)]) -> PixooResult<Vec<u8>> {
        let mut request = self.agent.get(url);
        for (name, value) in headers {
            request = request.set(name, value);
        }
        let response = request.call().map_err(|e| map_ureq_error(url, e))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| PixooError::transport(format!("read body of '{url}': {e}")))?;
        Ok(bytes)
    }
}

fn map_ureq_error(url: &str, err: ureq::Error) -> PixooError {
    match err {
        ureq::Error::Status(code, _) => {
            PixooError::transport(format!("'{url}' answered HTTP {code}"))
        }
        ureq::Error::Transport(t) => PixooError::transport(format!("'{url}': {t}")),
    }
}
