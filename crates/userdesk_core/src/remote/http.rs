//! HTTP implementation of the remote source contract.
//!
//! # Responsibility
//! - Issue blocking GET requests against the demo user endpoint.
//! - Decode JSON payloads into canonical records.
//!
//! # Invariants
//! - Requests carry a bounded timeout; a hung endpoint cannot wedge callers.
//! - Non-2xx statuses map to `TransportError::Status`, except 404 on the
//!   single-record path which reads as "no such record".

use crate::model::user::{UserId, UserRecord};
use crate::remote::{RemoteSource, TransportError};
use log::{error, info};
use std::io::Read;
use std::time::{Duration, Instant};

const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// `ureq`-backed remote source for the demo user endpoint.
pub struct HttpRemoteSource {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpRemoteSource {
    /// Creates a source against the default demo endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a source against a caller-provided base URL.
    ///
    /// Used by tests and deployments that point at a local fixture server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn get_body(&self, url: &str) -> Result<Option<String>, TransportError> {
        let started_at = Instant::now();
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                error!(
                    "event=remote_fetch module=remote status=error duration_ms={} http_status={status} url={url}",
                    started_at.elapsed().as_millis()
                );
                if status == 404 {
                    return Ok(None);
                }
                return Err(TransportError::Status(status));
            }
            Err(ureq::Error::Transport(err)) => {
                error!(
                    "event=remote_fetch module=remote status=error duration_ms={} error_code=transport error={err}",
                    started_at.elapsed().as_millis()
                );
                return Err(TransportError::Network(err.to_string()));
            }
        };

        let mut body = String::new();
        response
            .into_reader()
            .read_to_string(&mut body)
            .map_err(|err| TransportError::Network(format!("failed to read body: {err}")))?;

        info!(
            "event=remote_fetch module=remote status=ok duration_ms={} url={url}",
            started_at.elapsed().as_millis()
        );
        Ok(Some(body))
    }
}

impl Default for HttpRemoteSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteSource for HttpRemoteSource {
    fn fetch_all(&self) -> Result<Vec<UserRecord>, TransportError> {
        let url = format!("{}/users", self.base_url);
        // A 404 on the collection path is a real endpoint failure, not an
        // empty result.
        let body = self
            .get_body(&url)?
            .ok_or(TransportError::Status(404))?;
        serde_json::from_str(&body).map_err(|err| TransportError::Decode(err.to_string()))
    }

    fn fetch_user(&self, id: UserId) -> Result<Option<UserRecord>, TransportError> {
        let url = format!("{}/users/{id}", self.base_url);
        let Some(body) = self.get_body(&url)? else {
            return Ok(None);
        };
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|err| TransportError::Decode(err.to_string()))
    }
}
