//! Delivery of order payloads to the robot controller over HTTP.

use crate::orders::Orders;
use thiserror::Error;

/// Endpoint on the controller that accepts order payloads.
pub const SHOW_PATH: &str = "/api/show";

#[derive(Debug, Error)]
pub enum SendError {
    #[error("failed to serialize orders")]
    Serialize(#[from] serde_json::Error),

    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
}

/// Blocking client posting `{"orders": [...]}` to `http://<server>/api/show`.
pub struct OrderSender {
    url: String,
    agent: ureq::Agent,
}

impl OrderSender {
    /// `server` is `host:port`.
    pub fn new(server: &str) -> Self {
        Self {
            url: format!("http://{server}{SHOW_PATH}"),
            agent: ureq::Agent::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the payload and return the response body.
    pub fn send(&self, orders: &Orders) -> Result<String, SendError> {
        let body = serde_json::to_string(orders)?;
        tracing::debug!("POST {} ({} bytes)", self.url, body.len());

        match self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .set("Accept", "*/*")
            .send_string(&body)
        {
            Ok(response) => {
                let status = response.status();
                let text = response.into_string().unwrap_or_default();
                tracing::info!("Orders delivered to {}: {} {}", self.url, status, text.trim());
                Ok(text)
            }
            Err(ureq::Error::Status(status, response)) => Err(SendError::Status {
                status,
                body: response.into_string().unwrap_or_default(),
            }),
            Err(err) => Err(SendError::Transport {
                url: self.url.clone(),
                source: Box::new(err),
            }),
        }
    }
}
