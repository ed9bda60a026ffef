use crate::domain::ports::Transport;
use crate::utils::error::{Result, ShipmentError};
use reqwest::blocking::{Client, Response};
use serde_json::Value;
use std::time::Duration;

/// 以 `reqwest` 阻塞客戶端實作的傳輸層
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("dpd-shipment/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    fn read_body(url: &str, response: Response) -> Result<Vec<u8>> {
        let status = response.status();
        tracing::debug!("📡 Response from {}: {}", url, status);

        if !status.is_success() {
            return Err(ShipmentError::Transport {
                message: format!("HTTP {} from {}", status, url),
                code: Some(status.as_u16()),
            });
        }

        Ok(response.bytes()?.to_vec())
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> Result<Vec<u8>> {
        tracing::debug!("📡 POST {}", url);
        let response = self.client.post(url).timeout(timeout).json(body).send()?;
        Self::read_body(url, response)
    }

    fn get_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>> {
        tracing::debug!("📡 GET {}", url);
        let response = self.client.get(url).timeout(timeout).send()?;
        Self::read_body(url, response)
    }
}
