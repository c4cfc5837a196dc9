use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use super::error::SubscriptionError;

/// "Send envelope, receive envelope". The seam tests replace with a stub.
#[async_trait]
pub trait SoapTransport: Send + Sync {
    async fn send(&self, envelope: String) -> Result<String, SubscriptionError>;
}

/// HTTP transport to the legacy service.
///
/// Connection pooling is disabled: every call opens, uses and closes its own
/// connection, and every call is bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpTransport {
    pub const SERVICE_PATH: &'static str = "/api/subscribe";

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SubscriptionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| SubscriptionError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), Self::SERVICE_PATH),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_error(&self, err: reqwest::Error) -> SubscriptionError {
        if err.is_timeout() {
            SubscriptionError::Timeout(self.timeout)
        } else {
            SubscriptionError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl SoapTransport for HttpTransport {
    async fn send(&self, envelope: String) -> Result<String, SubscriptionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml")
            .body(envelope)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubscriptionError::HttpStatus(status.as_u16()));
        }

        response.text().await.map_err(|e| self.map_error(e))
    }
}
