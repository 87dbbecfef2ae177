//! HTTP gateway client.

use std::time::Duration;

use async_trait::async_trait;
use cubby_proto::LockerSnapshot;
use serde::Serialize;

use crate::{backend::LockerBackend, error::GatewayError};

/// Request timeout for backend calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct UseRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct UnlockRequest<'a> {
    pin: &'a str,
}

/// HTTP client for the locker backend.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a client for the backend at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Network(format!("http client init failed: {e}")))?;

        Ok(Self { http, base_url: base_url.into() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    async fn post_snapshot<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<LockerSnapshot, GatewayError> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Self::decode_snapshot(response).await
    }

    async fn decode_snapshot(response: reqwest::Response) -> Result<LockerSnapshot, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = GatewayError::from_response(status.as_u16(), &body);
            tracing::debug!(%status, %error, "backend rejected request");
            return Err(error);
        }

        response.json::<LockerSnapshot>().await.map_err(|e| GatewayError::Server {
            status: status.as_u16(),
            message: format!("invalid response body: {e}"),
        })
    }
}

#[async_trait]
impl LockerBackend for GatewayClient {
    async fn begin_deposit(&self, email: &str) -> Result<LockerSnapshot, GatewayError> {
        self.post_snapshot("/use", &UseRequest { email }).await
    }

    async fn submit_unlock(&self, pin: &str) -> Result<LockerSnapshot, GatewayError> {
        self.post_snapshot("/unlock", &UnlockRequest { pin }).await
    }

    async fn locker_status(&self, locker_id: &str) -> Result<LockerSnapshot, GatewayError> {
        let response = self
            .http
            .get(self.url(&format!("/locker/{locker_id}")))
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Self::decode_snapshot(response).await
    }
}
