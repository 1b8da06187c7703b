//! Control-plane response unwrapping
//!
//! Turns a raw response into a typed value on 2xx, or into
//! `NoCloudError::Api` carrying the original status on anything else.

use std::collections::HashMap;

use nocloud_core::{ErrorCode, NoCloudError, NoCloudResult};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Error body shape returned by the control plane.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ResponseResolver {
    overrides: HashMap<u16, ErrorCode>,
}

impl ResponseResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `status` to `code` instead of the default category.
    pub fn with_code(mut self, status: u16, code: ErrorCode) -> Self {
        self.overrides.insert(status, code);
        self
    }

    pub fn code_for(&self, status: u16) -> ErrorCode {
        self.overrides
            .get(&status)
            .copied()
            .unwrap_or_else(|| ErrorCode::from_status(status))
    }

    /// Parse a 2xx JSON body as `T`.
    pub async fn resolve<T: DeserializeOwned>(&self, response: Response) -> NoCloudResult<T> {
        let response = self.check(response).await?;
        let body = response.bytes().await.map_err(NoCloudError::transport)?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Accept any 2xx, discarding the body.
    pub async fn resolve_empty(&self, response: Response) -> NoCloudResult<()> {
        self.check(response).await.map(|_| ())
    }

    async fn check(&self, response: Response) -> NoCloudResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message.or(body.error))
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

        Err(NoCloudError::Api {
            status: status.as_u16(),
            code: self.code_for(status.as_u16()),
            message,
        })
    }
}
