//! Authenticated control-plane transport
//!
//! Every control-plane call goes through `Transport::send`, which prefixes the
//! API base path, injects the bearer token and retries failed attempts with a
//! fixed delay. Data-plane transfers to signed URLs never use it.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use nocloud_core::constants::API_BASE_PATH;
use nocloud_core::{ClientConfig, NoCloudError, NoCloudResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::Serialize;

/// One logical control-plane request.
#[derive(Debug, Clone, Default)]
pub struct TransportRequest {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    /// Overrides the configured retry count for this request
    pub retries: Option<u32>,
    /// Overrides the configured delay between attempts for this request
    pub retry_delay: Option<Duration>,
}

impl TransportRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> NoCloudResult<Self> {
        self.body = Some(Bytes::from(serde_json::to_vec(body)?));
        self.headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
        Ok(self)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }
}

#[derive(Clone, Debug)]
pub struct Transport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl Transport {
    /// The shared client only bounds connection setup. The configured timeout
    /// is applied per control-plane request in `send`, so data-plane transfers
    /// built from `http()` run until they finish or the caller drops them.
    pub fn new(config: ClientConfig) -> NoCloudResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| NoCloudError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying HTTP client. Requests built from it carry no credentials and
    /// no total timeout.
    pub fn http(&self) -> &Client {
        &self.client
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}{}", self.config.base_url(), API_BASE_PATH, path)
    }

    /// Bearer header first, then caller headers on top. A caller-supplied
    /// `Authorization` header replaces the bearer token.
    fn merged_headers(&self, headers: HeaderMap) -> NoCloudResult<HeaderMap> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key()))
            .map_err(|_| {
                NoCloudError::Config("API key contains invalid header characters".to_string())
            })?;
        bearer.set_sensitive(true);

        let mut merged = HeaderMap::new();
        merged.insert(AUTHORIZATION, bearer);
        for (name, value) in headers.iter() {
            merged.insert(name.clone(), value.clone());
        }
        Ok(merged)
    }

    /// Send a request, retrying network failures (and non-2xx responses when
    /// the policy says so). The last attempt's outcome is returned as-is.
    pub async fn send(&self, path: &str, request: TransportRequest) -> NoCloudResult<Response> {
        let url = self.build_url(path);
        let policy = &self.config.retry;
        let max_attempts = request
            .retries
            .unwrap_or(policy.retries)
            .saturating_add(1);
        let delay = request.retry_delay.unwrap_or(policy.delay);
        let headers = self.merged_headers(request.headers)?;

        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut builder = self
                .client
                .request(request.method.clone(), &url)
                .timeout(self.config.timeout)
                .headers(headers.clone());
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }

            let outcome = builder.send().await;
            let retryable = match &outcome {
                Ok(response) => policy.retry_on_status && !response.status().is_success(),
                Err(_) => true,
            };

            if !retryable || attempt >= max_attempts {
                return outcome.map_err(NoCloudError::transport);
            }

            match &outcome {
                Ok(response) => tracing::warn!(
                    method = %request.method,
                    url = %url,
                    status = response.status().as_u16(),
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Control-plane request returned an error status, retrying"
                ),
                Err(e) => tracing::warn!(
                    method = %request.method,
                    url = %url,
                    error = %e,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Control-plane request failed, retrying"
                ),
            }

            tokio::time::sleep(delay).await;
        }
    }
}
