#![allow(dead_code)]

use std::time::Duration;

use nocloud_client::{NoCloudClient, RetryPolicy};
use nocloud_core::ClientConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const API_KEY: &str = "test-api-key";
pub const SIGNED_URL_PATH: &str = "/v1/storage/signed-url";
pub const BATCH_DELETE_PATH: &str = "/v1/storage/batch-delete";
pub const STORE_PATH: &str = "/store/x";

/// Client pointed at the mock server, with a single attempt per request.
pub fn test_client(server: &MockServer) -> NoCloudClient {
    client_with_retry(server, RetryPolicy::none())
}

pub fn client_with_retry(server: &MockServer, retry: RetryPolicy) -> NoCloudClient {
    let config = ClientConfig::new(API_KEY)
        .unwrap()
        .with_base_url(server.uri())
        .with_retry(retry)
        .with_timeout(Duration::from_secs(5));
    NoCloudClient::new(config).unwrap()
}

/// Signed-URL grant whose upload URL points back at the mock server.
pub fn signed_url_body(server: &MockServer, media_id: &str) -> serde_json::Value {
    serde_json::json!({
        "url": format!("{}{}", server.uri(), STORE_PATH),
        "expiresAt": "2025-01-01T00:00:00Z",
        "mediaId": media_id,
        "mediaUrl": format!("https://cdn/{}", media_id),
    })
}

pub async fn mount_signed_url(server: &MockServer, media_id: &str) {
    Mock::given(method("POST"))
        .and(path(SIGNED_URL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(signed_url_body(server, media_id)))
        .mount(server)
        .await;
}

pub async fn mount_store(server: &MockServer, status: u16) {
    Mock::given(method("PUT"))
        .and(path(STORE_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub async fn requests_to(server: &MockServer, request_path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == request_path)
        .collect()
}
