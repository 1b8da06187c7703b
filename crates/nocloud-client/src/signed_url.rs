//! Signed upload URL requests.

use nocloud_core::constants::SIGNED_URL_PATH;
use nocloud_core::models::SignedUrlRequest;
use nocloud_core::{FileMetadata, NoCloudResult, SignedUrlResponse};
use reqwest::Method;

use crate::transport::TransportRequest;
use crate::NoCloudClient;

impl NoCloudClient {
    /// Ask the control plane for a single-use URL accepting exactly `size`
    /// bytes of `content_type`.
    pub async fn generate_signed_url(
        &self,
        content_type: &str,
        size: u64,
        metadata: Option<&FileMetadata>,
    ) -> NoCloudResult<SignedUrlResponse> {
        let request = TransportRequest::new(Method::POST).json(&SignedUrlRequest {
            content_type,
            size,
            metadata,
        })?;

        let response = self.transport.send(SIGNED_URL_PATH, request).await?;
        let signed: SignedUrlResponse = self.resolver.resolve(response).await?;

        tracing::debug!(
            media_id = %signed.media_id,
            content_type = %content_type,
            size_bytes = size,
            expires_at = %signed.expires_at,
            "Signed upload URL issued"
        );

        Ok(signed)
    }
}
