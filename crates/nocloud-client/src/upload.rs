//! Signed-URL uploads
//!
//! inspect → sign → PUT, strictly in that order. The PUT goes directly to the
//! object store with no credentials and is never retried: a failed transfer is
//! reported immediately and the caller re-runs the whole upload to get a fresh
//! URL.

use std::path::{Component, Path};
use std::time::Instant;

use bytes::Bytes;
use futures::TryStream;
use nocloud_core::constants::OCTET_STREAM;
use nocloud_core::mime::normalize_content_type;
use nocloud_core::{
    inspect, Blob, FileMetadata, IntoFileBody, NoCloudError, NoCloudResult, SignedUrlResponse,
    UploadResponse,
};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Body;

use crate::NoCloudClient;

enum PayloadSource {
    Buffer(Bytes),
    Stream(Body),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TransferKind {
    Buffered,
    Streamed,
}

impl TransferKind {
    fn failure(self, status: u16, body: String) -> NoCloudError {
        match self {
            TransferKind::Buffered => NoCloudError::UploadFailed { status, body },
            TransferKind::Streamed => NoCloudError::StreamUploadFailed { status, body },
        }
    }
}

/// Bytes to transfer, in memory or streamed, with their exact length.
struct SizedPayload {
    content_type: String,
    len: u64,
    source: PayloadSource,
}

impl SizedPayload {
    fn buffer(content_type: String, bytes: Bytes) -> Self {
        Self {
            content_type,
            len: bytes.len() as u64,
            source: PayloadSource::Buffer(bytes),
        }
    }

    fn stream(content_type: String, len: u64, body: Body) -> Self {
        Self {
            content_type,
            len,
            source: PayloadSource::Stream(body),
        }
    }

    fn kind(&self) -> TransferKind {
        match self.source {
            PayloadSource::Buffer(_) => TransferKind::Buffered,
            PayloadSource::Stream(_) => TransferKind::Streamed,
        }
    }

    fn into_body(self) -> Body {
        match self.source {
            PayloadSource::Buffer(bytes) => Body::from(bytes),
            PayloadSource::Stream(body) => body,
        }
    }
}

impl NoCloudClient {
    /// Upload a blob, byte buffer, base64 string, data URL or text.
    pub async fn upload<B: IntoFileBody>(
        &self,
        body: B,
        metadata: Option<&FileMetadata>,
    ) -> NoCloudResult<UploadResponse> {
        let info = inspect(body.into_file_body()?);

        let signed = self
            .generate_signed_url(&info.content_type, info.size, metadata)
            .await?;

        self.transfer(&signed, SizedPayload::buffer(info.content_type, info.payload))
            .await?;

        Ok(UploadResponse::from(signed))
    }

    /// Upload from a byte stream without buffering it.
    ///
    /// `content_length` must be exact; a mismatch is rejected by the HTTP
    /// stack or by the object store.
    pub async fn upload_stream<S>(
        &self,
        stream: S,
        content_type: &str,
        content_length: u64,
        metadata: Option<&FileMetadata>,
    ) -> NoCloudResult<UploadResponse>
    where
        S: TryStream + Send + 'static,
        S::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
        Bytes: From<S::Ok>,
    {
        let content_type = normalize_content_type(content_type);

        let signed = self
            .generate_signed_url(&content_type, content_length, metadata)
            .await?;

        let payload = SizedPayload::stream(content_type, content_length, Body::wrap_stream(stream));
        self.transfer(&signed, payload).await?;

        Ok(UploadResponse::from(signed))
    }

    /// Upload a local file. The content type is sniffed from the file's
    /// leading bytes.
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        metadata: Option<&FileMetadata>,
    ) -> NoCloudResult<UploadResponse> {
        let path = path.as_ref();
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(NoCloudError::UnsupportedBodyType(format!(
                "Invalid file path: {}",
                path.display()
            )));
        }

        let data = tokio::fs::read(path).await.map_err(|e| {
            NoCloudError::UnsupportedBodyType(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))
        })?;

        let content_type = infer::get(&data)
            .map(|kind| kind.mime_type())
            .unwrap_or(OCTET_STREAM)
            .to_string();

        self.upload(Blob::new(data, content_type), metadata).await
    }

    /// Download a remote resource and upload it, typed by the response's
    /// `Content-Type`.
    pub async fn upload_from_url(
        &self,
        url: &str,
        metadata: Option<&FileMetadata>,
    ) -> NoCloudResult<UploadResponse> {
        let response = self
            .transport
            .http()
            .get(url)
            .send()
            .await
            .map_err(NoCloudError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NoCloudError::Transport(format!(
                "Download from {} failed with status {}",
                url, status
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(OCTET_STREAM)
            .to_string();
        let data = response.bytes().await.map_err(NoCloudError::transport)?;

        self.upload(Blob::new(data, content_type), metadata).await
    }

    /// PUT the payload to the signed URL.
    async fn transfer(&self, signed: &SignedUrlResponse, payload: SizedPayload) -> NoCloudResult<()> {
        let start = Instant::now();
        let size = payload.len;
        let kind = payload.kind();
        let streamed = kind == TransferKind::Streamed;

        let request = self
            .transport
            .http()
            .put(&signed.url)
            .header(CONTENT_TYPE, payload.content_type.as_str())
            .header(CONTENT_LENGTH, size);

        let response = request
            .body(payload.into_body())
            .send()
            .await
            .map_err(NoCloudError::transport)?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(
                media_id = %signed.media_id,
                size_bytes = size,
                streamed = streamed,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Upload successful"
            );
            return Ok(());
        }

        let body = match response.text().await {
            Ok(text) if !text.trim().is_empty() => text,
            _ => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };

        tracing::error!(
            media_id = %signed.media_id,
            status = status.as_u16(),
            size_bytes = size,
            streamed = streamed,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload to signed URL failed"
        );

        Err(kind.failure(status.as_u16(), body))
    }
}
