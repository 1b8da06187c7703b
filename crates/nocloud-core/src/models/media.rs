use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metadata::FileMetadata;

/// Request body for minting a signed upload URL
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlRequest<'a> {
    /// Bare MIME type of the content that will be uploaded
    pub content_type: &'a str,
    /// Exact byte size of the content
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a FileMetadata>,
}

/// Control-plane grant for a single direct upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlResponse {
    /// Single-use, time-limited URL accepting one PUT
    pub url: String,
    /// When `url` stops being accepted
    pub expires_at: DateTime<Utc>,
    /// Durable handle of the stored object, used for deletes
    pub media_id: String,
    /// Public URL the object is served from once uploaded
    pub media_url: String,
}

/// Result of a confirmed upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: String,
    pub url: String,
}

impl From<SignedUrlResponse> for UploadResponse {
    fn from(signed: SignedUrlResponse) -> Self {
        UploadResponse {
            id: signed.media_id,
            url: signed.media_url,
        }
    }
}

/// Request body for the bulk-delete endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteRequest<'a> {
    pub media_ids: &'a [String],
}

/// Argument of a delete call: one id or a collection of ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaIds {
    One(String),
    Many(Vec<String>),
}

impl From<String> for MediaIds {
    fn from(id: String) -> Self {
        MediaIds::One(id)
    }
}

impl From<&str> for MediaIds {
    fn from(id: &str) -> Self {
        MediaIds::One(id.to_string())
    }
}

impl From<&String> for MediaIds {
    fn from(id: &String) -> Self {
        MediaIds::One(id.clone())
    }
}

impl From<Vec<String>> for MediaIds {
    fn from(ids: Vec<String>) -> Self {
        MediaIds::Many(ids)
    }
}

impl From<&[String]> for MediaIds {
    fn from(ids: &[String]) -> Self {
        MediaIds::Many(ids.to_vec())
    }
}

impl From<&[&str]> for MediaIds {
    fn from(ids: &[&str]) -> Self {
        MediaIds::Many(ids.iter().map(|id| id.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for MediaIds {
    fn from(ids: [&str; N]) -> Self {
        MediaIds::Many(ids.iter().map(|id| id.to_string()).collect())
    }
}
