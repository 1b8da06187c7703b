//! NoCloud Core Library
//!
//! Domain models, error types, configuration and body inspection shared by
//! the NoCloud client and CLI. Nothing in this crate performs network I/O.

pub mod body;
pub mod config;
pub mod constants;
pub mod error;
pub mod mime;
pub mod models;

// Re-export commonly used types
pub use body::{inspect, Blob, BodyInfo, FileBody, IntoFileBody};
pub use config::{ClientConfig, RetryPolicy};
pub use error::{ErrorCode, ErrorMetadata, LogLevel, NoCloudError, NoCloudResult};
pub use mime::{decoded_size, detect_mime_type, encode_base64};
pub use models::{
    FileMetadata, MediaIds, MetadataValue, SignedUrlResponse, UploadResponse,
};
