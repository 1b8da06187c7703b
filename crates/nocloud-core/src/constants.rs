//! Wire-level constants shared by the client crates.

/// Path prefix appended to the configured base URL for every control-plane call.
pub const API_BASE_PATH: &str = "/v1";

/// Default control-plane base URL when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.nocloud.dev";

/// Maximum number of ids sent in one bulk-delete request.
pub const DELETE_BATCH_SIZE: usize = 100;

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const TEXT_PLAIN: &str = "text/plain";

// Control-plane endpoints, relative to API_BASE_PATH
pub const SIGNED_URL_PATH: &str = "/storage/signed-url";
pub const BATCH_DELETE_PATH: &str = "/storage/batch-delete";
pub const MEDIA_PATH: &str = "/storage";
