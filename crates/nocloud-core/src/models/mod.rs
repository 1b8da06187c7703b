//! Data models for the storage client
//!
//! Wire DTOs for the control plane plus the argument types of the public
//! client operations.

mod media;
mod metadata;

pub use media::*;
pub use metadata::*;
