//! # Update Check SDK
//!
//! Client library for asking an update check server whether a build is
//! current.

pub mod client;
pub mod error;

pub use client::{UpdateClient, UpdateNotice, UpdateStatus};
pub use error::{ClientError, Result};

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::client::{UpdateClient, UpdateNotice, UpdateStatus};
    pub use crate::error::{ClientError, Result};
}
