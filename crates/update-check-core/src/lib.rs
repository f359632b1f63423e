//! # Update Check Core
//!
//! Core types for deciding whether a client build is up to date.
//!
//! This crate provides the building blocks:
//! - [`Configuration`] - The parsed configuration document
//! - [`Expected`] - The commit(s) a platform considers current
//! - [`OldCommits`] - Release history used by the history mode
//! - [`CheckError`] - Error taxonomy shared by store and server

pub mod check;
pub mod config;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use check::{check_expected, OldCommits};
pub use config::{Configuration, Expected, UpdatePayload};
pub use error::{CheckError, Result};
pub use types::*;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::check::{check_expected, OldCommits};
    pub use crate::config::{Configuration, Expected, UpdatePayload};
    pub use crate::error::{CheckError, Result};
    pub use crate::types::{CheckRequest, Mode, Verdict};
}
