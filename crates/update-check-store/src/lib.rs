//! # Update Check Store
//!
//! Configuration store with modification-time reload, and commit ancestry
//! resolution for release-history checks.

pub mod ancestry;
pub mod store;

pub use ancestry::{old_commits, parse_rev_list, AncestryResolver, GitAncestry};
pub use store::{ConfigSnapshot, ConfigStore};
