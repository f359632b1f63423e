//! Common types used across the update check service.

use serde::{Deserialize, Serialize};

use crate::error::{CheckError, Result};

/// Outcome of comparing a client's commit with the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The client runs an acceptable build.
    Current,
    /// The client should be shown the update payload.
    Outdated,
}

impl Verdict {
    /// Returns true if the client needs to update.
    pub fn is_outdated(&self) -> bool {
        matches!(self, Verdict::Outdated)
    }
}

/// How a configuration decides whether a commit is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Per-platform expected commits, reloaded when the file changes.
    Expect,
    /// Commits that are ancestors of the latest release are outdated.
    History,
}

/// Query parameters of a single check request.
///
/// Both fields are optional so that a missing parameter is reported as a
/// check error instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    /// Client build identifier, e.g. `mingw32` or `macosx`.
    pub platform: Option<String>,

    /// Version identifier the client was built from.
    pub commit: Option<String>,
}

impl CheckRequest {
    /// Create a request carrying both parameters.
    pub fn new(platform: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            platform: Some(platform.into()),
            commit: Some(commit.into()),
        }
    }

    /// Build a request from raw query pairs. A repeated parameter keeps its
    /// first value; unrelated parameters are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut request = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "platform" => &mut request.platform,
                "commit" => &mut request.commit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        request
    }

    pub fn require_commit(&self) -> Result<&str> {
        self.commit
            .as_deref()
            .ok_or(CheckError::MissingParameter { name: "commit" })
    }

    pub fn require_platform(&self) -> Result<&str> {
        self.platform
            .as_deref()
            .ok_or(CheckError::MissingParameter { name: "platform" })
    }
}
