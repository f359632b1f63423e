//! Update check client implementation.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ClientError, Result};

/// Client for asking an update check server about a build.
#[derive(Clone)]
pub struct UpdateClient {
    /// Base URL of the server.
    base_url: String,

    /// HTTP client.
    http_client: reqwest::Client,
}

/// Notice shown to users of an outdated build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNotice {
    /// Message for the user.
    pub text: String,

    /// Where the new build can be downloaded.
    pub url: String,
}

/// What the server said about a build.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateStatus {
    /// The build is current.
    UpToDate,

    /// A newer build is available.
    Available(UpdateNotice),

    /// The build is outdated but the payload has no `text`/`url` pair.
    Unrecognized(serde_json::Value),
}

impl UpdateStatus {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, UpdateStatus::UpToDate)
    }
}

impl UpdateClient {
    /// Create a client for the server at `url`.
    pub fn new(url: &str) -> Self {
        Self::with_http_client(url, reqwest::Client::new())
    }

    /// Create a client reusing an existing HTTP client.
    pub fn with_http_client(url: &str, http_client: reqwest::Client) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    /// Ask whether `commit` is current for `platform`.
    pub async fn check(&self, platform: &str, commit: &str) -> Result<UpdateStatus> {
        let url = format!("{}/", self.base_url);
        debug!("Checking {} for updates to {} ({})", url, commit, platform);

        let response = self
            .http_client
            .get(&url)
            .query(&[("platform", platform), ("commit", commit)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let status = interpret(&body)?;

        match &status {
            UpdateStatus::UpToDate => info!("Build {} is up to date", commit),
            _ => info!("An update is available for build {}", commit),
        }

        Ok(status)
    }
}

/// Interpret a successful response body.
pub fn interpret(body: &[u8]) -> Result<UpdateStatus> {
    if body.is_empty() {
        return Ok(UpdateStatus::UpToDate);
    }

    let value: serde_json::Value = serde_json::from_slice(body)?;

    match serde_json::from_value::<UpdateNotice>(value.clone()) {
        Ok(notice) => Ok(UpdateStatus::Available(notice)),
        Err(_) => Ok(UpdateStatus::Unrecognized(value)),
    }
}
