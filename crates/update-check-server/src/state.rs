//! Application state.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use update_check_core::prelude::*;
use update_check_store::{old_commits, AncestryResolver, ConfigSnapshot, ConfigStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Decides whether a request's commit is current.
    pub checker: Arc<Checker>,
}

/// Result of a successful check.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing to tell the client.
    Current,
    /// The client should update; carries the configured payload.
    Outdated(UpdatePayload),
}

/// The two ways a commit can be judged.
pub enum Checker {
    /// Per-platform expectations, re-read whenever the file changes.
    Expect(Arc<ConfigStore>),

    /// Release history computed once at startup.
    History {
        /// Configuration read at startup.
        config: Arc<ConfigSnapshot>,

        /// Strict ancestors of `latest_release`.
        old_commits: Arc<OldCommits>,
    },
}

impl Checker {
    /// Judge a single request.
    pub async fn check(&self, request: &CheckRequest) -> Result<Outcome> {
        match self {
            Checker::Expect(store) => {
                let snapshot = store.get_current().await?;
                let verdict = check_expected(&snapshot.config, request)?;
                outcome(verdict, &snapshot.config)
            }
            Checker::History {
                config,
                old_commits,
            } => {
                let verdict = old_commits.check(request)?;
                outcome(verdict, &config.config)
            }
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Checker::Expect(_) => Mode::Expect,
            Checker::History { .. } => Mode::History,
        }
    }

    /// When the configuration in use was parsed, if it has been.
    pub async fn loaded_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Checker::Expect(store) => store.cached().await.map(|snapshot| snapshot.loaded_at),
            Checker::History { config, .. } => Some(config.loaded_at),
        }
    }
}

fn outcome(verdict: Verdict, config: &Configuration) -> Result<Outcome> {
    match verdict {
        Verdict::Current => Ok(Outcome::Current),
        Verdict::Outdated => Ok(Outcome::Outdated(config.update_payload()?.clone())),
    }
}

impl AppState {
    /// State that checks against a reloading configuration store.
    pub fn expecting(store: Arc<ConfigStore>) -> Self {
        Self {
            checker: Arc::new(Checker::Expect(store)),
        }
    }

    /// State that checks against a fixed release history.
    pub fn with_history(config: Arc<ConfigSnapshot>, old_commits: OldCommits) -> Self {
        Self {
            checker: Arc::new(Checker::History {
                config,
                old_commits: Arc::new(old_commits),
            }),
        }
    }

    /// Read the configuration at `path` and pick the mode it asks for.
    ///
    /// History mode resolves the ancestors of `latest_release` here, so a
    /// failing resolver prevents startup.
    pub async fn from_config(
        path: &Path,
        resolver: &dyn AncestryResolver,
    ) -> Result<Self> {
        let store = Arc::new(ConfigStore::new(path));
        let snapshot = store.get_current().await?;

        match snapshot.config.mode()? {
            Mode::Expect => {
                info!("📄 Checking commits against per-platform expectations");
                Ok(Self::expecting(store))
            }
            Mode::History => {
                let reference = snapshot
                    .config
                    .latest_release
                    .as_deref()
                    .ok_or(CheckError::MissingConfigKey { key: "latest_release" })?;
                info!("🏷️  Checking commits against release {}", reference);

                let old = old_commits(resolver, reference).await?;
                Ok(Self::with_history(snapshot, old))
            }
        }
    }
}
