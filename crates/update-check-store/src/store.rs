//! Configuration store with lazy reload.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use update_check_core::{CheckError, Configuration, Result};

/// A parsed configuration together with the file state it came from.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    /// The parsed document.
    pub config: Configuration,

    /// Modification time of the file when it was read.
    pub modified: SystemTime,

    /// When the document was parsed.
    pub loaded_at: DateTime<Utc>,
}

/// Holds the current configuration and re-reads the backing file whenever its
/// modification time changes.
pub struct ConfigStore {
    /// Path of the YAML file.
    path: PathBuf,

    /// Last successfully loaded snapshot.
    current: RwLock<Option<Arc<ConfigSnapshot>>>,

    /// Number of times the file has been parsed.
    loads: AtomicU64,
}

impl ConfigStore {
    /// Create a store for `path`. Nothing is read until the first request.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: RwLock::new(None),
            loads: AtomicU64::new(0),
        }
    }

    /// Number of parses performed so far.
    pub fn loads(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }

    /// The cached snapshot, without checking the file.
    pub async fn cached(&self) -> Option<Arc<ConfigSnapshot>> {
        self.current.read().await.clone()
    }

    /// Return the current configuration, reloading it first if the file
    /// changed since the last load.
    ///
    /// A failed stat or parse discards the cached snapshot.
    pub async fn get_current(&self) -> Result<Arc<ConfigSnapshot>> {
        let modified = match modified_time(&self.path).await {
            Ok(modified) => modified,
            Err(e) => {
                self.current.write().await.take();
                return Err(e);
            }
        };

        {
            let current = self.current.read().await;
            if let Some(snapshot) = current.as_ref() {
                if snapshot.modified == modified {
                    return Ok(Arc::clone(snapshot));
                }
            }
        }

        let mut current = self.current.write().await;

        // Another request may have reloaded while we waited for the lock.
        if let Some(snapshot) = current.as_ref() {
            if snapshot.modified == modified {
                return Ok(Arc::clone(snapshot));
            }
        }

        match self.load(modified).await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *current = Some(Arc::clone(&snapshot));
                Ok(snapshot)
            }
            Err(e) => {
                warn!("Dropping cached configuration: {}", e);
                *current = None;
                Err(e)
            }
        }
    }

    async fn load(&self, modified: SystemTime) -> Result<ConfigSnapshot> {
        debug!("Loading configuration from {}", self.path.display());

        let config = read_config(&self.path).await?;
        self.loads.fetch_add(1, Ordering::Relaxed);

        info!(
            "Loaded configuration {} ({} platforms)",
            self.path.display(),
            config.platform_count()
        );

        Ok(ConfigSnapshot {
            config,
            modified,
            loaded_at: Utc::now(),
        })
    }
}

async fn modified_time(path: &Path) -> Result<SystemTime> {
    tokio::fs::metadata(path)
        .await
        .and_then(|metadata| metadata.modified())
        .map_err(|e| read_error(path, e))
}

async fn read_config(path: &Path) -> Result<Configuration> {
    let source = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| read_error(path, e))?;

    Configuration::from_yaml_str(&source).map_err(|e| match e {
        CheckError::ConfigParse { message, .. } => CheckError::ConfigParse {
            path: path.display().to_string(),
            message,
        },
        other => other,
    })
}

fn read_error(path: &Path, err: std::io::Error) -> CheckError {
    CheckError::ConfigRead {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
