//! Commit ancestry resolution.

use std::collections::HashSet;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};
use update_check_core::{CheckError, OldCommits, Result};

/// Source of commit history.
#[async_trait]
pub trait AncestryResolver: Send + Sync {
    /// All commits that strictly precede `reference`.
    async fn resolve_ancestors(&self, reference: &str) -> Result<HashSet<String>>;
}

/// Resolves ancestry with `git rev-list` inside a working tree.
#[derive(Debug, Clone)]
pub struct GitAncestry {
    /// Repository the release reference lives in.
    repo_dir: PathBuf,

    /// Executable to invoke.
    program: PathBuf,
}

impl GitAncestry {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            program: PathBuf::from("git"),
        }
    }

    /// Use a different git executable.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

#[async_trait]
impl AncestryResolver for GitAncestry {
    async fn resolve_ancestors(&self, reference: &str) -> Result<HashSet<String>> {
        // `^{}` peels annotated tags down to the commit they point at.
        let revision = format!("{}^{{}}", reference);
        debug!("Running git rev-list {} in {}", revision, self.repo_dir.display());

        let output = Command::new(&self.program)
            .arg("rev-list")
            .arg(&revision)
            .current_dir(&self.repo_dir)
            .output()
            .await
            .map_err(|e| CheckError::Ancestry(format!("failed to run {}: {}", self.program.display(), e)))?;

        if !output.status.success() {
            return Err(CheckError::Ancestry(format!(
                "git rev-list {} exited with {}: {}",
                revision,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(parse_rev_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse `git rev-list` output. The first line is the reference itself and
/// is not an ancestor.
pub fn parse_rev_list(stdout: &str) -> HashSet<String> {
    stdout
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Compute the old commits set for `reference`.
pub async fn old_commits(resolver: &dyn AncestryResolver, reference: &str) -> Result<OldCommits> {
    let commits = resolver.resolve_ancestors(reference).await?;
    info!("Release {} has {} older commits", reference, commits.len());
    Ok(OldCommits::new(commits))
}
