//! Deciding whether a client is current.

use std::collections::HashSet;

use crate::config::Configuration;
use crate::error::Result;
use crate::types::{CheckRequest, Verdict};

/// Judge a request against per-platform expectations.
///
/// Parameters are checked before the configuration is consulted, so a request
/// without `commit` is rejected even for a known platform.
pub fn check_expected(config: &Configuration, request: &CheckRequest) -> Result<Verdict> {
    let platform = request.require_platform()?;
    let commit = request.require_commit()?;
    let expected = config.expected_for(platform)?;

    if expected.accepts(commit) {
        Ok(Verdict::Current)
    } else {
        Ok(Verdict::Outdated)
    }
}

/// Commits that strictly precede the latest release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OldCommits {
    commits: HashSet<String>,
}

impl OldCommits {
    pub fn new(commits: HashSet<String>) -> Self {
        Self { commits }
    }

    /// Presence in the set means outdated. Commits the history does not know
    /// about, including mistyped ones, count as current.
    pub fn verdict(&self, commit: &str) -> Verdict {
        if self.commits.contains(commit) {
            Verdict::Outdated
        } else {
            Verdict::Current
        }
    }

    /// Judge a request; only `commit` is required.
    pub fn check(&self, request: &CheckRequest) -> Result<Verdict> {
        Ok(self.verdict(request.require_commit()?))
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

impl FromIterator<String> for OldCommits {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckError;

    fn sample() -> Configuration {
        Configuration::from_yaml_str(
            "expect:\n  win32: abc123\n  mac: [def456, ghi789]\nupdate: Please update!\n",
        )
        .unwrap()
    }

    #[test]
    fn test_scalar_expectation() {
        let config = sample();

        assert_eq!(
            check_expected(&config, &CheckRequest::new("win32", "abc123")).unwrap(),
            Verdict::Current
        );
        assert_eq!(
            check_expected(&config, &CheckRequest::new("win32", "zzz")).unwrap(),
            Verdict::Outdated
        );
    }

    #[test]
    fn test_list_expectation() {
        let config = sample();

        for commit in ["def456", "ghi789"] {
            assert_eq!(
                check_expected(&config, &CheckRequest::new("mac", commit)).unwrap(),
                Verdict::Current
            );
        }
        assert!(check_expected(&config, &CheckRequest::new("mac", "abc123"))
            .unwrap()
            .is_outdated());
    }

    #[test]
    fn test_request_errors() {
        let config = sample();

        assert_eq!(
            check_expected(&config, &CheckRequest::new("linux", "abc123")),
            Err(CheckError::UnknownPlatform { platform: "linux".to_string() })
        );

        let no_platform = CheckRequest {
            platform: None,
            commit: Some("abc123".to_string()),
        };
        assert_eq!(
            check_expected(&config, &no_platform),
            Err(CheckError::MissingParameter { name: "platform" })
        );

        let no_commit = CheckRequest {
            platform: Some("win32".to_string()),
            commit: None,
        };
        assert_eq!(
            check_expected(&config, &no_commit),
            Err(CheckError::MissingParameter { name: "commit" })
        );
    }

    #[test]
    fn test_old_commits_inverted() {
        let old: OldCommits = ["aaa".to_string(), "bbb".to_string()].into_iter().collect();

        assert_eq!(old.len(), 2);
        assert_eq!(old.verdict("aaa"), Verdict::Outdated);
        assert_eq!(old.verdict("release"), Verdict::Current);
        assert_eq!(old.verdict("typo"), Verdict::Current);
    }

    #[test]
    fn test_old_commits_ignores_platform() {
        let old: OldCommits = ["aaa".to_string()].into_iter().collect();
        let request = CheckRequest {
            platform: None,
            commit: Some("aaa".to_string()),
        };

        assert_eq!(old.check(&request).unwrap(), Verdict::Outdated);
        assert_eq!(
            old.check(&CheckRequest::default()),
            Err(CheckError::MissingParameter { name: "commit" })
        );
    }
}
