//! Configuration document model.
//!
//! The service is driven by a small YAML file:
//!
//! ```yaml
//! expect:
//!   mingw32: 3f1c2a9
//!   macosx: [3f1c2a9, 77d01be]
//! update:
//!   text: A new version is available.
//!   url: http://example.org/download
//! ```
//!
//! or, when commits are judged against the release history:
//!
//! ```yaml
//! latest_release: v3.21.50
//! update: { text: ..., url: ... }
//! ```

use std::collections::BTreeMap;

use std::fmt;

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{CheckError, Result};
use crate::types::Mode;

/// The commit(s) a platform considers current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// Exactly one acceptable commit.
    One(String),
    /// Any of several acceptable commits.
    Any(Vec<String>),
}

impl Expected {
    /// Returns true if `commit` is acceptable.
    pub fn accepts(&self, commit: &str) -> bool {
        match self {
            Expected::One(token) => token == commit,
            Expected::Any(tokens) => tokens.iter().any(|token| token == commit),
        }
    }
}

/// A commit token as written in the file.
///
/// YAML reads an all-digit short hash as an integer; its text is kept. A hash
/// like `1234e56` reads as a float whose text cannot be recovered, so it is
/// rejected and has to be quoted.
struct Token(String);

struct TokenVisitor;

impl<'de> Visitor<'de> for TokenVisitor {
    type Value = Token;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a commit token")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Token, E> {
        Ok(Token(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> std::result::Result<Token, E> {
        Ok(Token(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Token, E> {
        Ok(Token(value.to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Token, E> {
        Ok(Token(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<Token, E> {
        Err(E::custom(format!(
            "commit token read as the number {}; quote this commit token",
            value
        )))
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(TokenVisitor)
    }
}

struct ExpectedVisitor;

impl<'de> Visitor<'de> for ExpectedVisitor {
    type Value = Expected;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a commit token or a list of commit tokens")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Expected, E> {
        TokenVisitor.visit_str(value).map(|Token(t)| Expected::One(t))
    }

    fn visit_string<E: de::Error>(self, value: String) -> std::result::Result<Expected, E> {
        TokenVisitor.visit_string(value).map(|Token(t)| Expected::One(t))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Expected, E> {
        TokenVisitor.visit_u64(value).map(|Token(t)| Expected::One(t))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Expected, E> {
        TokenVisitor.visit_i64(value).map(|Token(t)| Expected::One(t))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<Expected, E> {
        TokenVisitor.visit_f64(value).map(|Token(t)| Expected::One(t))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Expected, A::Error> {
        let mut tokens = Vec::new();
        while let Some(Token(token)) = seq.next_element()? {
            tokens.push(token);
        }
        Ok(Expected::Any(tokens))
    }
}

impl<'de> Deserialize<'de> for Expected {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ExpectedVisitor)
    }
}

fn optional_token<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Option::<Token>::deserialize(deserializer).map(|token| token.map(|Token(t)| t))
}

/// Message returned verbatim to outdated clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdatePayload(pub serde_json::Value);

impl UpdatePayload {
    /// Borrow the payload as a JSON value.
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Configuration {
    /// Expected commit(s) per platform.
    #[serde(default)]
    pub expect: Option<BTreeMap<String, Expected>>,

    /// Payload for outdated clients. Older files call this `update_text`.
    #[serde(default, alias = "update_text")]
    pub update: Option<UpdatePayload>,

    /// Git reference of the newest release.
    #[serde(default, deserialize_with = "optional_token")]
    pub latest_release: Option<String>,
}

impl Configuration {
    /// Parse a configuration document.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).map_err(CheckError::from)
    }

    /// Look up what `platform` expects.
    pub fn expected_for(&self, platform: &str) -> Result<&Expected> {
        self.expect
            .as_ref()
            .ok_or(CheckError::MissingConfigKey { key: "expect" })?
            .get(platform)
            .ok_or_else(|| CheckError::UnknownPlatform {
                platform: platform.to_string(),
            })
    }

    pub fn update_payload(&self) -> Result<&UpdatePayload> {
        self.update
            .as_ref()
            .ok_or(CheckError::MissingConfigKey { key: "update" })
    }

    /// Determine how commits are judged. `latest_release` wins when both
    /// keys are present.
    pub fn mode(&self) -> Result<Mode> {
        if self.latest_release.is_some() {
            Ok(Mode::History)
        } else if self.expect.is_some() {
            Ok(Mode::Expect)
        } else {
            Err(CheckError::MissingConfigKey { key: "expect" })
        }
    }

    /// Number of configured platforms.
    pub fn platform_count(&self) -> usize {
        self.expect.as_ref().map_or(0, |expect| expect.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = r#"
expect:
  win32: abc123
  mac: [def456, ghi789]
update: Please update!
"#;

    #[test]
    fn test_parse_scalar_and_list() {
        let config = Configuration::from_yaml_str(SAMPLE).unwrap();

        assert_eq!(
            config.expected_for("win32").unwrap(),
            &Expected::One("abc123".to_string())
        );
        assert_eq!(
            config.expected_for("mac").unwrap(),
            &Expected::Any(vec!["def456".to_string(), "ghi789".to_string()])
        );
        assert_eq!(config.update_payload().unwrap().as_value(), &json!("Please update!"));
        assert_eq!(config.mode().unwrap(), Mode::Expect);
        assert_eq!(config.platform_count(), 2);
    }

    #[test]
    fn test_expected_accepts() {
        let one = Expected::One("abc123".to_string());
        assert!(one.accepts("abc123"));
        assert!(!one.accepts("abc1234"));

        let any = Expected::Any(vec!["def456".to_string(), "ghi789".to_string()]);
        assert!(any.accepts("ghi789"));
        assert!(!any.accepts("zzz"));
        assert!(!Expected::Any(Vec::new()).accepts(""));
    }

    #[test]
    fn test_numeric_tokens_keep_their_text() {
        let config = Configuration::from_yaml_str(
            "expect:\n  linux: 1234567\n  mac: [7654321, abcdef0]\nupdate: x\n",
        )
        .unwrap();

        assert!(config.expected_for("linux").unwrap().accepts("1234567"));
        assert!(config.expected_for("mac").unwrap().accepts("7654321"));
        assert!(config.expected_for("mac").unwrap().accepts("abcdef0"));
    }

    #[test]
    fn test_float_like_tokens_must_be_quoted() {
        for source in [
            "expect:\n  linux: 1234e56\nupdate: x\n",
            "expect:\n  mac: [abcdef0, 2553e12]\nupdate: x\n",
            "latest_release: 1234e56\nupdate: x\n",
        ] {
            match Configuration::from_yaml_str(source).unwrap_err() {
                CheckError::ConfigParse { message, .. } => {
                    assert!(message.contains("quote this commit token"), "{message}");
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        let config = Configuration::from_yaml_str(
            "expect:\n  linux: \"1234e56\"\n  mac: [\"2553e12\"]\nupdate: x\n",
        )
        .unwrap();
        assert!(config.expected_for("linux").unwrap().accepts("1234e56"));
        assert!(config.expected_for("mac").unwrap().accepts("2553e12"));
    }

    #[test]
    fn test_numeric_latest_release() {
        let config = Configuration::from_yaml_str("latest_release: 1234567\nupdate: x\n").unwrap();
        assert_eq!(config.latest_release.as_deref(), Some("1234567"));

        let config = Configuration::from_yaml_str("latest_release: ~\nexpect: {}\n").unwrap();
        assert_eq!(config.latest_release, None);
        assert_eq!(config.mode().unwrap(), Mode::Expect);
    }

    #[test]
    fn test_structured_update_payload() {
        let config = Configuration::from_yaml_str(
            r#"
expect: {linux: abc}
update:
  text: A new version is available.
  url: http://example.org/download
"#,
        )
        .unwrap();

        assert_eq!(
            config.update_payload().unwrap().as_value(),
            &json!({"text": "A new version is available.", "url": "http://example.org/download"})
        );
    }

    #[test]
    fn test_legacy_update_text_key() {
        let config =
            Configuration::from_yaml_str("expect: {linux: abc}\nupdate_text: Old style\n").unwrap();
        assert_eq!(config.update_payload().unwrap().as_value(), &json!("Old style"));
    }

    #[test]
    fn test_missing_keys() {
        let config = Configuration::from_yaml_str("update: x\n").unwrap();
        assert_eq!(
            config.expected_for("linux"),
            Err(CheckError::MissingConfigKey { key: "expect" })
        );
        assert_eq!(config.mode(), Err(CheckError::MissingConfigKey { key: "expect" }));

        let config = Configuration::from_yaml_str("expect: {linux: abc}\n").unwrap();
        assert_eq!(
            config.update_payload(),
            Err(CheckError::MissingConfigKey { key: "update" })
        );
        assert_eq!(
            config.expected_for("mac"),
            Err(CheckError::UnknownPlatform { platform: "mac".to_string() })
        );
    }

    #[test]
    fn test_history_mode() {
        let config = Configuration::from_yaml_str("latest_release: v3.21.50\nupdate: x\n").unwrap();
        assert_eq!(config.mode().unwrap(), Mode::History);
        assert_eq!(config.latest_release.as_deref(), Some("v3.21.50"));
    }

    #[test]
    fn test_malformed_document() {
        let err = Configuration::from_yaml_str("expect: [unclosed").unwrap_err();
        assert!(matches!(err, CheckError::ConfigParse { .. }));
        assert!(!err.is_client_error());
    }
}
