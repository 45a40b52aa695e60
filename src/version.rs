use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::VersionError;

/// A parsed project version: numeric core, optional pre-release tag,
/// optional build metadata. The raw string is kept verbatim because it
/// names the published files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionId {
    raw: String,
    core: Vec<u64>,
    pre_release: Option<String>,
    build: Option<String>,
}

impl VersionId {
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        if raw.is_empty() {
            return Err(VersionError::Empty);
        }

        let (rest, build) = match raw.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (raw, None),
        };
        let (core_str, tag) = match rest.split_once('-') {
            Some((core, tag)) => (core, Some(tag)),
            None => (rest, None),
        };

        let core = parse_core(core_str).ok_or_else(|| VersionError::InvalidCore {
            raw: raw.to_string(),
            core: core_str.to_string(),
        })?;

        if let Some(tag) = tag {
            if !is_identifier(tag) {
                return Err(VersionError::InvalidTag {
                    raw: raw.to_string(),
                    tag: tag.to_string(),
                });
            }
        }
        if let Some(build) = build {
            if !is_identifier(build) {
                return Err(VersionError::InvalidBuild {
                    raw: raw.to_string(),
                    build: build.to_string(),
                });
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            core,
            pre_release: tag.map(str::to_string),
            build: build.map(str::to_string),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn core(&self) -> &[u64] {
        &self.core
    }

    pub fn pre_release(&self) -> Option<&str> {
        self.pre_release.as_deref()
    }

    pub fn build_metadata(&self) -> Option<&str> {
        self.build.as_deref()
    }

    pub fn is_pre_release(&self) -> bool {
        self.pre_release.is_some()
    }
}

fn parse_core(core: &str) -> Option<Vec<u64>> {
    core.split('.')
        .map(|part| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                None
            } else {
                part.parse().ok()
            }
        })
        .collect()
}

fn is_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

impl FromStr for VersionId {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionId {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VersionId> for String {
    fn from(value: VersionId) -> Self {
        value.raw
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_release_version() {
        let version = VersionId::parse("0.2.0").unwrap();
        assert_eq!(version.core(), &[0, 2, 0]);
        assert!(!version.is_pre_release());
        assert_eq!(version.as_str(), "0.2.0");
    }

    #[test]
    fn test_snapshot_version() {
        let version = VersionId::parse("1.0-SNAPSHOT").unwrap();
        assert_eq!(version.core(), &[1, 0]);
        assert_eq!(version.pre_release(), Some("SNAPSHOT"));
    }

    #[test]
    fn test_engine_style_version_keeps_tag_verbatim() {
        let version = VersionId::parse("2025.07.04-1.21.5").unwrap();
        assert_eq!(version.core(), &[2025, 7, 4]);
        assert_eq!(version.pre_release(), Some("1.21.5"));
    }

    #[test]
    fn test_build_metadata() {
        let version = VersionId::parse("1.2.3-rc.1+build.7").unwrap();
        assert_eq!(version.pre_release(), Some("rc.1"));
        assert_eq!(version.build_metadata(), Some("build.7"));
    }

    #[rstest]
    #[case("")]
    #[case("a1b2c3d")]
    #[case("1..2")]
    #[case("1.0-")]
    #[case("1.0+")]
    #[case("1.0-SNAP SHOT")]
    #[case("v1.0")]
    fn test_rejects_malformed(#[case] raw: &str) {
        assert!(VersionId::parse(raw).is_err(), "{raw:?} should not parse");
    }

    #[test]
    fn test_hash_like_identifier_is_invalid_core() {
        let err = VersionId::parse("a1b2c3d").unwrap_err();
        assert!(matches!(err, VersionError::InvalidCore { .. }));
    }
}
