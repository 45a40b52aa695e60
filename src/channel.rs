use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::VersionError;
use crate::version::VersionId;

/// Which repository a build is published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Channel {
    PreRelease,
    Stable,
}

impl Channel {
    pub fn as_str(&self) -> &str {
        match self {
            Channel::PreRelease => "pre-release",
            Channel::Stable => "stable",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a version string is classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelRule {
    /// Pre-release iff the parsed version carries a `-tag`.
    #[default]
    Structured,
    /// Pre-release iff the raw string contains the marker anywhere.
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPolicy {
    rule: ChannelRule,
    marker: String,
}

impl ChannelPolicy {
    pub fn new(rule: ChannelRule, marker: impl Into<String>) -> Self {
        Self {
            rule,
            marker: marker.into(),
        }
    }

    pub fn rule(&self) -> ChannelRule {
        self.rule
    }

    /// Pure function of `version` and this policy.
    ///
    /// Under [`ChannelRule::Substring`] a stable version whose text happens
    /// to contain the marker (`1.4.0+SNAPSHOT-free`) is routed to pre-release.
    /// Under [`ChannelRule::Structured`] unparseable versions are an error.
    pub fn select(&self, version: &str) -> Result<Channel, VersionError> {
        match self.rule {
            ChannelRule::Substring => {
                if version.is_empty() {
                    return Err(VersionError::Empty);
                }
                if !self.marker.is_empty() && version.contains(&self.marker) {
                    Ok(Channel::PreRelease)
                } else {
                    Ok(Channel::Stable)
                }
            }
            ChannelRule::Structured => {
                let version = VersionId::parse(version)?;
                if version.is_pre_release() {
                    Ok(Channel::PreRelease)
                } else {
                    Ok(Channel::Stable)
                }
            }
        }
    }
}

impl Default for ChannelPolicy {
    fn default() -> Self {
        Self::new(ChannelRule::Structured, "SNAPSHOT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0.2.0", Channel::Stable)]
    #[case("1.0-SNAPSHOT", Channel::PreRelease)]
    #[case("SNAPSHOT-1.0", Channel::PreRelease)]
    #[case("1.0.0-SNAPSHOT.2", Channel::PreRelease)]
    #[case("1.0-snapshot", Channel::Stable)]
    // A stable build whose metadata mentions the marker: misrouted.
    #[case("1.4.0+SNAPSHOT-free", Channel::PreRelease)]
    #[case("a1b2c3d", Channel::Stable)]
    fn test_substring_rule(#[case] version: &str, #[case] expected: Channel) {
        let policy = ChannelPolicy::new(ChannelRule::Substring, "SNAPSHOT");
        assert_eq!(policy.select(version).unwrap(), expected);
    }

    #[rstest]
    #[case("0.2.0", Channel::Stable)]
    #[case("0.1.1", Channel::Stable)]
    #[case("1.0-SNAPSHOT", Channel::PreRelease)]
    #[case("1.4.0+SNAPSHOT-free", Channel::Stable)]
    #[case("2.0.0-rc.1", Channel::PreRelease)]
    #[case("2.0.0+build.5", Channel::Stable)]
    fn test_structured_rule(#[case] version: &str, #[case] expected: Channel) {
        assert_eq!(ChannelPolicy::default().select(version).unwrap(), expected);
    }

    #[test]
    fn test_structured_rule_rejects_hash_like_versions() {
        let err = ChannelPolicy::default().select("a1b2c3d").unwrap_err();
        assert!(matches!(err, VersionError::InvalidCore { .. }));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let policy = ChannelPolicy::default();
        let first = policy.select("1.0-SNAPSHOT").unwrap();
        for _ in 0..10 {
            assert_eq!(policy.select("1.0-SNAPSHOT").unwrap(), first);
        }
    }
}
