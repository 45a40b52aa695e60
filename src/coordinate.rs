use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ManifestError;

/// A `group:artifact:version` triple naming one external package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, ManifestError> {
        let coordinate = Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Builds a coordinate from a `group:artifact` module string.
    pub fn from_module(module: &str, version: impl Into<String>) -> Result<Self, ManifestError> {
        let (group, artifact) =
            module
                .split_once(':')
                .ok_or_else(|| ManifestError::InvalidCoordinate {
                    value: module.to_string(),
                    reason: "module must be written as group:artifact".to_string(),
                })?;
        Self::new(group, artifact, version)
    }

    /// Parses the full `group:artifact:version` form.
    pub fn parse(value: &str) -> Result<Self, ManifestError> {
        let parts: Vec<&str> = value.split(':').collect();
        match parts.as_slice() {
            [group, artifact, version] => Self::new(*group, *artifact, *version),
            _ => Err(ManifestError::InvalidCoordinate {
                value: value.to_string(),
                reason: "expected group:artifact:version".to_string(),
            }),
        }
    }

    fn validate(&self) -> Result<(), ManifestError> {
        let fields = [
            ("group", &self.group, true),
            ("artifact", &self.artifact, true),
            ("version", &self.version, false),
        ];
        for (name, value, path_safe) in fields {
            let reason = if value.is_empty() {
                Some(format!("{name} is empty"))
            } else if value.contains(':') || value.chars().any(char::is_whitespace) {
                Some(format!("{name} contains ':' or whitespace"))
            } else if path_safe && (value.contains('/') || value.contains('\\')) {
                Some(format!("{name} contains a path separator"))
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(ManifestError::InvalidCoordinate {
                    value: format!("{}:{}:{}", self.group, self.artifact, self.version),
                    reason,
                });
            }
        }
        Ok(())
    }

    /// Directory of this coordinate inside a Maven-layout repository,
    /// without leading or trailing slash.
    pub fn repository_dir(&self) -> String {
        format!(
            "{}/{}/{}",
            self.group.replace('.', "/"),
            self.artifact,
            self.version
        )
    }

    /// File name for an artifact of this coordinate, e.g.
    /// `cyano-0.1.1-sources.jar`.
    pub fn file_name(&self, classifier: Option<&str>, extension: &str) -> String {
        match classifier {
            Some(classifier) => format!(
                "{}-{}-{}.{}",
                self.artifact, self.version, classifier, extension
            ),
            None => format!("{}-{}.{}", self.artifact, self.version, extension),
        }
    }

    /// Full URL of a file of this coordinate below `repository`.
    pub fn url_in(&self, repository: &str, file_name: &str) -> String {
        format!(
            "{}/{}/{}",
            repository.trim_end_matches('/'),
            self.repository_dir(),
            file_name
        )
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_parsing() {
        let coordinate = Coordinate::from_module("net.minestom:minestom", "2025.07.04-1.21.5").unwrap();
        assert_eq!(coordinate.group, "net.minestom");
        assert_eq!(coordinate.artifact, "minestom");
        assert_eq!(coordinate.to_string(), "net.minestom:minestom:2025.07.04-1.21.5");
    }

    #[test]
    fn test_full_parsing() {
        let coordinate = Coordinate::parse("org.junit.jupiter:junit-jupiter-api:5.13.3").unwrap();
        assert_eq!(coordinate.artifact, "junit-jupiter-api");
        assert_eq!(coordinate.version, "5.13.3");

        assert!(Coordinate::parse("org.junit.jupiter:junit-jupiter-api").is_err());
        assert!(Coordinate::parse("a:b:c:d").is_err());
    }

    #[test]
    fn test_rejects_empty_and_unsafe_components() {
        assert!(Coordinate::new("", "minestom", "1.0").is_err());
        assert!(Coordinate::new("net.minestom", "mine stom", "1.0").is_err());
        assert!(Coordinate::new("net/minestom", "minestom", "1.0").is_err());
        assert!(Coordinate::new("net.minestom", "minestom", "").is_err());
    }

    #[test]
    fn test_repository_layout() {
        let coordinate = Coordinate::new("net.onelitefeather", "cyano", "0.1.1").unwrap();
        assert_eq!(coordinate.repository_dir(), "net/onelitefeather/cyano/0.1.1");
        assert_eq!(coordinate.file_name(None, "jar"), "cyano-0.1.1.jar");
        assert_eq!(coordinate.file_name(Some("javadoc"), "jar"), "cyano-0.1.1-javadoc.jar");
        assert_eq!(
            coordinate.url_in("https://repo.example.test/releases/", "cyano-0.1.1.pom"),
            "https://repo.example.test/releases/net/onelitefeather/cyano/0.1.1/cyano-0.1.1.pom"
        );
    }
}
