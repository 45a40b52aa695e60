use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::Catalog;
use crate::coordinate::Coordinate;
use crate::error::ManifestError;
use crate::project::ProjectManifest;

/// How far a dependency reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    /// On this library's compile classpath and on every consumer's.
    Api,
    CompileOnly,
    Test,
    TestRuntimeOnly,
}

impl Visibility {
    pub fn as_str(&self) -> &str {
        match self {
            Visibility::Api => "api",
            Visibility::CompileOnly => "compile-only",
            Visibility::Test => "test",
            Visibility::TestRuntimeOnly => "test-runtime-only",
        }
    }

    pub fn is_exposed(&self) -> bool {
        matches!(self, Visibility::Api)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Compile,
    TestCompile,
    TestRuntime,
    /// What a downstream project compiling against the published library
    /// receives.
    ConsumerCompile,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Compile,
        Phase::TestCompile,
        Phase::TestRuntime,
        Phase::ConsumerCompile,
    ];

    pub fn includes(&self, visibility: Visibility) -> bool {
        use Visibility::*;
        match self {
            Phase::Compile => matches!(visibility, Api | CompileOnly),
            Phase::TestCompile => matches!(visibility, Api | Test),
            Phase::TestRuntime => matches!(visibility, Api | Test | TestRuntimeOnly),
            Phase::ConsumerCompile => matches!(visibility, Api),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Phase::Compile => "compile",
            Phase::TestCompile => "test-compile",
            Phase::TestRuntime => "test-runtime",
            Phase::ConsumerCompile => "consumer-compile",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown phase {s:?}; expected one of compile, test-compile, test-runtime, consumer-compile"
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub alias: String,
    pub coordinate: Coordinate,
    pub visibility: Visibility,
}

/// Every declared dependency, in manifest order.
#[derive(Debug, Clone, Default)]
pub struct DependencySet {
    declarations: Vec<Declaration>,
}

impl DependencySet {
    pub fn from_manifest(manifest: &ProjectManifest) -> Result<Self, ManifestError> {
        let catalog = Catalog::from_manifest(manifest)?;
        let section = &manifest.dependencies;
        let groups = [
            (Visibility::Api, &section.api),
            (Visibility::CompileOnly, &section.compile_only),
            (Visibility::Test, &section.test),
            (Visibility::TestRuntimeOnly, &section.test_runtime_only),
        ];

        let mut set = Self::default();
        for (visibility, aliases) in groups {
            for alias in aliases {
                let coordinate = catalog.require(alias)?.clone();
                set.declare(alias, coordinate, visibility)?;
            }
        }
        Ok(set)
    }

    pub fn declare(
        &mut self,
        alias: &str,
        coordinate: Coordinate,
        visibility: Visibility,
    ) -> Result<(), ManifestError> {
        if self
            .declarations
            .iter()
            .any(|d| d.alias == alias && d.visibility == visibility)
        {
            return Err(ManifestError::DuplicateDependency {
                alias: alias.to_string(),
                visibility: visibility.to_string(),
            });
        }

        self.declarations.push(Declaration {
            alias: alias.to_string(),
            coordinate,
            visibility,
        });
        Ok(())
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Coordinates on the classpath of `phase`, first declaration wins.
    pub fn classpath(&self, phase: Phase) -> Vec<Coordinate> {
        let mut classpath: Vec<Coordinate> = Vec::new();
        for declaration in &self.declarations {
            if phase.includes(declaration.visibility) && !classpath.contains(&declaration.coordinate) {
                classpath.push(declaration.coordinate.clone());
            }
        }
        classpath
    }

    /// Distinct coordinates across all phases, in declaration order.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        let mut coordinates: Vec<Coordinate> = Vec::new();
        for declaration in &self.declarations {
            if !coordinates.contains(&declaration.coordinate) {
                coordinates.push(declaration.coordinate.clone());
            }
        }
        coordinates
    }

    /// Dependencies that downstream consumers inherit.
    pub fn exposed(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(|d| d.visibility.is_exposed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate(value: &str) -> Coordinate {
        Coordinate::parse(value).unwrap()
    }

    fn sample() -> DependencySet {
        let mut set = DependencySet::default();
        set.declare("minestom", coordinate("net.minestom:minestom:2025.07.04-1.21.5"), Visibility::Api)
            .unwrap();
        set.declare("junit.api", coordinate("org.junit.jupiter:junit-jupiter-api:5.13.3"), Visibility::CompileOnly)
            .unwrap();
        set.declare("junit.api", coordinate("org.junit.jupiter:junit-jupiter-api:5.13.3"), Visibility::Test)
            .unwrap();
        set.declare(
            "junit.engine",
            coordinate("org.junit.jupiter:junit-jupiter-engine:5.13.3"),
            Visibility::TestRuntimeOnly,
        )
        .unwrap();
        set
    }

    fn names(classpath: Vec<Coordinate>) -> Vec<String> {
        classpath.into_iter().map(|c| c.artifact).collect()
    }

    #[test]
    fn test_phase_membership() {
        let set = sample();

        assert_eq!(names(set.classpath(Phase::Compile)), vec!["minestom", "junit-jupiter-api"]);
        assert_eq!(names(set.classpath(Phase::TestCompile)), vec!["minestom", "junit-jupiter-api"]);
        assert_eq!(
            names(set.classpath(Phase::TestRuntime)),
            vec!["minestom", "junit-jupiter-api", "junit-jupiter-engine"]
        );
        assert_eq!(names(set.classpath(Phase::ConsumerCompile)), vec!["minestom"]);
    }

    #[test]
    fn test_compile_only_engine_is_hidden_from_consumers() {
        let mut set = DependencySet::default();
        set.declare("minestom", coordinate("net.minestom:minestom:1.0"), Visibility::CompileOnly)
            .unwrap();

        assert_eq!(set.classpath(Phase::Compile).len(), 1);
        assert!(set.classpath(Phase::ConsumerCompile).is_empty());
        assert_eq!(set.exposed().count(), 0);
    }

    #[test]
    fn test_duplicate_declaration() {
        let mut set = sample();
        let err = set
            .declare("minestom", coordinate("net.minestom:minestom:1.0"), Visibility::Api)
            .unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateDependency { .. }));
    }

    #[test]
    fn test_distinct_coordinates() {
        assert_eq!(sample().coordinates().len(), 3);
    }

    #[test]
    fn test_phase_parsing() {
        assert_eq!("test-runtime".parse::<Phase>().unwrap(), Phase::TestRuntime);
        assert!("runtime".parse::<Phase>().is_err());
    }

    #[test]
    fn test_from_manifest_reports_unknown_alias() {
        let manifest = ProjectManifest::parse(
            r#"
            [project]
            group = "net.onelitefeather"
            name = "cyano"
            version = "0.1.1"

            [dependencies]
            api = ["minestom"]
            "#,
        )
        .unwrap();

        let err = DependencySet::from_manifest(&manifest).unwrap_err();
        assert!(matches!(err, ManifestError::UnknownAlias { alias } if alias == "minestom"));
    }
}
