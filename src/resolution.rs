//! Turning declared coordinates into concrete artifacts.
//!
//! Resolution happens once per invocation, before any build command runs.
//! One unresolvable coordinate fails the whole graph; there is no partial
//! result and no retry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::coordinate::Coordinate;
use crate::dependencies::{DependencySet, Phase};
use crate::error::ResolveError;

/// A coordinate pinned to the repository that serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedArtifact {
    pub coordinate: Coordinate,
    pub repository: String,
}

pub trait Resolver {
    fn resolve(&self, coordinate: &Coordinate) -> Result<ResolvedArtifact, ResolveError>;
}

/// Probes Maven-layout repositories for the coordinate's POM, in order.
pub struct MavenResolver {
    repositories: Vec<String>,
    agent: ureq::Agent,
}

impl MavenResolver {
    pub fn new(repositories: Vec<String>) -> Self {
        Self {
            repositories,
            agent: ureq::Agent::new_with_defaults(),
        }
    }

    pub fn repositories(&self) -> &[String] {
        &self.repositories
    }

    /// URL checked for `coordinate` in `repository`.
    pub fn pom_url(repository: &str, coordinate: &Coordinate) -> String {
        coordinate.url_in(repository, &coordinate.file_name(None, "pom"))
    }
}

impl Resolver for MavenResolver {
    fn resolve(&self, coordinate: &Coordinate) -> Result<ResolvedArtifact, ResolveError> {
        if self.repositories.is_empty() {
            return Err(ResolveError::NoRepositories);
        }

        for repository in &self.repositories {
            let url = Self::pom_url(repository, coordinate);
            debug!(%url, "probing repository");

            match self.agent.head(&url).call() {
                Ok(_) => {
                    return Ok(ResolvedArtifact {
                        coordinate: coordinate.clone(),
                        repository: repository.clone(),
                    });
                }
                Err(ureq::Error::StatusCode(404)) => continue,
                Err(err) => {
                    return Err(ResolveError::Transport {
                        coordinate: coordinate.to_string(),
                        url,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Err(ResolveError::Unresolvable {
            coordinate: coordinate.to_string(),
            repositories: self.repositories.clone(),
        })
    }
}

/// Resolved artifacts plus the classpath of every phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedGraph {
    pub artifacts: Vec<ResolvedArtifact>,
    pub classpaths: BTreeMap<Phase, Vec<Coordinate>>,
}

impl ResolvedGraph {
    pub fn classpath(&self, phase: Phase) -> &[Coordinate] {
        self.classpaths
            .get(&phase)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn artifact(&self, coordinate: &Coordinate) -> Option<&ResolvedArtifact> {
        self.artifacts.iter().find(|a| &a.coordinate == coordinate)
    }
}

/// Resolves each distinct coordinate once, in declaration order.
pub fn resolve_graph(
    dependencies: &DependencySet,
    resolver: &dyn Resolver,
) -> Result<ResolvedGraph, ResolveError> {
    let coordinates = dependencies.coordinates();
    info!(count = coordinates.len(), "resolving dependencies");

    let mut artifacts = Vec::with_capacity(coordinates.len());
    for coordinate in &coordinates {
        let artifact = resolver.resolve(coordinate)?;
        debug!(%coordinate, repository = %artifact.repository, "resolved");
        artifacts.push(artifact);
    }

    let classpaths = Phase::ALL
        .into_iter()
        .map(|phase| (phase, dependencies.classpath(phase)))
        .collect();

    Ok(ResolvedGraph {
        artifacts,
        classpaths,
    })
}
