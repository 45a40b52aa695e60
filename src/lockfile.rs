use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::coordinate::Coordinate;
use crate::dependencies::{DependencySet, Phase};
use crate::resolution::ResolvedGraph;

/// On-disk record of one resolution, written before anything is compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockFile {
    pub project: Coordinate,
    pub generator: String,
    pub graph: ResolvedGraph,
}

pub struct LockFileWriter {
    path: PathBuf,
}

impl LockFileWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn generate(&self, project: &Coordinate, graph: &ResolvedGraph) -> LockFile {
        LockFile {
            project: project.clone(),
            generator: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            graph: graph.clone(),
        }
    }

    pub fn write(&self, lock: &LockFile) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create lock file directory: {}", parent.display()))?;
            }
        }

        let lock_json = serde_json::to_string_pretty(lock)
            .context("Failed to serialize lock file to JSON")?;

        fs::write(&self.path, lock_json)
            .with_context(|| format!("Failed to write lock file to {}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), "wrote lock file");

        Ok(self.path.clone())
    }

    pub fn read(&self) -> Result<LockFile> {
        let lock_content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read lock file from {}", self.path.display()))?;

        let lock: LockFile = serde_json::from_str(&lock_content)
            .with_context(|| format!("Failed to parse lock file JSON from {}", self.path.display()))?;

        Ok(lock)
    }
}

impl LockFile {
    /// Checks that this lock still describes `project` and `dependencies`.
    pub fn validate(&self, project: &Coordinate, dependencies: &DependencySet) -> Result<()> {
        if &self.project != project {
            return Err(anyhow!(
                "Lock file was written for {} but the project is {}",
                self.project,
                project
            ));
        }

        for coordinate in dependencies.coordinates() {
            if self.graph.artifact(&coordinate).is_none() {
                return Err(anyhow!("Lock file has no resolution for {}", coordinate));
            }
        }

        for phase in Phase::ALL {
            let declared = dependencies.classpath(phase);
            if self.graph.classpath(phase) != declared.as_slice() {
                return Err(anyhow!(
                    "Lock file {} classpath differs from the declared dependencies",
                    phase
                ));
            }
        }

        Ok(())
    }
}
