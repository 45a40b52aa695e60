//! The release pipeline: resolve, lock, compile, test, collect, publish.
//!
//! Stages run strictly in order and each one needs the previous one to
//! have succeeded. A failure anywhere ends the run with nothing further
//! attempted.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::artifact_discovery::{ArtifactDiscovery, ArtifactSet};
use crate::build_runner::{compile_invocation, test_invocation, BuildRunner};
use crate::coordinate::Coordinate;
use crate::dependencies::DependencySet;
use crate::lockfile::LockFileWriter;
use crate::pom::generate_pom;
use crate::project::ProjectManifest;
use crate::publish::{Credentials, PublishPlan, PublishReport, Publisher, Transport};
use crate::resolution::{resolve_graph, ResolvedGraph, Resolver};

pub struct Pipeline<'a> {
    manifest: &'a ProjectManifest,
    root: PathBuf,
    resolver: &'a dyn Resolver,
    runner: &'a dyn BuildRunner,
}

#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub graph: ResolvedGraph,
    pub artifacts: ArtifactSet,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        manifest: &'a ProjectManifest,
        root: impl AsRef<Path>,
        resolver: &'a dyn Resolver,
        runner: &'a dyn BuildRunner,
    ) -> Self {
        Self {
            manifest,
            root: root.as_ref().to_path_buf(),
            resolver,
            runner,
        }
    }

    fn project(&self) -> Result<Coordinate> {
        Ok(self.manifest.project_coordinate()?)
    }

    fn dependencies(&self) -> Result<DependencySet> {
        DependencySet::from_manifest(self.manifest).context("Failed to read declared dependencies")
    }

    pub fn lock_writer(&self) -> LockFileWriter {
        LockFileWriter::new(self.root.join(&self.manifest.build.lock_file))
    }

    /// Resolves every declared coordinate and writes the lock file.
    pub fn resolve(&self) -> Result<ResolvedGraph> {
        let project = self.project()?;
        let dependencies = self.dependencies()?;

        let graph = resolve_graph(&dependencies, self.resolver)
            .context("Dependency resolution failed")?;

        let writer = self.lock_writer();
        writer.write(&writer.generate(&project, &graph))?;

        Ok(graph)
    }

    pub fn pom(&self) -> Result<String> {
        let project = self.project()?;
        let dependencies = self.dependencies()?;
        Ok(generate_pom(
            &project,
            self.manifest.project.description.as_deref(),
            &dependencies,
        ))
    }

    /// Collects the already built artifacts without running anything.
    pub fn collect(&self) -> Result<ArtifactSet> {
        let project = self.project()?;
        let build = &self.manifest.build;

        let files = ArtifactDiscovery::new(self.root.join(&build.output_dir), project.clone())
            .sources(build.sources)
            .javadoc(build.javadoc)
            .discover_artifacts()
            .context("Failed to discover artifacts")?;

        Ok(ArtifactSet {
            coordinate: project,
            pom: self.pom()?,
            files,
        })
    }

    /// Resolve, compile, test and collect.
    pub fn build(&self) -> Result<BuildOutput> {
        let graph = self.resolve()?;
        let build = &self.manifest.build;

        self.runner
            .run(&compile_invocation(&build.compile))
            .context("Compilation failed")?;

        let existing = std::env::var(&build.jvm_args_env).ok();
        self.runner
            .run(&test_invocation(
                &build.test,
                &build.jvm_args_env,
                existing.as_deref(),
                &build.system_properties,
            ))
            .context("Tests failed")?;

        let artifacts = self.collect()?;
        info!(files = artifacts.files.len(), "build finished");

        Ok(BuildOutput { graph, artifacts })
    }

    /// Artifacts ready for upload. With `skip_build` the compile and test
    /// steps are skipped, but the declarations are still resolved and the
    /// lock file rewritten, so existing jars built against a dependency that
    /// no longer resolves are never published.
    pub fn artifacts(&self, skip_build: bool) -> Result<ArtifactSet> {
        if skip_build {
            self.resolve()?;
            self.collect()
        } else {
            Ok(self.build()?.artifacts)
        }
    }

    /// The uploads a publish would perform, without network I/O.
    pub fn plan(&self, artifacts: &ArtifactSet) -> Result<PublishPlan> {
        Publisher::from_section(&self.manifest.publishing)
            .plan(artifacts)
            .context("Failed to plan publication")
    }

    /// Full release. Credentials are read before anything else runs, so a
    /// missing variable costs neither a build nor a network call.
    pub fn release(&self, transport: &dyn Transport, skip_build: bool) -> Result<PublishReport> {
        let publishing = &self.manifest.publishing;
        let credentials = Credentials::from_env(&publishing.username_env, &publishing.password_env)
            .context("Publishing credentials are not available")?;

        let artifacts = self.artifacts(skip_build)?;

        let report = Publisher::from_section(publishing)
            .publish(&artifacts, &credentials, transport)
            .with_context(|| format!("Failed to publish to {}", publishing.name))?;

        Ok(report)
    }
}
