use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::build_runner::CommandRunner;
use crate::dependencies::{DependencySet, Phase};
use crate::logging::init_logging;
use crate::pipeline::Pipeline;
use crate::project::{ProjectManifest, DEFAULT_MANIFEST};
use crate::publish::{Credentials, HttpTransport, Publisher};
use crate::resolution::MavenResolver;

#[derive(Parser)]
#[command(name = "cyano-build")]
#[command(about = "Resolves, builds and publishes the cyano library")]
#[command(version)]
pub struct Cli {
    /// Path to cyano.toml
    #[arg(long, global = true, default_value = DEFAULT_MANIFEST)]
    pub manifest_path: PathBuf,

    /// Debug-level logging (CYANO_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve all declared dependencies and write the lock file
    Resolve,

    /// Print the classpath of one phase
    Classpath {
        /// compile, test-compile, test-runtime or consumer-compile
        #[arg(long, default_value = "compile")]
        phase: Phase,
    },

    /// Show which repository a version would be published to
    Channel {
        /// Version to classify (defaults to the project version)
        #[arg(long)]
        for_version: Option<String>,
    },

    /// Print the generated POM
    Pom,

    /// Resolve, compile, test and list the produced artifacts
    Build,

    /// Build and publish to the snapshot or release repository
    Publish {
        /// Publish artifacts already in the output directory
        #[arg(long)]
        skip_build: bool,

        /// Print the uploads instead of performing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Check configuration, build tools and credentials
    Doctor,
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let manifest = ProjectManifest::load(&cli.manifest_path)
        .with_context(|| format!("Failed to load {}", cli.manifest_path.display()))?;
    let root = project_root(&cli.manifest_path);

    match cli.command {
        Commands::Resolve => resolve_command(&manifest, &root),
        Commands::Classpath { phase } => classpath_command(&manifest, &root, phase),
        Commands::Channel { for_version } => channel_command(&manifest, for_version),
        Commands::Pom => pom_command(&manifest, &root),
        Commands::Build => build_command(&manifest, &root),
        Commands::Publish {
            skip_build,
            dry_run,
        } => publish_command(&manifest, &root, skip_build, dry_run),
        Commands::Doctor => doctor_command(&manifest, &root),
    }
}

fn project_root(manifest_path: &Path) -> PathBuf {
    match manifest_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn resolve_command(manifest: &ProjectManifest, root: &Path) -> Result<()> {
    let resolver = MavenResolver::new(manifest.repositories.resolve.clone());
    let runner = CommandRunner::new(root);
    let pipeline = Pipeline::new(manifest, root, &resolver, &runner);

    let graph = pipeline.resolve()?;

    println!("Resolved {} dependencies:", graph.artifacts.len());
    for artifact in &graph.artifacts {
        println!("  {} ({})", artifact.coordinate, artifact.repository);
    }
    println!("\nLock file: {}", pipeline.lock_writer().path().display());

    Ok(())
}

fn classpath_command(manifest: &ProjectManifest, root: &Path, phase: Phase) -> Result<()> {
    let resolver = MavenResolver::new(manifest.repositories.resolve.clone());
    let runner = CommandRunner::new(root);
    let pipeline = Pipeline::new(manifest, root, &resolver, &runner);

    let project = manifest.project_coordinate()?;
    let dependencies = DependencySet::from_manifest(manifest)?;

    // A lock that still matches the manifest saves a round of network requests.
    let graph = match pipeline.lock_writer().read() {
        Ok(lock) if lock.validate(&project, &dependencies).is_ok() => lock.graph,
        _ => pipeline.resolve()?,
    };

    for coordinate in graph.classpath(phase) {
        println!("{}", coordinate);
    }

    Ok(())
}

fn channel_command(manifest: &ProjectManifest, version: Option<String>) -> Result<()> {
    let version = version.unwrap_or_else(|| manifest.project.version.clone());
    let target = Publisher::from_section(&manifest.publishing)
        .target(&version)
        .with_context(|| format!("Cannot select a channel for {version:?}"))?;

    println!("{} -> {} ({})", version, target.channel, target.url);

    Ok(())
}

fn pom_command(manifest: &ProjectManifest, root: &Path) -> Result<()> {
    let resolver = MavenResolver::new(manifest.repositories.resolve.clone());
    let runner = CommandRunner::new(root);
    let pipeline = Pipeline::new(manifest, root, &resolver, &runner);

    print!("{}", pipeline.pom()?);

    Ok(())
}

fn build_command(manifest: &ProjectManifest, root: &Path) -> Result<()> {
    let resolver = MavenResolver::new(manifest.repositories.resolve.clone());
    let runner = CommandRunner::new(root);
    let pipeline = Pipeline::new(manifest, root, &resolver, &runner);

    let output = pipeline.build()?;

    println!("Built {} artifacts:", output.artifacts.files.len());
    for artifact in &output.artifacts.files {
        println!("  {} ({})", artifact.path.display(), artifact.kind.as_str());
    }

    Ok(())
}

fn publish_command(
    manifest: &ProjectManifest,
    root: &Path,
    skip_build: bool,
    dry_run: bool,
) -> Result<()> {
    let resolver = MavenResolver::new(manifest.repositories.resolve.clone());
    let runner = CommandRunner::new(root);
    let pipeline = Pipeline::new(manifest, root, &resolver, &runner);

    if dry_run {
        let artifacts = pipeline.artifacts(skip_build)?;
        let plan = pipeline.plan(&artifacts)?;

        println!(
            "Would publish {} to {} ({}):",
            artifacts.coordinate, plan.target.repository_name, plan.target.channel
        );
        for upload in &plan.uploads {
            println!("  PUT {} ({} bytes)", upload.url, upload.body.len());
        }
        println!("  PUT {} (merged with the existing listing)", plan.metadata_url);
        return Ok(());
    }

    let transport = HttpTransport::new();
    let report = pipeline.release(&transport, skip_build)?;

    println!(
        "Published {} files to {} ({})",
        report.uploaded.len(),
        report.target.url,
        report.target.channel
    );

    Ok(())
}

fn doctor_command(manifest: &ProjectManifest, root: &Path) -> Result<()> {
    println!("cyano-build doctor - checking project setup...\n");

    let project = manifest.project_coordinate()?;
    println!("✓ Project {}", project);

    let dependencies = DependencySet::from_manifest(manifest)
        .context("Dependency declarations are invalid")?;
    println!("✓ {} dependency declarations", dependencies.declarations().len());
    for declaration in dependencies.declarations() {
        println!("    {} = {} ({})", declaration.alias, declaration.coordinate, declaration.visibility);
    }

    match Publisher::from_section(&manifest.publishing).target(&manifest.project.version) {
        Ok(target) => println!("✓ Version {} publishes to {} ({})", project.version, target.url, target.channel),
        Err(err) => println!("✗ Version {} has no channel: {}", project.version, err),
    }

    let mut ok = true;
    for (step, command) in [("compile", &manifest.build.compile), ("test", &manifest.build.test)] {
        ok &= check_command_available(root, step, command);
    }

    let publishing = &manifest.publishing;
    match Credentials::from_env(&publishing.username_env, &publishing.password_env) {
        Ok(credentials) => println!("✓ Credentials found for user {}", credentials.username()),
        Err(err) => {
            println!("✗ {}", err);
            println!("  Set {} and {} before publishing", publishing.username_env, publishing.password_env);
        }
    }

    if !ok {
        return Err(anyhow!("Build commands are not available"));
    }

    println!("\n✓ cyano-build doctor check complete");

    Ok(())
}

fn check_command_available(root: &Path, step: &str, command: &[String]) -> bool {
    let Some(program) = command.first() else {
        println!("✗ No {} command configured", step);
        return false;
    };

    // Relative paths like ./gradlew are looked up in the project, not PATH.
    let found = if program.contains('/') || program.contains('\\') {
        let path = root.join(program);
        path.is_file().then_some(path)
    } else {
        which::which(program).ok()
    };

    match found {
        Some(path) => {
            println!("✓ {} command found at: {}", step, path.display());
            true
        }
        None => {
            println!("✗ {} command not found ({})", step, program);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_publish_flags() {
        let cli = Cli::try_parse_from(["cyano-build", "publish", "--skip-build", "--dry-run"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Publish {
                skip_build: true,
                dry_run: true
            }
        ));
        assert_eq!(cli.manifest_path, PathBuf::from("cyano.toml"));
    }

    #[test]
    fn test_parse_phase() {
        let cli = Cli::try_parse_from(["cyano-build", "classpath", "--phase", "consumer-compile"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Classpath {
                phase: Phase::ConsumerCompile
            }
        ));
        assert!(Cli::try_parse_from(["cyano-build", "classpath", "--phase", "runtime"]).is_err());
    }

    #[test]
    fn test_project_root() {
        assert_eq!(project_root(Path::new("cyano.toml")), PathBuf::from("."));
        assert_eq!(project_root(Path::new("lib/cyano.toml")), PathBuf::from("lib"));
    }

    #[test]
    fn test_relative_command_lookup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("gradlew"), "#!/bin/sh\n").unwrap();

        assert!(check_command_available(dir.path(), "test", &["./gradlew".to_string()]));
        assert!(!check_command_available(dir.path(), "test", &["./mvnw".to_string()]));
        assert!(!check_command_available(dir.path(), "test", &[]));
    }
}
