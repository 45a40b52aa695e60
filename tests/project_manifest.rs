use std::path::Path;

use cyano_build::catalog::Catalog;
use cyano_build::dependencies::{DependencySet, Phase, Visibility};
use cyano_build::publish::Publisher;
use cyano_build::{Channel, ProjectManifest};

fn checked_in_manifest() -> ProjectManifest {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("cyano.toml");
    ProjectManifest::load(&path).unwrap()
}

#[test]
fn checked_in_manifest_is_valid() {
    let manifest = checked_in_manifest();
    let catalog = Catalog::from_manifest(&manifest).unwrap();

    assert_eq!(
        catalog.require("minestom").unwrap().to_string(),
        "net.minestom:minestom:2025.07.04-1.21.5"
    );
    assert_eq!(catalog.aliases().len(), 5);
}

#[test]
fn engine_is_exposed_and_junit_is_not() {
    let manifest = checked_in_manifest();
    let dependencies = DependencySet::from_manifest(&manifest).unwrap();

    let exposed: Vec<_> = dependencies.exposed().map(|d| d.alias.as_str()).collect();
    assert_eq!(exposed, vec!["minestom"]);

    let consumer: Vec<_> = dependencies
        .classpath(Phase::ConsumerCompile)
        .into_iter()
        .map(|c| c.artifact)
        .collect();
    assert_eq!(consumer, vec!["minestom"]);

    let runtime = dependencies.classpath(Phase::TestRuntime);
    assert_eq!(runtime.len(), 5);
    assert!(dependencies
        .declarations()
        .iter()
        .any(|d| d.alias == "junit.api" && d.visibility == Visibility::CompileOnly));
}

#[test]
fn checked_in_version_is_a_release() {
    let manifest = checked_in_manifest();
    let target = Publisher::from_section(&manifest.publishing)
        .target(&manifest.project.version)
        .unwrap();

    assert_eq!(target.channel, Channel::Stable);
    assert_eq!(target.url, "https://repo.onelitefeather.dev/onelitefeather-releases");
}
