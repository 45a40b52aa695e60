use std::collections::BTreeMap;

use crate::coordinate::Coordinate;
use crate::error::ManifestError;
use crate::project::{LibrarySpec, ProjectManifest};

/// Library aliases from `[libraries]`, with version refs already looked up
/// in `[versions]`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    libraries: BTreeMap<String, Coordinate>,
}

impl Catalog {
    pub fn from_manifest(manifest: &ProjectManifest) -> Result<Self, ManifestError> {
        Self::build(&manifest.versions, &manifest.libraries)
    }

    pub fn build(
        versions: &BTreeMap<String, String>,
        libraries: &BTreeMap<String, LibrarySpec>,
    ) -> Result<Self, ManifestError> {
        let mut resolved = BTreeMap::new();

        for (alias, spec) in libraries {
            let coordinate = library_coordinate(alias, spec, versions)?;
            resolved.insert(alias.clone(), coordinate);
        }

        Ok(Self {
            libraries: resolved,
        })
    }

    pub fn coordinate(&self, alias: &str) -> Option<&Coordinate> {
        self.libraries.get(alias)
    }

    pub fn require(&self, alias: &str) -> Result<&Coordinate, ManifestError> {
        self.coordinate(alias)
            .ok_or_else(|| ManifestError::UnknownAlias {
                alias: alias.to_string(),
            })
    }

    pub fn aliases(&self) -> Vec<&str> {
        self.libraries.keys().map(|s| s.as_str()).collect()
    }
}

fn library_coordinate(
    alias: &str,
    spec: &LibrarySpec,
    versions: &BTreeMap<String, String>,
) -> Result<Coordinate, ManifestError> {
    let incomplete = |reason: &str| ManifestError::IncompleteLibrary {
        alias: alias.to_string(),
        reason: reason.to_string(),
    };

    let version = match (&spec.version, &spec.version_ref) {
        (Some(_), Some(_)) => return Err(incomplete("set either version or version-ref, not both")),
        (Some(version), None) => version.clone(),
        (None, Some(reference)) => versions
            .get(reference)
            .cloned()
            .ok_or_else(|| ManifestError::UnknownVersionRef {
                alias: alias.to_string(),
                reference: reference.clone(),
            })?,
        (None, None) => return Err(incomplete("missing version or version-ref")),
    };

    match (&spec.module, &spec.group, &spec.name) {
        (Some(module), None, None) => Coordinate::from_module(module, version),
        (None, Some(group), Some(name)) => Coordinate::new(group, name, version),
        (Some(_), _, _) => Err(incomplete("module cannot be combined with group or name")),
        _ => Err(incomplete("missing module or group/name")),
    }
}
