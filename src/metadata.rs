//! Artifact-level `maven-metadata.xml`: the version listing a repository
//! keeps next to the version directories.
//!
//! The file is read back from the target repository before each publish
//! and the new version is merged in, so earlier releases stay listed.

use crate::channel::Channel;
use crate::coordinate::Coordinate;
use crate::pom::escape_xml;

pub const METADATA_FILE: &str = "maven-metadata.xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenMetadata {
    group: String,
    artifact: String,
    latest: Option<String>,
    release: Option<String>,
    versions: Vec<String>,
}

impl MavenMetadata {
    pub fn new(coordinate: &Coordinate) -> Self {
        Self {
            group: coordinate.group.clone(),
            artifact: coordinate.artifact.clone(),
            latest: None,
            release: None,
            versions: Vec::new(),
        }
    }

    /// Reads the listing out of an existing file. Group and artifact always
    /// come from `coordinate`; unknown elements are dropped.
    pub fn parse(coordinate: &Coordinate, xml: &str) -> Self {
        let mut metadata = Self::new(coordinate);
        metadata.latest = element_texts(xml, "latest").first().map(|s| s.to_string());
        metadata.release = element_texts(xml, "release").first().map(|s| s.to_string());

        if let Some(versions) = element_texts(xml, "versions").first() {
            for version in element_texts(versions, "version") {
                if !metadata.versions.iter().any(|v| v == version) {
                    metadata.versions.push(version.to_string());
                }
            }
        }
        metadata
    }

    /// URL of the file for `coordinate`'s artifact in `repository`.
    pub fn url_in(coordinate: &Coordinate, repository: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            repository.trim_end_matches('/'),
            coordinate.group.replace('.', "/"),
            coordinate.artifact,
            METADATA_FILE
        )
    }

    pub fn add_version(&mut self, version: &str, channel: Channel) {
        if !self.versions.iter().any(|v| v == version) {
            self.versions.push(version.to_string());
        }
        self.latest = Some(version.to_string());
        if channel == Channel::Stable {
            self.release = Some(version.to_string());
        }
    }

    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    pub fn latest(&self) -> Option<&str> {
        self.latest.as_deref()
    }

    pub fn release(&self) -> Option<&str> {
        self.release.as_deref()
    }

    /// `last_updated` is the `yyyyMMddHHmmss` UTC stamp Maven expects.
    pub fn render(&self, last_updated: &str) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<metadata>\n");
        xml.push_str(&format!("  <groupId>{}</groupId>\n", escape_xml(&self.group)));
        xml.push_str(&format!("  <artifactId>{}</artifactId>\n", escape_xml(&self.artifact)));
        xml.push_str("  <versioning>\n");
        if let Some(latest) = &self.latest {
            xml.push_str(&format!("    <latest>{}</latest>\n", escape_xml(latest)));
        }
        if let Some(release) = &self.release {
            xml.push_str(&format!("    <release>{}</release>\n", escape_xml(release)));
        }
        xml.push_str("    <versions>\n");
        for version in &self.versions {
            xml.push_str(&format!("      <version>{}</version>\n", escape_xml(version)));
        }
        xml.push_str("    </versions>\n");
        xml.push_str(&format!("    <lastUpdated>{}</lastUpdated>\n", escape_xml(last_updated)));
        xml.push_str("  </versioning>\n");
        xml.push_str("</metadata>\n");
        xml
    }
}

/// Text of every `<name>...</name>` element, in document order. Enough for
/// the flat layout repositories write; attributes are not supported.
fn element_texts<'a>(xml: &'a str, name: &str) -> Vec<&'a str> {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let mut texts = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find(&open) {
        let after_open = &rest[start + open.len()..];
        let Some(end) = after_open.find(&close) else {
            break;
        };
        texts.push(after_open[..end].trim());
        rest = &after_open[end + close.len()..];
    }
    texts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate() -> Coordinate {
        Coordinate::parse("net.onelitefeather:cyano:0.2.0").unwrap()
    }

    const EXISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>net.onelitefeather</groupId>
  <artifactId>cyano</artifactId>
  <versioning>
    <latest>0.1.1</latest>
    <release>0.1.1</release>
    <versions>
      <version>0.1.0</version>
      <version>0.1.1</version>
    </versions>
    <lastUpdated>20250704120000</lastUpdated>
  </versioning>
</metadata>
"#;

    #[test]
    fn test_merges_into_existing_listing() {
        let mut metadata = MavenMetadata::parse(&coordinate(), EXISTING);
        assert_eq!(metadata.versions(), &["0.1.0", "0.1.1"]);

        metadata.add_version("0.2.0", Channel::Stable);
        assert_eq!(metadata.versions(), &["0.1.0", "0.1.1", "0.2.0"]);
        assert_eq!(metadata.latest(), Some("0.2.0"));
        assert_eq!(metadata.release(), Some("0.2.0"));
    }

    #[test]
    fn test_pre_release_does_not_move_release() {
        let mut metadata = MavenMetadata::parse(&coordinate(), EXISTING);
        metadata.add_version("0.2.0-SNAPSHOT", Channel::PreRelease);

        assert_eq!(metadata.latest(), Some("0.2.0-SNAPSHOT"));
        assert_eq!(metadata.release(), Some("0.1.1"));
    }

    #[test]
    fn test_republishing_does_not_duplicate() {
        let mut metadata = MavenMetadata::parse(&coordinate(), EXISTING);
        metadata.add_version("0.1.1", Channel::Stable);
        assert_eq!(metadata.versions().len(), 2);
    }

    #[test]
    fn test_render_round_trips() {
        let mut metadata = MavenMetadata::new(&coordinate());
        metadata.add_version("0.2.0", Channel::Stable);
        let xml = metadata.render("20251018093000");

        assert!(xml.contains("<groupId>net.onelitefeather</groupId>"));
        assert!(xml.contains("<lastUpdated>20251018093000</lastUpdated>"));
        assert_eq!(MavenMetadata::parse(&coordinate(), &xml), metadata);
    }

    #[test]
    fn test_url() {
        assert_eq!(
            MavenMetadata::url_in(&coordinate(), "https://repo.example.test/releases/"),
            "https://repo.example.test/releases/net/onelitefeather/cyano/maven-metadata.xml"
        );
    }

    #[test]
    fn test_garbage_yields_empty_listing() {
        let metadata = MavenMetadata::parse(&coordinate(), "<html>502 Bad Gateway</html>");
        assert!(metadata.versions().is_empty());
        assert_eq!(metadata.latest(), None);
    }
}
