//! Maven POM for the published library.
//!
//! Only `api` dependencies are written, at `compile` scope. This is what
//! puts the host engine on a downstream consumer's classpath; compile-only
//! and test dependencies never leave this build.

use crate::coordinate::Coordinate;
use crate::dependencies::DependencySet;

pub fn generate_pom(
    project: &Coordinate,
    description: Option<&str>,
    dependencies: &DependencySet,
) -> String {
    let mut pom = String::new();
    pom.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    pom.push_str(
        "<project xmlns=\"http://maven.apache.org/POM/4.0.0\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xsi:schemaLocation=\"http://maven.apache.org/POM/4.0.0 https://maven.apache.org/xsd/maven-4.0.0.xsd\">\n",
    );
    pom.push_str("  <modelVersion>4.0.0</modelVersion>\n");
    push_element(&mut pom, 1, "groupId", &project.group);
    push_element(&mut pom, 1, "artifactId", &project.artifact);
    push_element(&mut pom, 1, "version", &project.version);
    if let Some(description) = description {
        push_element(&mut pom, 1, "description", description);
    }

    let exposed: Vec<_> = dependencies.exposed().collect();
    if !exposed.is_empty() {
        pom.push_str("  <dependencies>\n");
        for declaration in exposed {
            let coordinate = &declaration.coordinate;
            pom.push_str("    <dependency>\n");
            push_element(&mut pom, 3, "groupId", &coordinate.group);
            push_element(&mut pom, 3, "artifactId", &coordinate.artifact);
            push_element(&mut pom, 3, "version", &coordinate.version);
            push_element(&mut pom, 3, "scope", "compile");
            pom.push_str("    </dependency>\n");
        }
        pom.push_str("  </dependencies>\n");
    }

    pom.push_str("</project>\n");
    pom
}

fn push_element(out: &mut String, depth: usize, name: &str, value: &str) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(&format!("<{name}>{}</{name}>\n", escape_xml(value)));
}

pub(crate) fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
