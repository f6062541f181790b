//! Reading one `pom.xml` module descriptor.

use indexmap::IndexMap;
use serde::Serialize;

use crate::xml;

/// Conventional descriptor file name.
pub const POM_FILE: &str = "pom.xml";

/// What a module packages into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Packaging {
    /// `pom`: aggregates submodules, owns no sources.
    Container,
    /// `war`: the deployable web module.
    War,
    /// `jar` and anything else.
    Library,
}

impl Packaging {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("pom") => Packaging::Container,
            Some("war") => Packaging::War,
            _ => Packaging::Library,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Packaging::Container)
    }

    pub fn is_war(&self) -> bool {
        matches!(self, Packaging::War)
    }
}

impl std::fmt::Display for Packaging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Packaging::Container => write!(f, "pom"),
            Packaging::War => write!(f, "war"),
            Packaging::Library => write!(f, "jar"),
        }
    }
}

/// A declared `<dependency>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    /// Literal version or a `${...}` reference, as written.
    pub version: Option<String>,
}

/// The facts yobatis needs from one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pom {
    pub artifact_id: String,
    pub packaging: Packaging,
    pub modules: Vec<String>,
    /// Declared `<resource><directory>` values, unsubstituted.
    pub resource_directories: Vec<String>,
    pub properties: IndexMap<String, String>,
    /// Properties of the single profile active by default.
    pub profile_properties: IndexMap<String, String>,
    pub dependencies: Vec<Dependency>,
}

impl Pom {
    /// Parse descriptor text.
    ///
    /// A missing or empty `artifactId` is rejected. More than one profile
    /// active by default leaves profile properties out entirely.
    pub fn parse(text: &str) -> Result<Self, String> {
        let doc = xml::parse_rooted(text, "project")?;
        let root = doc.root_element();

        let artifact_id =
            xml::child_text(root, "artifactId").ok_or("missing or empty artifactId")?;
        let packaging = Packaging::parse(xml::child_text(root, "packaging").as_deref());

        let modules = xml::child(root, "modules")
            .map(|m| xml::children(m, "module").filter_map(xml::text).collect())
            .unwrap_or_default();

        let resource_directories = xml::descend(root, &["build", "resources"])
            .map(|r| {
                xml::children(r, "resource")
                    .filter_map(|res| xml::child_text(res, "directory"))
                    .collect()
            })
            .unwrap_or_default();

        let properties = xml::child(root, "properties")
            .map(read_properties)
            .unwrap_or_default();

        let active_profiles: Vec<_> = xml::child(root, "profiles")
            .map(|p| {
                xml::children(p, "profile")
                    .filter(|profile| {
                        xml::descend(*profile, &["activation", "activeByDefault"])
                            .and_then(xml::text)
                            .is_some_and(|v| v == "true")
                    })
                    .collect()
            })
            .unwrap_or_default();
        let profile_properties = match active_profiles.as_slice() {
            [profile] => xml::child(*profile, "properties")
                .map(read_properties)
                .unwrap_or_default(),
            _ => IndexMap::new(),
        };

        let mut dependencies = Vec::new();
        for path in [&["dependencies"][..], &["dependencyManagement", "dependencies"][..]] {
            if let Some(list) = xml::descend(root, path) {
                dependencies.extend(xml::children(list, "dependency").filter_map(read_dependency));
            }
        }

        Ok(Self {
            artifact_id,
            packaging,
            modules,
            resource_directories,
            properties,
            profile_properties,
            dependencies,
        })
    }
}

fn read_properties(node: roxmltree::Node<'_, '_>) -> IndexMap<String, String> {
    node.children()
        .filter(|n| n.is_element())
        .filter_map(|n| Some((n.tag_name().name().to_string(), xml::text(n)?)))
        .collect()
}

fn read_dependency(node: roxmltree::Node<'_, '_>) -> Option<Dependency> {
    Some(Dependency {
        group_id: xml::child_text(node, "groupId")?,
        artifact_id: xml::child_text(node, "artifactId")?,
        version: xml::child_text(node, "version"),
    })
}
