//! The servlet deployment descriptor, read for its spring entry points.

use tracing::debug;
use yobatis_core::FileTree;

use crate::{Error, Result, module_tree::ModuleTree, xml};

/// Descriptor location under the web root.
pub const WEB_XML: &str = "WEB-INF/web.xml";

const CONFIG_LOCATION_PARAM: &str = "contextConfigLocation";
const DISPATCHER_SERVLET: &str = "org.springframework.web.servlet.DispatcherServlet";

/// `web.xml` of the web module, reduced to its spring configuration hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentDescriptor {
    path: String,
    hints: Vec<String>,
}

impl DeploymentDescriptor {
    /// Find and read the web module's descriptor.
    ///
    /// Fails when the project has no web module, the web module has no
    /// descriptor, or the descriptor names no spring configuration at all.
    pub fn load(modules: &ModuleTree<'_>) -> Result<Self> {
        let web = modules
            .web_module()
            .ok_or_else(|| Error::unsupported_project("no module is packaged as war"))?;
        let webroot = web.webroot_folder().ok_or_else(|| {
            Error::unsupported_project(format!(
                "web module '{}' has no src/main/webapp folder",
                web.artifact_id()
            ))
        })?;
        let path = webroot.child_path(WEB_XML);
        let tree = modules.tree();
        let file = tree
            .find_file(&path)
            .ok_or_else(|| Error::unsupported_project(format!("{} not found", path)))?;
        let text = tree
            .read(&file)
            .map_err(|e| Error::invalid_configuration(&path, e.to_string()))?;

        let descriptor = Self::parse(&path, &text)?;
        if descriptor.hints.is_empty() {
            return Err(Error::unsupported_project(format!(
                "{} does not configure contextConfigLocation",
                path
            )));
        }
        debug!(path = %path, hints = ?descriptor.hints, "read deployment descriptor");
        Ok(descriptor)
    }

    /// Read descriptor text.
    ///
    /// Hints come from the `contextConfigLocation` context-param and from the
    /// same init-param of spring's dispatcher servlet. Declaring either more
    /// than once is rejected.
    pub fn parse(path: &str, text: &str) -> Result<Self> {
        let doc = xml::parse_rooted(text, "web-app")
            .map_err(|msg| Error::invalid_configuration(path, msg))?;
        let root = doc.root_element();

        let context_params: Vec<String> = xml::children(root, "context-param")
            .filter_map(config_location)
            .collect();
        if context_params.len() > 1 {
            return Err(Error::unsupported_project(format!(
                "{} declares contextConfigLocation more than once",
                path
            )));
        }

        let servlet_params: Vec<String> = xml::children(root, "servlet")
            .filter(|servlet| {
                xml::child_text(*servlet, "servlet-class").as_deref() == Some(DISPATCHER_SERVLET)
            })
            .flat_map(|servlet| xml::children(servlet, "init-param").filter_map(config_location))
            .collect();
        if servlet_params.len() > 1 {
            return Err(Error::unsupported_project(format!(
                "{} configures the dispatcher servlet's contextConfigLocation more than once",
                path
            )));
        }

        let mut hints: Vec<String> = Vec::new();
        for value in context_params.iter().chain(&servlet_params) {
            for hint in split_locations(value) {
                if !hints.iter().any(|h| h == hint) {
                    hints.push(hint.to_string());
                }
            }
        }
        Ok(Self {
            path: path.to_string(),
            hints,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw location strings, in declaration order, without duplicates.
    pub fn hints(&self) -> &[String] {
        &self.hints
    }
}

/// The value of a `contextConfigLocation` parameter element.
fn config_location(param: roxmltree::Node<'_, '_>) -> Option<String> {
    if xml::child_text(param, "param-name").as_deref() != Some(CONFIG_LOCATION_PARAM) {
        return None;
    }
    xml::child_text(param, "param-value")
}

/// Split a location list the way spring does: commas, semicolons, whitespace.
fn split_locations(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|s| !s.is_empty())
}
