//! Info command report data structures.

use std::path::PathBuf;

use yobatis_core::Severity;

use super::output::{Mark, Output, Report};

/// Report data from project info.
#[derive(Debug)]
pub struct InfoReport {
    /// Project root.
    pub project_dir: PathBuf,
    /// Artifact id of the war module, if any.
    pub web_module: Option<String>,
    /// Every module, root first.
    pub modules: Vec<ModuleInfo>,
    /// Folders that look like model packages.
    pub model_folders: Vec<String>,
    /// Folders that look like dao packages.
    pub dao_folders: Vec<String>,
    /// Warning messages.
    pub warnings: Vec<String>,
}

/// One module of the tree.
#[derive(Debug)]
pub struct ModuleInfo {
    pub artifact_id: String,
    pub packaging: String,
    pub folder: String,
    /// Distance from the root module.
    pub depth: usize,
    pub source_folder: Option<String>,
    pub resource_folders: Vec<String>,
    pub webroot_folder: Option<String>,
}

impl Report for InfoReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.diagnostic(Severity::Warning, warning);
        }

        out.title(&self.project_dir.display().to_string());
        out.status(
            "Web module",
            self.web_module.as_deref().unwrap_or("(none)"),
        );
        out.newline();

        out.section("Modules");
        for module in &self.modules {
            let depth = module.depth;
            out.tree_node(
                depth,
                &format!("{} ({}) {}", module.artifact_id, module.packaging, module.folder),
            );
            if let Some(source) = &module.source_folder {
                out.tree_node(depth + 1, &format!("└─ sources: {}", source));
            }
            for resource in &module.resource_folders {
                out.tree_node(depth + 1, &format!("└─ resources: {}", resource));
            }
            if let Some(webroot) = &module.webroot_folder {
                out.tree_node(depth + 1, &format!("└─ web root: {}", webroot));
            }
        }
        out.newline();

        out.section(&format!("Model folders ({})", self.model_folders.len()));
        for folder in &self.model_folders {
            out.item(Mark::Plain, folder);
        }
        out.newline();

        out.section(&format!("Dao folders ({})", self.dao_folders.len()));
        for folder in &self.dao_folders {
            out.item(Mark::Plain, folder);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::RecordingOutput;

    fn module(artifact_id: &str, packaging: &str, folder: &str, depth: usize) -> ModuleInfo {
        ModuleInfo {
            artifact_id: artifact_id.into(),
            packaging: packaging.into(),
            folder: folder.into(),
            depth,
            source_folder: None,
            resource_folders: Vec::new(),
            webroot_folder: None,
        }
    }

    #[test]
    fn test_modules_render_as_tree() {
        let mut web = module("web", "war", "web", 1);
        web.source_folder = Some("web/src/main/java".into());
        web.webroot_folder = Some("web/src/main/webapp".into());
        let report = InfoReport {
            project_dir: PathBuf::from("demo"),
            web_module: Some("web".into()),
            modules: vec![module("demo", "pom", ".", 0), web],
            model_folders: vec!["web/src/main/java/org/demo/model".into()],
            dao_folders: Vec::new(),
            warnings: Vec::new(),
        };
        let mut out = RecordingOutput::default();
        report.render(&mut out);

        let modules = out.lines.iter().position(|l| l == "Modules:").unwrap();
        assert_eq!(
            out.lines[modules + 1..modules + 5],
            [
                "  demo (pom) .",
                "    web (war) web",
                "      └─ sources: web/src/main/java",
                "      └─ web root: web/src/main/webapp",
            ]
        );
        assert!(out.lines.contains(&"Web module: web".to_string()));
        assert!(out.lines.contains(&"Dao folders (0):".to_string()));
    }
}
