//! Info operation - the module tree as discovered.

use std::path::Path;

use yobatis_core::{Diagnostics, Folder, Severity};
use yobatis_project::{ModuleId, ModuleTree, Result};

use super::{messages, open_project};
use crate::reports::{InfoReport, ModuleInfo};

/// Execute the info operation.
pub fn info(project_dir: &Path) -> Result<InfoReport> {
    let tree = open_project(project_dir)?;
    let mut diagnostics = Diagnostics::new();
    let modules = ModuleTree::build(&tree, &mut diagnostics)?;

    let paths = |folders: &[Folder]| -> Vec<String> {
        folders.iter().map(|f| f.path().to_string()).collect()
    };
    let module_infos = modules
        .modules()
        .iter()
        .map(|node| ModuleInfo {
            artifact_id: node.artifact_id().to_string(),
            packaging: node.packaging().to_string(),
            folder: display_folder(node.folder()),
            depth: depth(&modules, node.parent()),
            source_folder: node.source_folder().map(|f| f.path().to_string()),
            resource_folders: paths(node.resource_folders()),
            webroot_folder: node.webroot_folder().map(|f| f.path().to_string()),
        })
        .collect();

    Ok(InfoReport {
        project_dir: std::fs::canonicalize(project_dir)
            .unwrap_or_else(|_| project_dir.to_path_buf()),
        web_module: modules.web_module().map(|n| n.artifact_id().to_string()),
        modules: module_infos,
        model_folders: paths(&modules.model_folders()),
        dao_folders: paths(&modules.dao_folders()),
        warnings: messages(&diagnostics, Severity::Warning),
    })
}

fn display_folder(folder: &Folder) -> String {
    if folder.is_root() {
        ".".to_string()
    } else {
        folder.path().to_string()
    }
}

fn depth(modules: &ModuleTree<'_>, mut parent: Option<ModuleId>) -> usize {
    let mut depth = 0;
    while let Some(id) = parent {
        depth += 1;
        parent = modules.module(id).parent();
    }
    depth
}
