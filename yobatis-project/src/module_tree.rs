//! The maven module tree of a project.
//!
//! Nodes live in one arena in pre-order (declared module order); each node
//! keeps its parent's [`ModuleId`] for placeholder lookup only.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use tracing::debug;
use yobatis_core::{
    Diagnostics, FileTree, Folder, TokenMatcher, extract_package_name, has_placeholder,
    substitute,
};

use crate::{
    Error, Result,
    pom::{POM_FILE, Packaging, Pom},
};

const PHASE: &str = "discover";
const SOURCE_DIR: &str = "src/main/java";
const DEFAULT_RESOURCE_DIR: &str = "src/main/resources";
const WEBAPP_DIR: &str = "src/main/webapp";

const MODEL_SUFFIXES: [&str; 3] = ["model", "domain", "entity"];
const DAO_SUFFIXES: [&str; 3] = ["dao", "mapper", "repository"];

/// JDBC driver classes whose connector jar can be located, with the maven
/// coordinates of the jar.
const DRIVER_ARTIFACTS: [(&str, &str, &str); 2] = [
    ("com.mysql.jdbc.Driver", "mysql", "mysql-connector-java"),
    ("com.mysql.cj.jdbc.Driver", "mysql", "mysql-connector-java"),
];

/// Handle of a node inside its [`ModuleTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(usize);

/// One module of the tree.
#[derive(Debug, Clone)]
pub struct ModuleNode {
    id: ModuleId,
    parent: Option<ModuleId>,
    folder: Folder,
    pom: Pom,
    source_folder: Option<Folder>,
    resource_folders: Vec<Folder>,
    webroot_folder: Option<Folder>,
}

impl ModuleNode {
    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn parent(&self) -> Option<ModuleId> {
        self.parent
    }

    pub fn artifact_id(&self) -> &str {
        &self.pom.artifact_id
    }

    pub fn packaging(&self) -> Packaging {
        self.pom.packaging
    }

    pub fn is_container(&self) -> bool {
        self.pom.packaging.is_container()
    }

    pub fn is_war(&self) -> bool {
        self.pom.packaging.is_war()
    }

    /// The folder holding this module's `pom.xml`.
    pub fn folder(&self) -> &Folder {
        &self.folder
    }

    pub fn pom(&self) -> &Pom {
        &self.pom
    }

    /// `src/main/java`, when present.
    pub fn source_folder(&self) -> Option<&Folder> {
        self.source_folder.as_ref()
    }

    pub fn resource_folders(&self) -> &[Folder] {
        &self.resource_folders
    }

    /// `src/main/webapp` of a war module, when present.
    pub fn webroot_folder(&self) -> Option<&Folder> {
        self.webroot_folder.as_ref()
    }

    /// A property declared by this module alone.
    fn own_property(&self, name: &str) -> Option<&str> {
        self.pom
            .properties
            .get(name)
            .or_else(|| self.pom.profile_properties.get(name))
            .map(String::as_str)
    }

    /// Whether a folder lies inside this module's source tree.
    fn owns_source(&self, folder: &Folder) -> bool {
        self.source_folder
            .as_ref()
            .is_some_and(|src| folder.path().starts_with(&format!("{}/", src.path())))
    }
}

/// All modules of a project, rooted at the project folder.
pub struct ModuleTree<'t> {
    tree: &'t dyn FileTree,
    nodes: Vec<ModuleNode>,
    web_module: Option<ModuleId>,
}

impl std::fmt::Debug for ModuleTree<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleTree")
            .field("nodes", &self.nodes)
            .field("web_module", &self.web_module)
            .finish()
    }
}

impl<'t> ModuleTree<'t> {
    /// Read the root `pom.xml` and every declared submodule below it.
    ///
    /// A submodule whose folder or descriptor is missing is skipped with a
    /// warning. A descriptor that exists but cannot be read is rejected.
    pub fn build(tree: &'t dyn FileTree, diagnostics: &mut Diagnostics) -> Result<Self> {
        let root = tree.root();
        if tree.find_file(&root.child_path(POM_FILE)).is_none() {
            return Err(Error::unsupported_project(
                "no pom.xml found at the project root",
            ));
        }

        let mut this = Self {
            tree,
            nodes: Vec::new(),
            web_module: None,
        };
        this.load(root, None, diagnostics)?;

        let wars: Vec<ModuleId> = this.nodes.iter().filter(|n| n.is_war()).map(|n| n.id).collect();
        if wars.len() > 1 {
            let names: Vec<&str> = wars.iter().map(|id| this.module(*id).artifact_id()).collect();
            diagnostics.warning(
                PHASE,
                format!(
                    "more than one war module ({}), using '{}'",
                    names.join(", "),
                    names[0]
                ),
            );
        }
        this.web_module = wars.first().copied();
        Ok(this)
    }

    fn load(
        &mut self,
        folder: Folder,
        parent: Option<ModuleId>,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let pom_path = folder.child_path(POM_FILE);
        let pom = self
            .tree
            .find_file(&pom_path)
            .ok_or_else(|| Error::unsupported_project(format!("{} is missing", pom_path)))
            .and_then(|file| {
                self.tree
                    .read(&file)
                    .map_err(|e| Error::invalid_configuration(&pom_path, e.to_string()))
            })
            .and_then(|text| {
                Pom::parse(&text).map_err(|msg| Error::invalid_configuration(&pom_path, msg))
            })?;
        debug!(path = %pom_path, artifact = %pom.artifact_id, "loaded module descriptor");

        let id = ModuleId(self.nodes.len());
        let submodules = pom.modules.clone();
        self.nodes.push(ModuleNode {
            id,
            parent,
            folder: folder.clone(),
            pom,
            source_folder: None,
            resource_folders: Vec::new(),
            webroot_folder: None,
        });
        self.load_folders(id);

        for name in submodules {
            let path = folder.child_path(&name);
            let Some(subfolder) = self.tree.find_folder(&path) else {
                diagnostics.warning(PHASE, format!("module folder '{}' not found, skipped", path));
                continue;
            };
            if self.tree.find_file(&subfolder.child_path(POM_FILE)).is_none() {
                diagnostics.warning(PHASE, format!("module '{}' has no pom.xml, skipped", path));
                continue;
            }
            self.load(subfolder, Some(id), diagnostics)?;
        }
        Ok(())
    }

    fn load_folders(&mut self, id: ModuleId) {
        let node = self.module(id);
        if node.is_container() {
            return;
        }
        let base = node.folder.clone();
        let find = |relative: &str| self.tree.find_folder(&base.child_path(relative));

        let source_folder = find(SOURCE_DIR);
        let webroot_folder = if node.is_war() { find(WEBAPP_DIR) } else { None };

        let declared: Vec<String> = node
            .pom
            .resource_directories
            .iter()
            .map(|dir| self.filter_placeholders(id, dir))
            .collect();
        let mut resource_folders = IndexSet::new();
        if declared.is_empty() {
            resource_folders.extend(find(DEFAULT_RESOURCE_DIR));
        }
        for dir in &declared {
            resource_folders.extend(find(dir));
        }

        let node = &mut self.nodes[id.0];
        node.source_folder = source_folder;
        node.webroot_folder = webroot_folder;
        node.resource_folders = resource_folders.into_iter().collect();
    }

    pub fn tree(&self) -> &'t dyn FileTree {
        self.tree
    }

    /// Every module, root first, in declared order.
    pub fn modules(&self) -> &[ModuleNode] {
        &self.nodes
    }

    pub fn module(&self, id: ModuleId) -> &ModuleNode {
        &self.nodes[id.0]
    }

    pub fn root(&self) -> &ModuleNode {
        &self.nodes[0]
    }

    pub fn parent(&self, id: ModuleId) -> Option<&ModuleNode> {
        self.module(id).parent.map(|p| self.module(p))
    }

    /// The deployable web module. With several, the first in declared order.
    pub fn web_module(&self) -> Option<&ModuleNode> {
        self.web_module.map(|id| self.module(id))
    }

    /// First module, in declared order, matching a predicate.
    pub fn find_module_by(&self, predicate: impl Fn(&ModuleNode) -> bool) -> Option<&ModuleNode> {
        self.nodes.iter().find(|node| predicate(node))
    }

    /// Look a property up on a module, then on each ancestor in turn.
    pub fn resolve_property(&self, id: ModuleId, name: &str) -> Option<&str> {
        let mut current = Some(id);
        while let Some(cur) = current {
            let node = self.module(cur);
            if let Some(value) = node.own_property(name) {
                return Some(value);
            }
            current = node.parent;
        }
        None
    }

    /// Substitute `${...}` placeholders with module properties.
    ///
    /// Each level substitutes what it declares and hands the rest up to its
    /// parent. Unknown placeholders stay in the text.
    pub fn filter_placeholders(&self, id: ModuleId, text: &str) -> String {
        let mut text = text.to_string();
        let mut current = Some(id);
        while let Some(cur) = current {
            if !has_placeholder(&text) {
                break;
            }
            let node = self.module(cur);
            text = substitute(&text, |key| node.own_property(key).map(str::to_string));
            current = node.parent;
        }
        text
    }

    /// Path of the connector jar for a JDBC driver inside a maven repository.
    ///
    /// The first module declaring the driver's artifact with a resolvable
    /// version wins.
    pub fn resolve_jar_path(&self, driver_class: &str, repository: &Path) -> Option<PathBuf> {
        let (_, group, artifact) = DRIVER_ARTIFACTS
            .iter()
            .find(|(driver, _, _)| *driver == driver_class)?;
        self.nodes.iter().find_map(|node| {
            let dependency = node
                .pom
                .dependencies
                .iter()
                .find(|d| d.group_id == *group && d.artifact_id == *artifact)?;
            let version = self.filter_placeholders(node.id, dependency.version.as_deref()?);
            if version.is_empty() || has_placeholder(&version) {
                return None;
            }
            let mut path = repository.to_path_buf();
            path.extend(group.split('.'));
            path.push(artifact);
            path.push(&version);
            path.push(format!("{}-{}.jar", artifact, version));
            Some(path)
        })
    }

    fn source_folders_matching(&self, suffixes: &[&str]) -> Vec<(ModuleId, Folder)> {
        self.nodes
            .iter()
            .filter_map(|node| Some((node.id, node.source_folder.as_ref()?)))
            .flat_map(|(id, src)| {
                self.tree
                    .all_folders(src)
                    .into_iter()
                    .filter(move |f| suffixes.iter().any(|s| f.path().ends_with(s)))
                    .filter(|f| extract_package_name(f.path()).is_some())
                    .map(move |f| (id, f))
            })
            .collect()
    }

    /// Source folders that look like they hold model classes.
    pub fn model_folders(&self) -> Vec<Folder> {
        self.source_folders_matching(&MODEL_SUFFIXES)
            .into_iter()
            .map(|(_, f)| f)
            .collect()
    }

    /// Source folders that look like they hold dao interfaces.
    pub fn dao_folders(&self) -> Vec<Folder> {
        self.source_folders_matching(&DAO_SUFFIXES)
            .into_iter()
            .map(|(_, f)| f)
            .collect()
    }

    /// The module whose source tree contains a folder.
    pub fn owner_of(&self, folder: &Folder) -> Option<&ModuleNode> {
        self.nodes.iter().find(|node| node.owns_source(folder))
    }

    /// The dao folder whose package shares most tokens with a model folder's.
    ///
    /// Dao folders of the model's own module are preferred; the rest of the
    /// project is searched only when that module has none.
    pub fn matching_dao_folder(&self, model_folder: &Folder) -> Option<Folder> {
        let package = extract_package_name(model_folder.path())?;
        let matcher = TokenMatcher::from_split(&package, '.');
        let tokenize = |f: &Folder| -> Vec<String> {
            extract_package_name(f.path())
                .map(|p| p.split('.').map(str::to_string).collect())
                .unwrap_or_default()
        };

        let all = self.source_folders_matching(&DAO_SUFFIXES);
        let owner = self.owner_of(model_folder).map(ModuleNode::id);
        let same_module: Vec<Folder> = all
            .iter()
            .filter(|(id, _)| Some(*id) == owner)
            .map(|(_, f)| f.clone())
            .collect();
        if !same_module.is_empty() {
            return matcher.best(same_module, tokenize);
        }
        matcher.best(all.into_iter().map(|(_, f)| f), tokenize)
    }

    /// The resource folder mapper XML for a model folder goes to: the model
    /// module's first resource folder, else the web module's first.
    pub fn matching_resource_folder(&self, model_folder: &Folder) -> Option<Folder> {
        self.owner_of(model_folder)
            .and_then(|node| node.resource_folders.first())
            .or_else(|| {
                self.web_module()
                    .and_then(|node| node.resource_folders.first())
            })
            .cloned()
    }
}
