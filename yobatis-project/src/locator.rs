//! Resolving spring location hints to files of the module tree.

use indexmap::IndexMap;
use tracing::debug;
use yobatis_core::{AntPattern, File, FileTree, Folder, concat_path};

use crate::module_tree::{ModuleId, ModuleTree};

const CLASSPATH: &str = "classpath:";
const CLASSPATH_ALL: &str = "classpath*:";

/// A matched file and the module it was found through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub file: File,
    pub module: ModuleId,
}

/// Where a hint points, once its prefix is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintKind<'h> {
    /// `classpath:X`: the current module's resource folders.
    Classpath(&'h str),
    /// `classpath*:X`: every module's resource folders.
    ClasspathAll(&'h str),
    /// Anything else.
    Path(&'h str),
}

impl<'h> HintKind<'h> {
    pub fn of(hint: &'h str) -> Self {
        if let Some(tail) = hint.strip_prefix(CLASSPATH_ALL) {
            HintKind::ClasspathAll(tail)
        } else if let Some(tail) = hint.strip_prefix(CLASSPATH) {
            HintKind::Classpath(tail)
        } else {
            HintKind::Path(hint)
        }
    }
}

/// Turns hints into files, using module resource folders and the web root.
pub struct ConfigFileLocator<'m, 't> {
    modules: &'m ModuleTree<'t>,
}

impl<'m, 't> ConfigFileLocator<'m, 't> {
    pub fn new(modules: &'m ModuleTree<'t>) -> Self {
        Self { modules }
    }

    pub fn modules(&self) -> &'m ModuleTree<'t> {
        self.modules
    }

    /// Resolve a hint found in the context of a module.
    ///
    /// The hint is run through the module's placeholder chain first. Plain
    /// paths are taken relative to the web module's web root.
    pub fn locate(&self, hint: &str, module: ModuleId) -> Vec<Located> {
        let hint = self.modules.filter_placeholders(module, hint.trim());
        if hint.is_empty() {
            return Vec::new();
        }
        match HintKind::of(&hint) {
            HintKind::Classpath(tail) => self.locate_in_resources(tail, Some(module)),
            HintKind::ClasspathAll(tail) => self.locate_in_resources(tail, None),
            HintKind::Path(path) => self.locate_in_webroot(path),
        }
    }

    /// Resolve a pattern under the web module's web root.
    pub fn locate_in_webroot(&self, pattern: &str) -> Vec<Located> {
        let Some(web) = self.modules.web_module() else {
            return Vec::new();
        };
        let Some(webroot) = web.webroot_folder() else {
            return Vec::new();
        };
        self.locate_in(webroot, web.id(), pattern)
    }

    /// Resolve a pattern under one folder, attributing matches to a module.
    pub fn locate_in(&self, folder: &Folder, module: ModuleId, pattern: &str) -> Vec<Located> {
        let mut found = IndexMap::new();
        self.match_files(folder, module, pattern, &mut found);
        into_located(found)
    }

    fn locate_in_resources(&self, pattern: &str, only: Option<ModuleId>) -> Vec<Located> {
        if pattern.trim().is_empty() {
            return Vec::new();
        }
        let mut found = IndexMap::new();
        let modules = self
            .modules
            .modules()
            .iter()
            .filter(|m| only.is_none_or(|id| m.id() == id));
        for module in modules {
            for folder in module.resource_folders() {
                self.match_files(folder, module.id(), pattern, &mut found);
            }
        }
        into_located(found)
    }

    fn match_files(
        &self,
        folder: &Folder,
        module: ModuleId,
        pattern: &str,
        found: &mut IndexMap<File, ModuleId>,
    ) {
        let full = concat_path(folder.path(), pattern.trim());
        let matcher = AntPattern::new(&full);
        for file in self.modules.tree().all_files(folder) {
            if file.path() == full || matcher.matches(file.path()) {
                debug!(pattern = %full, file = %file.path(), "matched location");
                found.entry(file).or_insert(module);
            }
        }
    }
}

fn into_located(found: IndexMap<File, ModuleId>) -> Vec<Located> {
    found
        .into_iter()
        .map(|(file, module)| Located { file, module })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;
    use yobatis_core::{Diagnostics, LocalTree};

    use super::*;

    fn write(dir: &TempDir, path: &str, content: &str) {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "pom.xml",
            "<project><artifactId>root</artifactId><packaging>pom</packaging>\
             <properties><env>dev</env></properties>\
             <modules><module>web</module><module>dao</module></modules></project>",
        );
        write(
            &dir,
            "web/pom.xml",
            "<project><artifactId>web</artifactId><packaging>war</packaging></project>",
        );
        write(&dir, "dao/pom.xml", "<project><artifactId>dao</artifactId></project>");
        write(&dir, "web/src/main/resources/spring/app.xml", "<beans/>");
        write(&dir, "web/src/main/resources/spring/dev/db.xml", "<beans/>");
        write(&dir, "web/src/main/webapp/WEB-INF/servlet.xml", "<beans/>");
        write(&dir, "dao/src/main/resources/spring/dao.xml", "<beans/>");
        dir
    }

    fn paths(located: &[Located]) -> Vec<&str> {
        located.iter().map(|l| l.file.path()).collect()
    }

    #[test]
    fn test_hint_kinds() {
        assert_eq!(HintKind::of("classpath:a.xml"), HintKind::Classpath("a.xml"));
        assert_eq!(HintKind::of("classpath*:a.xml"), HintKind::ClasspathAll("a.xml"));
        assert_eq!(HintKind::of("/WEB-INF/a.xml"), HintKind::Path("/WEB-INF/a.xml"));
    }

    #[test]
    fn test_locate() {
        let dir = project();
        let tree = LocalTree::open(dir.path()).unwrap();
        let modules = ModuleTree::build(&tree, &mut Diagnostics::new()).unwrap();
        let locator = ConfigFileLocator::new(&modules);
        let web = modules.web_module().unwrap().id();

        assert!(locator.locate("", web).is_empty());
        assert_eq!(
            paths(&locator.locate("classpath:spring/*.xml", web)),
            vec!["web/src/main/resources/spring/app.xml"],
            "classpath: stays in the module"
        );
        assert_eq!(
            paths(&locator.locate("classpath*:spring/**/*.xml", web)),
            vec![
                "web/src/main/resources/spring/app.xml",
                "web/src/main/resources/spring/dev/db.xml",
                "dao/src/main/resources/spring/dao.xml",
            ]
        );
        assert_eq!(
            paths(&locator.locate("/WEB-INF/servlet.xml", web)),
            vec!["web/src/main/webapp/WEB-INF/servlet.xml"]
        );
    }

    #[test]
    fn test_locate_substitutes_placeholders_first() {
        let dir = project();
        let tree = LocalTree::open(dir.path()).unwrap();
        let modules = ModuleTree::build(&tree, &mut Diagnostics::new()).unwrap();
        let locator = ConfigFileLocator::new(&modules);
        let web = modules.web_module().unwrap().id();

        let located = locator.locate("classpath:spring/${env}/db.xml", web);
        assert_eq!(paths(&located), vec!["web/src/main/resources/spring/dev/db.xml"]);
        assert_eq!(located[0].module, web);
    }
}
