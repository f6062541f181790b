//! Assigning tables to model packages by shared name tokens.

use tracing::debug;
use yobatis_core::{Folder, TokenMatcher, extract_package_name, highest_scoring};
use yobatis_project::{Error, Result};

use crate::table::Table;

/// Tables assigned to one model folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableGroup {
    pub model_folder: Folder,
    /// Java package of the model folder.
    pub package: String,
    pub tables: Vec<Table>,
}

struct Candidate {
    folder: Folder,
    package: String,
    tokens: TokenMatcher,
}

/// Picks, for every table, the model package whose name shares the most
/// tokens with the table name.
///
/// Table names are split on `_` and packages on `.`, case-insensitively.
/// Candidates are compared in the order given and a later candidate only
/// wins with a strictly greater score, so ties go to the first declared
/// candidate. A table sharing nothing with any package lands in the first.
pub struct TableClassifier {
    candidates: Vec<Candidate>,
}

impl TableClassifier {
    /// Fails when there are no candidates, or none lies inside a java
    /// source root and so has no package name.
    pub fn new(candidates: Vec<Folder>) -> Result<Self> {
        if candidates.is_empty() {
            return Err(Error::unsupported_project(
                "no model folder found: expected a package ending in model, domain or entity under src/main/java",
            ));
        }
        let candidates: Vec<Candidate> = candidates
            .into_iter()
            .filter_map(|folder| {
                let package = extract_package_name(folder.path())?;
                let tokens = TokenMatcher::from_split(&package, '.');
                Some(Candidate {
                    folder,
                    package,
                    tokens,
                })
            })
            .collect();
        if candidates.is_empty() {
            return Err(Error::unsupported_project(
                "none of the model folders has a package name",
            ));
        }
        Ok(Self { candidates })
    }

    /// Group tables by their best candidate. Groups come back in candidate
    /// order; candidates that receive no table are left out.
    pub fn classify(&self, tables: Vec<Table>) -> Vec<TableGroup> {
        let mut assigned: Vec<Vec<Table>> = vec![Vec::new(); self.candidates.len()];
        for table in tables {
            let index = self.best_candidate(&table.name);
            debug!(
                table = %table.name,
                package = %self.candidates[index].package,
                "classified table"
            );
            assigned[index].push(table);
        }

        self.candidates
            .iter()
            .zip(assigned)
            .filter(|(_, tables)| !tables.is_empty())
            .map(|(candidate, tables)| TableGroup {
                model_folder: candidate.folder.clone(),
                package: candidate.package.clone(),
                tables,
            })
            .collect()
    }

    fn best_candidate(&self, table_name: &str) -> usize {
        highest_scoring(self.candidates.iter().enumerate(), |(_, candidate)| {
            candidate.tokens.score(table_name.split('_'))
        })
        .map_or(0, |(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use yobatis_core::{FileTree, LocalTree};

    use super::*;

    fn folders(dir: &TempDir, paths: &[&str]) -> Vec<Folder> {
        let tree = LocalTree::open(dir.path()).unwrap();
        paths
            .iter()
            .map(|p| tree.create_folder(p).unwrap())
            .collect()
    }

    fn names(group: &TableGroup) -> Vec<&str> {
        group.tables.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_tables_follow_shared_tokens() {
        let dir = TempDir::new().unwrap();
        let candidates = folders(
            &dir,
            &["app/src/main/java/sys/admin", "app/src/main/java/yobatis/model"],
        );
        let classifier = TableClassifier::new(candidates).unwrap();

        let groups =
            classifier.classify(vec![Table::new("yobatis_user"), Table::new("sys_admin")]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].package, "sys.admin");
        assert_eq!(names(&groups[0]), vec!["sys_admin"]);
        assert_eq!(groups[1].package, "yobatis.model");
        assert_eq!(names(&groups[1]), vec!["yobatis_user"]);
    }

    #[test]
    fn test_ties_go_to_first_candidate() {
        let dir = TempDir::new().unwrap();
        let candidates = folders(
            &dir,
            &[
                "app/src/main/java/org/shop/model",
                "app/src/main/java/org/blog/model",
            ],
        );
        let classifier = TableClassifier::new(candidates).unwrap();

        let groups = classifier.classify(vec![
            Table::new("ORDER_ITEM"),
            Table::new("blog_post"),
            Table::new("audit"),
        ]);
        assert_eq!(groups[0].package, "org.shop.model");
        assert_eq!(
            names(&groups[0]),
            vec!["ORDER_ITEM", "audit"],
            "tables matching nothing go to the first candidate"
        );
        assert_eq!(names(&groups[1]), vec!["blog_post"]);
    }

    #[test]
    fn test_case_insensitive_tokens() {
        let dir = TempDir::new().unwrap();
        let candidates = folders(
            &dir,
            &["a/src/main/java/x/model", "a/src/main/java/user/model"],
        );
        let classifier = TableClassifier::new(candidates).unwrap();
        let groups = classifier.classify(vec![Table::new("USER_ROLE")]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].package, "user.model");
    }

    #[test]
    fn test_rejects_missing_candidates() {
        let err = TableClassifier::new(Vec::new()).err().unwrap();
        assert!(matches!(*err, Error::UnsupportedProject { .. }));

        let dir = TempDir::new().unwrap();
        let outside_sources = folders(&dir, &["docs/model"]);
        let err = TableClassifier::new(outside_sources).err().unwrap();
        assert!(matches!(*err, Error::UnsupportedProject { .. }));
    }
}
