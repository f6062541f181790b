//! Checking a merged document before the generator runs on it.

use yobatis_core::{concat_path, package_to_path};
use yobatis_ir::{ConfigDocument, Context, ContextItem, tags};
use yobatis_project::{Error, Result};

/// Where one context's generated artifacts will be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorDirs {
    pub context: String,
    pub model_dir: String,
    /// The renamed `Example` classes, below the model dir.
    pub criteria_dir: String,
    pub dao_dir: String,
    pub xml_mapper_dir: String,
}

const GENERATORS: [&str; 3] = [
    tags::MODEL_GENERATOR,
    tags::SQL_MAP_GENERATOR,
    tags::CLIENT_GENERATOR,
];

/// Require every live context to carry exactly one of each generator
/// element, and report the directories they target.
pub fn analyze(document: &ConfigDocument) -> Result<Vec<GeneratorDirs>> {
    document.contexts().map(analyze_context).collect()
}

fn analyze_context(ctx: &Context) -> Result<GeneratorDirs> {
    let id = ctx.id().unwrap_or_default();
    for tag in GENERATORS {
        let count = ctx.count_live(tag);
        if count != 1 {
            return Err(Error::ambiguous_generator_element(id, tag, count));
        }
    }

    let target = |tag: &str| -> String {
        let element = ctx
            .live_items()
            .find(|item| item.tag() == tag)
            .map(ContextItem::element);
        let project = element.and_then(|e| e.attribute("targetProject")).unwrap_or_default();
        let package = element.and_then(|e| e.attribute("targetPackage")).unwrap_or_default();
        concat_path(project, &package_to_path(package))
    };

    let model_dir = target(tags::MODEL_GENERATOR);
    Ok(GeneratorDirs {
        context: id.to_string(),
        criteria_dir: concat_path(&model_dir, "criteria"),
        model_dir,
        dao_dir: target(tags::CLIENT_GENERATOR),
        xml_mapper_dir: target(tags::SQL_MAP_GENERATOR),
    })
}
