//! Render phase - turns table groups into a configuration document.

use yobatis_project::{Error, Result};

use crate::{
    pipeline::{GenerationContext, Phase},
    render::{ContextModel, GeneratorConfigModel},
};

/// Phase that pairs every table group with its dao and resource folders and
/// renders the document this run would write on its own.
pub struct RenderPhase;

impl Phase for RenderPhase {
    fn name(&self) -> &'static str {
        "render"
    }

    fn description(&self) -> &'static str {
        "Render the generator configuration for this run"
    }

    fn run(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let GenerationContext {
            modules,
            connection,
            groups,
            class_path_entry,
            diagnostics,
            generated,
            ..
        } = ctx;
        let modules = modules.as_ref().ok_or_else(|| Error::phase_order("discover"))?;
        let connection = connection
            .clone()
            .ok_or_else(|| Error::phase_order("classify"))?;

        let contexts = groups
            .iter()
            .cloned()
            .map(|group| ContextModel::locate(group, modules, diagnostics))
            .collect();
        let model = GeneratorConfigModel {
            class_path_entry: class_path_entry.clone(),
            connection,
            contexts,
        };
        *generated = Some(model.render());
        Ok(())
    }
}
