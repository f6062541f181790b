//! Classify phase - lists the tables and groups them by model package.

use yobatis_project::Result;

use crate::{
    classifier::TableClassifier,
    pipeline::{GenerationContext, Phase},
    table::TableSource,
};

/// Phase that insists on complete connection settings, asks the table
/// source for the tables, and assigns each to a model folder.
///
/// The table source is never consulted when a connection field is missing
/// or still holds a placeholder.
pub struct ClassifyPhase {
    source: Box<dyn TableSource>,
}

impl ClassifyPhase {
    pub fn new(source: impl TableSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }
}

impl Phase for ClassifyPhase {
    fn name(&self) -> &'static str {
        "classify"
    }

    fn description(&self) -> &'static str {
        "Group tables by the model package they belong to"
    }

    fn run(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let connection = ctx.database()?.ensure_complete()?;
        let tables = self.source.list_tables(&connection)?;
        if tables.is_empty() {
            ctx.diagnostics
                .warning(self.name(), "the table source returned no tables");
        }

        let classifier = TableClassifier::new(ctx.modules()?.model_folders())?;
        ctx.groups = classifier.classify(tables);
        ctx.connection = Some(connection);
        Ok(())
    }
}
