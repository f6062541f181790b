//! Discover phase - reads the project and resolves the datasource.

use tracing::debug;
use yobatis_project::{
    ConfigFileLocator, DatasourceResolver, DeploymentDescriptor, Error, ModuleTree, Result,
};

use crate::pipeline::{GenerationContext, Phase};

/// Phase that builds the module tree and follows the web module's spring
/// configuration to the datasource.
///
/// The connection fields are stored as found, complete or not; it is up to
/// the next phase to insist on them. The driver jar is looked up in the
/// local maven repository when the driver class is known.
pub struct DiscoverPhase;

impl Phase for DiscoverPhase {
    fn name(&self) -> &'static str {
        "discover"
    }

    fn description(&self) -> &'static str {
        "Read the module tree and resolve the datasource"
    }

    fn run(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let modules = ModuleTree::build(ctx.tree, &mut ctx.diagnostics)?;
        let descriptor = DeploymentDescriptor::load(&modules)?;
        let web = modules
            .web_module()
            .ok_or_else(|| Error::unsupported_project("no war module found"))?
            .id();

        let database = {
            let locator = ConfigFileLocator::new(&modules);
            DatasourceResolver::new(&locator).resolve(descriptor.hints(), web, &mut ctx.diagnostics)
        };

        let repository = ctx.settings.project.maven_repository();
        ctx.class_path_entry = match database.driver_class_name.as_deref() {
            Some(driver) => match modules.resolve_jar_path(driver, &repository) {
                Some(jar) => Some(jar.display().to_string()),
                None => {
                    ctx.diagnostics.warning(
                        self.name(),
                        format!(
                            "no connector jar found for driver '{}', classPathEntry left out",
                            driver
                        ),
                    );
                    None
                }
            },
            None => None,
        };
        debug!(
            modules = modules.modules().len(),
            jar = ?ctx.class_path_entry,
            "discovered project"
        );

        ctx.modules = Some(modules);
        ctx.database = Some(database);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use yobatis_core::LocalTree;
    use yobatis_project::Settings;

    use super::*;

    #[test]
    fn test_discover_requires_root_pom() {
        let dir = TempDir::new().unwrap();
        let tree = LocalTree::open(dir.path()).unwrap();
        let mut ctx = GenerationContext::new(&tree, Settings::default());

        let err = DiscoverPhase.run(&mut ctx).unwrap_err();
        assert!(matches!(*err, Error::UnsupportedProject { .. }));
        assert!(ctx.modules.is_none());
    }
}
