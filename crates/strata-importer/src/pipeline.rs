use std::sync::Arc;
use std::time::Instant;

use strata_classpath::{Location, LocationSet};
use strata_config::ImportConfig;
use strata_model::ClassModel;

use crate::binary::BinaryImporter;
use crate::completion::CompletionProcess;
use crate::context::ImportContext;
use crate::dependencies::{ClasspathDependencies, DependencyResolver, NoDependencies};
use crate::error::ImportError;

/// Binary import followed by completion: location set in, frozen model out.
#[derive(Clone)]
pub struct ClassFileImporter {
    config: ImportConfig,
    dependencies: Arc<dyn DependencyResolver>,
}

impl std::fmt::Debug for ClassFileImporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassFileImporter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for ClassFileImporter {
    fn default() -> Self {
        Self::new(ImportConfig::default())
    }
}

impl ClassFileImporter {
    /// Uses `config.dependency_classpath`, in order, to resolve types the
    /// analyzed locations reference but do not contain.
    pub fn new(config: ImportConfig) -> Self {
        let dependencies: Arc<dyn DependencyResolver> = if config.dependency_classpath.is_empty() {
            Arc::new(NoDependencies)
        } else {
            Arc::new(ClasspathDependencies::new(
                config
                    .dependency_classpath
                    .iter()
                    .map(|path| Location::from_path(path.as_path())),
            ))
        };
        Self {
            config,
            dependencies,
        }
    }

    pub fn with_dependencies(config: ImportConfig, dependencies: Arc<dyn DependencyResolver>) -> Self {
        Self {
            config,
            dependencies,
        }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn import_locations(&self, locations: &LocationSet) -> Result<ClassModel, ImportError> {
        let started = Instant::now();

        let mut context = ImportContext::new();
        BinaryImporter::new(self.config.parallel).import(locations, &mut context);
        let records = context.records().len();

        let model = CompletionProcess::new(
            context,
            self.dependencies.as_ref(),
            self.config.missing_dependencies,
        )
        .link()
        .resolve_accesses()
        .map_err(|err| {
            tracing::error!(target: "strata.import", error = %err, "import failed");
            err
        })?;

        tracing::info!(
            target: "strata.import",
            locations = locations.len(),
            types = model.len(),
            records,
            diagnostics = model.diagnostics().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "imported locations"
        );
        Ok(model)
    }
}
