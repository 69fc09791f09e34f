mod dependencies;
mod failures;
mod resolution;

use std::path::Path;

use strata_classpath::LocationSet;
use strata_config::{ImportConfig, MissingDependencies};
use strata_importer::{ClassFileImporter, ImportError};
use strata_model::ClassModel;
use strata_test_utils::write_class_dir;

pub(crate) fn config(missing: MissingDependencies) -> ImportConfig {
    ImportConfig {
        missing_dependencies: missing,
        ..ImportConfig::default()
    }
}

/// Writes the classes into a fresh directory under `root` and imports it.
pub(crate) fn import_dir(
    root: &Path,
    classes: &[(&str, Vec<u8>)],
    config: ImportConfig,
) -> Result<ClassModel, ImportError> {
    let dir = root.join("classes");
    write_class_dir(&dir, classes).unwrap();
    let locations = LocationSet::from_paths([dir]).unwrap();
    ClassFileImporter::new(config).import_locations(&locations)
}

/// `(caller, target, line)` of every method call in the model, by name.
pub(crate) fn method_calls(model: &ClassModel) -> Vec<(String, String, Option<u32>)> {
    let mut out: Vec<_> = model
        .classes()
        .flat_map(|class| class.method_calls_from_self())
        .map(|call| (call.caller().full_name(), call.target().full_name(), call.line()))
        .collect();
    out.sort();
    out
}
