//! Process-lifetime memoization of class-file imports.
//!
//! [`ImportCache`] maps a normalized [`LocationSet`] to the frozen
//! [`ClassModel`] imported from it. Each key is imported at most once, however
//! many threads ask for it at the same time: the first caller runs the import,
//! the others block on that key until the model is published. Callers asking
//! for other keys are never blocked.
//!
//! Failed imports are not cached; the next request for the key retries. There
//! is no eviction. Dropping the cache (or building a new one) is the way to see
//! changed class files.

#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use thiserror::Error;

use strata_classpath::LocationSet;
use strata_importer::{ClassFileImporter, ImportError};
use strata_model::ClassModel;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("failed to normalize locations: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Runs the full import of a location set.
pub trait ModelImporter: Send + Sync {
    fn import(&self, locations: &LocationSet) -> std::result::Result<ClassModel, ImportError>;
}

impl ModelImporter for ClassFileImporter {
    fn import(&self, locations: &LocationSet) -> std::result::Result<ClassModel, ImportError> {
        self.import_locations(locations)
    }
}

type Slot = Arc<OnceCell<Arc<ClassModel>>>;

pub struct ImportCache<I = ClassFileImporter> {
    importer: I,
    models: DashMap<LocationSet, Slot>,
}

impl Default for ImportCache<ClassFileImporter> {
    fn default() -> Self {
        Self::new(ClassFileImporter::default())
    }
}

impl<I: ModelImporter> ImportCache<I> {
    pub fn new(importer: I) -> Self {
        Self {
            importer,
            models: DashMap::new(),
        }
    }

    pub fn importer(&self) -> &I {
        &self.importer
    }

    /// The model for `locations`, importing it on first request.
    pub fn get_model_for(&self, locations: &LocationSet) -> Result<Arc<ClassModel>> {
        // Clone the slot out so no map shard stays locked during the import.
        let slot: Slot = self
            .models
            .entry(locations.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .value()
            .clone();

        if let Some(model) = slot.get() {
            tracing::trace!(target: "strata.cache", locations = locations.len(), "cache hit");
            return Ok(model.clone());
        }

        let model = slot.get_or_try_init(|| {
            tracing::debug!(
                target: "strata.cache",
                locations = locations.len(),
                "importing location set"
            );
            match self.importer.import(locations) {
                Ok(model) => Ok(Arc::new(model)),
                Err(err) => {
                    tracing::warn!(
                        target: "strata.cache",
                        locations = locations.len(),
                        error = %err,
                        "import failed; not caching"
                    );
                    Err(err)
                }
            }
        })?;
        Ok(model.clone())
    }

    /// Normalizes `paths` into a [`LocationSet`] and returns its model.
    pub fn get_model_for_paths<P, T>(&self, paths: P) -> Result<Arc<ClassModel>>
    where
        P: IntoIterator<Item = T>,
        T: Into<PathBuf>,
    {
        let locations = LocationSet::from_paths(paths)?;
        self.get_model_for(&locations)
    }

    /// Whether a model for `locations` has been published.
    pub fn contains(&self, locations: &LocationSet) -> bool {
        self.models
            .get(locations)
            .is_some_and(|slot| slot.value().get().is_some())
    }

    /// Number of published models.
    pub fn len(&self) -> usize {
        self.models
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<I> std::fmt::Debug for ImportCache<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportCache")
            .field("keys", &self.models.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Empty(AtomicUsize);

    impl ModelImporter for Empty {
        fn import(&self, _: &LocationSet) -> std::result::Result<ClassModel, ImportError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(strata_model::ClassModelBuilder::new().freeze())
        }
    }

    #[test]
    fn equal_sets_share_one_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.jar");
        let b = tmp.path().join("b.jar");
        let cache = ImportCache::new(Empty(AtomicUsize::new(0)));

        let first = cache.get_model_for_paths([a.clone(), b.clone()]).unwrap();
        let second = cache.get_model_for_paths([b, a.clone(), a]).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.importer().0.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }
}
