//! Types that are referenced by, but not part of, the analyzed locations.

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use strata_classfile::ClassFile;
use strata_classpath::{ClassFileSource, Location};
use strata_model::names::to_internal_name;
use strata_model::{MemberDecl, MemberOrigin, TypeDecl, TypeOrigin};

use crate::binary::declarations;

/// Declarations of a type found outside the analyzed locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyType {
    pub decl: TypeDecl,
    pub members: Vec<MemberDecl>,
}

/// Source of declarations for types missing from the analyzed locations.
///
/// Implementations are shared between concurrent imports.
pub trait DependencyResolver: Send + Sync {
    /// Looks up a type by binary name (`a.b.C`).
    fn find_type(&self, binary_name: &str) -> Option<DependencyType>;
}

/// Knows no types; every missing type falls back to the import policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDependencies;

impl DependencyResolver for NoDependencies {
    fn find_type(&self, _binary_name: &str) -> Option<DependencyType> {
        None
    }
}

#[derive(Debug)]
struct IndexedLocation {
    location: Location,
    /// Internal name -> class file, built on first lookup.
    classes: OnceCell<HashMap<String, ClassFileSource>>,
}

/// Resolves types against an ordered list of class directories and jars.
///
/// Each location is indexed lazily, the first time a lookup reaches it; earlier
/// locations shadow later ones. Lookups, misses included, are memoized.
#[derive(Debug)]
pub struct ClasspathDependencies {
    locations: Vec<IndexedLocation>,
    resolved: Mutex<HashMap<String, Option<DependencyType>>>,
}

impl ClasspathDependencies {
    pub fn new<I>(locations: I) -> Self
    where
        I: IntoIterator<Item = Location>,
    {
        Self {
            locations: locations
                .into_iter()
                .map(|location| IndexedLocation {
                    location,
                    classes: OnceCell::new(),
                })
                .collect(),
            resolved: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    fn lookup(&self, binary_name: &str) -> Option<DependencyType> {
        let internal = to_internal_name(binary_name);
        for indexed in &self.locations {
            let Some(source) = indexed.classes().get(&internal) else {
                continue;
            };
            match decode(source) {
                Ok(ty) if ty.decl.name == binary_name => return Some(ty),
                Ok(ty) => {
                    tracing::warn!(
                        target: "strata.import",
                        location = %source.location.path().display(),
                        entry = %source.entry,
                        expected = %binary_name,
                        declared = %ty.decl.name,
                        "skipping dependency class declaring another name"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        target: "strata.import",
                        location = %source.location.path().display(),
                        entry = %source.entry,
                        error = %err,
                        "skipping malformed dependency class"
                    );
                }
            }
        }
        None
    }
}

impl DependencyResolver for ClasspathDependencies {
    fn find_type(&self, binary_name: &str) -> Option<DependencyType> {
        if let Some(hit) = self.resolved.lock().get(binary_name) {
            return hit.clone();
        }
        // Decoding happens outside the lock; a racing lookup of the same name
        // computes the same value.
        let found = self.lookup(binary_name);
        self.resolved
            .lock()
            .entry(binary_name.to_string())
            .or_insert(found)
            .clone()
    }
}

impl IndexedLocation {
    fn classes(&self) -> &HashMap<String, ClassFileSource> {
        self.classes.get_or_init(|| match self.location.class_files() {
            Ok(sources) => {
                let mut classes = HashMap::with_capacity(sources.len());
                for source in sources {
                    let Some(name) = class_name(&source) else {
                        continue;
                    };
                    classes.entry(name).or_insert(source);
                }
                tracing::debug!(
                    target: "strata.import",
                    location = %self.location.path().display(),
                    classes = classes.len(),
                    "indexed dependency location"
                );
                classes
            }
            Err(err) => {
                tracing::warn!(
                    target: "strata.import",
                    location = %self.location.path().display(),
                    error = %err,
                    "failed to read dependency location"
                );
                HashMap::new()
            }
        })
    }
}

fn class_name(source: &ClassFileSource) -> Option<String> {
    if let Some(hint) = source.internal_name_hint() {
        return Some(hint.to_string());
    }
    match ClassFile::parse(&source.bytes) {
        Ok(class_file) => Some(class_file.this_class),
        Err(err) => {
            tracing::warn!(
                target: "strata.import",
                entry = %source.entry,
                error = %err,
                "skipping malformed dependency class"
            );
            None
        }
    }
}

fn decode(source: &ClassFileSource) -> strata_classfile::Result<DependencyType> {
    let class_file = ClassFile::parse(&source.bytes)?;
    let (decl, members) =
        declarations(&class_file, TypeOrigin::Dependency, MemberOrigin::Dependency)?;
    Ok(DependencyType { decl, members })
}
