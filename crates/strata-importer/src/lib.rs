//! Class-file import for Strata.
//!
//! [`ClassFileImporter`] reads a [`strata_classpath::LocationSet`], decodes
//! every class file ([`BinaryImporter`]), links the type hierarchy and resolves
//! each field access, method call and constructor call to a member
//! ([`CompletionProcess`]). The result is a frozen [`strata_model::ClassModel`].
//!
//! Types referenced but not imported come from a [`DependencyResolver`], or
//! are synthesized as stubs depending on
//! [`strata_config::MissingDependencies`].

#![forbid(unsafe_code)]

mod binary;
mod completion;
mod context;
mod dependencies;
mod error;
mod pipeline;

pub use crate::binary::{BinaryImporter, ImportedClass};
pub use crate::completion::{CompletionProcess, Initial, Linked};
pub use crate::context::ImportContext;
pub use crate::dependencies::{
    ClasspathDependencies, DependencyResolver, DependencyType, NoDependencies,
};
pub use crate::error::{ImportError, InvariantViolation};
pub use crate::pipeline::ClassFileImporter;
