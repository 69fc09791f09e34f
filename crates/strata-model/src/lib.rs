//! In-memory model of an imported batch of JVM classes.
//!
//! Types and members live in arenas and refer to each other through
//! [`TypeId`]/[`MemberId`] handles, so the cyclic class graph (supertypes,
//! subtypes, callers, targets) needs no shared ownership. A model is built
//! with [`ClassModelBuilder`] and frozen into a read-only [`ClassModel`].

#![forbid(unsafe_code)]

mod builder;
mod diagnostic;
mod error;
mod graph;
pub mod hierarchy;
mod ids;
mod member;
mod model;
mod modifiers;
pub mod names;
mod record;

pub use crate::builder::{ClassModelBuilder, LinkError};
pub use crate::diagnostic::Diagnostic;
pub use crate::error::ModelError;
pub use crate::graph::TypeGraph;
pub use crate::hierarchy::Dispatch;
pub use crate::ids::{MemberId, TypeId};
pub use crate::member::{
    MemberDecl, MemberDeclaration, MemberKind, MemberOrigin, MemberType, Signature, TypeDecl,
    TypeKind, TypeOrigin,
};
pub use crate::model::{ClassModel, JavaCall, JavaClass, JavaFieldAccess, JavaMember};
pub use crate::modifiers::Modifiers;
pub use crate::record::{
    AccessType, Call, CodeUnitId, FieldAccess, RawAccessRecord, TargetDescriptor, TargetKind,
};
