use std::fmt;

use crate::record::{CodeUnitId, TargetDescriptor};

/// A recoverable condition met while importing a batch. Each one explains a
/// relationship that is missing from, or weaker in, the finished model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A class file that could not be decoded; the file was skipped.
    MalformedBinary {
        location: String,
        entry: String,
        message: String,
    },
    /// A location that could not be read at all.
    UnreadableLocation { location: String, message: String },
    /// A reference whose target type is available nowhere; the record was
    /// dropped.
    MissingDependency {
        caller: CodeUnitId,
        target: TargetDescriptor,
    },
    /// A declared supertype that could not be linked.
    UnresolvedSupertype {
        type_name: String,
        supertype: String,
        reason: String,
    },
    /// A reference carrying a descriptor that does not parse; the record was
    /// dropped.
    InvalidDescriptor {
        caller: CodeUnitId,
        target: TargetDescriptor,
    },
    /// The same type was found in more than one location; the first one won.
    DuplicateType {
        type_name: String,
        location: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedBinary {
                location,
                entry,
                message,
            } => write!(f, "malformed class file {entry} in {location}: {message}"),
            Diagnostic::UnreadableLocation { location, message } => {
                write!(f, "cannot read location {location}: {message}")
            }
            Diagnostic::MissingDependency { caller, target } => write!(
                f,
                "{}.{}{} references {}.{}{} but {} is not available",
                caller.owner,
                caller.name,
                caller.descriptor,
                target.owner,
                target.name,
                target.descriptor,
                target.owner
            ),
            Diagnostic::UnresolvedSupertype {
                type_name,
                supertype,
                reason,
            } => write!(f, "cannot link {type_name} to supertype {supertype}: {reason}"),
            Diagnostic::InvalidDescriptor { caller, target } => write!(
                f,
                "{}.{}{} references {}.{} with invalid descriptor {:?}",
                caller.owner, caller.name, caller.descriptor, target.owner, target.name, target.descriptor
            ),
            Diagnostic::DuplicateType {
                type_name,
                location,
            } => write!(f, "duplicate type {type_name} in {location} ignored"),
        }
    }
}
