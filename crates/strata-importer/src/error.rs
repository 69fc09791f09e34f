use thiserror::Error;

use strata_model::{CodeUnitId, TargetDescriptor};

/// A fatal import failure. The batch is abandoned and nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("resolution invariant violated: {0}")]
    ResolutionInvariantViolation(#[from] InvariantViolation),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// An access record names a caller that no imported type declares.
    #[error("access from {}.{}{} has no matching code unit", .caller.owner, .caller.name, .caller.descriptor)]
    MissingCaller { caller: CodeUnitId },
    /// A constructor call targets a type whose declarations are known but
    /// that has no such constructor.
    #[error(
        "{}.{}{} calls constructor {}{} which its owner does not declare",
        .caller.owner, .caller.name, .caller.descriptor, .target.owner, .target.descriptor
    )]
    MissingConstructor {
        caller: CodeUnitId,
        target: TargetDescriptor,
    },
}
