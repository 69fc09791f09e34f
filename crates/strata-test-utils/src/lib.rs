//! Utilities shared by Strata tests.
//!
//! [`ClassFileBuilder`] produces real class-file bytes without a JDK, and the
//! fixture helpers lay those bytes out as class directories or jars.

mod class_builder;

#[cfg(feature = "fixture-fs")]
mod fixture_fs;

pub use class_builder::{ClassFileBuilder, MethodBuilder};

#[cfg(feature = "fixture-fs")]
pub use fixture_fs::*;
