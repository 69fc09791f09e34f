//! Turning class files into type declarations and raw access records.

use rayon::prelude::*;

use strata_classfile::{AccessInstruction, ClassFile};
use strata_classpath::{ClassFileSource, LocationSet};
use strata_model::names::to_binary_name;
use strata_model::{
    AccessType, CodeUnitId, Diagnostic, MemberDecl, MemberDeclaration, MemberKind, MemberOrigin,
    Modifiers, RawAccessRecord, TargetDescriptor, TargetKind, TypeDecl, TypeOrigin,
};

use crate::context::ImportContext;

/// One decoded class file.
#[derive(Debug, Clone)]
pub struct ImportedClass {
    pub decl: TypeDecl,
    pub members: Vec<MemberDecl>,
    pub accesses: Vec<RawAccessRecord>,
}

impl ImportedClass {
    /// Decodes a class of the analyzed locations, accesses included.
    pub fn from_class_file(class_file: &ClassFile) -> strata_classfile::Result<Self> {
        let (decl, members) =
            declarations(class_file, TypeOrigin::Imported, MemberOrigin::Imported)?;
        let accesses = raw_accesses(class_file, &decl.name);
        Ok(Self {
            decl,
            members,
            accesses,
        })
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }
}

/// Type and member declarations of a class file, with the given origins.
pub(crate) fn declarations(
    class_file: &ClassFile,
    type_origin: TypeOrigin,
    member_origin: MemberOrigin,
) -> strata_classfile::Result<(TypeDecl, Vec<MemberDecl>)> {
    let mut decl = TypeDecl::new(
        &class_file.this_class,
        Modifiers::from_bits(class_file.access_flags),
        type_origin,
    );
    if let Some(super_class) = &class_file.super_class {
        decl = decl.with_super(super_class);
    }
    for interface in &class_file.interfaces {
        decl = decl.with_interface(interface);
    }
    if let Some(source_file) = &class_file.source_file {
        decl = decl.with_source_file(source_file.clone());
    }

    let mut members = Vec::with_capacity(class_file.fields.len() + class_file.methods.len());
    for field in &class_file.fields {
        members.push(MemberDecl::declared(
            MemberKind::Field,
            &field.name,
            &field.descriptor,
            Modifiers::from_bits(field.access_flags),
            member_origin,
            MemberDeclaration {
                generic_signature: field.signature.clone(),
                throws: Vec::new(),
            },
        )?);
    }
    for method in &class_file.methods {
        members.push(MemberDecl::declared(
            MemberKind::for_method_name(&method.name),
            &method.name,
            &method.descriptor,
            Modifiers::from_bits(method.access_flags),
            member_origin,
            MemberDeclaration {
                generic_signature: method.signature.clone(),
                throws: method.exceptions.iter().map(|e| to_binary_name(e)).collect(),
            },
        )?);
    }
    Ok((decl, members))
}

fn raw_accesses(class_file: &ClassFile, owner: &str) -> Vec<RawAccessRecord> {
    let mut out = Vec::new();
    for method in &class_file.methods {
        if method.accesses.is_empty() {
            continue;
        }
        let caller = CodeUnitId::new(owner, method.name.as_str(), method.descriptor.as_str());
        for access in &method.accesses {
            if access.target.owner.starts_with('[') {
                // `int[].clone()` and friends: arrays have no declarations to resolve.
                tracing::debug!(
                    target: "strata.import",
                    caller = %owner,
                    target_owner = %access.target.owner,
                    name = %access.target.name,
                    "skipping reference to array type"
                );
                continue;
            }
            let kind = match access.instruction {
                instruction if instruction.is_field_access() => {
                    TargetKind::Field(if instruction.is_write() {
                        AccessType::Set
                    } else {
                        AccessType::Get
                    })
                }
                AccessInstruction::InvokeSpecial if access.target.name == "<init>" => {
                    TargetKind::Constructor
                }
                _ => TargetKind::Method,
            };
            out.push(RawAccessRecord {
                caller: caller.clone(),
                target: TargetDescriptor {
                    owner: to_binary_name(&access.target.owner),
                    name: access.target.name.clone(),
                    descriptor: access.target.descriptor.clone(),
                    kind,
                },
                line: access.line,
            });
        }
    }
    out
}

/// Reads and decodes every class file of a location set into an
/// [`ImportContext`].
///
/// Unreadable locations and malformed class files become diagnostics; one bad
/// file never aborts the batch. Classes are inserted in name order, and a class
/// present in several locations is taken from the first one in set order.
#[derive(Debug, Clone, Copy)]
pub struct BinaryImporter {
    parallel: bool,
}

struct Parsed {
    location_index: usize,
    location: String,
    entry: String,
    result: strata_classfile::Result<ImportedClass>,
}

impl BinaryImporter {
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    pub fn import(&self, locations: &LocationSet, context: &mut ImportContext) {
        let mut sources: Vec<(usize, ClassFileSource)> = Vec::new();
        for (index, location) in locations.iter().enumerate() {
            match location.class_files() {
                Ok(files) => sources.extend(files.into_iter().map(|file| (index, file))),
                Err(err) => {
                    tracing::warn!(
                        target: "strata.import",
                        location = %location.path().display(),
                        error = %err,
                        "failed to read location"
                    );
                    context.push_diagnostic(Diagnostic::UnreadableLocation {
                        location: location.path().display().to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }

        let parse = |(location_index, source): &(usize, ClassFileSource)| Parsed {
            location_index: *location_index,
            location: source.location.path().display().to_string(),
            entry: source.entry.clone(),
            result: ClassFile::parse(&source.bytes)
                .and_then(|class_file| ImportedClass::from_class_file(&class_file)),
        };
        let parsed: Vec<Parsed> = if self.parallel {
            sources.par_iter().map(parse).collect()
        } else {
            sources.iter().map(parse).collect()
        };

        let mut classes = Vec::with_capacity(parsed.len());
        for item in parsed {
            match item.result {
                Ok(class) => classes.push((item.location_index, item.location, class)),
                Err(err) => {
                    tracing::warn!(
                        target: "strata.import",
                        location = %item.location,
                        entry = %item.entry,
                        error = %err,
                        "skipping malformed class file"
                    );
                    context.push_diagnostic(Diagnostic::MalformedBinary {
                        location: item.location,
                        entry: item.entry,
                        message: err.to_string(),
                    });
                }
            }
        }

        classes.sort_by(|(a_index, _, a), (b_index, _, b)| {
            a.name().cmp(b.name()).then(a_index.cmp(b_index))
        });
        for (_, location, class) in classes {
            let name = class.decl.name.clone();
            if !context.add_class(class) {
                tracing::debug!(
                    target: "strata.import",
                    class = %name,
                    location = %location,
                    "ignoring duplicate class"
                );
                context.push_diagnostic(Diagnostic::DuplicateType {
                    type_name: name,
                    location,
                });
            }
        }
    }
}
