use strata_classfile::{parse_field_descriptor, parse_method_descriptor, FieldType, MethodDescriptor};

use crate::modifiers::Modifiers;
use crate::names::to_binary_name;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl TypeKind {
    pub fn from_modifiers(modifiers: Modifiers) -> Self {
        if modifiers.contains(Modifiers::ANNOTATION) {
            TypeKind::Annotation
        } else if modifiers.contains(Modifiers::INTERFACE) {
            TypeKind::Interface
        } else if modifiers.contains(Modifiers::ENUM) {
            TypeKind::Enum
        } else {
            TypeKind::Class
        }
    }

    /// Annotations are interfaces too.
    pub fn is_interface(self) -> bool {
        matches!(self, TypeKind::Interface | TypeKind::Annotation)
    }
}

/// Where a type's data came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeOrigin {
    /// Parsed from a class file of the analyzed locations.
    Imported,
    /// Stub backed by a class file of the dependency classpath; its supertypes
    /// and member declarations are known.
    Dependency,
    /// Stub fabricated from a name alone.
    Synthesized,
}

impl TypeOrigin {
    pub fn is_stub(self) -> bool {
        !matches!(self, TypeOrigin::Imported)
    }

    /// Whether the full member list of the type is known.
    pub fn declarations_known(self) -> bool {
        !matches!(self, TypeOrigin::Synthesized)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemberKind {
    Field,
    Method,
    Constructor,
}

impl MemberKind {
    /// `<init>` is a constructor; everything else in the methods table,
    /// `<clinit>` included, is a method.
    pub fn for_method_name(name: &str) -> Self {
        if name == "<init>" {
            MemberKind::Constructor
        } else {
            MemberKind::Method
        }
    }

    pub fn is_code_unit(self) -> bool {
        !matches!(self, MemberKind::Field)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberOrigin {
    Imported,
    Dependency,
    Synthesized,
}

/// Anything identified by a member name plus raw JVM descriptor.
pub trait Signature {
    fn name(&self) -> &str;
    fn descriptor(&self) -> &str;

    fn same_signature<S: Signature + ?Sized>(&self, other: &S) -> bool {
        self.name() == other.name() && self.descriptor() == other.descriptor()
    }
}

/// Decoded form of a member's descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberType {
    Field(FieldType),
    Method(MethodDescriptor),
}

impl MemberType {
    pub fn parse(kind: MemberKind, descriptor: &str) -> strata_classfile::Result<Self> {
        Ok(match kind {
            MemberKind::Field => MemberType::Field(parse_field_descriptor(descriptor)?),
            MemberKind::Method | MemberKind::Constructor => {
                MemberType::Method(parse_method_descriptor(descriptor)?)
            }
        })
    }

    /// Binary names of every class type mentioned by the descriptor.
    pub fn referenced_classes(&self) -> Vec<String> {
        match self {
            MemberType::Field(ty) => ty.class_name().into_iter().collect(),
            MemberType::Method(method) => {
                let mut out: Vec<String> = method
                    .params
                    .iter()
                    .filter_map(FieldType::class_name)
                    .collect();
                if let strata_classfile::ReturnType::Type(ty) = &method.return_type {
                    out.extend(ty.class_name());
                }
                out
            }
        }
    }
}

/// Source-level declaration details; only available for members read from a
/// class file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberDeclaration {
    /// Generic signature from the `Signature` attribute.
    pub generic_signature: Option<String>,
    /// Binary names from the `Exceptions` attribute.
    pub throws: Vec<String>,
}

/// Input for [`crate::ClassModelBuilder::add_type`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub modifiers: Modifiers,
    pub origin: TypeOrigin,
    pub super_name: Option<String>,
    pub interface_names: Vec<String>,
    pub source_file: Option<String>,
}

impl TypeDecl {
    pub fn new(name: &str, modifiers: Modifiers, origin: TypeOrigin) -> Self {
        Self {
            name: to_binary_name(name),
            modifiers,
            origin,
            super_name: None,
            interface_names: Vec::new(),
            source_file: None,
        }
    }

    /// A public class stub carrying nothing but its name.
    pub fn synthesized(name: &str) -> Self {
        Self::new(name, Modifiers::PUBLIC, TypeOrigin::Synthesized)
    }

    pub fn with_super(mut self, name: &str) -> Self {
        self.super_name = Some(to_binary_name(name));
        self
    }

    pub fn with_interface(mut self, name: &str) -> Self {
        self.interface_names.push(to_binary_name(name));
        self
    }

    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = Some(source_file.into());
        self
    }
}

/// Input for [`crate::ClassModelBuilder::add_member`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberDecl {
    pub kind: MemberKind,
    pub name: String,
    pub descriptor: String,
    pub member_type: MemberType,
    pub modifiers: Modifiers,
    pub origin: MemberOrigin,
    pub declaration: Option<MemberDeclaration>,
}

impl MemberDecl {
    /// A member read from a class file (analyzed or dependency).
    pub fn declared(
        kind: MemberKind,
        name: &str,
        descriptor: &str,
        modifiers: Modifiers,
        origin: MemberOrigin,
        declaration: MemberDeclaration,
    ) -> strata_classfile::Result<Self> {
        Ok(Self {
            kind,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            member_type: MemberType::parse(kind, descriptor)?,
            modifiers,
            origin,
            declaration: Some(declaration),
        })
    }

    /// A member fabricated from a reference alone.
    ///
    /// Methods are `public abstract` (the only thing an unresolvable dispatch
    /// target can be is an interface method); fields and constructors are
    /// `public`.
    pub fn synthesized(
        kind: MemberKind,
        name: &str,
        descriptor: &str,
    ) -> strata_classfile::Result<Self> {
        let modifiers = match kind {
            MemberKind::Method => Modifiers::PUBLIC | Modifiers::ABSTRACT,
            MemberKind::Field | MemberKind::Constructor => Modifiers::PUBLIC,
        };
        Ok(Self {
            kind,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            member_type: MemberType::parse(kind, descriptor)?,
            modifiers,
            origin: MemberOrigin::Synthesized,
            declaration: None,
        })
    }
}

impl Signature for MemberDecl {
    fn name(&self) -> &str {
        &self.name
    }

    fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

/// A bare `(name, descriptor)` pair, as used for lookups.
impl Signature for (&str, &str) {
    fn name(&self) -> &str {
        self.0
    }

    fn descriptor(&self) -> &str {
        self.1
    }
}
