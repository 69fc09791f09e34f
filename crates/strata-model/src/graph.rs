use std::collections::HashMap;

use crate::ids::{Arena, MemberId, TypeId};
use crate::member::{
    MemberDeclaration, MemberKind, MemberOrigin, MemberType, Signature, TypeKind, TypeOrigin,
};
use crate::modifiers::Modifiers;
use crate::names::to_binary_name;
use crate::record::{Call, FieldAccess};

/// Read access to the type hierarchy, shared by the builder and the frozen
/// model so dispatch can be resolved against either.
pub trait TypeGraph {
    fn super_class(&self, ty: TypeId) -> Option<TypeId>;
    fn interfaces(&self, ty: TypeId) -> &[TypeId];
    fn direct_subtypes(&self, ty: TypeId) -> &[TypeId];
    fn is_interface(&self, ty: TypeId) -> bool;

    /// The member of `ty` (itself, not inherited) with this kind, name and
    /// descriptor. Synthesized members are only returned when
    /// `include_synthesized` is set.
    fn declared_member(
        &self,
        ty: TypeId,
        kind: MemberKind,
        name: &str,
        descriptor: &str,
        include_synthesized: bool,
    ) -> Option<MemberId>;

    /// Super class first, then interfaces in declaration order.
    fn direct_supertypes(&self, ty: TypeId) -> Vec<TypeId> {
        let mut out: Vec<TypeId> = self.super_class(ty).into_iter().collect();
        out.extend_from_slice(self.interfaces(ty));
        out
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TypeData {
    pub(crate) name: String,
    pub(crate) modifiers: Modifiers,
    pub(crate) kind: TypeKind,
    pub(crate) origin: TypeOrigin,
    pub(crate) super_name: Option<String>,
    pub(crate) interface_names: Vec<String>,
    pub(crate) source_file: Option<String>,
    pub(crate) super_class: Option<TypeId>,
    pub(crate) interfaces: Vec<TypeId>,
    pub(crate) subtypes: Vec<TypeId>,
    pub(crate) members: Vec<MemberId>,
    pub(crate) linked: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct MemberData {
    pub(crate) owner: TypeId,
    pub(crate) kind: MemberKind,
    pub(crate) name: String,
    pub(crate) descriptor: String,
    pub(crate) member_type: MemberType,
    pub(crate) modifiers: Modifiers,
    pub(crate) origin: MemberOrigin,
    pub(crate) declaration: Option<MemberDeclaration>,
    pub(crate) field_accesses: Vec<FieldAccess>,
    pub(crate) method_calls: Vec<Call>,
    pub(crate) constructor_calls: Vec<Call>,
}

impl Signature for MemberData {
    fn name(&self) -> &str {
        &self.name
    }

    fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

/// Arena storage for types and members plus the by-name index.
#[derive(Debug, Clone, Default)]
pub(crate) struct Graph {
    pub(crate) types: Arena<TypeData>,
    pub(crate) members: Arena<MemberData>,
    pub(crate) by_name: HashMap<String, TypeId>,
}

impl Graph {
    pub(crate) fn lookup(&self, name: &str) -> Option<TypeId> {
        match self.by_name.get(name) {
            Some(id) => Some(*id),
            None if name.contains('/') => self.by_name.get(&to_binary_name(name)).copied(),
            None => None,
        }
    }
}

impl TypeGraph for Graph {
    fn super_class(&self, ty: TypeId) -> Option<TypeId> {
        self.types[ty].super_class
    }

    fn interfaces(&self, ty: TypeId) -> &[TypeId] {
        &self.types[ty].interfaces
    }

    fn direct_subtypes(&self, ty: TypeId) -> &[TypeId] {
        &self.types[ty].subtypes
    }

    fn is_interface(&self, ty: TypeId) -> bool {
        self.types[ty].kind.is_interface()
    }

    fn declared_member(
        &self,
        ty: TypeId,
        kind: MemberKind,
        name: &str,
        descriptor: &str,
        include_synthesized: bool,
    ) -> Option<MemberId> {
        self.types[ty].members.iter().copied().find(|id| {
            let member = &self.members[*id];
            member.kind == kind
                && member.same_signature(&(name, descriptor))
                && (include_synthesized || member.origin != MemberOrigin::Synthesized)
        })
    }
}

/// Implements [`TypeGraph`] for a type holding a `graph: Graph` field.
macro_rules! delegate_type_graph {
    ($ty:ty) => {
        impl $crate::graph::TypeGraph for $ty {
            fn super_class(&self, ty: $crate::TypeId) -> Option<$crate::TypeId> {
                self.graph.super_class(ty)
            }

            fn interfaces(&self, ty: $crate::TypeId) -> &[$crate::TypeId] {
                self.graph.interfaces(ty)
            }

            fn direct_subtypes(&self, ty: $crate::TypeId) -> &[$crate::TypeId] {
                self.graph.direct_subtypes(ty)
            }

            fn is_interface(&self, ty: $crate::TypeId) -> bool {
                self.graph.is_interface(ty)
            }

            fn declared_member(
                &self,
                ty: $crate::TypeId,
                kind: $crate::MemberKind,
                name: &str,
                descriptor: &str,
                include_synthesized: bool,
            ) -> Option<$crate::MemberId> {
                self.graph
                    .declared_member(ty, kind, name, descriptor, include_synthesized)
            }
        }
    };
}

pub(crate) use delegate_type_graph;
