use crate::diagnostic::Diagnostic;
use crate::graph::{delegate_type_graph, Graph, MemberData, TypeData, TypeGraph};
use crate::hierarchy::is_subtype_of;
use crate::ids::{MemberId, TypeId};
use crate::member::{MemberDecl, MemberKind, MemberOrigin, TypeDecl, TypeKind, TypeOrigin};
use crate::model::ClassModel;
use crate::record::{Call, FieldAccess};

/// Why a supertype link was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkError {
    /// The link would make a type its own supertype.
    Cycle,
    /// The child already has a linked super class.
    SuperClassAlreadyLinked,
}

/// Mutable phase of a class model. Types and members can be added, linked and
/// given resolved accesses until [`ClassModelBuilder::freeze`] turns the
/// builder into an immutable [`ClassModel`].
#[derive(Debug, Default)]
pub struct ClassModelBuilder {
    graph: Graph,
    diagnostics: Vec<Diagnostic>,
}

delegate_type_graph!(ClassModelBuilder);

impl ClassModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type, or returns `None` when a type of that name already exists.
    pub fn add_type(&mut self, decl: TypeDecl) -> Option<TypeId> {
        if self.graph.by_name.contains_key(&decl.name) {
            return None;
        }
        let kind = TypeKind::from_modifiers(decl.modifiers);
        let name = decl.name.clone();
        let id = TypeId::from_raw(self.graph.types.alloc(TypeData {
            name: decl.name,
            modifiers: decl.modifiers,
            kind,
            origin: decl.origin,
            super_name: decl.super_name,
            interface_names: decl.interface_names,
            source_file: decl.source_file,
            super_class: None,
            interfaces: Vec::new(),
            subtypes: Vec::new(),
            members: Vec::new(),
            linked: false,
        }));
        self.graph.by_name.insert(name, id);
        Some(id)
    }

    /// Adds a member to `owner`. Adding a member whose kind, name and
    /// descriptor already exist on the owner returns the existing handle.
    pub fn add_member(&mut self, owner: TypeId, decl: MemberDecl) -> MemberId {
        if let Some(existing) =
            self.graph
                .declared_member(owner, decl.kind, &decl.name, &decl.descriptor, true)
        {
            return existing;
        }
        let id = MemberId::from_raw(self.graph.members.alloc(MemberData {
            owner,
            kind: decl.kind,
            name: decl.name,
            descriptor: decl.descriptor,
            member_type: decl.member_type,
            modifiers: decl.modifiers,
            origin: decl.origin,
            declaration: decl.declaration,
            field_accesses: Vec::new(),
            method_calls: Vec::new(),
            constructor_calls: Vec::new(),
        }));
        self.graph.types[owner].members.push(id);
        id
    }

    /// Looks a type up by binary (`a.b.C`) or internal (`a/b/C`) name.
    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.graph.lookup(name)
    }

    pub fn type_count(&self) -> usize {
        self.graph.types.len()
    }

    /// Handles of all types in insertion order.
    pub fn type_ids(&self) -> Vec<TypeId> {
        self.graph
            .types
            .iter()
            .map(|(raw, _)| TypeId::from_raw(raw))
            .collect()
    }

    pub fn type_name(&self, ty: TypeId) -> &str {
        &self.graph.types[ty].name
    }

    pub fn type_origin(&self, ty: TypeId) -> TypeOrigin {
        self.graph.types[ty].origin
    }

    /// Declared (not yet linked) super class name, binary spelling.
    pub fn super_name(&self, ty: TypeId) -> Option<&str> {
        self.graph.types[ty].super_name.as_deref()
    }

    /// Declared (not yet linked) interface names, binary spelling.
    pub fn interface_names(&self, ty: TypeId) -> &[String] {
        &self.graph.types[ty].interface_names
    }

    pub fn member_name(&self, member: MemberId) -> &str {
        &self.graph.members[member].name
    }

    pub fn member_owner(&self, member: MemberId) -> TypeId {
        self.graph.members[member].owner
    }

    pub fn member_origin(&self, member: MemberId) -> MemberOrigin {
        self.graph.members[member].origin
    }

    pub fn is_linked(&self, ty: TypeId) -> bool {
        self.graph.types[ty].linked
    }

    pub fn mark_linked(&mut self, ty: TypeId) {
        self.graph.types[ty].linked = true;
    }

    pub fn link_super_class(&mut self, child: TypeId, parent: TypeId) -> Result<(), LinkError> {
        if self.graph.types[child].super_class.is_some() {
            return Err(LinkError::SuperClassAlreadyLinked);
        }
        if is_subtype_of(&self.graph, parent, child) {
            return Err(LinkError::Cycle);
        }
        self.graph.types[child].super_class = Some(parent);
        self.graph.types[parent].subtypes.push(child);
        Ok(())
    }

    pub fn link_interface(&mut self, child: TypeId, interface: TypeId) -> Result<(), LinkError> {
        if is_subtype_of(&self.graph, interface, child) {
            return Err(LinkError::Cycle);
        }
        if self.graph.types[child].interfaces.contains(&interface) {
            return Ok(());
        }
        self.graph.types[child].interfaces.push(interface);
        self.graph.types[interface].subtypes.push(child);
        Ok(())
    }

    /// The method, constructor or static initializer of `owner` with this name
    /// and descriptor, whatever its origin.
    pub fn code_unit(&self, owner: TypeId, name: &str, descriptor: &str) -> Option<MemberId> {
        let kind = MemberKind::for_method_name(name);
        self.graph
            .declared_member(owner, kind, name, descriptor, true)
    }

    pub fn add_field_access(&mut self, access: FieldAccess) {
        self.graph.members[access.caller].field_accesses.push(access);
    }

    pub fn add_method_call(&mut self, call: Call) {
        self.graph.members[call.caller].method_calls.push(call);
    }

    pub fn add_constructor_call(&mut self, call: Call) {
        self.graph.members[call.caller].constructor_calls.push(call);
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn freeze(self) -> ClassModel {
        ClassModel::new(self.graph, self.diagnostics)
    }
}
