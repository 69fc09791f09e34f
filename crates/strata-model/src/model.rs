use std::fmt;

use crate::diagnostic::Diagnostic;
use crate::error::ModelError;
use crate::graph::{delegate_type_graph, Graph, MemberData, TypeData};
use crate::hierarchy::{is_subtype_of, subtypes, supertypes};
use crate::ids::{MemberId, TypeId};
use crate::member::{
    MemberDeclaration, MemberKind, MemberOrigin, MemberType, Signature, TypeKind, TypeOrigin,
};
use crate::modifiers::Modifiers;
use crate::names;
use crate::record::{AccessType, Call, FieldAccess};

/// The frozen result of one import batch.
///
/// Nothing can be added or changed after freezing; the model is `Send + Sync`
/// and meant to be shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ClassModel {
    graph: Graph,
    diagnostics: Vec<Diagnostic>,
}

delegate_type_graph!(ClassModel);

impl ClassModel {
    pub(crate) fn new(graph: Graph, diagnostics: Vec<Diagnostic>) -> Self {
        Self { graph, diagnostics }
    }

    /// Looks a type up by binary (`a.b.C`) or internal (`a/b/C`) name.
    pub fn get(&self, name: &str) -> Result<JavaClass<'_>, ModelError> {
        self.graph
            .lookup(name)
            .map(|id| self.class(id))
            .ok_or_else(|| ModelError::not_found("class", names::to_binary_name(name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.graph.lookup(name).is_some()
    }

    pub fn class(&self, id: TypeId) -> JavaClass<'_> {
        JavaClass { model: self, id }
    }

    pub fn member(&self, id: MemberId) -> JavaMember<'_> {
        JavaMember { model: self, id }
    }

    /// Every type of the batch, stubs included, in handle order.
    pub fn classes(&self) -> impl Iterator<Item = JavaClass<'_>> + '_ {
        self.graph
            .types
            .iter()
            .map(move |(raw, _)| self.class(TypeId::from_raw(raw)))
    }

    pub fn len(&self) -> usize {
        self.graph.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.types.len() == 0
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn type_data(&self, id: TypeId) -> &TypeData {
        &self.graph.types[id]
    }

    fn member_data(&self, id: MemberId) -> &MemberData {
        &self.graph.members[id]
    }
}

/// A type of a [`ClassModel`].
#[derive(Clone, Copy)]
pub struct JavaClass<'m> {
    model: &'m ClassModel,
    id: TypeId,
}

impl<'m> JavaClass<'m> {
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Binary name, e.g. `com.example.Outer$Inner`.
    pub fn name(&self) -> &'m str {
        &self.data().name
    }

    pub fn simple_name(&self) -> &'m str {
        names::simple_name(self.name())
    }

    pub fn package_name(&self) -> &'m str {
        names::package_name(self.name())
    }

    pub fn modifiers(&self) -> Modifiers {
        self.data().modifiers
    }

    pub fn kind(&self) -> TypeKind {
        self.data().kind
    }

    pub fn is_interface(&self) -> bool {
        self.data().kind.is_interface()
    }

    pub fn origin(&self) -> TypeOrigin {
        self.data().origin
    }

    pub fn source_file(&self) -> Option<&'m str> {
        self.data().source_file.as_deref()
    }

    pub fn super_class(&self) -> Option<JavaClass<'m>> {
        self.data().super_class.map(|id| self.model.class(id))
    }

    pub fn interfaces(&self) -> impl Iterator<Item = JavaClass<'m>> + 'm {
        let model = self.model;
        self.data().interfaces.iter().map(move |id| model.class(*id))
    }

    pub fn direct_subtypes(&self) -> impl Iterator<Item = JavaClass<'m>> + 'm {
        let model = self.model;
        self.data().subtypes.iter().map(move |id| model.class(*id))
    }

    /// Transitive subtypes, breadth-first.
    pub fn all_subtypes(&self) -> Vec<JavaClass<'m>> {
        subtypes(self.model, self.id)
            .into_iter()
            .map(|id| self.model.class(id))
            .collect()
    }

    /// Transitive super classes and interfaces, breadth-first.
    pub fn all_supertypes(&self) -> Vec<JavaClass<'m>> {
        supertypes(self.model, self.id)
            .into_iter()
            .map(|id| self.model.class(id))
            .collect()
    }

    /// Whether this type is, extends or implements `name`.
    pub fn is_assignable_to(&self, name: &str) -> bool {
        match self.model.graph.lookup(name) {
            Some(other) => is_subtype_of(self.model, self.id, other),
            None => false,
        }
    }

    pub fn members(&self) -> impl Iterator<Item = JavaMember<'m>> + 'm {
        let model = self.model;
        self.data().members.iter().map(move |id| model.member(*id))
    }

    pub fn fields(&self) -> impl Iterator<Item = JavaMember<'m>> + 'm {
        self.members_of(MemberKind::Field)
    }

    pub fn methods(&self) -> impl Iterator<Item = JavaMember<'m>> + 'm {
        self.members_of(MemberKind::Method)
    }

    pub fn constructors(&self) -> impl Iterator<Item = JavaMember<'m>> + 'm {
        self.members_of(MemberKind::Constructor)
    }

    /// Methods, constructors and the static initializer.
    pub fn code_units(&self) -> impl Iterator<Item = JavaMember<'m>> + 'm {
        self.members().filter(|m| m.kind().is_code_unit())
    }

    pub fn field(&self, name: &str) -> Result<JavaMember<'m>, ModelError> {
        self.fields()
            .find(|f| f.name() == name)
            .ok_or_else(|| ModelError::not_found("field", format!("{}.{name}", self.name())))
    }

    pub fn method(&self, name: &str, descriptor: &str) -> Result<JavaMember<'m>, ModelError> {
        self.methods()
            .find(|m| m.name() == name && m.descriptor() == descriptor)
            .ok_or_else(|| {
                ModelError::not_found("method", format!("{}.{name}{descriptor}", self.name()))
            })
    }

    pub fn constructor(&self, descriptor: &str) -> Result<JavaMember<'m>, ModelError> {
        self.constructors()
            .find(|m| m.descriptor() == descriptor)
            .ok_or_else(|| {
                ModelError::not_found("constructor", format!("{}.<init>{descriptor}", self.name()))
            })
    }

    pub fn static_initializer(&self) -> Option<JavaMember<'m>> {
        self.methods().find(|m| m.name() == "<clinit>")
    }

    /// Field accesses made by any code unit of this type.
    pub fn field_accesses_from_self(&self) -> Vec<JavaFieldAccess<'m>> {
        self.code_units().flat_map(|m| m.field_accesses()).collect()
    }

    /// Method calls made by any code unit of this type.
    pub fn method_calls_from_self(&self) -> Vec<JavaCall<'m>> {
        self.code_units().flat_map(|m| m.method_calls()).collect()
    }

    /// Constructor calls made by any code unit of this type.
    pub fn constructor_calls_from_self(&self) -> Vec<JavaCall<'m>> {
        self.code_units().flat_map(|m| m.constructor_calls()).collect()
    }

    fn members_of(&self, kind: MemberKind) -> impl Iterator<Item = JavaMember<'m>> + 'm {
        self.members().filter(move |m| m.kind() == kind)
    }

    fn data(&self) -> &'m TypeData {
        self.model.type_data(self.id)
    }
}

impl PartialEq for JavaClass<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.model, other.model) && self.id == other.id
    }
}

impl Eq for JavaClass<'_> {}

impl fmt::Debug for JavaClass<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JavaClass({})", self.name())
    }
}

/// A field, method, constructor or static initializer of a [`ClassModel`].
#[derive(Clone, Copy)]
pub struct JavaMember<'m> {
    model: &'m ClassModel,
    id: MemberId,
}

impl<'m> JavaMember<'m> {
    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn owner(&self) -> JavaClass<'m> {
        self.model.class(self.data().owner)
    }

    pub fn kind(&self) -> MemberKind {
        self.data().kind
    }

    pub fn name(&self) -> &'m str {
        &self.data().name
    }

    pub fn descriptor(&self) -> &'m str {
        &self.data().descriptor
    }

    pub fn member_type(&self) -> &'m MemberType {
        &self.data().member_type
    }

    pub fn modifiers(&self) -> Modifiers {
        self.data().modifiers
    }

    pub fn origin(&self) -> MemberOrigin {
        self.data().origin
    }

    /// `owner.name descriptor`, e.g. `a.B.run()V`.
    pub fn full_name(&self) -> String {
        format!("{}.{}{}", self.owner().name(), self.name(), self.descriptor())
    }

    /// The generic signature and thrown types as written in the class file.
    ///
    /// Synthesized members were never read from a class file and fail with
    /// [`ModelError::ReflectionUnavailable`].
    pub fn declaration(&self) -> Result<&'m MemberDeclaration, ModelError> {
        self.data()
            .declaration
            .as_ref()
            .ok_or_else(|| ModelError::ReflectionUnavailable {
                owner: self.owner().name().to_string(),
                name: self.name().to_string(),
                descriptor: self.descriptor().to_string(),
            })
    }

    pub fn field_accesses(&self) -> impl Iterator<Item = JavaFieldAccess<'m>> + 'm {
        let model = self.model;
        self.data()
            .field_accesses
            .iter()
            .map(move |record| JavaFieldAccess {
                model,
                record: *record,
            })
    }

    pub fn method_calls(&self) -> impl Iterator<Item = JavaCall<'m>> + 'm {
        let model = self.model;
        self.data().method_calls.iter().map(move |record| JavaCall {
            model,
            record: *record,
        })
    }

    pub fn constructor_calls(&self) -> impl Iterator<Item = JavaCall<'m>> + 'm {
        let model = self.model;
        self.data()
            .constructor_calls
            .iter()
            .map(move |record| JavaCall {
                model,
                record: *record,
            })
    }

    fn data(&self) -> &'m MemberData {
        self.model.member_data(self.id)
    }
}

impl Signature for JavaMember<'_> {
    fn name(&self) -> &str {
        &self.data().name
    }

    fn descriptor(&self) -> &str {
        &self.data().descriptor
    }
}

impl PartialEq for JavaMember<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.model, other.model) && self.id == other.id
    }
}

impl Eq for JavaMember<'_> {}

impl fmt::Debug for JavaMember<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JavaMember({})", self.full_name())
    }
}

#[derive(Clone, Copy)]
pub struct JavaFieldAccess<'m> {
    model: &'m ClassModel,
    record: FieldAccess,
}

impl<'m> JavaFieldAccess<'m> {
    pub fn record(&self) -> FieldAccess {
        self.record
    }

    pub fn caller(&self) -> JavaMember<'m> {
        self.model.member(self.record.caller)
    }

    pub fn target(&self) -> JavaMember<'m> {
        self.model.member(self.record.target)
    }

    pub fn access_type(&self) -> AccessType {
        self.record.access_type
    }

    pub fn line(&self) -> Option<u32> {
        self.record.line
    }
}

impl fmt::Debug for JavaFieldAccess<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JavaFieldAccess")
            .field("caller", &self.caller().full_name())
            .field("target", &self.target().full_name())
            .field("access_type", &self.record.access_type)
            .field("line", &self.record.line)
            .finish()
    }
}

/// A resolved method or constructor call.
#[derive(Clone, Copy)]
pub struct JavaCall<'m> {
    model: &'m ClassModel,
    record: Call,
}

impl<'m> JavaCall<'m> {
    pub fn record(&self) -> Call {
        self.record
    }

    pub fn caller(&self) -> JavaMember<'m> {
        self.model.member(self.record.caller)
    }

    pub fn target(&self) -> JavaMember<'m> {
        self.model.member(self.record.target)
    }

    pub fn line(&self) -> Option<u32> {
        self.record.line
    }
}

impl fmt::Debug for JavaCall<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JavaCall")
            .field("caller", &self.caller().full_name())
            .field("target", &self.target().full_name())
            .field("line", &self.record.line)
            .finish()
    }
}
