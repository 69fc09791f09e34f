//! Linking and access resolution for one import batch.
//!
//! [`CompletionProcess`] moves through its phases by value:
//! `CompletionProcess<Initial>` can only be linked, and only a
//! `CompletionProcess<Linked>` can resolve accesses and freeze the model.

use std::collections::{BTreeSet, VecDeque};
use std::marker::PhantomData;

use strata_config::MissingDependencies;
use strata_model::hierarchy::resolve_member;
use strata_model::{
    Call, ClassModel, ClassModelBuilder, Diagnostic, Dispatch, FieldAccess, LinkError, MemberDecl,
    MemberId, MemberKind, MemberType, RawAccessRecord, TargetKind, TypeDecl, TypeId,
};

use crate::context::ImportContext;
use crate::dependencies::DependencyResolver;
use crate::error::{ImportError, InvariantViolation};

/// Types and raw records collected; nothing linked yet.
#[derive(Debug)]
pub enum Initial {}

/// Every known type is linked to its supertypes.
#[derive(Debug)]
pub enum Linked {}

pub struct CompletionProcess<'d, State> {
    builder: ClassModelBuilder,
    records: BTreeSet<RawAccessRecord>,
    dependencies: &'d dyn DependencyResolver,
    missing: MissingDependencies,
    pending: VecDeque<TypeId>,
    _state: PhantomData<State>,
}

impl<'d> CompletionProcess<'d, Initial> {
    pub fn new(
        context: ImportContext,
        dependencies: &'d dyn DependencyResolver,
        missing: MissingDependencies,
    ) -> Self {
        let (builder, records) = context.into_parts();
        Self {
            builder,
            records,
            dependencies,
            missing,
            pending: VecDeque::new(),
            _state: PhantomData,
        }
    }

    /// Resolves every declared supertype name to a type, creating stubs for
    /// names the batch does not contain, and links the stubs in turn.
    pub fn link(mut self) -> CompletionProcess<'d, Linked> {
        self.pending.extend(self.builder.type_ids());
        self.link_pending();
        tracing::debug!(
            target: "strata.import",
            types = self.builder.type_count(),
            "linked type hierarchy"
        );
        CompletionProcess {
            builder: self.builder,
            records: self.records,
            dependencies: self.dependencies,
            missing: self.missing,
            pending: self.pending,
            _state: PhantomData,
        }
    }
}

impl<'d> CompletionProcess<'d, Linked> {
    /// Resolves every raw access record, attaches it under its caller and
    /// freezes the model.
    pub fn resolve_accesses(mut self) -> Result<ClassModel, ImportError> {
        let records = std::mem::take(&mut self.records);
        for record in records {
            self.resolve_record(record)?;
        }
        Ok(self.builder.freeze())
    }

    fn resolve_record(&mut self, record: RawAccessRecord) -> Result<(), ImportError> {
        let caller = self
            .builder
            .type_id(&record.caller.owner)
            .and_then(|ty| {
                self.builder
                    .code_unit(ty, &record.caller.name, &record.caller.descriptor)
            })
            .ok_or_else(|| InvariantViolation::MissingCaller {
                caller: record.caller.clone(),
            })?;

        let kind = record.target.kind.member_kind();
        if let Err(err) = MemberType::parse(kind, &record.target.descriptor) {
            tracing::warn!(
                target: "strata.import",
                caller = %record.caller.owner,
                target_owner = %record.target.owner,
                name = %record.target.name,
                error = %err,
                "dropping reference with invalid descriptor"
            );
            self.builder.push_diagnostic(Diagnostic::InvalidDescriptor {
                caller: record.caller,
                target: record.target,
            });
            return Ok(());
        }

        let Some(owner) = self.ensure_type(&record.target.owner) else {
            tracing::warn!(
                target: "strata.import",
                caller = %record.caller.owner,
                target_owner = %record.target.owner,
                name = %record.target.name,
                "dropping reference to unavailable type"
            );
            self.builder.push_diagnostic(Diagnostic::MissingDependency {
                caller: record.caller,
                target: record.target,
            });
            return Ok(());
        };
        self.link_pending();

        let target = match resolve_member(
            &self.builder,
            owner,
            kind,
            &record.target.name,
            &record.target.descriptor,
        ) {
            Dispatch::Resolved(member) => member,
            Dispatch::Unmatched
                if kind == MemberKind::Constructor
                    && self.builder.type_origin(owner).declarations_known() =>
            {
                return Err(InvariantViolation::MissingConstructor {
                    caller: record.caller,
                    target: record.target,
                }
                .into());
            }
            Dispatch::Ambiguous(candidates) => {
                tracing::debug!(
                    target: "strata.import",
                    owner = %record.target.owner,
                    name = %record.target.name,
                    descriptor = %record.target.descriptor,
                    candidates = candidates.len(),
                    "ambiguous reference; synthesizing member on declared owner"
                );
                match self.synthesize_member(owner, kind, &record) {
                    Some(member) => member,
                    None => return Ok(()),
                }
            }
            Dispatch::Unmatched => match self.synthesize_member(owner, kind, &record) {
                Some(member) => member,
                None => return Ok(()),
            },
        };

        match record.target.kind {
            TargetKind::Field(access_type) => self.builder.add_field_access(FieldAccess {
                caller,
                target,
                access_type,
                line: record.line,
            }),
            TargetKind::Method => self.builder.add_method_call(Call {
                caller,
                target,
                line: record.line,
            }),
            TargetKind::Constructor => self.builder.add_constructor_call(Call {
                caller,
                target,
                line: record.line,
            }),
        }
        Ok(())
    }

    fn synthesize_member(
        &mut self,
        owner: TypeId,
        kind: MemberKind,
        record: &RawAccessRecord,
    ) -> Option<MemberId> {
        match MemberDecl::synthesized(kind, &record.target.name, &record.target.descriptor) {
            Ok(decl) => Some(self.builder.add_member(owner, decl)),
            Err(_) => {
                self.builder.push_diagnostic(Diagnostic::InvalidDescriptor {
                    caller: record.caller.clone(),
                    target: record.target.clone(),
                });
                None
            }
        }
    }
}

impl<'d, State> CompletionProcess<'d, State> {
    pub fn builder(&self) -> &ClassModelBuilder {
        &self.builder
    }

    /// The type named `name`, loading it from the dependency classpath or
    /// synthesizing a stub when the batch lacks it. New types are queued for
    /// linking.
    fn ensure_type(&mut self, name: &str) -> Option<TypeId> {
        if let Some(id) = self.builder.type_id(name) {
            return Some(id);
        }
        let id = match self.dependencies.find_type(name) {
            Some(dependency) if dependency.decl.name != name => {
                tracing::warn!(
                    target: "strata.import",
                    requested = %name,
                    declared = %dependency.decl.name,
                    "dependency resolver answered with another type"
                );
                self.missing_type(name)?
            }
            Some(dependency) => {
                let id = self.builder.add_type(dependency.decl)?;
                for member in dependency.members {
                    self.builder.add_member(id, member);
                }
                id
            }
            None => self.missing_type(name)?,
        };
        self.pending.push_back(id);
        Some(id)
    }

    fn missing_type(&mut self, name: &str) -> Option<TypeId> {
        match self.missing {
            MissingDependencies::Synthesize => self.builder.add_type(TypeDecl::synthesized(name)),
            MissingDependencies::Drop => None,
        }
    }

    fn link_pending(&mut self) {
        while let Some(ty) = self.pending.pop_front() {
            self.link_type(ty);
        }
    }

    fn link_type(&mut self, ty: TypeId) {
        if self.builder.is_linked(ty) {
            return;
        }
        self.builder.mark_linked(ty);

        let super_name = self.builder.super_name(ty).map(str::to_owned);
        let interface_names = self.builder.interface_names(ty).to_vec();

        if let Some(super_name) = super_name {
            let linked = self
                .ensure_type(&super_name)
                .ok_or("not found")
                .and_then(|parent| {
                    self.builder
                        .link_super_class(ty, parent)
                        .map_err(link_error_reason)
                });
            if let Err(reason) = linked {
                self.unresolved_supertype(ty, super_name, reason);
            }
        }
        for interface in interface_names {
            let linked = self
                .ensure_type(&interface)
                .ok_or("not found")
                .and_then(|parent| {
                    self.builder
                        .link_interface(ty, parent)
                        .map_err(link_error_reason)
                });
            if let Err(reason) = linked {
                self.unresolved_supertype(ty, interface, reason);
            }
        }
    }

    fn unresolved_supertype(&mut self, ty: TypeId, supertype: String, reason: &'static str) {
        let type_name = self.builder.type_name(ty).to_string();
        tracing::debug!(
            target: "strata.import",
            class = %type_name,
            supertype = %supertype,
            reason,
            "cannot link supertype"
        );
        self.builder.push_diagnostic(Diagnostic::UnresolvedSupertype {
            type_name,
            supertype,
            reason: reason.to_string(),
        });
    }
}

fn link_error_reason(err: LinkError) -> &'static str {
    match err {
        LinkError::Cycle => "cycle",
        LinkError::SuperClassAlreadyLinked => "super class already linked",
    }
}
