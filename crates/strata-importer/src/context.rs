use std::collections::BTreeSet;

use strata_model::{ClassModelBuilder, Diagnostic, RawAccessRecord};

use crate::binary::ImportedClass;

/// State shared by the binary pass and the completion pass of one import.
///
/// Raw access records are kept in a sorted set so that resolution order, and
/// with it every stub created along the way, only depends on the input.
#[derive(Debug, Default)]
pub struct ImportContext {
    builder: ClassModelBuilder,
    records: BTreeSet<RawAccessRecord>,
}

impl ImportContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a decoded class with its members and accesses. Returns
    /// `false`, leaving the context untouched, when the class name is taken.
    pub fn add_class(&mut self, class: ImportedClass) -> bool {
        let Some(id) = self.builder.add_type(class.decl) else {
            return false;
        };
        for member in class.members {
            self.builder.add_member(id, member);
        }
        self.records.extend(class.accesses);
        true
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.builder.push_diagnostic(diagnostic);
    }

    pub fn builder(&self) -> &ClassModelBuilder {
        &self.builder
    }

    pub fn records(&self) -> &BTreeSet<RawAccessRecord> {
        &self.records
    }

    pub(crate) fn into_parts(self) -> (ClassModelBuilder, BTreeSet<RawAccessRecord>) {
        (self.builder, self.records)
    }
}
