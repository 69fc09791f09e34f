//! Access records: raw ones captured from bytecode and their resolved form.

use crate::ids::MemberId;
use crate::member::{MemberKind, Signature};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessType {
    Get,
    Set,
}

/// Identity of the method, constructor or static initializer an access was
/// found in. `owner` is a binary name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodeUnitId {
    pub owner: String,
    pub name: String,
    pub descriptor: String,
}

impl CodeUnitId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }
}

impl Signature for CodeUnitId {
    fn name(&self) -> &str {
        &self.name
    }

    fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetKind {
    Field(AccessType),
    Method,
    Constructor,
}

impl TargetKind {
    pub fn member_kind(self) -> MemberKind {
        match self {
            TargetKind::Field(_) => MemberKind::Field,
            TargetKind::Method => MemberKind::Method,
            TargetKind::Constructor => MemberKind::Constructor,
        }
    }
}

/// An unresolved reference exactly as the bytecode spells it. `owner` is the
/// binary name of the type named by the instruction, which need not be the
/// type declaring the member.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetDescriptor {
    pub owner: String,
    pub name: String,
    pub descriptor: String,
    pub kind: TargetKind,
}

impl Signature for TargetDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawAccessRecord {
    pub caller: CodeUnitId,
    pub target: TargetDescriptor,
    pub line: Option<u32>,
}

impl RawAccessRecord {
    pub fn access_type(&self) -> Option<AccessType> {
        match self.target.kind {
            TargetKind::Field(access_type) => Some(access_type),
            TargetKind::Method | TargetKind::Constructor => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldAccess {
    pub caller: MemberId,
    pub target: MemberId,
    pub access_type: AccessType,
    pub line: Option<u32>,
}

/// A resolved method or constructor call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Call {
    pub caller: MemberId,
    pub target: MemberId,
    pub line: Option<u32>,
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn record(caller: &str, line: Option<u32>) -> RawAccessRecord {
        RawAccessRecord {
            caller: CodeUnitId::new("a.Caller", caller, "()V"),
            target: TargetDescriptor {
                owner: "a.Target".into(),
                name: "value".into(),
                descriptor: "I".into(),
                kind: TargetKind::Field(AccessType::Get),
            },
            line,
        }
    }

    #[test]
    fn raw_records_collapse_and_order_deterministically() {
        let mut set = BTreeSet::new();
        set.insert(record("run", Some(12)));
        set.insert(record("call", Some(3)));
        set.insert(record("run", Some(12)));
        set.insert(record("run", None));

        let ordered: Vec<_> = set.iter().map(|r| (r.caller.name.as_str(), r.line)).collect();
        assert_eq!(
            ordered,
            vec![("call", Some(3)), ("run", None), ("run", Some(12))]
        );
    }

    #[test]
    fn access_type_only_for_fields() {
        let mut raw = record("run", None);
        assert_eq!(raw.access_type(), Some(AccessType::Get));
        raw.target.kind = TargetKind::Method;
        assert_eq!(raw.access_type(), None);
        assert_eq!(TargetKind::Constructor.member_kind(), MemberKind::Constructor);
    }
}
