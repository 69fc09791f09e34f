//! Pure hierarchy queries and member dispatch over a [`TypeGraph`].
//!
//! Dispatch follows one rule in both directions: a declaration is acceptable
//! when the hierarchy path between the referenced owner and the declaring type
//! holds exactly one declaration of the signature. Anything closer would
//! shadow it; anything else on a parallel path makes the reference ambiguous.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::graph::TypeGraph;
use crate::ids::{MemberId, TypeId};
use crate::member::MemberKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Resolved(MemberId),
    /// Several declarations are equally close (a diamond). Sorted by handle.
    Ambiguous(Vec<MemberId>),
    Unmatched,
}

/// Every transitive supertype of `ty` (excluding `ty`), breadth-first.
pub fn supertypes<G: TypeGraph + ?Sized>(graph: &G, ty: TypeId) -> Vec<TypeId> {
    walk(ty, |t| graph.direct_supertypes(t))
}

/// Every transitive subtype of `ty` (excluding `ty`), breadth-first.
pub fn subtypes<G: TypeGraph + ?Sized>(graph: &G, ty: TypeId) -> Vec<TypeId> {
    walk(ty, |t| graph.direct_subtypes(t).to_vec())
}

fn walk(start: TypeId, mut next: impl FnMut(TypeId) -> Vec<TypeId>) -> Vec<TypeId> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    let mut out = Vec::new();
    while let Some(current) = queue.pop_front() {
        for candidate in next(current) {
            if seen.insert(candidate) {
                out.push(candidate);
                queue.push_back(candidate);
            }
        }
    }
    out
}

/// Reflexive subtype test.
pub fn is_subtype_of<G: TypeGraph + ?Sized>(graph: &G, child: TypeId, parent: TypeId) -> bool {
    child == parent || supertypes(graph, child).contains(&parent)
}

/// All types `t` with `child <: t <: parent` (both ends included), or an empty
/// path when `child` is not a subtype of `parent`.
pub fn hierarchy_path<G: TypeGraph + ?Sized>(
    graph: &G,
    child: TypeId,
    parent: TypeId,
) -> BTreeSet<TypeId> {
    if !is_subtype_of(graph, child, parent) {
        return BTreeSet::new();
    }
    std::iter::once(child)
        .chain(supertypes(graph, child))
        .filter(|t| is_subtype_of(graph, *t, parent))
        .collect()
}

/// Number of types on `path` declaring the signature, ignoring synthesized
/// members.
pub fn count_matches<G: TypeGraph + ?Sized>(
    graph: &G,
    path: &BTreeSet<TypeId>,
    kind: MemberKind,
    name: &str,
    descriptor: &str,
) -> usize {
    path.iter()
        .filter(|t| {
            graph
                .declared_member(**t, kind, name, descriptor, false)
                .is_some()
        })
        .count()
}

/// Finds the member a reference to `owner.name descriptor` denotes.
///
/// A direct declaration on `owner` always wins, synthesized or not.
/// Constructors are never inherited. Fields and methods are searched upward,
/// class declarations beating interface ones. Methods with no upward match are
/// then searched downward, which is where diamond ambiguity shows up.
pub fn resolve_member<G: TypeGraph + ?Sized>(
    graph: &G,
    owner: TypeId,
    kind: MemberKind,
    name: &str,
    descriptor: &str,
) -> Dispatch {
    if let Some(member) = graph.declared_member(owner, kind, name, descriptor, true) {
        return Dispatch::Resolved(member);
    }
    if kind == MemberKind::Constructor {
        return Dispatch::Unmatched;
    }

    let mut accepted: Vec<(TypeId, MemberId)> = Vec::new();
    for candidate_owner in supertypes(graph, owner) {
        let Some(member) = graph.declared_member(candidate_owner, kind, name, descriptor, false)
        else {
            continue;
        };
        let path = hierarchy_path(graph, owner, candidate_owner);
        if count_matches(graph, &path, kind, name, descriptor) == 1 {
            accepted.push((candidate_owner, member));
        }
    }
    if !accepted.is_empty() {
        let on_classes: Vec<MemberId> = accepted
            .iter()
            .filter(|(t, _)| !graph.is_interface(*t))
            .map(|(_, m)| *m)
            .collect();
        let winners = if on_classes.is_empty() {
            accepted.iter().map(|(_, m)| *m).collect()
        } else {
            on_classes
        };
        return pick(winners);
    }

    if kind != MemberKind::Method {
        return Dispatch::Unmatched;
    }

    let mut accepted: Vec<MemberId> = Vec::new();
    for candidate_owner in subtypes(graph, owner) {
        let Some(member) = graph.declared_member(candidate_owner, kind, name, descriptor, false)
        else {
            continue;
        };
        let path = hierarchy_path(graph, candidate_owner, owner);
        if count_matches(graph, &path, kind, name, descriptor) == 1 {
            accepted.push(member);
        }
    }
    pick(accepted)
}

fn pick(mut members: Vec<MemberId>) -> Dispatch {
    members.sort();
    members.dedup();
    match members.len() {
        0 => Dispatch::Unmatched,
        1 => Dispatch::Resolved(members[0]),
        _ => Dispatch::Ambiguous(members),
    }
}
