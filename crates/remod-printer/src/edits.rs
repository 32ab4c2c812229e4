//! The edit store.
//!
//! Pending structural changes live here, keyed by node identity; the
//! tree itself is never touched. The store indexes ids only — node
//! contents are read through the arena handed in by the caller, and
//! only where a `remove_child` request has to be validated or a parent
//! rebuilt.
//!
//! Semantics: the latest `replace` wins outright; `insert_before` and
//! `insert_after` accumulate (new prefixes land in front of existing
//! prefixes, new suffixes behind existing suffixes); removals are
//! tracked per `(parent, field)` pair, so removing a child from one
//! field never affects another field that happens to hold the same id.

use crate::error::EditError;
use remod_parser::children::{field_names, filter_sequences, sequence_contains, sequence_field_names};
use remod_parser::{NodeArena, NodeId};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

type NodeList = SmallVec<[NodeId; 2]>;

#[derive(Debug, Default)]
pub struct EditStore {
    prefixes: FxHashMap<NodeId, NodeList>,
    replacements: FxHashMap<NodeId, NodeList>,
    suffixes: FxHashMap<NodeId, NodeList>,
    removals: FxHashMap<NodeId, FxHashMap<&'static str, FxHashSet<NodeId>>>,
}

impl EditStore {
    pub fn new() -> EditStore {
        EditStore::default()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
            && self.replacements.is_empty()
            && self.suffixes.is_empty()
            && self.removals.is_empty()
    }

    /// Replace `node` with `replacements` in the output. Overwrites any
    /// prior replacement for the same node. An empty list deletes the
    /// node.
    pub fn replace(&mut self, node: NodeId, replacements: impl IntoIterator<Item = NodeId>) {
        self.replacements
            .insert(node, replacements.into_iter().collect());
    }

    /// Insert `prefixes` before `node`. Repeated calls compose: the
    /// newest prefixes end up furthest from the node.
    pub fn insert_before(&mut self, node: NodeId, prefixes: impl IntoIterator<Item = NodeId>) {
        let entry = self.prefixes.entry(node).or_default();
        let mut combined: NodeList = prefixes.into_iter().collect();
        combined.extend(entry.drain(..));
        *entry = combined;
    }

    /// Insert `suffixes` after `node`. Repeated calls compose: the
    /// newest suffixes end up furthest from the node.
    pub fn insert_after(&mut self, node: NodeId, suffixes: impl IntoIterator<Item = NodeId>) {
        self.suffixes.entry(node).or_default().extend(suffixes);
    }

    /// Record `child` as removed from the sequence field `field` of
    /// `parent`. Validation is synchronous: a field that does not
    /// exist, is not a sequence, or does not contain `child` fails
    /// here, at the call site.
    pub fn remove_child(
        &mut self,
        arena: &NodeArena,
        parent: NodeId,
        field: &str,
        child: NodeId,
    ) -> Result<(), EditError> {
        let kind = arena.kind(parent);
        let Some(canonical) = sequence_field_names(kind).iter().copied().find(|&f| f == field)
        else {
            if field_names(kind).contains(&field) {
                return Err(EditError::NotASequence {
                    parent: kind,
                    field: field.to_string(),
                });
            }
            return Err(EditError::NoSuchField {
                parent: kind,
                field: field.to_string(),
            });
        };
        if sequence_contains(arena.data(parent), canonical, child) != Some(true) {
            return Err(EditError::ChildNotPresent {
                parent: kind,
                field: field.to_string(),
                child,
            });
        }
        self.removals
            .entry(parent)
            .or_default()
            .entry(canonical)
            .or_default()
            .insert(child);
        Ok(())
    }

    /// The full substitution for `node`:
    /// `prefixes ++ (replacement or [node]) ++ suffixes`. `None` when
    /// no replace/insert edit exists for `node`.
    pub fn resolve(&self, node: NodeId) -> Option<Vec<NodeId>> {
        let prefixes = self.prefixes.get(&node);
        let replacement = self.replacements.get(&node);
        let suffixes = self.suffixes.get(&node);
        if prefixes.is_none() && replacement.is_none() && suffixes.is_none() {
            return None;
        }
        let mut out = Vec::new();
        if let Some(prefixes) = prefixes {
            out.extend(prefixes.iter().copied());
        }
        match replacement {
            Some(replacement) => out.extend(replacement.iter().copied()),
            None => out.push(node),
        }
        if let Some(suffixes) = suffixes {
            out.extend(suffixes.iter().copied());
        }
        Some(out)
    }

    /// Does any field of `parent` have tracked removals?
    pub fn is_removal_parent(&self, parent: NodeId) -> bool {
        self.removals.contains_key(&parent)
    }

    /// Is `child` removed from `parent`'s field `field`?
    pub fn is_removed(&self, parent: NodeId, field: &str, child: NodeId) -> bool {
        self.removals
            .get(&parent)
            .and_then(|fields| fields.get(field))
            .is_some_and(|set| set.contains(&child))
    }

    /// Allocate a span-less shallow copy of `parent` with each affected
    /// sequence field filtered to its survivors. Unaffected fields and
    /// surviving children keep their ids untouched. `None` when no
    /// field of `parent` has removals.
    pub fn resolve_removals(&self, arena: &mut NodeArena, parent: NodeId) -> Option<NodeId> {
        let removals = self.removals.get(&parent)?;
        let data = filter_sequences(arena.data(parent), |field, child| {
            removals.get(field).is_some_and(|set| set.contains(&child))
        });
        Some(arena.alloc(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remod_parser::{NodeData, VarKind};

    fn declaration(arena: &mut NodeArena) -> (NodeId, Vec<NodeId>) {
        let a = arena.identifier("a");
        let b = arena.identifier("b");
        let da = arena.variable_declarator(a, None);
        let db = arena.variable_declarator(b, None);
        let decl = arena.variable_declaration(VarKind::Let, vec![da, db]);
        (decl, vec![da, db])
    }

    #[test]
    fn resolve_without_edits_is_none() {
        let mut arena = NodeArena::new();
        let (decl, _) = declaration(&mut arena);
        let store = EditStore::new();
        assert_eq!(store.resolve(decl), None);
    }

    #[test]
    fn last_replace_wins() {
        let mut arena = NodeArena::new();
        let (decl, _) = declaration(&mut arena);
        let first = arena.identifier("first");
        let second = arena.identifier("second");
        let mut store = EditStore::new();
        store.replace(decl, [first]);
        store.replace(decl, [second]);
        assert_eq!(store.resolve(decl), Some(vec![second]));
    }

    #[test]
    fn prefixes_prepend_and_suffixes_append() {
        let mut arena = NodeArena::new();
        let (decl, _) = declaration(&mut arena);
        let p1 = arena.identifier("p1");
        let p2 = arena.identifier("p2");
        let s1 = arena.identifier("s1");
        let s2 = arena.identifier("s2");
        let mut store = EditStore::new();
        store.insert_before(decl, [p1]);
        store.insert_before(decl, [p2]);
        store.insert_after(decl, [s1]);
        store.insert_after(decl, [s2]);
        assert_eq!(store.resolve(decl), Some(vec![p2, p1, decl, s1, s2]));
    }

    #[test]
    fn empty_replacement_is_a_deletion() {
        let mut arena = NodeArena::new();
        let (decl, _) = declaration(&mut arena);
        let mut store = EditStore::new();
        store.replace(decl, []);
        assert_eq!(store.resolve(decl), Some(vec![]));
    }

    #[test]
    fn remove_child_validates_field_and_membership() {
        let mut arena = NodeArena::new();
        let (decl, declarators) = declaration(&mut arena);
        let stranger = arena.identifier("stranger");
        let mut store = EditStore::new();

        assert!(matches!(
            store.remove_child(&arena, decl, "bodies", declarators[0]),
            Err(EditError::NoSuchField { .. })
        ));
        assert!(matches!(
            store.remove_child(&arena, decl, "kind", declarators[0]),
            Err(EditError::NotASequence { .. })
        ));
        assert!(matches!(
            store.remove_child(&arena, decl, "declarations", stranger),
            Err(EditError::ChildNotPresent { .. })
        ));

        store
            .remove_child(&arena, decl, "declarations", declarators[0])
            .unwrap();
        assert!(store.is_removal_parent(decl));
        assert!(store.is_removed(decl, "declarations", declarators[0]));
        assert!(!store.is_removed(decl, "declarations", declarators[1]));
    }

    #[test]
    fn resolve_removals_filters_only_affected_fields() {
        let mut arena = NodeArena::new();
        let (decl, declarators) = declaration(&mut arena);
        let mut store = EditStore::new();
        assert_eq!(store.resolve_removals(&mut arena, decl), None);

        store
            .remove_child(&arena, decl, "declarations", declarators[1])
            .unwrap();
        let copy = store.resolve_removals(&mut arena, decl).unwrap();
        assert_ne!(copy, decl);
        assert_eq!(arena.span(copy), None);
        match arena.data(copy) {
            NodeData::VariableDeclaration { declarations, kind } => {
                assert_eq!(*kind, VarKind::Let);
                assert_eq!(declarations.as_slice(), &declarators[..1]);
            }
            other => panic!("unexpected kind {:?}", other.kind()),
        }
    }
}
