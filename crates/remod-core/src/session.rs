//! One transformation session: parse once, analyze once, edit freely,
//! print once.

use once_cell::unsync::OnceCell;
use remod_common::Comment;
use remod_parser::children::{children, for_each_child};
use remod_parser::{NodeArena, NodeData, NodeId, ParseError};
use remod_printer::{
    EditError, EditStore, OverrideTable, PrintError, PrintOptions, QuoteStyle, generate,
};
use remod_scope::{ScopeError, ScopeInfo, analyze};
use tracing::debug;

/// Parse `source` into a fresh [`Session`].
pub fn parse(source: &str) -> Result<Session, ParseError> {
    let result = remod_parser::parse(source)?;
    Ok(Session {
        arena: result.arena,
        root: result.root,
        source: source.to_string(),
        comments: result.comments,
        edits: EditStore::new(),
        overrides: OverrideTable::new(),
        scope: OnceCell::new(),
    })
}

/// Owns everything belonging to one parse: the arena (and with it node
/// identity), the original text, pending edits and layout overrides.
/// Scope information is computed on first use and read-only afterwards.
///
/// Nodes from another session's arena must never be passed in here;
/// identity-keyed maps would silently confuse them.
pub struct Session {
    arena: NodeArena,
    root: NodeId,
    source: String,
    comments: Vec<Comment>,
    edits: EditStore,
    overrides: OverrideTable,
    scope: OnceCell<ScopeInfo>,
}

impl Session {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Mutable arena access for synthesizing replacement nodes.
    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub(crate) fn edits(&self) -> &EditStore {
        &self.edits
    }

    pub(crate) fn edits_mut(&mut self) -> &mut EditStore {
        &mut self.edits
    }

    /// Scope tables for this parse, computed on first call.
    pub fn scope(&self) -> Result<&ScopeInfo, ScopeError> {
        self.scope.get_or_try_init(|| {
            debug!("running scope analysis");
            analyze(&self.arena, self.root)
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Every node matching `pred`, in document order.
    pub fn find(&self, mut pred: impl FnMut(&NodeData) -> bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(self.root, &mut |id| {
            if pred(self.arena.data(id)) {
                out.push(id);
            }
        });
        out
    }

    fn walk(&self, id: NodeId, visit: &mut impl FnMut(NodeId)) {
        visit(id);
        for_each_child(self.arena.data(id), |child| self.walk(child, visit));
    }

    pub fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        children(self.arena.data(id))
    }

    /// Ancestors of `target`, innermost first. Empty for the root and
    /// for nodes not reachable from it. Computed by walking — nodes
    /// carry no parent pointers, so the tree stays acyclic and
    /// shareable.
    pub fn ancestors_of(&self, target: NodeId) -> Vec<NodeId> {
        fn search(
            arena: &NodeArena,
            id: NodeId,
            target: NodeId,
            stack: &mut Vec<NodeId>,
            found: &mut Option<Vec<NodeId>>,
        ) {
            if found.is_some() {
                return;
            }
            if id == target {
                let mut ancestors = stack.clone();
                ancestors.reverse();
                *found = Some(ancestors);
                return;
            }
            stack.push(id);
            for_each_child(arena.data(id), |child| {
                search(arena, child, target, stack, found);
            });
            stack.pop();
        }
        let mut found = None;
        let mut stack = Vec::new();
        search(&self.arena, self.root, target, &mut stack, &mut found);
        found.unwrap_or_default()
    }

    pub fn parent_of(&self, target: NodeId) -> Option<NodeId> {
        self.ancestors_of(target).first().copied()
    }

    /// The original text of `node`, when it carries a range.
    pub fn source_of(&self, node: NodeId) -> Option<&str> {
        self.arena.span(node).map(|span| span.slice(&self.source))
    }

    // ========================================================================
    // Scope lookups
    // ========================================================================

    /// The declaration identifier for a reference, or `ident` itself
    /// when it already is a declaration.
    pub fn declaration_of(&self, ident: NodeId) -> Result<Option<NodeId>, ScopeError> {
        let scope = self.scope()?;
        if let Some(&declaration) = scope.declarations.get(&ident) {
            return Ok(Some(declaration));
        }
        if scope.declaration_scope.contains_key(&ident) {
            return Ok(Some(ident));
        }
        Ok(None)
    }

    /// Every reference to the binding behind `ident`, resolving through
    /// the declaration when handed a reference. Document order.
    pub fn references_of(&self, ident: NodeId) -> Result<Vec<NodeId>, ScopeError> {
        let scope = self.scope()?;
        let declaration = scope.declarations.get(&ident).copied().unwrap_or(ident);
        Ok(scope
            .references
            .get(&declaration)
            .cloned()
            .unwrap_or_default())
    }

    /// Rename the binding behind `ident`: the declaration and every
    /// resolved reference are replaced in place. Unrelated identifiers
    /// that happen to share the spelling are untouched.
    pub fn rename(&mut self, ident: NodeId, new_name: &str) -> Result<(), ScopeError> {
        let (declaration, references) = {
            let scope = self.scope()?;
            let declaration = scope.declarations.get(&ident).copied().unwrap_or(ident);
            let references = scope
                .references
                .get(&declaration)
                .cloned()
                .unwrap_or_default();
            (declaration, references)
        };
        debug!(%declaration, references = references.len(), new_name, "renaming binding");
        let fresh = self.arena.identifier(new_name);
        self.edits.replace(declaration, [fresh]);
        for reference in references {
            self.edits.replace(reference, [fresh]);
        }
        Ok(())
    }

    // ========================================================================
    // Edits
    // ========================================================================

    pub fn replace(&mut self, node: NodeId, replacements: impl IntoIterator<Item = NodeId>) {
        self.edits.replace(node, replacements);
    }

    pub fn insert_before(&mut self, node: NodeId, prefixes: impl IntoIterator<Item = NodeId>) {
        self.edits.insert_before(node, prefixes);
    }

    pub fn insert_after(&mut self, node: NodeId, suffixes: impl IntoIterator<Item = NodeId>) {
        self.edits.insert_after(node, suffixes);
    }

    pub fn remove_child(
        &mut self,
        parent: NodeId,
        field: &str,
        child: NodeId,
    ) -> Result<(), EditError> {
        self.edits.remove_child(&self.arena, parent, field, child)
    }

    /// The pending substitution for `node`, if any edit exists:
    /// prefixes, then the replacement (or the node itself), then
    /// suffixes.
    pub fn resolve(&self, node: NodeId) -> Option<Vec<NodeId>> {
        self.edits.resolve(node)
    }

    pub fn is_removal_parent(&self, parent: NodeId) -> bool {
        self.edits.is_removal_parent(parent)
    }

    /// A span-less copy of `parent` with recorded removals applied, or
    /// `None` when no field of `parent` has removals.
    pub fn resolve_removals(&mut self, parent: NodeId) -> Option<NodeId> {
        self.edits.resolve_removals(&mut self.arena, parent)
    }

    pub fn override_print_options(&mut self, node: NodeId, options: PrintOptions) {
        self.overrides.set_override(node, options);
    }

    /// Replace a string literal with a new value, keeping the quoting
    /// of the text it replaces.
    pub fn replace_string(&mut self, node: NodeId, value: &str) {
        let quotes = match self.source_of(node).and_then(|text| text.chars().next()) {
            Some('\'') => QuoteStyle::Single,
            Some('`') => QuoteStyle::Backtick,
            _ => QuoteStyle::Double,
        };
        let literal = self.arena.string_literal(value);
        self.edits.replace(node, [literal]);
        self.overrides.set_override(
            literal,
            PrintOptions {
                quotes,
                ..PrintOptions::default()
            },
        );
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Run the differential printer over the whole tree.
    pub fn print(&self, options: PrintOptions) -> Result<String, PrintError> {
        generate(
            &self.arena,
            self.root,
            &self.source,
            &self.edits,
            &self.overrides,
            options,
        )
    }
}
