//! The two resolution passes.

use crate::reference::is_reference;
use crate::{ScopeError, ScopeInfo, declares_arguments, declares_this, is_block_scope, is_scope};
use remod_parser::children::for_each_child;
use remod_parser::{NodeArena, NodeData, NodeId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

type AncestorStack = SmallVec<[NodeId; 16]>;

/// Analyze a parsed tree. The arena must be the one that produced
/// `root`; the returned tables key by its node ids.
pub fn analyze(arena: &NodeArena, root: NodeId) -> Result<ScopeInfo, ScopeError> {
    let mut resolver = Resolver {
        arena,
        info: ScopeInfo::default(),
        locals: FxHashMap::default(),
    };
    let mut stack = AncestorStack::new();
    resolver.register_bindings(root, &mut stack)?;
    debug_assert!(stack.is_empty());
    resolver.resolve_references(root, &mut stack);
    debug!(
        bindings = resolver.info.declaration_scope.len(),
        references = resolver.info.declarations.len(),
        globals = resolver.info.globals.len(),
        "scope analysis complete"
    );
    Ok(resolver.info)
}

struct Resolver<'a> {
    arena: &'a NodeArena,
    info: ScopeInfo,
    /// Per-scope name tables. A re-declaration of the same name in the
    /// same scope overwrites the earlier entry.
    locals: FxHashMap<NodeId, FxHashMap<String, NodeId>>,
}

impl<'a> Resolver<'a> {
    fn set_local(&mut self, scope: NodeId, decl: NodeId) {
        let name = self
            .arena
            .identifier_name(decl)
            .expect("binding identifiers are Identifier nodes")
            .to_string();
        self.locals.entry(scope).or_default().insert(name, decl);
        self.info.declaration_scope.insert(decl, scope);
    }

    /// Nearest enclosing function-like-or-module scope.
    fn enclosing_scope(&self, ancestors: &[NodeId]) -> Option<NodeId> {
        ancestors
            .iter()
            .rev()
            .copied()
            .find(|&id| is_scope(self.arena.kind(id)))
    }

    /// Nearest enclosing block-like scope.
    fn enclosing_block_scope(&self, ancestors: &[NodeId]) -> Option<NodeId> {
        ancestors
            .iter()
            .rev()
            .copied()
            .find(|&id| is_block_scope(self.arena.kind(id)))
    }

    // ======================================================================
    // Pass 1 — binding registration
    // ======================================================================

    fn register_bindings(
        &mut self,
        id: NodeId,
        stack: &mut AncestorStack,
    ) -> Result<(), ScopeError> {
        self.register_node(id, stack)?;
        stack.push(id);
        let mut result = Ok(());
        for_each_child(self.arena.data(id), |child| {
            if result.is_ok() {
                result = self.register_bindings(child, stack);
            }
        });
        stack.pop();
        result
    }

    fn register_node(&mut self, id: NodeId, ancestors: &[NodeId]) -> Result<(), ScopeError> {
        match self.arena.data(id) {
            NodeData::VariableDeclaration {
                kind,
                declarations,
            } => {
                // `var` hoists to the nearest function or module scope;
                // `let`/`const` bind at the nearest block.
                let scope = match kind {
                    remod_parser::VarKind::Var => self.enclosing_scope(ancestors),
                    _ => self.enclosing_block_scope(ancestors),
                };
                if let Some(scope) = scope {
                    for &decl in declarations.clone().iter() {
                        if let NodeData::VariableDeclarator { id: pattern, .. } =
                            self.arena.data(decl)
                        {
                            self.declare_pattern(*pattern, scope)?;
                        }
                    }
                }
            }
            NodeData::FunctionDeclaration {
                id: name, params, ..
            } => {
                let name = *name;
                let params = params.clone();
                // The name is visible inside the function itself and in
                // the enclosing scope; the enclosing scope is the one
                // the binding belongs to.
                self.set_local(id, name);
                if let Some(scope) = self.enclosing_scope(ancestors) {
                    self.set_local(scope, name);
                }
                for param in params {
                    self.declare_pattern(param, id)?;
                }
            }
            NodeData::FunctionExpression {
                id: name, params, ..
            } => {
                let name = *name;
                let params = params.clone();
                if let Some(name) = name {
                    self.set_local(id, name);
                }
                for param in params {
                    self.declare_pattern(param, id)?;
                }
            }
            NodeData::ArrowFunctionExpression { params, .. } => {
                for param in params.clone() {
                    self.declare_pattern(param, id)?;
                }
            }
            NodeData::ClassMethod { params, .. } => {
                for param in params.clone() {
                    self.declare_pattern(param, id)?;
                }
            }
            NodeData::ClassDeclaration { id: name, .. } => {
                let name = *name;
                if let Some(scope) = self.enclosing_scope(ancestors) {
                    self.set_local(scope, name);
                }
            }
            NodeData::CatchClause { param, .. } => {
                // The catch parameter binds to the clause itself.
                if let Some(param) = *param {
                    self.declare_pattern(param, id)?;
                }
            }
            NodeData::ImportSpecifier { local, .. }
            | NodeData::ImportDefaultSpecifier { local }
            | NodeData::ImportNamespaceSpecifier { local } => {
                let local = *local;
                if let Some(scope) = self.enclosing_scope(ancestors) {
                    self.set_local(scope, local);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Register every identifier a binding pattern introduces into
    /// `scope`. Meeting a kind with no handling here is a defect.
    fn declare_pattern(&mut self, pattern: NodeId, scope: NodeId) -> Result<(), ScopeError> {
        match self.arena.data(pattern) {
            NodeData::Identifier { .. } => {
                self.set_local(scope, pattern);
            }
            NodeData::ObjectPattern { properties } => {
                for prop in properties.clone() {
                    match self.arena.data(prop) {
                        NodeData::ObjectProperty { value, .. } => {
                            self.declare_pattern(*value, scope)?;
                        }
                        NodeData::RestElement { argument } => {
                            self.declare_pattern(*argument, scope)?;
                        }
                        other => {
                            return Err(ScopeError::UnsupportedPattern {
                                kind: other.kind(),
                                span: self.arena.span(prop),
                            });
                        }
                    }
                }
            }
            NodeData::ArrayPattern { elements } => {
                for element in elements.clone().into_iter().flatten() {
                    self.declare_pattern(element, scope)?;
                }
            }
            NodeData::RestElement { argument } => {
                self.declare_pattern(*argument, scope)?;
            }
            NodeData::AssignmentPattern { left, .. } => {
                self.declare_pattern(*left, scope)?;
            }
            other => {
                return Err(ScopeError::UnsupportedPattern {
                    kind: other.kind(),
                    span: self.arena.span(pattern),
                });
            }
        }
        Ok(())
    }

    // ======================================================================
    // Pass 2 — reference resolution
    // ======================================================================

    fn resolve_references(&mut self, id: NodeId, stack: &mut AncestorStack) {
        match self.arena.data(id) {
            NodeData::Identifier { name } => {
                let name = name.clone();
                self.resolve_identifier(id, &name, stack);
            }
            NodeData::ThisExpression => self.resolve_this(id, stack),
            _ => {}
        }
        stack.push(id);
        for_each_child(self.arena.data(id), |child| {
            self.resolve_references(child, stack);
        });
        stack.pop();
    }

    fn resolve_identifier(&mut self, id: NodeId, name: &str, ancestors: &[NodeId]) {
        if name == "undefined" {
            return;
        }
        let Some(&parent) = ancestors.last() else {
            return;
        };
        let grandparent = ancestors.len().checked_sub(2).map(|i| ancestors[i]);
        if !is_reference(self.arena, id, parent, grandparent) {
            return;
        }

        for &ancestor in ancestors.iter().rev() {
            if name == "arguments" && declares_arguments(self.arena.kind(ancestor)) {
                self.info.arguments_bindings.insert(id, ancestor);
                self.info
                    .arguments_references
                    .entry(ancestor)
                    .or_default()
                    .push(id);
                return;
            }
            if let Some(locals) = self.locals.get(&ancestor)
                && let Some(&decl) = locals.get(name)
            {
                if decl == id {
                    // The declaration itself showed up in a read
                    // position (e.g. a named function expression).
                    return;
                }
                self.info.declarations.insert(id, decl);
                self.info.references.entry(decl).or_default().push(id);
                return;
            }
        }

        self.info
            .globals
            .entry(name.to_string())
            .or_default()
            .push(id);
    }

    fn resolve_this(&mut self, id: NodeId, ancestors: &[NodeId]) {
        for &ancestor in ancestors.iter().rev() {
            if declares_this(self.arena.kind(ancestor)) {
                self.info.this_bindings.insert(id, ancestor);
                self.info
                    .this_references
                    .entry(ancestor)
                    .or_default()
                    .push(id);
                return;
            }
        }
        self.info.global_this.push(id);
    }
}
