//! Node storage.
//!
//! All nodes of one parse (and every node later synthesized for edits
//! against that parse) live in a single [`NodeArena`]. The arena never
//! frees or reorders entries, so a [`NodeId`] is a stable identity for
//! the whole transformation session.

use crate::node::{Node, NodeData, NodeId, NodeKind, VarKind};
use remod_common::Span;

#[derive(Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a synthesized (span-less) node.
    pub fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { span: None, data });
        id
    }

    /// Allocate a parsed node with its source range.
    pub fn alloc_spanned(&mut self, data: NodeData, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            span: Some(span),
            data,
        });
        id
    }

    /// Discard nodes allocated after a parser checkpoint. Only the
    /// parser's speculative parses use this; ids handed out to clients
    /// are never invalidated.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    pub(crate) fn set_span(&mut self, id: NodeId, span: Span) {
        self.nodes[id.index()].span = Some(span);
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()].data
    }

    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.nodes[id.index()].span
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].data.kind()
    }

    /// Identifier text, if `id` is an identifier.
    pub fn identifier_name(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            NodeData::Identifier { name } => Some(name),
            _ => None,
        }
    }

    // ========================================================================
    // Builders for commonly synthesized nodes. Anything not covered here
    // can be allocated directly with `alloc(NodeData::...)`.
    // ========================================================================

    pub fn identifier(&mut self, name: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Identifier { name: name.into() })
    }

    pub fn string_literal(&mut self, value: impl Into<String>) -> NodeId {
        self.alloc(NodeData::StringLiteral {
            value: value.into(),
        })
    }

    pub fn numeric_literal(&mut self, value: f64) -> NodeId {
        self.alloc(NodeData::NumericLiteral { value })
    }

    pub fn variable_declaration(&mut self, kind: VarKind, declarations: Vec<NodeId>) -> NodeId {
        self.alloc(NodeData::VariableDeclaration { kind, declarations })
    }

    pub fn variable_declarator(&mut self, id: NodeId, init: Option<NodeId>) -> NodeId {
        self.alloc(NodeData::VariableDeclarator { id, init })
    }

    pub fn function_expression(
        &mut self,
        id: Option<NodeId>,
        params: Vec<NodeId>,
        body: NodeId,
    ) -> NodeId {
        self.alloc(NodeData::FunctionExpression {
            id,
            params,
            body,
            is_async: false,
            is_generator: false,
        })
    }

    pub fn call_expression(&mut self, callee: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.alloc(NodeData::CallExpression { callee, arguments })
    }

    pub fn member_expression(&mut self, object: NodeId, property: NodeId) -> NodeId {
        self.alloc(NodeData::MemberExpression {
            object,
            property,
            computed: false,
        })
    }

    pub fn expression_statement(&mut self, expression: NodeId) -> NodeId {
        self.alloc(NodeData::ExpressionStatement { expression })
    }

    pub fn block_statement(&mut self, body: Vec<NodeId>) -> NodeId {
        self.alloc(NodeData::BlockStatement { body })
    }

    pub fn export_named_declaration(&mut self, declaration: NodeId) -> NodeId {
        self.alloc(NodeData::ExportNamedDeclaration { declaration })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_per_allocation() {
        let mut arena = NodeArena::new();
        let a = arena.identifier("x");
        let b = arena.identifier("x");
        assert_ne!(a, b);
        assert_eq!(arena.data(a), arena.data(b));
        assert_eq!(arena.span(a), None);
    }
}
