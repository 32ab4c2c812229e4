//! The remover cascade.
//!
//! [`Session::remove`] takes "delete this node" and turns it into the
//! right edit for the node's parent: usually a `remove_child` on the
//! containing sequence, but a removal that would leave a degenerate
//! parent removes or rewrites the parent instead — a single-declarator
//! variable statement goes away whole, a logical expression collapses
//! to its surviving operand, and so on. Counts are taken against the
//! parent's current survivors, so cascades compose with earlier
//! removals.

use crate::session::Session;
use remod_parser::{NodeData, NodeId, NodeKind};
use remod_printer::EditError;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveError {
    /// The node has no parent in this tree (it is the root, or it is
    /// not reachable from the root).
    NoParent { node: NodeId },
    /// No removal rule exists for this parent kind.
    Unsupported { parent: NodeKind },
    Edit(EditError),
}

impl fmt::Display for RemoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoveError::NoParent { node } => {
                write!(f, "node {node} has no parent to remove it from")
            }
            RemoveError::Unsupported { parent } => {
                write!(f, "no removal rule for a child of {parent}")
            }
            RemoveError::Edit(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for RemoveError {}

impl From<EditError> for RemoveError {
    fn from(err: EditError) -> RemoveError {
        RemoveError::Edit(err)
    }
}

impl Session {
    /// Remove `node` from the tree output, cascading to the parent
    /// where a plain child removal would leave degenerate syntax.
    pub fn remove(&mut self, node: NodeId) -> Result<(), RemoveError> {
        let Some(parent) = self.parent_of(node) else {
            return Err(RemoveError::NoParent { node });
        };
        let parent_kind = self.arena().kind(parent);
        debug!(%node, %parent, %parent_kind, "removing node");
        match parent_kind {
            NodeKind::ArrayExpression | NodeKind::ArrayPattern | NodeKind::TupleExpression => {
                self.remove_from(parent, "elements", node)
            }
            NodeKind::ObjectExpression | NodeKind::ObjectPattern | NodeKind::RecordExpression => {
                self.remove_from(parent, "properties", node)
            }
            NodeKind::FunctionDeclaration
            | NodeKind::FunctionExpression
            | NodeKind::ArrowFunctionExpression
            | NodeKind::ClassMethod => self.remove_from(parent, "params", node),
            NodeKind::Program | NodeKind::BlockStatement => self.remove_from(parent, "body", node),
            NodeKind::ClassDeclaration => {
                if self.arena().kind(node) == NodeKind::Decorator {
                    self.remove_from(parent, "decorators", node)
                } else {
                    self.remove_from(parent, "body", node)
                }
            }
            NodeKind::CallExpression | NodeKind::NewExpression => {
                self.remove_from(parent, "arguments", node)
            }
            NodeKind::SwitchStatement => self.remove_from(parent, "cases", node),
            NodeKind::SwitchCase => self.remove_from(parent, "consequent", node),
            // Removing an expression statement's expression removes the
            // statement; same for a named export's declaration.
            NodeKind::ExpressionStatement | NodeKind::ExportNamedDeclaration => self.remove(parent),
            NodeKind::ImportDeclaration => {
                let specifiers = match self.arena().data(parent) {
                    NodeData::ImportDeclaration { specifiers, .. } => specifiers.clone(),
                    _ => unreachable!("kind checked above"),
                };
                if self.surviving(parent, "specifiers", &specifiers) == 1 {
                    self.remove(parent)
                } else {
                    self.remove_from(parent, "specifiers", node)
                }
            }
            NodeKind::VariableDeclaration => {
                let declarations = match self.arena().data(parent) {
                    NodeData::VariableDeclaration { declarations, .. } => declarations.clone(),
                    _ => unreachable!("kind checked above"),
                };
                if self.surviving(parent, "declarations", &declarations) == 1 {
                    self.remove(parent)
                } else {
                    self.remove_from(parent, "declarations", node)
                }
            }
            NodeKind::LogicalExpression => {
                let (left, right) = match self.arena().data(parent) {
                    NodeData::LogicalExpression { left, right, .. } => (*left, *right),
                    _ => unreachable!("kind checked above"),
                };
                let survivor = if node == left { right } else { left };
                self.edits_mut().replace(parent, [survivor]);
                Ok(())
            }
            NodeKind::SequenceExpression => {
                let expressions = match self.arena().data(parent) {
                    NodeData::SequenceExpression { expressions } => expressions.clone(),
                    _ => unreachable!("kind checked above"),
                };
                let survivors: Vec<NodeId> = expressions
                    .iter()
                    .copied()
                    .filter(|&e| e != node && !self.edits().is_removed(parent, "expressions", e))
                    .collect();
                if survivors.len() == 1 {
                    self.edits_mut().replace(parent, [survivors[0]]);
                    Ok(())
                } else {
                    self.remove_from(parent, "expressions", node)
                }
            }
            other => Err(RemoveError::Unsupported { parent: other }),
        }
    }

    fn remove_from(
        &mut self,
        parent: NodeId,
        field: &'static str,
        child: NodeId,
    ) -> Result<(), RemoveError> {
        self.remove_child(parent, field, child)?;
        Ok(())
    }

    /// Children of `parent`'s `field` not yet removed.
    fn surviving(&self, parent: NodeId, field: &str, items: &[NodeId]) -> usize {
        items
            .iter()
            .filter(|&&item| !self.edits().is_removed(parent, field, item))
            .count()
    }
}
