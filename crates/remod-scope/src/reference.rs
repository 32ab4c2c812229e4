//! Reference classification.
//!
//! Decides whether an identifier occurrence is a value read. Declaration
//! positions, non-computed property keys and labels are not references;
//! assignment targets are (renaming a binding must rewrite its writes
//! too).

use remod_parser::{NodeArena, NodeData, NodeId, NodeKind};

/// Is `node` (an identifier) a value read, given its parent and
/// grandparent?
pub fn is_reference(
    arena: &NodeArena,
    node: NodeId,
    parent: NodeId,
    grandparent: Option<NodeId>,
) -> bool {
    use NodeData::*;
    match arena.data(parent) {
        // Both sides of an assignment read or write the binding.
        AssignmentExpression { .. } => true,
        MemberExpression {
            object,
            property,
            computed,
        } => node == *object || (*computed && node == *property),
        VariableDeclarator { id, .. } => node != *id,
        ObjectProperty {
            key,
            computed,
            shorthand,
            ..
        } => {
            if !*shorthand && node == *key {
                return *computed;
            }
            // Value position (shorthand keys count as their own value):
            // a reference in an object literal, a binding in a pattern.
            !grandparent.is_some_and(|gp| arena.kind(gp) == NodeKind::ObjectPattern)
        }
        FunctionDeclaration { .. } | FunctionExpression { .. } => false,
        ArrowFunctionExpression { body, .. } => node == *body,
        ClassMethod { key, computed, .. } => node == *key && *computed,
        ClassDeclaration { super_class, .. } => Some(node) == *super_class,
        LabeledStatement { .. } | BreakStatement { .. } | ContinueStatement { .. } => false,
        ImportSpecifier { .. }
        | ImportDefaultSpecifier { .. }
        | ImportNamespaceSpecifier { .. } => false,
        CatchClause { .. } => false,
        RestElement { .. } => false,
        ArrayPattern { .. } => false,
        AssignmentPattern { right, .. } => node == *right,
        _ => true,
    }
}
