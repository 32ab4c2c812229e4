//! Lexical scope resolution.
//!
//! [`analyze`] runs two passes over a parsed tree: the first registers
//! every binding with its owning scope (walking outward from the
//! declaration under hoisting rules, never by source order), the second
//! resolves every value-read identifier to the innermost matching
//! binding or records it as a global. The resulting [`ScopeInfo`] is a
//! set of read-only identity-keyed maps; compute it once per session.

mod reference;
mod resolver;

pub use reference::is_reference;
pub use resolver::analyze;

use indexmap::IndexMap;
use remod_common::Span;
use remod_parser::{NodeId, NodeKind};
use rustc_hash::FxHashMap;
use std::fmt;

/// Binding and reference tables produced by [`analyze`].
///
/// "Declaration identifier" below always means the identifier node that
/// introduced the name, not the surrounding declaration statement.
#[derive(Debug, Default)]
pub struct ScopeInfo {
    /// Reference identifier → declaration identifier.
    pub declarations: FxHashMap<NodeId, NodeId>,
    /// Declaration identifier → references, in document order.
    pub references: FxHashMap<NodeId, Vec<NodeId>>,
    /// Declaration identifier → the scope node owning the binding.
    pub declaration_scope: FxHashMap<NodeId, NodeId>,
    /// `arguments` identifier → the non-arrow function it reads from.
    pub arguments_bindings: FxHashMap<NodeId, NodeId>,
    /// Non-arrow function → its `arguments` reads, in document order.
    pub arguments_references: FxHashMap<NodeId, Vec<NodeId>>,
    /// `this` expression → the non-arrow function it reads from.
    pub this_bindings: FxHashMap<NodeId, NodeId>,
    /// Non-arrow function → its `this` reads, in document order.
    pub this_references: FxHashMap<NodeId, Vec<NodeId>>,
    /// `this` reads with no enclosing non-arrow function.
    pub global_this: Vec<NodeId>,
    /// Unresolved name → occurrences, keyed in first-seen order.
    pub globals: IndexMap<String, Vec<NodeId>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// A node kind showed up in binding-pattern position that the
    /// resolver has no handling for. This is a defect in the grammar
    /// mapping, not a recoverable input problem.
    UnsupportedPattern {
        kind: NodeKind,
        span: Option<Span>,
    },
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeError::UnsupportedPattern { kind, span } => {
                write!(f, "unsupported binding pattern kind {kind}")?;
                if let Some(span) = span {
                    write!(f, " at {span}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ScopeError {}

/// Function-like-or-module scopes: the binding targets of `var`,
/// function and class declarations, and import specifiers.
pub fn is_scope(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Program
            | NodeKind::FunctionDeclaration
            | NodeKind::FunctionExpression
            | NodeKind::ArrowFunctionExpression
            | NodeKind::ClassMethod
    )
}

/// Block-like scopes: the binding targets of `let`/`const`.
pub fn is_block_scope(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::BlockStatement
            | NodeKind::ForStatement
            | NodeKind::ForInStatement
            | NodeKind::ForOfStatement
            | NodeKind::CatchClause
    ) || is_scope(kind)
}

/// Non-arrow function-likes declare `arguments`.
pub fn declares_arguments(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::FunctionDeclaration | NodeKind::FunctionExpression | NodeKind::ClassMethod
    )
}

/// `this` has the same owners as `arguments`.
pub fn declares_this(kind: NodeKind) -> bool {
    declares_arguments(kind)
}
