//! JavaScript parser and syntax tree for the remod codemod engine.
//!
//! The tree is arena-allocated: every node lives in a [`NodeArena`] and
//! is addressed by a [`NodeId`]. Identity-keyed maps throughout the
//! engine (scope tables, edit store, layout overrides) key by `NodeId`,
//! so two structurally equal nodes are always distinct entries. Parsed
//! nodes carry a token-tight byte [`Span`](remod_common::Span);
//! synthesized nodes carry none.

pub mod arena;
pub mod children;
pub mod node;
pub mod parser;

pub use arena::NodeArena;
pub use node::{
    AssignOp, BinaryOp, LogicalOp, MethodKind, Node, NodeData, NodeId, NodeKind, UnaryOp,
    UpdateOp, VarKind,
};
pub use parser::{ParseError, ParseResult, parse};
