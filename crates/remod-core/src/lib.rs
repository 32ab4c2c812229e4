//! Session facade for the remod codemod engine.
//!
//! [`parse`] turns source text into a [`Session`] that owns the arena,
//! the original text, the edit store and the layout override table,
//! and computes scope information lazily, at most once. Everything a
//! codemod needs goes through the session: document-order queries,
//! scope lookups, the edit surface, and [`Session::print`].
//!
//! ```
//! use remod_core::parse;
//!
//! let mut session = parse("const greeting = 'hi';").unwrap();
//! let strings = session.find(|data| {
//!     matches!(data, remod_core::NodeData::StringLiteral { .. })
//! });
//! session.replace_string(strings[0], "hello");
//! let output = session.print(Default::default()).unwrap();
//! assert_eq!(output, "const greeting = 'hello';");
//! ```

mod removers;
mod session;

pub use removers::RemoveError;
pub use session::{Session, parse};

pub use remod_parser::{
    AssignOp, BinaryOp, LogicalOp, MethodKind, Node, NodeArena, NodeData, NodeId, NodeKind,
    ParseError, UnaryOp, UpdateOp, VarKind,
};
pub use remod_printer::{
    EditError, EditStore, IndentStyle, NumberEncoding, OverrideTable, PrintError, PrintOptions,
    QuoteStyle, RecordTupleSyntax,
};
pub use remod_scope::{ScopeError, ScopeInfo};
