//! Edit store and differential printer for the remod codemod engine.
//!
//! Client code records pending edits against a parsed tree in an
//! [`EditStore`] — the tree itself is never mutated — and then calls
//! [`generate`], which walks the tree once and decides, node by node,
//! whether to copy original bytes verbatim or synthesize text through
//! the per-kind layout rules. With no edits the output reproduces the
//! input byte for byte (trailing-newline presence tracks the input);
//! with edits, only the edited regions change.

mod edits;
mod error;
mod generate;
mod layout;
mod options;
mod writer;

pub use edits::EditStore;
pub use error::{EditError, PrintError};
pub use generate::generate;
pub use options::{
    IndentStyle, NumberEncoding, OverrideTable, PrintOptions, QuoteStyle, RecordTupleSyntax,
};
