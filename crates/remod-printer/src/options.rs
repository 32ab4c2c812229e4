//! Print configuration and the per-node override table.
//!
//! Every option may be set globally on [`PrintOptions`] or overridden
//! for a single node through [`OverrideTable`]. Overrides are scoped:
//! they apply to the overridden node and everything synthesized beneath
//! it, then the previous configuration is restored. The usual client is
//! quote-preserving string replacement, where a fresh literal mimics
//! the quoting of the text it replaces.

use remod_parser::NodeId;
use rustc_hash::FxHashMap;

/// Quoting for synthesized string literals.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QuoteStyle {
    Single,
    Double,
    Backtick,
    /// Double quotes with escapes restricted to the JSON-safe set.
    JsonSafe,
}

/// Encoding for synthesized numeric literals. Non-integral values
/// always fall back to decimal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NumberEncoding {
    Decimal,
    Binary,
    Octal,
    Hexadecimal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IndentStyle {
    Spaces,
    Tabs,
}

/// Record and tuple literal spelling: `{| ... |}` / `[| ... |]` or
/// `#{ ... }` / `#[ ... ]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecordTupleSyntax {
    Bar,
    Hash,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrintOptions {
    pub quotes: QuoteStyle,
    pub numbers: NumberEncoding,
    /// When disabled, the printer stops carrying comments into
    /// synthesized output; this includes reused inter-sibling gaps that
    /// contain a comment. Verbatim regions always keep their bytes.
    pub comments: bool,
    pub indent_style: IndentStyle,
    /// Spaces per indent level. Ignored for [`IndentStyle::Tabs`].
    pub indent_width: u8,
    /// Emit a decorated class's decorators before the `export` keyword
    /// rather than between `export` and `class`.
    pub decorators_before_export: bool,
    pub record_tuple: RecordTupleSyntax,
}

impl Default for PrintOptions {
    fn default() -> PrintOptions {
        PrintOptions {
            quotes: QuoteStyle::Double,
            numbers: NumberEncoding::Decimal,
            comments: true,
            indent_style: IndentStyle::Spaces,
            indent_width: 2,
            decorators_before_export: false,
            record_tuple: RecordTupleSyntax::Bar,
        }
    }
}

impl PrintOptions {
    /// The text of one indent level.
    pub fn indent_unit(&self) -> String {
        match self.indent_style {
            IndentStyle::Tabs => "\t".to_string(),
            IndentStyle::Spaces => " ".repeat(self.indent_width as usize),
        }
    }
}

/// Per-node layout overrides, keyed by node identity.
#[derive(Debug, Default)]
pub struct OverrideTable {
    overrides: FxHashMap<NodeId, PrintOptions>,
}

impl OverrideTable {
    pub fn new() -> OverrideTable {
        OverrideTable::default()
    }

    /// Register `options` for `node`, replacing any prior override.
    pub fn set_override(&mut self, node: NodeId, options: PrintOptions) {
        self.overrides.insert(node, options);
    }

    pub fn get(&self, node: NodeId) -> Option<&PrintOptions> {
        self.overrides.get(&node)
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
