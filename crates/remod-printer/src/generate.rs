//! The differential printer.
//!
//! One depth-first pass over the tree, alternating between two modes.
//! In **Verbatim** mode output comes from copying a contiguous byte
//! range of the original source; meeting a ranged node emits the
//! literal gap up to its start, processes the node structurally, and
//! resumes copying from its end. In **Structural** mode output is
//! synthesized by the per-kind layout rules in [`crate::layout`].
//!
//! The transition discipline is strict: a verbatim region opened while
//! visiting a node closes before or exactly when that node's frame
//! returns, and a range-less node met while verbatim copying expects to
//! resume is a defect. Both abort the whole call — there is no partial
//! output.

use crate::edits::EditStore;
use crate::error::PrintError;
use crate::options::{OverrideTable, PrintOptions};
use crate::writer::Writer;
use remod_common::safe_slice;
use remod_parser::children::for_each_child;
use remod_parser::{NodeArena, NodeId};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Regenerate source text for `root`, consulting `edits` and the
/// original `source`. With an empty edit store the output equals the
/// input byte for byte, except that trailing-newline presence tracks
/// the input.
pub fn generate(
    arena: &NodeArena,
    root: NodeId,
    source: &str,
    edits: &EditStore,
    overrides: &OverrideTable,
    options: PrintOptions,
) -> Result<String, PrintError> {
    let writer = Writer::new(options.indent_unit());
    let mut printer = Printer {
        arena,
        source,
        edits,
        overrides,
        options,
        writer,
        mode: Mode::Structural,
        substituting: FxHashSet::default(),
        active_overrides: FxHashSet::default(),
        in_for_head: false,
    };
    printer.print_node(root)?;
    let mut out = printer.writer.finish();

    // Trailing-newline presence tracks the input.
    if source.ends_with('\n') {
        if !out.ends_with('\n') {
            out.push('\n');
        }
    } else {
        while out.ends_with('\n') {
            out.pop();
        }
    }
    debug!(input = source.len(), output = out.len(), "generated");
    Ok(out)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Structural,
    /// Copying original bytes; `cursor` is the next byte to copy,
    /// `end` the exclusive bound of the open region.
    Verbatim { cursor: u32, end: u32 },
}

pub(crate) struct Printer<'a> {
    pub(crate) arena: &'a NodeArena,
    pub(crate) source: &'a str,
    pub(crate) edits: &'a EditStore,
    pub(crate) overrides: &'a OverrideTable,
    pub(crate) options: PrintOptions,
    pub(crate) writer: Writer,
    mode: Mode,
    /// Nodes whose substitution is already being printed in this call
    /// stack; guards `replace(n, [n, ...])`-style cycles.
    substituting: FxHashSet<NodeId>,
    /// Nodes whose layout override is already active.
    active_overrides: FxHashSet<NodeId>,
    /// Set while printing a `for (...)` head, where a structurally
    /// emitted variable declaration must not print its own terminator.
    pub(crate) in_for_head: bool,
}

impl<'a> Printer<'a> {
    /// Visit one node: apply a pending layout override, intercept for
    /// verbatim copying, then hand off to structural processing.
    pub(crate) fn print_node(&mut self, id: NodeId) -> Result<(), PrintError> {
        if !self.active_overrides.contains(&id)
            && let Some(override_options) = self.overrides.get(id)
        {
            let saved = std::mem::replace(&mut self.options, override_options.clone());
            self.writer.set_indent_unit(self.options.indent_unit());
            self.active_overrides.insert(id);
            let result = self.print_node(id);
            self.active_overrides.remove(&id);
            self.writer.set_indent_unit(saved.indent_unit());
            self.options = saved;
            return result;
        }

        if let Mode::Verbatim { cursor, end } = self.mode {
            let Some(span) = self.arena.span(id) else {
                return Err(PrintError::MissingRange { node: id });
            };
            if span.start > cursor {
                self.copy(cursor, span.start);
            }
            self.mode = Mode::Structural;
            self.print_structural(id)?;
            self.mode = Mode::Verbatim {
                cursor: span.end.max(cursor),
                end,
            };
            return Ok(());
        }

        self.print_structural(id)
    }

    /// Structural processing: substitution from the edit store first,
    /// then removal-aware synthesis, then verbatim descent for ranged
    /// nodes, and pure layout for synthetic ones.
    fn print_structural(&mut self, id: NodeId) -> Result<(), PrintError> {
        debug_assert_eq!(self.mode, Mode::Structural);

        if !self.substituting.contains(&id)
            && let Some(resolved) = self.edits.resolve(id)
        {
            self.substituting.insert(id);
            let result = self.print_substitution(&resolved);
            self.substituting.remove(&id);
            return result;
        }

        if self.edits.is_removal_parent(id) {
            // Removed children must not be copied, so the node is laid
            // out structurally; the join rules reuse original gaps
            // between surviving ranged siblings.
            return self.emit_node(id);
        }

        if let Some(span) = self.arena.span(id) {
            self.mode = Mode::Verbatim {
                cursor: span.start,
                end: span.end,
            };
            let mut result = Ok(());
            for_each_child(self.arena.data(id), |child| {
                if result.is_ok() {
                    result = self.print_node(child);
                }
            });
            result?;
            match self.mode {
                Mode::Verbatim { cursor, end } if end == span.end => {
                    if span.end > cursor {
                        self.copy(cursor, span.end);
                    }
                    self.mode = Mode::Structural;
                    Ok(())
                }
                _ => Err(PrintError::ModeInvariantViolation { node: id }),
            }
        } else {
            self.emit_node(id)
        }
    }

    /// Print a resolved substitution list. Statements go on their own
    /// lines; anything else joins with `", "`.
    fn print_substitution(&mut self, nodes: &[NodeId]) -> Result<(), PrintError> {
        for (i, &node) in nodes.iter().enumerate() {
            if i > 0 {
                let previous = nodes[i - 1];
                if self.arena.kind(previous).is_statement() || self.arena.kind(node).is_statement()
                {
                    self.writer.write_line();
                    self.writer.flush_indent();
                } else {
                    self.writer.write(", ");
                }
            }
            self.print_node(node)?;
        }
        Ok(())
    }

    /// Copy `[from, to)` of the original source into the output.
    pub(crate) fn copy(&mut self, from: u32, to: u32) {
        let text = safe_slice::slice(self.source, from as usize, to as usize);
        self.writer.write_raw(text);
    }
}
