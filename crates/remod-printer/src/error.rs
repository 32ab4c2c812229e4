//! Error types for edits and printing.
//!
//! [`EditError`] is a caller mistake and is raised synchronously at the
//! edit call site, so a bad request is attributable to the specific
//! `remove_child` call rather than surfacing later at print time.
//! [`PrintError`] variants are defects: the printer's mode discipline
//! was broken or a node that had to anchor a verbatim copy carries no
//! range. Neither is recoverable for the current call.

use remod_parser::{NodeId, NodeKind};
use std::fmt;

/// A structurally invalid edit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The named field does not exist on the parent's kind at all.
    NoSuchField { parent: NodeKind, field: String },
    /// The field exists but does not hold an ordered child sequence.
    NotASequence { parent: NodeKind, field: String },
    /// The sequence exists but does not currently contain the child.
    ChildNotPresent {
        parent: NodeKind,
        field: String,
        child: NodeId,
    },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::NoSuchField { parent, field } => {
                write!(f, "{parent} has no field named `{field}`")
            }
            EditError::NotASequence { parent, field } => {
                write!(f, "{parent}.{field} is not a child sequence")
            }
            EditError::ChildNotPresent {
                parent,
                field,
                child,
            } => {
                write!(f, "{parent}.{field} does not contain node {child}")
            }
        }
    }
}

impl std::error::Error for EditError {}

/// A defect detected while generating output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintError {
    /// A verbatim region opened during a node's frame did not close by
    /// the time the frame returned.
    ModeInvariantViolation { node: NodeId },
    /// A range-less node was encountered while the printer expected to
    /// resume verbatim copying.
    MissingRange { node: NodeId },
}

impl fmt::Display for PrintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintError::ModeInvariantViolation { node } => {
                write!(f, "verbatim region left open at node {node}")
            }
            PrintError::MissingRange { node } => {
                write!(f, "node {node} has no source range to resume verbatim copying from")
            }
        }
    }
}

impl std::error::Error for PrintError {}
