//! Common types and utilities for the remod codemod engine.
//!
//! This crate provides foundational types used across all remod crates:
//! - Source spans (`Span`)
//! - Line/column lookup (`LineMap`, `Position`)
//! - Comment records (`Comment`, `CommentKind`)
//! - Safe string slicing helpers

pub mod comments;
pub mod position;
pub mod safe_slice;
pub mod span;

pub use comments::{Comment, CommentKind};
pub use position::{LineMap, Position};
pub use span::Span;
