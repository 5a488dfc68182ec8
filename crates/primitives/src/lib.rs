//! Operational transformation primitives for collaborative plain-text editing.
//!
//! - [`Operation`]: retain/insert/delete edits with `apply`, `invert`,
//!   `compose` and `transform`.
//! - [`Range`] and [`Selection`]: cursors that follow edits.
//! - [`WrappedOperation`]: an operation carrying selection context.
//! - [`SimpleOperation`]: single position-based edits.
//!
//! All lengths and offsets count Unicode scalar values (`char`s).

/// Error types for the operation algebra.
pub mod error;
/// Retain/insert/delete operations.
pub mod operation;
/// Text range types and index mapping.
pub mod range;
/// Revision numbers of a document history.
pub mod revision;
/// Multi-range selections.
pub mod selection;
/// Position-based single edits.
pub mod simple;
/// Character-indexed string helpers.
pub mod text;
/// Operations with attached selection metadata.
pub mod wrapped;

pub use error::{OperationError, Result};
pub use operation::{Insertion, Operation, Step};
pub use range::{CharIdx, CharLen, Range};
pub use revision::Revision;
pub use ropey::Rope;
pub use selection::{SelfSelection, Selection};
pub use simple::SimpleOperation;
pub use wrapped::{OperationMeta, WrappedOperation};
