//! Operations carrying cursor context.
//!
//! A [`WrappedOperation`] pairs an [`Operation`] with optional metadata that
//! must follow the operation through composition and transformation, such as
//! the selection a peer had when sending it, or the before/after selection
//! bracket of an undo entry.

use crate::error::Result;
use crate::operation::Operation;
use crate::selection::{SelfSelection, Selection};

/// Metadata that can follow an operation through the algebra.
pub trait OperationMeta: Clone {
	/// Combines the metadata of two consecutive operations.
	fn compose(&self, other: &Self) -> Self;

	/// Adjusts the metadata for a concurrent `operation`.
	fn transform(&self, operation: &Operation) -> Self;
}

impl OperationMeta for Selection {
	fn compose(&self, other: &Self) -> Self {
		Selection::compose(self, other)
	}

	fn transform(&self, operation: &Operation) -> Self {
		Selection::transform(self, operation)
	}
}

impl OperationMeta for SelfSelection {
	fn compose(&self, other: &Self) -> Self {
		SelfSelection::compose(self, other)
	}

	fn transform(&self, operation: &Operation) -> Self {
		SelfSelection::transform(self, operation)
	}
}

/// An operation with optional metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedOperation<M = SelfSelection> {
	/// The text operation.
	pub operation: Operation,
	/// Attached metadata; `None` for operations without cursor context.
	pub meta: Option<M>,
}

impl<M: OperationMeta> WrappedOperation<M> {
	/// Wraps `operation` with `meta`.
	pub fn new(operation: Operation, meta: Option<M>) -> Self {
		Self { operation, meta }
	}

	/// Wraps `operation` without metadata.
	pub fn bare(operation: Operation) -> Self {
		Self::new(operation, None)
	}

	/// Applies the wrapped operation to `doc`.
	pub fn apply(&self, doc: &str) -> Result<String> {
		self.operation.apply(doc)
	}

	/// Inverts the wrapped operation, keeping the metadata as is.
	pub fn invert(&self, doc: &str) -> Result<Self> {
		Ok(Self::new(self.operation.invert(doc)?, self.meta.clone()))
	}

	/// Composes with a following operation.
	///
	/// Metadata is composed only when both sides carry some.
	pub fn compose(&self, other: &Self) -> Result<Self> {
		let meta = match (&self.meta, &other.meta) {
			(Some(a), Some(b)) => Some(a.compose(b)),
			_ => None,
		};
		Ok(Self::new(self.operation.compose(&other.operation)?, meta))
	}

	/// Transforms two concurrent wrapped operations.
	///
	/// Each side's metadata is mapped through the *other* side's operation.
	pub fn transform(a: &Self, b: &Self) -> Result<(Self, Self)> {
		let (a_prime, b_prime) = Operation::transform(&a.operation, &b.operation)?;
		Ok((
			Self::new(a_prime, a.meta.as_ref().map(|m| m.transform(&b.operation))),
			Self::new(b_prime, b.meta.as_ref().map(|m| m.transform(&a.operation))),
		))
	}
}
