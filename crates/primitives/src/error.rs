//! Error types for operation algebra and wire decoding.

use thiserror::Error;

use crate::range::CharLen;

/// Errors raised by operation application, composition, transformation and decoding.
///
/// All of these indicate a caller-side invariant violation (mismatched revisions,
/// corrupted streams); none is recoverable inside the algebra.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
	/// The document length differs from the operation's base length.
	#[error("operation expects a document of length {expected}, got {actual}")]
	LengthMismatch {
		/// Base length the operation was built for.
		expected: CharLen,
		/// Length of the document it was applied to.
		actual: CharLen,
	},

	/// The step sequence does not describe a valid edit of the input.
	#[error("invalid operation: {0}")]
	InvalidOperation(&'static str),

	/// Two operations do not chain (compose) or share a base (transform).
	#[error("incompatible operations: {0}")]
	IncompatibleOperations(&'static str),

	/// A wire value could not be decoded into an operation.
	#[error("malformed operation: {0}")]
	MalformedOperation(String),
}

/// Result type for operation algebra.
pub type Result<T> = std::result::Result<T, OperationError>;
