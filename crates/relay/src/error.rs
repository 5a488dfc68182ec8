//! Error types for the relay.

use thiserror::Error;
use weft_primitives::{OperationError, Revision};

/// Errors raised while receiving a submission.
#[derive(Debug, Error)]
pub enum RelayError {
	/// The submission claims a revision the relay has not reached.
	#[error("client revision {client} is ahead of current revision {current}")]
	RevisionAhead {
		/// Revision the client based its operation on.
		client: Revision,
		/// Latest committed revision.
		current: Revision,
	},

	/// The log disagrees with the relay about how many operations follow a revision.
	#[error("revision log returned {actual} operations after {since}, expected {expected}")]
	LogInconsistent {
		/// Revision the operations were requested after.
		since: Revision,
		/// Count implied by the current revision.
		expected: u64,
		/// Count the log returned.
		actual: u64,
	},

	/// The revision log failed.
	#[error("revision log failure: {0}")]
	Log(String),

	/// The submitted operation does not fit the document.
	#[error(transparent)]
	Operation(#[from] OperationError),

	/// Configuration text could not be parsed.
	#[error("config parse error: {0}")]
	Config(#[from] toml::de::Error),
}

/// Result type for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;
