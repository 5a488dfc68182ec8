//! Error types for the client.

use thiserror::Error;
use weft_primitives::OperationError;

/// Errors raised by the client state machine, undo history and orchestrator.
#[derive(Debug, Error)]
pub enum ClientError {
	/// A server ack arrived while no operation was outstanding.
	#[error("no pending operation: client is not expecting a server ack")]
	NoPendingOperation,

	/// Undo was requested with an empty undo stack.
	#[error("nothing to undo")]
	NoPendingUndo,

	/// Redo was requested with an empty redo stack.
	#[error("nothing to redo")]
	NoPendingRedo,

	/// An operation failed to apply, compose or transform.
	#[error(transparent)]
	Operation(#[from] OperationError),

	/// Configuration text could not be parsed.
	#[error("config parse error: {0}")]
	Config(#[from] toml::de::Error),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
