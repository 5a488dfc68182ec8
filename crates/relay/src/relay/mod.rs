//! Per-document transform relay.
//!
//! # Invariants
//!
//! - Revision `n` is the document after the first `n` entries of the log; the
//!   relay's rope always equals that document.
//! - Receiving a submission is atomic with respect to other submissions for
//!   the same document: fetching concurrent operations, validating, appending
//!   and advancing the revision happen under one lock.
//! - A submission is committed at most once. Re-sending it (same client, same
//!   base revision) returns the original commit while it is still within the
//!   dedupe window.

#[cfg(test)]
mod tests;

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info, trace, warn};
use weft_primitives::{Revision, Rope, Selection, WrappedOperation};

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::log::RevisionLog;

/// Identifies the client that submitted an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "client#{}", self.0)
	}
}

/// An operation sent by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
	/// Sender.
	pub client: ClientId,
	/// Revision the operation is based on.
	pub revision: Revision,
	/// The operation and the sender's selection after it.
	pub operation: WrappedOperation<Selection>,
}

/// A committed operation, as acknowledged to its sender and broadcast to everyone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedOperation {
	/// Revision this operation produced.
	pub revision: Revision,
	/// Sender.
	pub client: ClientId,
	/// The operation rebased onto the previous revision.
	pub operation: WrappedOperation<Selection>,
}

/// State guarded by the relay lock.
struct RelayState {
	current: Revision,
	text: Rope,
	/// Recent commits keyed by `(client, base revision)`, oldest first.
	recent: VecDeque<((ClientId, Revision), RelayedOperation)>,
}

/// Authority for one document.
pub struct DocumentRelay<L> {
	log: L,
	config: RelayConfig,
	state: Mutex<RelayState>,
	events: broadcast::Sender<RelayedOperation>,
}

impl<L: RevisionLog> DocumentRelay<L> {
	/// Creates a relay for a document at `revision` with contents `text`.
	///
	/// `log` must hold exactly `revision` operations.
	pub fn new(log: L, revision: Revision, text: &str, config: RelayConfig) -> Self {
		let (events, _) = broadcast::channel(config.broadcast_capacity.max(1));
		Self {
			log,
			config,
			state: Mutex::new(RelayState {
				current: revision,
				text: Rope::from(text),
				recent: VecDeque::new(),
			}),
			events,
		}
	}

	pub fn log(&self) -> &L {
		&self.log
	}

	pub fn config(&self) -> &RelayConfig {
		&self.config
	}

	/// Latest committed revision.
	pub async fn current_revision(&self) -> Revision {
		self.state.lock().await.current
	}

	/// Latest revision and the document at it, for late joiners.
	pub async fn snapshot(&self) -> (Revision, String) {
		let state = self.state.lock().await;
		(state.current, state.text.to_string())
	}

	/// Receives every operation committed from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<RelayedOperation> {
		self.events.subscribe()
	}

	/// Rebases a submission onto the latest revision and commits it.
	///
	/// The operation is transformed against every operation committed after
	/// its base revision, in commit order. The submission is the left operand
	/// of each transform and wins position ties, as a client's outstanding
	/// operation does against incoming ones. The result is returned to the sender as its ack and broadcast to
	/// subscribers.
	///
	/// # Errors
	///
	/// - [`RelayError::RevisionAhead`] if the base revision is in the future.
	/// - [`RelayError::LogInconsistent`] if the log returns the wrong number of
	///   concurrent operations.
	/// - [`RelayError::Operation`] if the operation does not fit the document.
	///
	/// Nothing is appended or broadcast on error.
	pub async fn receive_operation(&self, submission: Submission) -> Result<RelayedOperation> {
		let Submission {
			client,
			revision,
			operation,
		} = submission;
		let key = (client, revision);

		let mut state = self.state.lock().await;

		if let Some((_, committed)) = state.recent.iter().find(|(k, _)| *k == key) {
			info!(%client, base = %revision, committed = %committed.revision, "duplicate submission");
			return Ok(committed.clone());
		}

		let behind = state.current.since(revision).ok_or_else(|| {
			warn!(%client, base = %revision, current = %state.current, "submission ahead of relay");
			RelayError::RevisionAhead {
				client: revision,
				current: state.current,
			}
		})?;

		let concurrent = self.log.operations_after(revision).await?;
		if concurrent.len() as u64 != behind {
			warn!(since = %revision, expected = behind, actual = concurrent.len(), "revision log inconsistent");
			return Err(RelayError::LogInconsistent {
				since: revision,
				expected: behind,
				actual: concurrent.len() as u64,
			});
		}

		let mut operation = operation;
		for committed in concurrent {
			(operation, _) = WrappedOperation::transform(&operation, &WrappedOperation::bare(committed))?;
		}
		trace!(%client, concurrent = behind, "submission rebased");

		let mut text = state.text.clone();
		if let Err(err) = operation.operation.apply_to_rope(&mut text) {
			warn!(%client, base = %revision, error = %err, "submission rejected");
			return Err(err.into());
		}

		self.log.append(operation.operation.clone()).await?;
		state.text = text;
		state.current = state.current.next();

		let relayed = RelayedOperation {
			revision: state.current,
			client,
			operation,
		};
		state.recent.push_back((key, relayed.clone()));
		while state.recent.len() > self.config.dedupe_window {
			state.recent.pop_front();
		}

		info!(%client, base = %revision, revision = %relayed.revision, "operation committed");
		if self.events.send(relayed.clone()).is_err() {
			debug!(revision = %relayed.revision, "no subscribers");
		}
		Ok(relayed)
	}
}
