//! Client synchronization state machine.
//!
//! A client keeps at most one operation in flight to the server. Edits made
//! while waiting for the acknowledgement are composed into a local buffer that
//! is sent once the outstanding operation is acked. Remote operations are
//! transformed past the outstanding operation and the buffer before being
//! applied locally.
//!
//! ```text
//!                 apply_client               apply_client
//!  Synchronized ───────────────► AwaitingConfirm ───────────► AwaitingWithBuffer
//!       ▲                         │        ▲                          │
//!       └───────── server_ack ────┘        └──── server_ack (send) ───┘
//! ```


use tracing::{debug, trace};
use weft_primitives::{Operation, Revision, Selection};

use crate::error::{ClientError, Result};
use crate::signal::Signal;

/// Side effects the state machine needs from its owner.
pub trait SyncHost {
	/// Sends a local operation based on `revision` to the server.
	fn send_operation(&mut self, revision: Revision, operation: &Operation);

	/// Applies an already-transformed remote operation to the local document.
	fn apply_operation(&mut self, operation: &Operation) -> Result<()>;
}

/// Synchronization state of a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClientState {
	/// No local edit is waiting for the server.
	#[default]
	Synchronized,
	/// One local edit was sent and is waiting for its ack.
	AwaitingConfirm {
		/// The sent, unacknowledged operation.
		outstanding: Operation,
	},
	/// One local edit is in flight and later edits are buffered.
	AwaitingWithBuffer {
		/// The sent, unacknowledged operation.
		outstanding: Operation,
		/// Local edits made after `outstanding`, not yet sent.
		buffer: Operation,
	},
}

/// Data-free discriminant of [`ClientState`], for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientStateKind {
	/// See [`ClientState::Synchronized`].
	Synchronized,
	/// See [`ClientState::AwaitingConfirm`].
	AwaitingConfirm,
	/// See [`ClientState::AwaitingWithBuffer`].
	AwaitingWithBuffer,
}

impl ClientState {
	/// Returns the discriminant of this state.
	pub fn kind(&self) -> ClientStateKind {
		match self {
			Self::Synchronized => ClientStateKind::Synchronized,
			Self::AwaitingConfirm { .. } => ClientStateKind::AwaitingConfirm,
			Self::AwaitingWithBuffer { .. } => ClientStateKind::AwaitingWithBuffer,
		}
	}

	/// The operation in flight, if any.
	pub fn outstanding(&self) -> Option<&Operation> {
		match self {
			Self::Synchronized => None,
			Self::AwaitingConfirm { outstanding } | Self::AwaitingWithBuffer { outstanding, .. } => {
				Some(outstanding)
			}
		}
	}

	/// The buffered local edits, if any.
	pub fn buffer(&self) -> Option<&Operation> {
		match self {
			Self::AwaitingWithBuffer { buffer, .. } => Some(buffer),
			_ => None,
		}
	}

	/// Handles a local edit based on the client's current document.
	pub fn apply_client(
		&self,
		host: &mut impl SyncHost,
		revision: Revision,
		operation: Operation,
	) -> Result<ClientState> {
		Ok(match self {
			Self::Synchronized => {
				host.send_operation(revision, &operation);
				Self::AwaitingConfirm {
					outstanding: operation,
				}
			}
			Self::AwaitingConfirm { outstanding } => Self::AwaitingWithBuffer {
				outstanding: outstanding.clone(),
				buffer: operation,
			},
			Self::AwaitingWithBuffer {
				outstanding,
				buffer,
			} => Self::AwaitingWithBuffer {
				outstanding: outstanding.clone(),
				buffer: buffer.compose(&operation)?,
			},
		})
	}

	/// Handles an operation from another client, based on the last acked revision.
	pub fn apply_server(&self, host: &mut impl SyncHost, operation: &Operation) -> Result<ClientState> {
		Ok(match self {
			Self::Synchronized => {
				host.apply_operation(operation)?;
				Self::Synchronized
			}
			Self::AwaitingConfirm { outstanding } => {
				let (outstanding, operation) = Operation::transform(outstanding, operation)?;
				host.apply_operation(&operation)?;
				Self::AwaitingConfirm { outstanding }
			}
			Self::AwaitingWithBuffer {
				outstanding,
				buffer,
			} => {
				let (outstanding, operation) = Operation::transform(outstanding, operation)?;
				let (buffer, operation) = Operation::transform(buffer, &operation)?;
				host.apply_operation(&operation)?;
				Self::AwaitingWithBuffer {
					outstanding,
					buffer,
				}
			}
		})
	}

	/// Handles the server acknowledging the outstanding operation.
	///
	/// `revision` is the revision after the acked operation; a buffered edit is
	/// sent against it.
	///
	/// # Errors
	///
	/// [`ClientError::NoPendingOperation`] when synchronized.
	pub fn server_ack(&self, host: &mut impl SyncHost, revision: Revision) -> Result<ClientState> {
		match self {
			Self::Synchronized => Err(ClientError::NoPendingOperation),
			Self::AwaitingConfirm { .. } => Ok(Self::Synchronized),
			Self::AwaitingWithBuffer { buffer, .. } => {
				host.send_operation(revision, buffer);
				Ok(Self::AwaitingConfirm {
					outstanding: buffer.clone(),
				})
			}
		}
	}

	/// Maps a selection relative to the last acked revision into the local document.
	pub fn transform_selection(&self, selection: &Selection) -> Selection {
		match self {
			Self::Synchronized => selection.clone(),
			Self::AwaitingConfirm { outstanding } => selection.transform(outstanding),
			Self::AwaitingWithBuffer {
				outstanding,
				buffer,
			} => selection.transform(outstanding).transform(buffer),
		}
	}

	/// Re-sends the outstanding operation after a reconnect. The buffer was never
	/// sent and stays local.
	pub fn resend(&self, host: &mut impl SyncHost, revision: Revision) {
		if let Some(outstanding) = self.outstanding() {
			host.send_operation(revision, outstanding);
		}
	}
}

/// Protocol core of a client: its revision and synchronization state.
#[derive(Debug, Default)]
pub struct Client {
	revision: Revision,
	state: ClientState,
	/// Emitted after every transition, including ones that keep the same state.
	pub state_changed: Signal<ClientStateKind>,
}

impl Client {
	/// Creates a synchronized client at `revision`.
	pub fn new(revision: Revision) -> Self {
		Self {
			revision,
			..Self::default()
		}
	}

	/// Last revision acknowledged or received from the server.
	pub fn revision(&self) -> Revision {
		self.revision
	}

	/// Current state.
	pub fn state(&self) -> &ClientState {
		&self.state
	}

	/// Discriminant of the current state.
	pub fn state_kind(&self) -> ClientStateKind {
		self.state.kind()
	}

	fn set_state(&mut self, state: ClientState) {
		let kind = state.kind();
		if kind != self.state.kind() {
			trace!(from = ?self.state.kind(), to = ?kind, revision = %self.revision, "client state changed");
		}
		self.state = state;
		self.state_changed.emit(&kind);
	}

	/// Feeds a local edit into the state machine.
	pub fn apply_client(&mut self, host: &mut impl SyncHost, operation: Operation) -> Result<()> {
		let next = self.state.apply_client(host, self.revision, operation)?;
		self.set_state(next);
		Ok(())
	}

	/// Feeds a remote operation into the state machine and advances the revision.
	pub fn apply_server(&mut self, host: &mut impl SyncHost, operation: &Operation) -> Result<()> {
		let next = self.state.apply_server(host, operation)?;
		self.revision = self.revision.next();
		debug!(revision = %self.revision, "remote operation applied");
		self.set_state(next);
		Ok(())
	}

	/// Handles an ack of the outstanding operation and advances the revision.
	pub fn server_ack(&mut self, host: &mut impl SyncHost) -> Result<()> {
		let revision = self.revision.next();
		let next = self.state.server_ack(host, revision)?;
		self.revision = revision;
		debug!(revision = %self.revision, "operation acknowledged");
		self.set_state(next);
		Ok(())
	}

	/// Re-sends the outstanding operation after reconnecting.
	pub fn server_reconnect(&mut self, host: &mut impl SyncHost) {
		debug!(revision = %self.revision, state = ?self.state.kind(), "resending after reconnect");
		self.state.resend(host, self.revision);
	}

	/// Maps a peer selection from the server's view into the local document.
	pub fn transform_selection(&self, selection: &Selection) -> Selection {
		self.state.transform_selection(selection)
	}
}
