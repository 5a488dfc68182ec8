//! Collaborator traits the client drives, and the events they report.

use weft_primitives::{Operation, OperationError, Revision, Selection};

/// Renders the selections of remote peers.
pub trait PresenceRenderer<Id> {
	/// Handle for one rendered selection, returned to [`Self::clear_selection`].
	type Marker;

	/// Shows `selection` of `peer`, labelled with `name`.
	fn mark_selection(&mut self, peer: &Id, name: &str, selection: &Selection) -> Self::Marker;

	/// Removes a previously rendered selection.
	fn clear_selection(&mut self, marker: Self::Marker);
}

/// The editable text surface of the local user.
pub trait EditorSurface<Id>: PresenceRenderer<Id> {
	/// Current document contents.
	fn value(&self) -> String;

	/// Current local selection.
	fn selection(&self) -> Selection;

	/// Replaces the local selection.
	fn set_selection(&mut self, selection: &Selection);

	/// Applies an operation that did not originate from the local user.
	///
	/// Must not report the edit back as an [`EditorEvent::Change`].
	fn apply_operation(&mut self, operation: &Operation) -> Result<(), OperationError>;
}

/// Outgoing half of the server connection.
pub trait ServerTransport {
	/// Sends a local operation based on `revision`, with the selection after it.
	fn send_operation(&mut self, revision: Revision, operation: &Operation, selection: &Selection);

	/// Publishes the local selection, or `None` when the editor lost focus.
	fn send_selection(&mut self, selection: Option<&Selection>);
}

/// Events reported by the editor surface.
///
/// Each event carries the local selection as it was when the event happened,
/// so events may be handled after the editor has moved on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
	/// The local user edited the document.
	Change {
		/// The edit.
		operation: Operation,
		/// The edit's inverse, computed against the document before it.
		inverse: Operation,
		/// The local selection right after the edit.
		selection: Selection,
	},
	/// The local selection moved to the given selection.
	SelectionChange(Selection),
	/// The editor lost focus.
	Blur,
	/// The user asked to undo.
	Undo,
	/// The user asked to redo.
	Redo,
}

/// Events reported by the server connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent<Id> {
	/// Another client's operation, based on the client's current revision.
	OperationReceived(Operation),
	/// A peer's selection moved, or `None` when it lost focus.
	SelectionReceived {
		/// The peer.
		peer: Id,
		/// Its selection relative to the client's current revision.
		selection: Option<Selection>,
	},
	/// The outstanding operation was committed.
	OperationAcked,
	/// A peer disconnected.
	PeerLeft(Id),
	/// A peer changed its display name.
	PeerNameChanged {
		/// The peer.
		peer: Id,
		/// The new name.
		name: String,
	},
	/// The connection was re-established.
	Reconnected,
}
