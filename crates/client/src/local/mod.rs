//! Orchestrator wiring an editor and a server connection to the protocol.
//!
//! [`LocalClient`] owns the protocol core ([`Client`]), the undo history, the
//! last local selection and the known remote peers. Embedders forward editor
//! events to [`LocalClient::handle_editor_event`] and server events to
//! [`LocalClient::handle_server_event`]; everything else happens through the
//! [`EditorSurface`] and [`ServerTransport`] it was given.
//!
//! Undo entries store the inverse of each local edit together with the
//! selections around it. Remote operations rebase the whole undo history, so an
//! undo only ever reverts local work.


use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use tracing::{debug, trace};
use weft_primitives::{Operation, Revision, SelfSelection, Selection, WrappedOperation};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::remote::{PeerSummary, RemoteClient};
use crate::signal::Signal;
use crate::state::{Client, ClientState, ClientStateKind, SyncHost};
use crate::surface::{EditorEvent, EditorSurface, ServerEvent, ServerTransport};
use crate::undo_manager::UndoManager;

/// Everything the state machine touches while handling one event.
struct Host<Id, E: EditorSurface<Id>, T> {
	editor: E,
	transport: T,
	undo: UndoManager,
	/// Local selection as last read from the editor.
	last_selection: Selection,
	peers: IndexMap<Id, RemoteClient<Id, E::Marker>>,
}

impl<Id, E: EditorSurface<Id>, T: ServerTransport> SyncHost for Host<Id, E, T> {
	fn send_operation(&mut self, revision: Revision, operation: &Operation) {
		self.transport
			.send_operation(revision, operation, &self.last_selection);
	}

	fn apply_operation(&mut self, operation: &Operation) -> Result<()> {
		let rebased = self
			.undo
			.rebase(&WrappedOperation::bare(operation.clone()))?;
		self.editor.apply_operation(operation)?;
		self.undo.commit(rebased);
		self.last_selection = self.editor.selection();
		Ok(())
	}
}

/// A collaborating client bound to one editor and one server connection.
pub struct LocalClient<Id, E: EditorSurface<Id>, T> {
	client: Client,
	host: Host<Id, E, T>,
	peers_changed: Signal<Vec<PeerSummary<Id>>>,
}

impl<Id, E, T> LocalClient<Id, E, T>
where
	Id: Clone + Eq + Hash + fmt::Debug,
	E: EditorSurface<Id>,
	T: ServerTransport,
{
	/// Creates a synchronized client at `revision` with default configuration.
	pub fn new(revision: Revision, editor: E, transport: T) -> Self {
		Self::with_config(revision, editor, transport, &ClientConfig::default())
	}

	/// Creates a synchronized client at `revision`.
	pub fn with_config(revision: Revision, editor: E, transport: T, config: &ClientConfig) -> Self {
		Self {
			client: Client::new(revision),
			host: Host {
				editor,
				transport,
				undo: UndoManager::with_config(&config.undo),
				last_selection: Selection::empty(),
				peers: IndexMap::new(),
			},
			peers_changed: Signal::new(),
		}
	}

	pub fn revision(&self) -> Revision {
		self.client.revision()
	}

	pub fn state(&self) -> &ClientState {
		self.client.state()
	}

	pub fn state_kind(&self) -> ClientStateKind {
		self.client.state_kind()
	}

	pub fn editor(&self) -> &E {
		&self.host.editor
	}

	/// Mutable access to the editor, e.g. to drain its events.
	pub fn editor_mut(&mut self) -> &mut E {
		&mut self.host.editor
	}

	pub fn transport(&self) -> &T {
		&self.host.transport
	}

	pub fn transport_mut(&mut self) -> &mut T {
		&mut self.host.transport
	}

	pub fn undo_manager(&self) -> &UndoManager {
		&self.host.undo
	}

	/// Local selection as last read from the editor.
	pub fn last_selection(&self) -> &Selection {
		&self.host.last_selection
	}

	/// Known peers in the order they were added.
	pub fn peers(&self) -> impl Iterator<Item = &RemoteClient<Id, E::Marker>> {
		self.host.peers.values()
	}

	pub fn peer(&self, id: &Id) -> Option<&RemoteClient<Id, E::Marker>> {
		self.host.peers.get(id)
	}

	/// Emitted after every state machine transition.
	pub fn state_changed(&mut self) -> &mut Signal<ClientStateKind> {
		&mut self.client.state_changed
	}

	/// Emitted with all peers whenever a peer is added, removed or renamed.
	pub fn peers_changed(&mut self) -> &mut Signal<Vec<PeerSummary<Id>>> {
		&mut self.peers_changed
	}

	fn emit_peers(&mut self) {
		let summaries: Vec<_> = self.host.peers.values().map(RemoteClient::summary).collect();
		self.peers_changed.emit(&summaries);
	}

	/// Dispatches an editor event.
	pub fn handle_editor_event(&mut self, event: EditorEvent) -> Result<()> {
		match event {
			EditorEvent::Change {
				operation,
				inverse,
				selection,
			} => self.on_change(operation, inverse, selection),
			EditorEvent::SelectionChange(selection) => {
				self.on_selection_change(selection);
				Ok(())
			}
			EditorEvent::Blur => {
				self.on_blur();
				Ok(())
			}
			EditorEvent::Undo => self.undo(),
			EditorEvent::Redo => self.redo(),
		}
	}

	/// Dispatches a server event.
	pub fn handle_server_event(&mut self, event: ServerEvent<Id>) -> Result<()> {
		match event {
			ServerEvent::OperationReceived(operation) => self.apply_server(&operation),
			ServerEvent::SelectionReceived { peer, selection } => {
				self.on_selection_received(peer, selection);
				Ok(())
			}
			ServerEvent::OperationAcked => self.server_ack(),
			ServerEvent::PeerLeft(peer) => {
				self.on_peer_left(&peer);
				Ok(())
			}
			ServerEvent::PeerNameChanged { peer, name } => {
				self.set_peer_name(peer, &name);
				Ok(())
			}
			ServerEvent::Reconnected => {
				self.server_reconnect();
				Ok(())
			}
		}
	}

	/// Records a local edit for undo and hands it to the state machine.
	///
	/// `inverse` must revert `operation` on the document after it, and
	/// `selection` is the local selection right after the edit.
	pub fn on_change(
		&mut self,
		operation: Operation,
		inverse: Operation,
		selection: Selection,
	) -> Result<()> {
		let before = std::mem::replace(&mut self.host.last_selection, selection);

		let compose = self
			.host
			.undo
			.last_undo()
			.is_some_and(|top| inverse.should_be_composed_with_inverted(&top.operation));
		let meta = SelfSelection::new(self.host.last_selection.clone(), before);
		self.host
			.undo
			.add(WrappedOperation::new(inverse, Some(meta)), compose)?;

		self.client.apply_client(&mut self.host, operation)
	}

	/// Records the local selection and publishes it if it changed.
	pub fn on_selection_change(&mut self, selection: Selection) {
		let previous = std::mem::replace(&mut self.host.last_selection, selection);
		if previous == self.host.last_selection {
			return;
		}
		self.publish_selection(true);
	}

	/// Clears the local selection and tells peers to stop showing it.
	pub fn on_blur(&mut self) {
		self.host.last_selection = Selection::empty();
		self.publish_selection(false);
	}

	fn publish_selection(&mut self, focused: bool) {
		if self.client.state_kind() == ClientStateKind::AwaitingWithBuffer {
			trace!("selection not sent while edits are buffered");
			return;
		}
		let selection = focused.then_some(&self.host.last_selection);
		self.host.transport.send_selection(selection);
	}

	/// Reverts the most recent local edit, if any.
	pub fn undo(&mut self) -> Result<()> {
		if !self.host.undo.can_undo() {
			return Ok(());
		}
		let entry = self.host.undo.start_undo()?;
		let result = self.apply_unredo(entry);
		self.host.undo.finish();
		result
	}

	/// Re-applies the most recently undone edit, if any.
	pub fn redo(&mut self) -> Result<()> {
		if !self.host.undo.can_redo() {
			return Ok(());
		}
		let entry = self.host.undo.start_redo()?;
		let result = self.apply_unredo(entry);
		self.host.undo.finish();
		result
	}

	/// Applies a popped history entry as a new local edit.
	///
	/// Its inverse is recorded first; the undo manager routes it to the
	/// opposite stack.
	fn apply_unredo(&mut self, entry: WrappedOperation) -> Result<()> {
		let inverse = entry.invert(&self.host.editor.value())?;
		self.host.undo.add(inverse, false)?;

		self.host.editor.apply_operation(&entry.operation)?;
		self.host.last_selection = entry.meta.map(|meta| meta.after).unwrap_or_default();
		self.host.editor.set_selection(&self.host.last_selection);

		self.client.apply_client(&mut self.host, entry.operation)
	}

	/// Applies another client's operation.
	pub fn apply_server(&mut self, operation: &Operation) -> Result<()> {
		debug!(operation = %operation, "operation received");
		self.client.apply_server(&mut self.host, operation)
	}

	/// Handles an ack of the outstanding operation.
	pub fn server_ack(&mut self) -> Result<()> {
		self.client.server_ack(&mut self.host)
	}

	/// Re-sends the outstanding operation after reconnecting.
	pub fn server_reconnect(&mut self) {
		self.client.server_reconnect(&mut self.host);
	}

	/// Renders or clears a peer's selection, creating the peer if unknown.
	pub fn on_selection_received(&mut self, peer: Id, selection: Option<Selection>) {
		trace!(?peer, present = selection.is_some(), "peer selection received");
		let selection = selection.map(|s| self.client.transform_selection(&s));
		let Host { editor, peers, .. } = &mut self.host;
		let remote = peers
			.entry(peer.clone())
			.or_insert_with(|| RemoteClient::new(peer, ""));
		match selection {
			Some(selection) => remote.update_selection(editor, selection),
			None => remote.remove_selection(editor),
		}
	}

	/// Adds a peer and renders its last selection as is.
	pub fn add_peer(&mut self, mut peer: RemoteClient<Id, E::Marker>) {
		let Host { editor, peers, .. } = &mut self.host;
		peer.attach(editor);
		if let Some(mut replaced) = peers.insert(peer.id().clone(), peer) {
			replaced.remove_selection(editor);
		}
		self.emit_peers();
	}

	/// Replaces all peers.
	///
	/// Incoming selections are relative to the last acked revision and are
	/// mapped through unacked local edits before rendering.
	pub fn set_peers(&mut self, incoming: impl IntoIterator<Item = RemoteClient<Id, E::Marker>>) {
		let Host { editor, peers, .. } = &mut self.host;
		for (_, mut peer) in peers.drain(..) {
			peer.remove_selection(editor);
		}
		for mut peer in incoming {
			if let Some(selection) = peer.take_selection() {
				peer.update_selection(editor, self.client.transform_selection(&selection));
			}
			peers.insert(peer.id().clone(), peer);
		}
		debug!(peers = self.host.peers.len(), "peers replaced");
		self.emit_peers();
	}

	/// Removes a peer and its rendered selection.
	pub fn on_peer_left(&mut self, id: &Id) {
		let Host { editor, peers, .. } = &mut self.host;
		let Some(mut peer) = peers.shift_remove(id) else {
			return;
		};
		peer.remove_selection(editor);
		debug!(peer = ?id, "peer left");
		self.emit_peers();
	}

	/// Renames a peer, creating it if unknown.
	pub fn set_peer_name(&mut self, id: Id, name: &str) {
		let Host { editor, peers, .. } = &mut self.host;
		let peer = peers
			.entry(id.clone())
			.or_insert_with(|| RemoteClient::new(id, ""));
		peer.set_name(editor, name);
		self.emit_peers();
	}
}
