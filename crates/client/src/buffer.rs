//! Headless editor surface backed by a rope.
//!
//! [`BufferSurface`] implements [`EditorSurface`] without any UI. Local edits
//! made through its helpers queue the [`EditorEvent`]s a real editor would
//! report; the embedder drains them into
//! [`LocalClient::handle_editor_event`](crate::LocalClient::handle_editor_event).

use std::collections::VecDeque;

use weft_primitives::{CharIdx, CharLen, Operation, OperationError, Rope, Selection};

use crate::surface::{EditorEvent, EditorSurface, PresenceRenderer};

/// Handle of a peer selection rendered on a [`BufferSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(u64);

/// A peer selection rendered on a [`BufferSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerMark<Id> {
	pub marker: MarkerId,
	pub peer: Id,
	pub name: String,
	pub selection: Selection,
}

/// Rope-backed document with a local selection, peer marks and an event queue.
#[derive(Debug, Clone)]
pub struct BufferSurface<Id> {
	text: Rope,
	selection: Selection,
	marks: Vec<PeerMark<Id>>,
	next_marker: u64,
	events: VecDeque<EditorEvent>,
}

impl<Id> Default for BufferSurface<Id> {
	fn default() -> Self {
		Self::new("")
	}
}

impl<Id> BufferSurface<Id> {
	/// Creates a surface holding `text` with the cursor at the start.
	pub fn new(text: &str) -> Self {
		Self {
			text: Rope::from(text),
			selection: Selection::cursor(0),
			marks: Vec::new(),
			next_marker: 0,
			events: VecDeque::new(),
		}
	}

	/// The document as a rope.
	pub fn text(&self) -> &Rope {
		&self.text
	}

	/// Length of the document in characters.
	pub fn len_chars(&self) -> CharLen {
		self.text.len_chars()
	}

	/// Peer selections currently rendered.
	pub fn marks(&self) -> &[PeerMark<Id>] {
		&self.marks
	}

	/// Applies a local edit and queues a [`EditorEvent::Change`].
	///
	/// The local selection is mapped through the edit.
	pub fn edit(&mut self, operation: Operation) -> Result<(), OperationError> {
		let inverse = operation.invert(&self.text.to_string())?;
		operation.apply_to_rope(&mut self.text)?;
		self.selection = self.selection.transform(&operation);
		for mark in &mut self.marks {
			mark.selection = mark.selection.transform(&operation);
		}
		self.events.push_back(EditorEvent::Change {
			operation,
			inverse,
			selection: self.selection.clone(),
		});
		Ok(())
	}

	/// Types `text` at `pos`.
	pub fn insert(&mut self, pos: CharIdx, text: &str) -> Result<(), OperationError> {
		let len = self.len_chars();
		let tail = len.checked_sub(pos).ok_or(OperationError::InvalidOperation(
			"insert position past the end of the document",
		))?;
		let mut op = Operation::new();
		op.retain(pos).insert(text).retain(tail);
		self.edit(op)
	}

	/// Deletes `count` characters starting at `pos`.
	pub fn delete(&mut self, pos: CharIdx, count: CharLen) -> Result<(), OperationError> {
		let len = self.len_chars();
		let tail = len
			.checked_sub(pos)
			.and_then(|rest| rest.checked_sub(count))
			.ok_or(OperationError::InvalidOperation(
				"delete range past the end of the document",
			))?;
		let mut op = Operation::new();
		op.retain(pos).delete(count).retain(tail);
		self.edit(op)
	}

	/// Moves the local selection and queues a [`EditorEvent::SelectionChange`].
	pub fn select(&mut self, selection: Selection) {
		self.events
			.push_back(EditorEvent::SelectionChange(selection.clone()));
		self.selection = selection;
	}

	/// Queues a [`EditorEvent::Blur`].
	pub fn blur(&mut self) {
		self.events.push_back(EditorEvent::Blur);
	}

	/// Queues a [`EditorEvent::Undo`].
	pub fn request_undo(&mut self) {
		self.events.push_back(EditorEvent::Undo);
	}

	/// Queues a [`EditorEvent::Redo`].
	pub fn request_redo(&mut self) {
		self.events.push_back(EditorEvent::Redo);
	}

	/// Removes and returns all queued events, oldest first.
	pub fn drain_events(&mut self) -> Vec<EditorEvent> {
		self.events.drain(..).collect()
	}
}

impl<Id: PartialEq> BufferSurface<Id> {
	/// The rendered selection of `peer`, if any.
	pub fn mark_of(&self, peer: &Id) -> Option<&PeerMark<Id>> {
		self.marks.iter().find(|mark| &mark.peer == peer)
	}
}

impl<Id: Clone> PresenceRenderer<Id> for BufferSurface<Id> {
	type Marker = MarkerId;

	fn mark_selection(&mut self, peer: &Id, name: &str, selection: &Selection) -> MarkerId {
		let marker = MarkerId(self.next_marker);
		self.next_marker += 1;
		self.marks.push(PeerMark {
			marker,
			peer: peer.clone(),
			name: name.to_owned(),
			selection: selection.clone(),
		});
		marker
	}

	fn clear_selection(&mut self, marker: MarkerId) {
		self.marks.retain(|mark| mark.marker != marker);
	}
}

impl<Id: Clone> EditorSurface<Id> for BufferSurface<Id> {
	fn value(&self) -> String {
		self.text.to_string()
	}

	fn selection(&self) -> Selection {
		self.selection.clone()
	}

	fn set_selection(&mut self, selection: &Selection) {
		self.selection = selection.clone();
	}

	fn apply_operation(&mut self, operation: &Operation) -> Result<(), OperationError> {
		operation.apply_to_rope(&mut self.text)?;
		self.selection = self.selection.transform(operation);
		for mark in &mut self.marks {
			mark.selection = mark.selection.transform(operation);
		}
		Ok(())
	}
}
