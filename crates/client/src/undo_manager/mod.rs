//! Undo/redo history of wrapped operations.
//!
//! The [`UndoManager`] stores *inverse* operations: the top of the undo stack
//! applies to the current document and reverts the most recent local edit.
//! Remote edits rebase every stored entry through [`UndoManager::transform`],
//! so undoing after a peer edited the document still reverts only local work.
//!
//! Undo and redo run in two phases. [`UndoManager::start_undo`] pops the top
//! entry and switches to the undoing state, in which [`UndoManager::add`]
//! routes the re-pushed inverse onto the redo stack; [`UndoManager::finish`]
//! returns to normal. [`UndoManager::perform_undo`] wraps both around a
//! callback for callers that need no other state.

#[cfg(test)]
mod tests;

use tracing::trace;
use weft_primitives::{OperationMeta, SelfSelection, WrappedOperation};

use crate::config::UndoConfig;
use crate::error::{ClientError, Result};

/// What [`UndoManager::add`] currently does with new entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum UndoState {
	/// New local edits; entries go to the undo stack.
	#[default]
	Normal,
	/// Inside an undo; entries go to the redo stack.
	Undoing,
	/// Inside a redo; entries go to the undo stack.
	Redoing,
}

/// Undo history rebased onto a concurrent operation, awaiting
/// [`UndoManager::commit`].
#[derive(Debug, Clone)]
#[must_use]
pub struct RebasedHistory<M = SelfSelection> {
	undo_stack: Vec<WrappedOperation<M>>,
	redo_stack: Vec<WrappedOperation<M>>,
}

/// Bounded undo and redo stacks of wrapped inverse operations.
#[derive(Debug, Clone)]
pub struct UndoManager<M = SelfSelection> {
	max_items: usize,
	state: UndoState,
	/// Set after an undo/redo so the next normal edit starts a fresh entry.
	dont_compose: bool,
	undo_stack: Vec<WrappedOperation<M>>,
	redo_stack: Vec<WrappedOperation<M>>,
}

impl<M: OperationMeta> Default for UndoManager<M> {
	fn default() -> Self {
		Self::with_config(&UndoConfig::default())
	}
}

impl<M: OperationMeta> UndoManager<M> {
	/// Creates a manager keeping at most `max_items` undo entries.
	pub fn new(max_items: usize) -> Self {
		Self {
			max_items,
			state: UndoState::Normal,
			dont_compose: false,
			undo_stack: Vec::new(),
			redo_stack: Vec::new(),
		}
	}

	/// Creates a manager from configuration.
	pub fn with_config(config: &UndoConfig) -> Self {
		Self::new(config.max_items)
	}

	/// Maximum undo stack depth.
	pub fn max_items(&self) -> usize {
		self.max_items
	}

	/// Number of undo entries.
	pub fn undo_len(&self) -> usize {
		self.undo_stack.len()
	}

	/// Number of redo entries.
	pub fn redo_len(&self) -> usize {
		self.redo_stack.len()
	}

	/// Returns `true` if there are undo entries.
	pub fn can_undo(&self) -> bool {
		!self.undo_stack.is_empty()
	}

	/// Returns `true` if there are redo entries.
	pub fn can_redo(&self) -> bool {
		!self.redo_stack.is_empty()
	}

	/// Returns `true` between [`Self::start_undo`] and [`Self::finish`].
	pub fn is_undoing(&self) -> bool {
		self.state == UndoState::Undoing
	}

	/// Returns `true` between [`Self::start_redo`] and [`Self::finish`].
	pub fn is_redoing(&self) -> bool {
		self.state == UndoState::Redoing
	}

	/// The entry the next undo would apply.
	pub fn last_undo(&self) -> Option<&WrappedOperation<M>> {
		self.undo_stack.last()
	}

	/// The entry the next redo would apply.
	pub fn last_redo(&self) -> Option<&WrappedOperation<M>> {
		self.redo_stack.last()
	}

	/// Records an inverse operation.
	///
	/// While undoing the entry lands on the redo stack, while redoing on the
	/// undo stack. In normal state it either merges into the top undo entry
	/// (when `compose` is set and the previous entry was not produced by an
	/// undo/redo) or is pushed, evicting the oldest entry past the limit; the
	/// redo stack is cleared.
	pub fn add(&mut self, entry: WrappedOperation<M>, compose: bool) -> Result<()> {
		match self.state {
			UndoState::Undoing => {
				self.redo_stack.push(entry);
				self.dont_compose = true;
				trace!(redo_stack = self.redo_stack.len(), "undo entry pushed to redo stack");
			}
			UndoState::Redoing => {
				self.undo_stack.push(entry);
				self.dont_compose = true;
				trace!(undo_stack = self.undo_stack.len(), "redo entry pushed to undo stack");
			}
			UndoState::Normal => {
				let merge_into = match self.undo_stack.last_mut() {
					Some(top) if compose && !self.dont_compose => Some(top),
					_ => None,
				};
				if let Some(top) = merge_into {
					*top = entry.compose(top)?;
					trace!(undo_stack = self.undo_stack.len(), "undo entry composed");
				} else {
					self.undo_stack.push(entry);
					if self.undo_stack.len() > self.max_items {
						self.undo_stack.remove(0);
						trace!(max_items = self.max_items, "oldest undo entry evicted");
					}
					trace!(undo_stack = self.undo_stack.len(), "undo entry pushed");
				}
				self.dont_compose = false;
				if !self.redo_stack.is_empty() {
					trace!(cleared = self.redo_stack.len(), "redo stack cleared");
				}
				self.redo_stack.clear();
			}
		}
		Ok(())
	}

	/// Rebases both stacks onto a concurrent `operation` that was just applied.
	///
	/// Stacks are left unchanged if any transform fails.
	pub fn transform(&mut self, operation: &WrappedOperation<M>) -> Result<()> {
		let rebased = self.rebase(operation)?;
		self.commit(rebased);
		Ok(())
	}

	/// Computes both stacks rebased onto `operation` without installing them.
	///
	/// Pair with [`Self::commit`] when the rebase must only take effect once
	/// `operation` has been applied elsewhere.
	pub fn rebase(&self, operation: &WrappedOperation<M>) -> Result<RebasedHistory<M>> {
		Ok(RebasedHistory {
			undo_stack: transform_stack(&self.undo_stack, operation)?,
			redo_stack: transform_stack(&self.redo_stack, operation)?,
		})
	}

	/// Installs stacks computed by [`Self::rebase`].
	pub fn commit(&mut self, rebased: RebasedHistory<M>) {
		self.undo_stack = rebased.undo_stack;
		self.redo_stack = rebased.redo_stack;
		trace!(
			undo_stack = self.undo_stack.len(),
			redo_stack = self.redo_stack.len(),
			"undo history transformed"
		);
	}

	/// Pops the top undo entry and enters the undoing state.
	///
	/// # Errors
	///
	/// [`ClientError::NoPendingUndo`] if the undo stack is empty; the state is
	/// left unchanged.
	pub fn start_undo(&mut self) -> Result<WrappedOperation<M>> {
		let entry = self.undo_stack.pop().ok_or(ClientError::NoPendingUndo)?;
		self.state = UndoState::Undoing;
		trace!(undo_stack = self.undo_stack.len(), "undo started");
		Ok(entry)
	}

	/// Pops the top redo entry and enters the redoing state.
	///
	/// # Errors
	///
	/// [`ClientError::NoPendingRedo`] if the redo stack is empty.
	pub fn start_redo(&mut self) -> Result<WrappedOperation<M>> {
		let entry = self.redo_stack.pop().ok_or(ClientError::NoPendingRedo)?;
		self.state = UndoState::Redoing;
		trace!(redo_stack = self.redo_stack.len(), "redo started");
		Ok(entry)
	}

	/// Returns to the normal state after an undo or redo.
	pub fn finish(&mut self) {
		self.state = UndoState::Normal;
	}

	/// Undoes one entry through `apply`.
	///
	/// `apply` receives the manager in undoing state and the popped entry. It
	/// is expected to apply the entry and [`add`](Self::add) its inverse, which
	/// then lands on the redo stack. The manager returns to normal state even
	/// if `apply` fails.
	pub fn perform_undo<F>(&mut self, apply: F) -> Result<()>
	where
		F: FnOnce(&mut Self, WrappedOperation<M>) -> Result<()>,
	{
		let entry = self.start_undo()?;
		let result = apply(self, entry);
		self.finish();
		result
	}

	/// Redoes one entry through `apply`; the mirror of [`Self::perform_undo`].
	pub fn perform_redo<F>(&mut self, apply: F) -> Result<()>
	where
		F: FnOnce(&mut Self, WrappedOperation<M>) -> Result<()>,
	{
		let entry = self.start_redo()?;
		let result = apply(self, entry);
		self.finish();
		result
	}
}

/// Transforms `stack` against `operation`, from the top entry down.
///
/// The top entry applies to the current document, so it is transformed first;
/// each deeper entry sees `operation` as rebased past the entries above it.
fn transform_stack<M: OperationMeta>(
	stack: &[WrappedOperation<M>],
	operation: &WrappedOperation<M>,
) -> Result<Vec<WrappedOperation<M>>> {
	let mut operation = operation.clone();
	let mut transformed = Vec::with_capacity(stack.len());
	for entry in stack.iter().rev() {
		let (entry, rest) = WrappedOperation::transform(entry, &operation)?;
		transformed.push(entry);
		operation = rest;
	}
	transformed.reverse();
	Ok(transformed)
}
