use weft_primitives::{Operation, SelfSelection, Selection, WrappedOperation};

use super::UndoManager;
use crate::ClientError;

fn insert_at(pos: usize, text: &str, len: usize) -> Operation {
	let mut op = Operation::new();
	op.retain(pos).insert(text).retain(len - pos);
	op
}

fn delete_at(pos: usize, count: usize, len: usize) -> Operation {
	let mut op = Operation::new();
	op.retain(pos).delete(count).retain(len - pos - count);
	op
}

fn bare(op: Operation) -> WrappedOperation {
	WrappedOperation::bare(op)
}

/// Undo entries for typing `a` then `b` into an empty document.
fn typed_ab(manager: &mut UndoManager, compose: bool) {
	manager.add(bare(delete_at(0, 1, 1)), false).unwrap();
	manager.add(bare(delete_at(1, 1, 2)), compose).unwrap();
}

#[test]
fn add_pushes_entries() {
	let mut manager = UndoManager::default();
	assert!(!manager.can_undo());
	typed_ab(&mut manager, false);
	assert_eq!(manager.undo_len(), 2);
	assert!(manager.can_undo());
	assert!(!manager.can_redo());
}

#[test]
fn add_composes_new_entry_before_top() {
	let mut manager = UndoManager::default();
	typed_ab(&mut manager, true);
	assert_eq!(manager.undo_len(), 1);
	let top = manager.last_undo().unwrap();
	assert_eq!(top.operation.base_len(), 2);
	assert_eq!(top.apply("ab").unwrap(), "");
}

#[test]
fn add_evicts_oldest_past_limit() {
	let mut manager = UndoManager::new(2);
	manager.add(bare(delete_at(0, 1, 1)), false).unwrap();
	manager.add(bare(delete_at(1, 1, 2)), false).unwrap();
	manager.add(bare(delete_at(2, 1, 3)), false).unwrap();
	assert_eq!(manager.undo_len(), 2);
	manager.start_undo().unwrap();
	manager.finish();
	assert_eq!(manager.last_undo(), Some(&bare(delete_at(1, 1, 2))));
}

#[test]
fn undo_routes_inverse_to_redo_stack() {
	let mut manager = UndoManager::default();
	typed_ab(&mut manager, false);

	manager
		.perform_undo(|m, entry| {
			assert!(m.is_undoing());
			assert_eq!(entry.apply("ab").unwrap(), "a");
			m.add(bare(insert_at(1, "b", 1)), true)
		})
		.unwrap();

	assert!(!manager.is_undoing());
	assert_eq!(manager.undo_len(), 1);
	assert_eq!(manager.redo_len(), 1);
	assert_eq!(manager.last_redo().unwrap().apply("a").unwrap(), "ab");
}

#[test]
fn redo_routes_inverse_to_undo_stack() {
	let mut manager = UndoManager::default();
	manager.add(bare(delete_at(0, 1, 1)), false).unwrap();
	manager
		.perform_undo(|m, _| m.add(bare(insert_at(0, "a", 0)), false))
		.unwrap();

	manager
		.perform_redo(|m, entry| {
			assert!(m.is_redoing());
			assert_eq!(entry.apply("").unwrap(), "a");
			m.add(bare(delete_at(0, 1, 1)), false)
		})
		.unwrap();

	assert!(!manager.is_redoing());
	assert_eq!(manager.undo_len(), 1);
	assert_eq!(manager.redo_len(), 0);
}

#[test]
fn edit_after_undo_starts_fresh_entry_and_clears_redo() {
	let mut manager = UndoManager::default();
	typed_ab(&mut manager, false);
	manager
		.perform_undo(|m, _| m.add(bare(insert_at(1, "b", 1)), false))
		.unwrap();

	manager.add(bare(delete_at(1, 1, 2)), true).unwrap();
	assert_eq!(manager.undo_len(), 2);
	assert!(!manager.can_redo());

	manager.add(bare(delete_at(2, 1, 3)), true).unwrap();
	assert_eq!(manager.undo_len(), 2);
}

#[test]
fn empty_stacks_report_errors() {
	let mut manager = UndoManager::<SelfSelection>::default();
	assert!(matches!(
		manager.perform_undo(|_, _| Ok(())),
		Err(ClientError::NoPendingUndo)
	));
	assert!(!manager.is_undoing());
	assert!(matches!(manager.start_redo(), Err(ClientError::NoPendingRedo)));
	assert!(!manager.is_redoing());
}

#[test]
fn failing_callback_still_finishes() {
	let mut manager = UndoManager::default();
	typed_ab(&mut manager, false);
	let result = manager.perform_undo(|_, _| Err(ClientError::NoPendingOperation));
	assert!(matches!(result, Err(ClientError::NoPendingOperation)));
	assert!(!manager.is_undoing());
	assert_eq!(manager.undo_len(), 1);
}

#[test]
fn transform_rebases_entries_onto_remote_edit() {
	let mut manager = UndoManager::default();
	// "abc" -> "aXbc"
	manager.add(bare(delete_at(1, 1, 4)), false).unwrap();

	let remote = insert_at(0, "ZZ", 4);
	manager.transform(&bare(remote)).unwrap();

	let top = manager.last_undo().unwrap();
	assert_eq!(top.apply("ZZaXbc").unwrap(), "ZZabc");
}

#[test]
fn transform_walks_stack_from_top() {
	let mut manager = UndoManager::default();
	typed_ab(&mut manager, false);

	manager.transform(&bare(insert_at(0, "Q", 2))).unwrap();

	let mut doc = String::from("Qab");
	while manager.can_undo() {
		let entry = manager.start_undo().unwrap();
		manager.finish();
		doc = entry.apply(&doc).unwrap();
	}
	assert_eq!(doc, "Q");
}

#[test]
fn transform_maps_selection_metadata() {
	let mut manager = UndoManager::default();
	let meta = SelfSelection::new(Selection::cursor(2), Selection::cursor(1));
	manager
		.add(WrappedOperation::new(delete_at(1, 1, 4), Some(meta)), false)
		.unwrap();

	manager.transform(&bare(insert_at(0, "ZZ", 4))).unwrap();

	let top = manager.last_undo().unwrap();
	assert_eq!(
		top.meta,
		Some(SelfSelection::new(Selection::cursor(4), Selection::cursor(3)))
	);
}

#[test]
fn failed_transform_leaves_stacks_untouched() {
	let mut manager = UndoManager::default();
	manager.add(bare(delete_at(1, 1, 4)), false).unwrap();
	let before = manager.last_undo().cloned();

	assert!(manager.transform(&bare(insert_at(0, "x", 9))).is_err());
	assert_eq!(manager.last_undo().cloned(), before);
}

#[test]
fn rebase_takes_effect_only_on_commit() {
	let mut manager = UndoManager::default();
	manager.add(bare(delete_at(1, 1, 4)), false).unwrap();
	let before = manager.last_undo().cloned();

	let rebased = manager.rebase(&bare(insert_at(0, "ZZ", 4))).unwrap();
	assert_eq!(manager.last_undo().cloned(), before);

	manager.commit(rebased);
	assert_eq!(manager.last_undo().unwrap().apply("ZZaXbc").unwrap(), "ZZabc");
}
