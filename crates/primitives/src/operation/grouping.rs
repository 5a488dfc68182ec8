//! Undo grouping heuristics.
//!
//! Undoing should revert a sentence typed in one go or a run of backspaces,
//! not every single keystroke. These predicates decide whether two consecutive
//! operations belong to the same undo entry.

use super::{Operation, Step};
use crate::range::CharIdx;

impl Operation {
	/// The only non-retain step, if the operation is a single contiguous edit.
	fn simple_step(&self) -> Option<&Step> {
		match self.steps.as_slice() {
			[step] | [Step::Retain(_), step] | [step, Step::Retain(_)] => Some(step),
			[Step::Retain(_), step, Step::Retain(_)] => Some(step),
			_ => None,
		}
	}

	/// Offset at which the first edit happens.
	fn start_index(&self) -> CharIdx {
		match self.steps.first() {
			Some(Step::Retain(n)) => *n,
			_ => 0,
		}
	}

	/// Returns true if `other`, applied right after `self`, continues the same edit.
	///
	/// That is the case for consecutive inserts where `other` starts where `self`
	/// ended, and for deletes at the same position (forward delete) or ending
	/// where `self` started (backspace). No-ops group with anything.
	pub fn should_be_composed_with(&self, other: &Operation) -> bool {
		if self.is_noop() || other.is_noop() {
			return true;
		}

		let (start_a, start_b) = (self.start_index(), other.start_index());
		match (self.simple_step(), other.simple_step()) {
			(Some(Step::Insert(a)), Some(Step::Insert(_))) => start_a + a.char_len() == start_b,
			(Some(Step::Delete(_)), Some(Step::Delete(b))) => {
				start_b + b == start_a || start_a == start_b
			}
			_ => false,
		}
	}

	/// Grouping predicate for inverted operations.
	///
	/// Satisfies `a.should_be_composed_with(b) ==
	/// b_inv.should_be_composed_with_inverted(a_inv)`.
	pub fn should_be_composed_with_inverted(&self, other: &Operation) -> bool {
		if self.is_noop() || other.is_noop() {
			return true;
		}

		let (start_a, start_b) = (self.start_index(), other.start_index());
		match (self.simple_step(), other.simple_step()) {
			(Some(Step::Insert(a)), Some(Step::Insert(_))) => {
				start_a + a.char_len() == start_b || start_a == start_b
			}
			(Some(Step::Delete(_)), Some(Step::Delete(b))) => start_b + b == start_a,
			_ => false,
		}
	}
}
