use serde::{Deserialize, Serialize};

use crate::operation::{Operation, Step};

/// A position in the text, measured in characters (not bytes).
pub type CharIdx = usize;

/// A length or count in the text, measured in characters (not bytes).
///
/// This is distinct from CharIdx to avoid accidentally passing an index
/// where a length is expected or vice versa.
pub type CharLen = usize;

/// A text range defined by anchor and head positions.
///
/// The anchor is the fixed end, and the head moves during selection extension.
/// A range with `anchor == head` is a plain cursor.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Range {
	/// The fixed end of the range.
	pub anchor: CharIdx,
	/// The moving end of the range (cursor position).
	pub head: CharIdx,
}

impl Range {
	/// Creates a new range from anchor to head.
	pub fn new(anchor: CharIdx, head: CharIdx) -> Self {
		Self { anchor, head }
	}

	/// Creates a zero-width range (cursor) at the given position.
	pub fn point(pos: CharIdx) -> Self {
		Self::new(pos, pos)
	}

	/// Returns the smaller of anchor and head.
	#[inline]
	pub fn min(&self) -> CharIdx {
		std::cmp::min(self.anchor, self.head)
	}

	/// Returns the larger of anchor and head.
	#[inline]
	pub fn max(&self) -> CharIdx {
		std::cmp::max(self.anchor, self.head)
	}

	/// Returns true if anchor equals head (zero-width cursor).
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.anchor == self.head
	}

	/// Maps this range through an operation.
	///
	/// A cursor maps its single point once; a real range maps both ends
	/// independently, so edits inside it may collapse or widen it.
	pub fn transform(&self, operation: &Operation) -> Range {
		let anchor = map_index(operation, self.anchor);
		if self.is_empty() {
			return Range::point(anchor);
		}
		Range::new(anchor, map_index(operation, self.head))
	}
}

/// Maps a character index of an operation's base document into its target document.
///
/// Inserts at or before the index push it forward; an index inside a deleted
/// span collapses to the start of the deletion.
fn map_index(operation: &Operation, index: CharIdx) -> CharIdx {
	let mut remaining = index;
	let mut mapped = index;

	for step in operation.steps() {
		match step {
			Step::Retain(n) => {
				if *n > remaining {
					break;
				}
				remaining -= n;
			}
			Step::Insert(ins) => mapped += ins.char_len(),
			Step::Delete(n) => {
				mapped -= remaining.min(*n);
				if *n > remaining {
					break;
				}
				remaining -= n;
			}
		}
	}

	mapped
}

#[cfg(test)]
mod tests {
	use super::*;

	fn op(build: impl FnOnce(&mut Operation)) -> Operation {
		let mut op = Operation::new();
		build(&mut op);
		op
	}

	#[test]
	fn cursor_moves_with_insert_at_same_position() {
		let ins = op(|o| {
			o.retain(3).insert("ab").retain(2);
		});
		assert_eq!(Range::point(3).transform(&ins), Range::point(5));
		assert_eq!(Range::point(2).transform(&ins), Range::point(2));
	}

	#[test]
	fn range_inside_deletion_collapses() {
		let del = op(|o| {
			o.delete(10).retain(2);
		});
		assert_eq!(Range::new(3, 7).transform(&del), Range::new(0, 0));
	}

	#[test]
	fn trailing_indices_shift_back() {
		let del = op(|o| {
			o.retain(1).delete(2).retain(5);
		});
		assert_eq!(Range::new(4, 8).transform(&del), Range::new(2, 6));
		assert_eq!(Range::new(2, 5).transform(&del), Range::new(1, 3));
	}

	#[test]
	fn edit_inside_range_changes_its_width() {
		let ins = op(|o| {
			o.retain(2).insert("xyz").retain(4);
		});
		assert_eq!(Range::new(1, 4).transform(&ins), Range::new(1, 7));

		let del = op(|o| {
			o.retain(1).delete(3).retain(2);
		});
		assert!(Range::new(1, 4).transform(&del).is_empty());
	}
}
