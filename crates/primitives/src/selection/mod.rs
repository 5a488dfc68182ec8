use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::operation::Operation;
use crate::range::{CharIdx, Range};


/// A set of cursors and highlighted spans.
///
/// Ranges are independent: they are never merged, and their order does not
/// matter for equality. An empty selection means "no cursor" (for example an
/// unfocused editor).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Selection {
	ranges: SmallVec<[Range; 1]>,
}

impl Selection {
	/// Creates a selection from the given ranges.
	pub fn new(ranges: impl IntoIterator<Item = Range>) -> Self {
		Self {
			ranges: ranges.into_iter().collect(),
		}
	}

	/// Creates a selection without any range.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Creates a single-range selection.
	pub fn single(anchor: CharIdx, head: CharIdx) -> Self {
		Self::new([Range::new(anchor, head)])
	}

	/// Creates a single cursor at `pos`.
	pub fn cursor(pos: CharIdx) -> Self {
		Self::new([Range::point(pos)])
	}

	/// Returns all ranges as a slice.
	pub fn ranges(&self) -> &[Range] {
		&self.ranges
	}

	/// Returns the number of ranges.
	pub fn len(&self) -> usize {
		self.ranges.len()
	}

	/// Returns true if the selection holds no range at all.
	pub fn is_empty(&self) -> bool {
		self.ranges.is_empty()
	}

	/// Iterates over all ranges.
	pub fn iter(&self) -> impl Iterator<Item = &Range> {
		self.ranges.iter()
	}

	/// Adds a range.
	pub fn push(&mut self, range: Range) {
		self.ranges.push(range);
	}

	/// Returns true if any range spans at least one character.
	pub fn something_selected(&self) -> bool {
		self.ranges.iter().any(|r| !r.is_empty())
	}

	/// Combines two consecutive selections: the newer one simply wins.
	pub fn compose(&self, other: &Selection) -> Selection {
		other.clone()
	}

	/// Maps every range through `operation`.
	pub fn transform(&self, operation: &Operation) -> Selection {
		Self {
			ranges: self.ranges.iter().map(|r| r.transform(operation)).collect(),
		}
	}

	fn sorted(&self) -> SmallVec<[Range; 1]> {
		let mut ranges = self.ranges.clone();
		ranges.sort_unstable();
		ranges
	}
}

impl PartialEq for Selection {
	fn eq(&self, other: &Self) -> bool {
		self.ranges.len() == other.ranges.len() && self.sorted() == other.sorted()
	}
}

impl Eq for Selection {}

impl FromIterator<Range> for Selection {
	fn from_iter<I: IntoIterator<Item = Range>>(iter: I) -> Self {
		Self::new(iter)
	}
}

/// Selections bracketing one local edit: before it was made and after.
///
/// Only used by undo history, never sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelfSelection {
	/// Selection before the edit.
	pub before: Selection,
	/// Selection after the edit.
	pub after: Selection,
}

impl SelfSelection {
	/// Creates a new bracket.
	pub fn new(before: Selection, after: Selection) -> Self {
		Self { before, after }
	}

	/// Swaps before and after.
	pub fn invert(&self) -> SelfSelection {
		Self::new(self.after.clone(), self.before.clone())
	}

	/// Brackets two consecutive edits: first `before`, last `after`.
	pub fn compose(&self, other: &SelfSelection) -> SelfSelection {
		Self::new(self.before.clone(), other.after.clone())
	}

	/// Maps both selections through `operation`.
	pub fn transform(&self, operation: &Operation) -> SelfSelection {
		Self::new(self.before.transform(operation), self.after.transform(operation))
	}
}
