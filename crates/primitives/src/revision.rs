use serde::{Deserialize, Serialize};

/// Server-assigned position of an operation in a document's linear history.
///
/// Revision `n` is the document state after the first `n` committed operations.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Revision(pub u64);

impl Revision {
	/// Returns the revision following this one.
	#[inline]
	pub fn next(self) -> Self {
		Self(self.0 + 1)
	}

	/// Number of revisions between `earlier` and `self`, or `None` if `earlier` is ahead.
	#[inline]
	pub fn since(self, earlier: Revision) -> Option<u64> {
		self.0.checked_sub(earlier.0)
	}
}

impl std::fmt::Display for Revision {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "r{}", self.0)
	}
}
