use crate::range::CharLen;

/// A text insertion with cached character length.
///
/// Storing the character count avoids repeated O(n) `.chars().count()` calls
/// in hot paths like `apply()`, `compose()` and `transform()`.
///
/// Fields are private to enforce the invariant that `char_len` always equals
/// `text.chars().count()`. Construct via [`Insertion::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
	text: String,
	char_len: CharLen,
}

impl Insertion {
	/// Creates a new insertion, computing the character length once.
	#[inline]
	pub fn new(text: impl Into<String>) -> Self {
		let text = text.into();
		let char_len = text.chars().count();
		Self { text, char_len }
	}

	/// Creates an insertion from text with a pre-computed length.
	///
	/// # Debug Assertions
	/// In debug builds, asserts that `char_len` matches the actual character count.
	#[inline]
	pub(crate) fn from_chars(text: String, char_len: CharLen) -> Self {
		debug_assert_eq!(text.chars().count(), char_len);
		Self { text, char_len }
	}

	/// Returns true if this insertion is empty.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.char_len == 0
	}

	/// Returns the inserted text.
	#[inline]
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Returns the cached character length.
	#[inline]
	pub fn char_len(&self) -> CharLen {
		self.char_len
	}

	/// Appends text from another insertion, updating the cached length.
	pub(crate) fn push(&mut self, other: Insertion) {
		self.text.push_str(&other.text);
		self.char_len += other.char_len;
	}

	/// Splits after the first `n` characters, returning `(prefix, suffix)`.
	pub(crate) fn split_at(self, n: CharLen) -> (Insertion, Insertion) {
		debug_assert!(n <= self.char_len);
		let byte_idx = self.text.char_indices().nth(n).map_or(self.text.len(), |(idx, _)| idx);
		let mut prefix = self.text;
		let suffix = prefix.split_off(byte_idx);
		(
			Insertion::from_chars(prefix, n),
			Insertion::from_chars(suffix, self.char_len - n),
		)
	}
}

/// A single step of an [`Operation`](super::Operation).
///
/// Steps are the atomic units an operation is built from. Retains and deletes
/// carry a strictly positive character count, inserts a non-empty string; the
/// builder methods never emit degenerate steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
	/// Keep the next N characters of the base document.
	Retain(CharLen),
	/// Insert new text at the current position.
	Insert(Insertion),
	/// Remove the next N characters of the base document.
	Delete(CharLen),
}

impl Step {
	/// Number of characters this step spans on the side it consumes or produces.
	pub fn len(&self) -> CharLen {
		match self {
			Step::Retain(n) | Step::Delete(n) => *n,
			Step::Insert(ins) => ins.char_len(),
		}
	}

	/// Returns true for a zero-length step (never present in a built operation).
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns true if this step is a retain.
	pub fn is_retain(&self) -> bool {
		matches!(self, Step::Retain(_))
	}

	/// Returns true if this step is an insert.
	pub fn is_insert(&self) -> bool {
		matches!(self, Step::Insert(_))
	}

	/// Returns true if this step is a delete.
	pub fn is_delete(&self) -> bool {
		matches!(self, Step::Delete(_))
	}
}
