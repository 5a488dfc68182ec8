//! Character-indexed helpers over `&str`.

use crate::range::CharLen;

/// Splits `s` after its first `n` characters.
///
/// Returns `None` if `s` holds fewer than `n` characters.
pub(crate) fn split_chars(s: &str, n: CharLen) -> Option<(&str, &str)> {
	let mut chars = s.char_indices();
	for _ in 0..n {
		chars.next()?;
	}
	let idx = chars.next().map_or(s.len(), |(idx, _)| idx);
	Some(s.split_at(idx))
}

/// Returns the number of characters in `s`.
#[inline]
pub fn char_len(s: &str) -> CharLen {
	s.chars().count()
}
