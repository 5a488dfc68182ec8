//! Position-based single edits.
//!
//! [`SimpleOperation`] describes one insertion or deletion at an absolute
//! offset. It is easier to inspect than a full [`Operation`] (for example
//! when rendering remote edits) and has its own pairwise transform.

use std::fmt;

use serde_json::Value;

use crate::error::{OperationError, Result};
use crate::operation::{Operation, Step};
use crate::range::{CharIdx, CharLen};
use crate::text::{char_len, split_chars};

/// A single edit at an absolute character offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleOperation {
	/// Does nothing.
	Noop,
	/// Inserts non-empty `text` at `position`.
	Insert {
		/// Inserted text.
		text: String,
		/// Offset of the insertion.
		position: CharIdx,
	},
	/// Removes `count` characters starting at `position`.
	Delete {
		/// Number of removed characters, at least one.
		count: CharLen,
		/// Offset of the first removed character.
		position: CharIdx,
	},
}

use SimpleOperation::{Delete, Insert, Noop};

impl SimpleOperation {
	/// Creates an insertion, or [`SimpleOperation::Noop`] for empty text.
	pub fn insert(text: impl Into<String>, position: CharIdx) -> Self {
		let text = text.into();
		if text.is_empty() { Noop } else { Insert { text, position } }
	}

	/// Creates a deletion, or [`SimpleOperation::Noop`] for a zero count.
	pub fn delete(count: CharLen, position: CharIdx) -> Self {
		if count == 0 { Noop } else { Delete { count, position } }
	}

	/// Applies the edit to `doc`.
	///
	/// # Errors
	///
	/// [`OperationError::InvalidOperation`] if the edit reaches past the end of `doc`.
	pub fn apply(&self, doc: &str) -> Result<String> {
		match self {
			Noop => Ok(doc.to_owned()),
			Insert { text, position } => {
				let (head, tail) = split_chars(doc, *position)
					.ok_or(OperationError::InvalidOperation("insert past the end of the document"))?;
				Ok([head, text.as_str(), tail].concat())
			}
			Delete { count, position } => {
				let err = OperationError::InvalidOperation("delete past the end of the document");
				let (head, rest) = split_chars(doc, *position).ok_or(err.clone())?;
				let (_, tail) = split_chars(rest, *count).ok_or(err)?;
				Ok([head, tail].concat())
			}
		}
	}

	/// Wire value: `0` for a no-op, `-count` for a delete, the text for an insert.
	pub fn to_json(&self) -> Value {
		match self {
			Noop => Value::from(0),
			Insert { text, .. } => Value::from(text.as_str()),
			Delete { count, .. } => Value::from(-(*count as i64)),
		}
	}

	/// Transforms two concurrent edits into `(a', b')`.
	///
	/// Concurrent inserts at the same offset are ordered by their text; two
	/// identical inserts cancel out. An insert landing inside a concurrent
	/// delete is swallowed by widening the delete.
	pub fn transform(a: &Self, b: &Self) -> (Self, Self) {
		match (a, b) {
			(Noop, _) | (_, Noop) => (a.clone(), b.clone()),
			(Insert { .. }, Insert { .. }) => transform_inserts(a, b),
			(Insert { text, position }, Delete { count, position: del_pos }) => {
				transform_insert_delete(text, *position, *count, *del_pos)
			}
			(Delete { count, position: del_pos }, Insert { text, position }) => {
				let (b_prime, a_prime) = transform_insert_delete(text, *position, *count, *del_pos);
				(a_prime, b_prime)
			}
			(
				Delete { count: a_count, position: a_pos },
				Delete { count: b_count, position: b_pos },
			) => transform_deletes(*a_count, *a_pos, *b_count, *b_pos),
		}
	}

	/// Splits an operation into its individual edits, in document order.
	///
	/// Positions refer to the document as it looks while walking the operation,
	/// so applying the results one after another reproduces the operation.
	pub fn from_operation(operation: &Operation) -> Vec<SimpleOperation> {
		let mut simple = Vec::new();
		let mut index = 0;
		for step in operation.steps() {
			match step {
				Step::Retain(n) => index += n,
				Step::Insert(ins) => {
					simple.push(Insert {
						text: ins.text().to_owned(),
						position: index,
					});
					index += ins.char_len();
				}
				Step::Delete(n) => simple.push(Delete {
					count: *n,
					position: index,
				}),
			}
		}
		simple
	}
}

fn transform_inserts(a: &SimpleOperation, b: &SimpleOperation) -> (SimpleOperation, SimpleOperation) {
	let (Insert { text: a_text, position: a_pos }, Insert { text: b_text, position: b_pos }) = (a, b)
	else {
		return (a.clone(), b.clone());
	};

	match (a_pos, a_text.as_str()).cmp(&(b_pos, b_text.as_str())) {
		std::cmp::Ordering::Less => (a.clone(), SimpleOperation::insert(b_text.clone(), b_pos + char_len(a_text))),
		std::cmp::Ordering::Greater => (SimpleOperation::insert(a_text.clone(), a_pos + char_len(b_text)), b.clone()),
		std::cmp::Ordering::Equal => (Noop, Noop),
	}
}

/// Transforms an insert (`a`) against a delete (`b`), returning `(a', b')`.
fn transform_insert_delete(
	text: &str,
	position: CharIdx,
	count: CharLen,
	del_pos: CharIdx,
) -> (SimpleOperation, SimpleOperation) {
	let len = char_len(text);
	if position <= del_pos {
		(SimpleOperation::insert(text, position), SimpleOperation::delete(count, del_pos + len))
	} else if position >= del_pos + count {
		(SimpleOperation::insert(text, position - count), SimpleOperation::delete(count, del_pos))
	} else {
		// The insert lands inside the deleted span: it cannot survive.
		(Noop, SimpleOperation::delete(count + len, del_pos))
	}
}

fn transform_deletes(
	a_count: CharLen,
	a_pos: CharIdx,
	b_count: CharLen,
	b_pos: CharIdx,
) -> (SimpleOperation, SimpleOperation) {
	let a_end = a_pos + a_count;
	let b_end = b_pos + b_count;

	if a_pos == b_pos {
		if a_count == b_count {
			(Noop, Noop)
		} else if a_count < b_count {
			(Noop, SimpleOperation::delete(b_count - a_count, b_pos))
		} else {
			(SimpleOperation::delete(a_count - b_count, a_pos), Noop)
		}
	} else if a_pos < b_pos {
		if a_end <= b_pos {
			(SimpleOperation::delete(a_count, a_pos), SimpleOperation::delete(b_count, b_pos - a_count))
		} else if a_end >= b_end {
			(SimpleOperation::delete(a_count - b_count, a_pos), Noop)
		} else {
			(
				SimpleOperation::delete(b_pos - a_pos, a_pos),
				SimpleOperation::delete(b_end - a_end, a_pos),
			)
		}
	} else if a_pos >= b_end {
		(SimpleOperation::delete(a_count, a_pos - b_count), SimpleOperation::delete(b_count, b_pos))
	} else if a_end <= b_end {
		(Noop, SimpleOperation::delete(b_count - a_count, b_pos))
	} else {
		(
			SimpleOperation::delete(a_end - b_end, b_pos),
			SimpleOperation::delete(a_pos - b_pos, b_pos),
		)
	}
}

impl fmt::Display for SimpleOperation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Noop => f.write_str("Noop()"),
			Insert { text, position } => write!(f, "Insert({text}, {position})"),
			Delete { count, position } => write!(f, "Delete({count}, {position})"),
		}
	}
}
