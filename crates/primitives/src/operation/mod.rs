//! Retain/insert/delete operations and their algebra.
//!
//! An [`Operation`] is a sequence of [`Step`]s walked by an imaginary cursor
//! over the base document: retains copy characters, deletes skip them, inserts
//! emit new text. It is a morphism from documents of [`Operation::base_len`]
//! characters to documents of [`Operation::target_len`] characters.
//!
//! The builder keeps operations canonical: adjacent steps of the same kind are
//! merged, zero-length steps are dropped, and an insert directly following a
//! delete is moved in front of it. Two operations with the same effect on every
//! valid document therefore compare equal.

mod algebra;
mod grouping;
mod types;
mod wire;


use std::fmt;

use ropey::Rope;
pub use types::{Insertion, Step};

use crate::error::{OperationError, Result};
use crate::range::CharLen;
use crate::text::{char_len, split_chars};

/// An edit of a whole plain-text document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Operation {
	/// Canonical step sequence.
	steps: Vec<Step>,
	/// Length of the document this operation applies to.
	base_len: CharLen,
	/// Length of the document this operation produces.
	target_len: CharLen,
}

impl Operation {
	/// Creates an empty operation (base and target length zero).
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds an operation from raw steps, normalizing them through the builder.
	pub fn from_steps(steps: impl IntoIterator<Item = Step>) -> Self {
		let mut op = Self::new();
		for step in steps {
			op.push(step);
		}
		op
	}

	/// Returns the length of the document this operation expects.
	pub fn base_len(&self) -> CharLen {
		self.base_len
	}

	/// Returns the length of the document this operation produces.
	pub fn target_len(&self) -> CharLen {
		self.target_len
	}

	/// Returns the canonical steps.
	pub fn steps(&self) -> &[Step] {
		&self.steps
	}

	/// Returns true if applying this operation leaves every document unchanged.
	pub fn is_noop(&self) -> bool {
		matches!(self.steps.as_slice(), [] | [Step::Retain(_)])
	}

	/// Appends a step of any kind.
	pub fn push(&mut self, step: Step) -> &mut Self {
		match step {
			Step::Retain(n) => self.retain(n),
			Step::Insert(ins) => self.insert_insertion(ins),
			Step::Delete(n) => self.delete(n),
		}
	}

	/// Skips over `n` characters of the base document.
	///
	/// Consecutive retains are merged.
	pub fn retain(&mut self, n: CharLen) -> &mut Self {
		if n == 0 {
			return self;
		}

		self.base_len += n;
		self.target_len += n;

		if let Some(Step::Retain(count)) = self.steps.last_mut() {
			*count += n;
		} else {
			self.steps.push(Step::Retain(n));
		}
		self
	}

	/// Inserts `text` at the current position.
	///
	/// Inserts are merged with an adjacent insert, and always placed before a
	/// trailing delete.
	pub fn insert(&mut self, text: impl Into<String>) -> &mut Self {
		self.insert_insertion(Insertion::new(text))
	}

	fn insert_insertion(&mut self, ins: Insertion) -> &mut Self {
		if ins.is_empty() {
			return self;
		}

		self.target_len += ins.char_len();

		match self.steps.as_mut_slice() {
			[.., Step::Insert(prev)] | [.., Step::Insert(prev), Step::Delete(_)] => {
				prev.push(ins);
			}
			[.., last @ Step::Delete(_)] => {
				let del = std::mem::replace(last, Step::Insert(ins));
				self.steps.push(del);
			}
			_ => {
				self.steps.push(Step::Insert(ins));
			}
		}
		self
	}

	/// Deletes the next `n` characters of the base document.
	///
	/// Consecutive deletes are merged.
	pub fn delete(&mut self, n: CharLen) -> &mut Self {
		if n == 0 {
			return self;
		}

		self.base_len += n;

		if let Some(Step::Delete(count)) = self.steps.last_mut() {
			*count += n;
		} else {
			self.steps.push(Step::Delete(n));
		}
		self
	}

	fn check_len(&self, actual: CharLen) -> Result<()> {
		if actual == self.base_len {
			Ok(())
		} else {
			Err(OperationError::LengthMismatch {
				expected: self.base_len,
				actual,
			})
		}
	}

	/// Applies this operation to `doc`, returning the new document.
	///
	/// # Errors
	///
	/// [`OperationError::LengthMismatch`] if `doc` is not [`Self::base_len`]
	/// characters long, [`OperationError::InvalidOperation`] if the steps overrun
	/// or fail to consume the document.
	pub fn apply(&self, doc: &str) -> Result<String> {
		self.check_len(char_len(doc))?;

		let mut out = String::with_capacity(doc.len());
		let mut rest = doc;
		for step in &self.steps {
			match step {
				Step::Retain(n) => {
					let (kept, tail) = split_chars(rest, *n).ok_or(
						OperationError::InvalidOperation("retain past the end of the document"),
					)?;
					out.push_str(kept);
					rest = tail;
				}
				Step::Insert(ins) => out.push_str(ins.text()),
				Step::Delete(n) => {
					let (_, tail) = split_chars(rest, *n).ok_or(
						OperationError::InvalidOperation("delete past the end of the document"),
					)?;
					rest = tail;
				}
			}
		}

		if !rest.is_empty() {
			return Err(OperationError::InvalidOperation(
				"operation did not consume the whole document",
			));
		}
		Ok(out)
	}

	/// Applies this operation to a rope in place.
	///
	/// The length is validated before any mutation, so a rejected operation
	/// leaves `doc` untouched.
	pub fn apply_to_rope(&self, doc: &mut Rope) -> Result<()> {
		self.check_len(doc.len_chars())?;

		let mut pos = 0;
		for step in &self.steps {
			match step {
				Step::Retain(n) => pos += n,
				Step::Delete(n) => doc.remove(pos..pos + n),
				Step::Insert(ins) => {
					doc.insert(pos, ins.text());
					pos += ins.char_len();
				}
			}
		}
		Ok(())
	}

	/// Computes the operation that reverts this one.
	///
	/// `doc` is the document *before* this operation was applied; deleted text
	/// is recovered from it. Inserts invert to deletes, deletes to inserts of the
	/// removed text, retains to themselves.
	pub fn invert(&self, doc: &str) -> Result<Operation> {
		self.check_len(char_len(doc))?;

		let mut inverse = Operation::new();
		let mut rest = doc;
		for step in &self.steps {
			match step {
				Step::Retain(n) => {
					inverse.retain(*n);
					rest = split_chars(rest, *n)
						.ok_or(OperationError::InvalidOperation(
							"retain past the end of the document",
						))?
						.1;
				}
				Step::Insert(ins) => {
					inverse.delete(ins.char_len());
				}
				Step::Delete(n) => {
					let (removed, tail) = split_chars(rest, *n).ok_or(
						OperationError::InvalidOperation("delete past the end of the document"),
					)?;
					inverse.insert(removed);
					rest = tail;
				}
			}
		}
		Ok(inverse)
	}
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, step) in self.steps.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			match step {
				Step::Retain(n) => write!(f, "retain {n}")?,
				Step::Insert(ins) => write!(f, "insert '{}'", ins.text())?,
				Step::Delete(n) => write!(f, "delete {n}")?,
			}
		}
		Ok(())
	}
}
