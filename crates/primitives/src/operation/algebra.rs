//! Composition and transformation of operations.

use super::{Operation, Step};
use crate::error::{OperationError, Result};
use crate::range::CharLen;

/// Returns the unconsumed part of a counted step, if any.
#[inline]
fn remainder(left: CharLen, kind: fn(CharLen) -> Step) -> Option<Step> {
	(left > 0).then(|| kind(left))
}

impl Operation {
	/// Composes two consecutive operations into one with the same net effect.
	///
	/// For every document `s` of length [`Self::base_len`],
	/// `self.compose(other).apply(s) == other.apply(self.apply(s))`.
	///
	/// # Errors
	///
	/// [`OperationError::IncompatibleOperations`] if `self.target_len()` differs
	/// from `other.base_len()`.
	pub fn compose(&self, other: &Operation) -> Result<Operation> {
		if self.target_len != other.base_len {
			return Err(OperationError::IncompatibleOperations(
				"the base length of the second operation must equal the target length of the first",
			));
		}

		let mut result = Operation::new();
		let mut a_steps = self.steps.iter().cloned();
		let mut b_steps = other.steps.iter().cloned();
		let mut a = a_steps.next();
		let mut b = b_steps.next();

		loop {
			match (a.take(), b.take()) {
				(None, None) => break,
				// Deletes of the first operation never reach the second.
				(Some(Step::Delete(n)), rest) => {
					result.delete(n);
					a = a_steps.next();
					b = rest;
				}
				// Inserts of the second operation never touched the first.
				(rest, Some(Step::Insert(ins))) => {
					result.insert_insertion(ins);
					a = rest;
					b = b_steps.next();
				}
				(None, Some(_)) => {
					return Err(OperationError::IncompatibleOperations(
						"cannot compose: first operation is too short",
					));
				}
				(Some(_), None) => {
					return Err(OperationError::IncompatibleOperations(
						"cannot compose: first operation is too long",
					));
				}
				(Some(Step::Retain(n)), Some(Step::Retain(m))) => {
					let len = n.min(m);
					result.retain(len);
					a = remainder(n - len, Step::Retain).or_else(|| a_steps.next());
					b = remainder(m - len, Step::Retain).or_else(|| b_steps.next());
				}
				(Some(Step::Insert(ins)), Some(Step::Delete(m))) => {
					let len = ins.char_len().min(m);
					let (_, tail) = ins.split_at(len);
					a = (!tail.is_empty()).then(|| Step::Insert(tail)).or_else(|| a_steps.next());
					b = remainder(m - len, Step::Delete).or_else(|| b_steps.next());
				}
				(Some(Step::Insert(ins)), Some(Step::Retain(m))) => {
					let len = ins.char_len().min(m);
					let (head, tail) = ins.split_at(len);
					result.insert_insertion(head);
					a = (!tail.is_empty()).then(|| Step::Insert(tail)).or_else(|| a_steps.next());
					b = remainder(m - len, Step::Retain).or_else(|| b_steps.next());
				}
				(Some(Step::Retain(n)), Some(Step::Delete(m))) => {
					let len = n.min(m);
					result.delete(len);
					a = remainder(n - len, Step::Retain).or_else(|| a_steps.next());
					b = remainder(m - len, Step::Delete).or_else(|| b_steps.next());
				}
			}
		}

		Ok(result)
	}

	/// Transforms two concurrent operations against each other.
	///
	/// Both must apply to the same document. Returns `(a', b')` such that
	/// `b'.apply(a.apply(s)) == a'.apply(b.apply(s))`. When both operations
	/// insert at the same position, `a`'s text is placed first.
	///
	/// # Errors
	///
	/// [`OperationError::IncompatibleOperations`] if the base lengths differ.
	pub fn transform(a: &Operation, b: &Operation) -> Result<(Operation, Operation)> {
		if a.base_len != b.base_len {
			return Err(OperationError::IncompatibleOperations(
				"both operations must have the same base length",
			));
		}

		let mut a_prime = Operation::new();
		let mut b_prime = Operation::new();
		let mut a_steps = a.steps.iter().cloned();
		let mut b_steps = b.steps.iter().cloned();
		let mut x = a_steps.next();
		let mut y = b_steps.next();

		// Both cursors always sit at the same offset of the shared base document.
		loop {
			match (x.take(), y.take()) {
				(None, None) => break,
				(Some(Step::Insert(ins)), rest) => {
					b_prime.retain(ins.char_len());
					a_prime.insert_insertion(ins);
					x = a_steps.next();
					y = rest;
				}
				(rest, Some(Step::Insert(ins))) => {
					a_prime.retain(ins.char_len());
					b_prime.insert_insertion(ins);
					x = rest;
					y = b_steps.next();
				}
				(None, Some(_)) => {
					return Err(OperationError::IncompatibleOperations(
						"cannot transform: first operation is too short",
					));
				}
				(Some(_), None) => {
					return Err(OperationError::IncompatibleOperations(
						"cannot transform: first operation is too long",
					));
				}
				(Some(Step::Retain(n)), Some(Step::Retain(m))) => {
					let len = n.min(m);
					a_prime.retain(len);
					b_prime.retain(len);
					x = remainder(n - len, Step::Retain).or_else(|| a_steps.next());
					y = remainder(m - len, Step::Retain).or_else(|| b_steps.next());
				}
				// Both delete the same span; neither side needs to do anything.
				(Some(Step::Delete(n)), Some(Step::Delete(m))) => {
					let len = n.min(m);
					x = remainder(n - len, Step::Delete).or_else(|| a_steps.next());
					y = remainder(m - len, Step::Delete).or_else(|| b_steps.next());
				}
				(Some(Step::Delete(n)), Some(Step::Retain(m))) => {
					let len = n.min(m);
					a_prime.delete(len);
					x = remainder(n - len, Step::Delete).or_else(|| a_steps.next());
					y = remainder(m - len, Step::Retain).or_else(|| b_steps.next());
				}
				(Some(Step::Retain(n)), Some(Step::Delete(m))) => {
					let len = n.min(m);
					b_prime.delete(len);
					x = remainder(n - len, Step::Retain).or_else(|| a_steps.next());
					y = remainder(m - len, Step::Delete).or_else(|| b_steps.next());
				}
			}
		}

		Ok((a_prime, b_prime))
	}
}
