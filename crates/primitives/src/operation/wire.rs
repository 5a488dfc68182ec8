//! Flat wire encoding of operations.
//!
//! An operation encodes as a sequence where a positive integer is a retain, a
//! negative integer a delete and a string an insert:
//!
//! ```text
//! [3, "hello", -2, 4]   // retain 3, insert "hello", delete 2, retain 4
//! ```
//!
//! Decoding rebuilds the operation through the builder, so non-canonical input
//! (split retains, delete before insert, zeros) decodes to the canonical form.

use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::{Operation, Step};
use crate::error::{OperationError, Result};
use crate::range::CharLen;
use crate::text::char_len;

impl Serialize for Operation {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut seq = serializer.serialize_seq(Some(self.steps.len()))?;
		for step in &self.steps {
			match step {
				Step::Retain(n) => seq.serialize_element(&(*n as i64))?,
				Step::Delete(n) => seq.serialize_element(&-(*n as i64))?,
				Step::Insert(ins) => seq.serialize_element(ins.text())?,
			}
		}
		seq.end()
	}
}

/// One decoded wire element.
enum WireStep {
	Count(i64),
	Text(String),
}

impl<'de> Deserialize<'de> for WireStep {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		struct WireStepVisitor;

		impl<'de> Visitor<'de> for WireStepVisitor {
			type Value = WireStep;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str("an integer (retain/delete) or a string (insert)")
			}

			fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<WireStep, E> {
				Ok(WireStep::Count(v))
			}

			fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<WireStep, E> {
				i64::try_from(v)
					.map(WireStep::Count)
					.map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
			}

			fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<WireStep, E> {
				Ok(WireStep::Text(v.to_owned()))
			}

			fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<WireStep, E> {
				Ok(WireStep::Text(v))
			}
		}

		deserializer.deserialize_any(WireStepVisitor)
	}
}

impl<'de> Deserialize<'de> for Operation {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		struct OperationVisitor;

		impl<'de> Visitor<'de> for OperationVisitor {
			type Value = Operation;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str("a sequence of retain/delete integers and insert strings")
			}

			fn visit_seq<A: SeqAccess<'de>>(
				self,
				mut seq: A,
			) -> std::result::Result<Operation, A::Error> {
				let mut op = Operation::new();
				while let Some(step) = seq.next_element::<WireStep>()? {
					let (base_step, target_step) = match &step {
						WireStep::Count(n) => {
							let count = CharLen::try_from(n.unsigned_abs())
								.map_err(|_| <A::Error as de::Error>::custom("step count out of range"))?;
							if *n < 0 { (count, 0) } else { (count, count) }
						}
						WireStep::Text(text) => (0, char_len(text)),
					};
					// Step counts never exceed the base length, so checking the
					// totals keeps every builder addition in range.
					op.base_len
						.checked_add(base_step)
						.zip(op.target_len.checked_add(target_step))
						.ok_or_else(|| <A::Error as de::Error>::custom("operation length overflows"))?;
					match step {
						WireStep::Count(n) if n < 0 => op.delete(base_step),
						WireStep::Count(_) => op.retain(base_step),
						WireStep::Text(text) => op.insert(text),
					};
				}
				Ok(op)
			}
		}

		deserializer.deserialize_seq(OperationVisitor)
	}
}

impl Operation {
	/// Encodes this operation as a JSON array.
	pub fn to_json(&self) -> Value {
		Value::Array(
			self.steps
				.iter()
				.map(|step| match step {
					Step::Retain(n) => Value::from(*n as i64),
					Step::Delete(n) => Value::from(-(*n as i64)),
					Step::Insert(ins) => Value::from(ins.text()),
				})
				.collect(),
		)
	}

	/// Decodes an operation from a JSON array.
	///
	/// # Errors
	///
	/// [`OperationError::MalformedOperation`] if `value` is not an array or holds
	/// anything other than integers and strings.
	pub fn from_json(value: &Value) -> Result<Operation> {
		Operation::deserialize(value).map_err(|e| OperationError::MalformedOperation(e.to_string()))
	}
}
