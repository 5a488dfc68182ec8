//! Append-only log of committed operations.

use async_trait::async_trait;
use parking_lot::RwLock;
use weft_primitives::{Operation, Revision};

use crate::Result;

/// Persistence for a document's committed operations.
///
/// The operation at index `n` is the one that produced revision `n + 1`.
#[async_trait]
pub trait RevisionLog: Send + Sync {
	/// Operations committed after `revision`, in commit order.
	async fn operations_after(&self, revision: Revision) -> Result<Vec<Operation>>;

	/// Appends the operation producing the next revision.
	async fn append(&self, operation: Operation) -> Result<()>;
}

/// In-memory [`RevisionLog`].
#[derive(Debug, Default)]
pub struct MemoryLog {
	operations: RwLock<Vec<Operation>>,
}

impl MemoryLog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a log holding an existing history, starting at revision 0.
	pub fn with_operations(operations: Vec<Operation>) -> Self {
		Self {
			operations: RwLock::new(operations),
		}
	}

	/// Number of committed operations.
	pub fn len(&self) -> usize {
		self.operations.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Copy of the whole history.
	pub fn operations(&self) -> Vec<Operation> {
		self.operations.read().clone()
	}
}

#[async_trait]
impl RevisionLog for MemoryLog {
	async fn operations_after(&self, revision: Revision) -> Result<Vec<Operation>> {
		let operations = self.operations.read();
		let start = usize::try_from(revision.0).unwrap_or(usize::MAX);
		Ok(operations.get(start..).map(<[Operation]>::to_vec).unwrap_or_default())
	}

	async fn append(&self, operation: Operation) -> Result<()> {
		self.operations.write().push(operation);
		Ok(())
	}
}
