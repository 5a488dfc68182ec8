use async_trait::async_trait;
use tokio::sync::broadcast::error::TryRecvError;
use weft_primitives::{Operation, OperationError, Revision, Selection, WrappedOperation};

use super::{ClientId, DocumentRelay, RelayedOperation, Submission};
use crate::{MemoryLog, RelayConfig, RelayError, Result, RevisionLog};

fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn insert_at(pos: usize, text: &str, len: usize) -> Operation {
	let mut op = Operation::new();
	op.retain(pos).insert(text).retain(len - pos);
	op
}

fn delete_at(pos: usize, count: usize, len: usize) -> Operation {
	let mut op = Operation::new();
	op.retain(pos).delete(count).retain(len - pos - count);
	op
}

/// History typing `1`, `2`, ... `n` at the end of an empty document.
fn appends(n: usize) -> Vec<Operation> {
	(1..=n).map(|i| insert_at(i - 1, &i.to_string(), i - 1)).collect()
}

fn relay_over(history: Vec<Operation>, config: RelayConfig) -> DocumentRelay<MemoryLog> {
	let mut doc = String::new();
	for op in &history {
		doc = op.apply(&doc).unwrap();
	}
	let revision = Revision(history.len() as u64);
	DocumentRelay::new(MemoryLog::with_operations(history), revision, &doc, config)
}

fn submission(client: u64, revision: u64, operation: Operation) -> Submission {
	Submission {
		client: ClientId(client),
		revision: Revision(revision),
		operation: WrappedOperation::bare(operation),
	}
}

#[tokio::test(flavor = "current_thread")]
async fn submission_is_rebased_past_concurrent_operations() {
	init_tracing();
	let mut history = appends(5);
	history.push(delete_at(0, 1, 5));
	history.push(insert_at(0, "ab", 4));
	let relay = relay_over(history, RelayConfig::default());
	assert_eq!(relay.snapshot().await, (Revision(7), "ab2345".to_owned()));

	// Client saw "12345" and typed X after "12".
	let relayed = relay
		.receive_operation(submission(1, 5, insert_at(2, "X", 5)))
		.await
		.unwrap();

	assert_eq!(relayed.revision, Revision(8));
	assert_eq!(relayed.client, ClientId(1));
	assert_eq!(relayed.operation.apply("ab2345").unwrap(), "ab2X345");
	assert_eq!(relay.snapshot().await, (Revision(8), "ab2X345".to_owned()));
	assert_eq!(relay.log().len(), 8);
	assert_eq!(relay.log().operations()[7], relayed.operation.operation);
}

#[tokio::test(flavor = "current_thread")]
async fn submission_wins_position_ties() {
	let relay = relay_over(appends(7), RelayConfig::default());
	relay
		.receive_operation(submission(1, 5, insert_at(5, "X", 5)))
		.await
		.unwrap();
	assert_eq!(relay.snapshot().await.1, "12345X67");
}

#[tokio::test(flavor = "current_thread")]
async fn selection_follows_the_rebase() {
	let mut history = appends(3);
	history.push(insert_at(0, "ab", 3));
	let relay = relay_over(history, RelayConfig::default());

	let relayed = relay
		.receive_operation(Submission {
			client: ClientId(9),
			revision: Revision(3),
			operation: WrappedOperation::new(insert_at(3, "!", 3), Some(Selection::cursor(4))),
		})
		.await
		.unwrap();

	assert_eq!(relayed.operation.meta, Some(Selection::cursor(6)));
	assert_eq!(relay.snapshot().await.1, "ab123!");
}

#[tokio::test(flavor = "current_thread")]
async fn up_to_date_submission_is_committed_unchanged() {
	let relay = relay_over(appends(2), RelayConfig::default());
	let op = delete_at(0, 1, 2);
	let relayed = relay
		.receive_operation(submission(1, 2, op.clone()))
		.await
		.unwrap();
	assert_eq!(relayed.operation.operation, op);
	assert_eq!(relay.current_revision().await, Revision(3));
}

#[tokio::test(flavor = "current_thread")]
async fn submission_from_the_future_is_rejected() {
	let relay = relay_over(appends(2), RelayConfig::default());
	let err = relay
		.receive_operation(submission(1, 3, insert_at(0, "x", 3)))
		.await
		.unwrap_err();
	assert!(matches!(
		err,
		RelayError::RevisionAhead {
			client: Revision(3),
			current: Revision(2)
		}
	));
	assert_eq!(relay.log().len(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn short_log_is_reported() {
	let relay = DocumentRelay::new(
		MemoryLog::with_operations(appends(2)),
		Revision(3),
		"123",
		RelayConfig::default(),
	);
	let err = relay
		.receive_operation(submission(1, 0, insert_at(0, "x", 0)))
		.await
		.unwrap_err();
	assert!(matches!(
		err,
		RelayError::LogInconsistent {
			expected: 3,
			actual: 2,
			..
		}
	));
}

#[tokio::test(flavor = "current_thread")]
async fn mismatched_operation_leaves_document_untouched() {
	let relay = relay_over(appends(3), RelayConfig::default());
	let mut events = relay.subscribe();

	let err = relay
		.receive_operation(submission(1, 3, insert_at(0, "x", 10)))
		.await
		.unwrap_err();

	assert!(matches!(
		err,
		RelayError::Operation(OperationError::LengthMismatch { .. })
	));
	assert_eq!(relay.snapshot().await, (Revision(3), "123".to_owned()));
	assert_eq!(relay.log().len(), 3);
	assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(flavor = "current_thread")]
async fn resent_submission_is_committed_once() {
	let relay = relay_over(Vec::new(), RelayConfig::default());
	let mut events = relay.subscribe();

	let first = relay
		.receive_operation(submission(1, 0, insert_at(0, "hi", 0)))
		.await
		.unwrap();
	relay
		.receive_operation(submission(2, 1, insert_at(2, "!", 2)))
		.await
		.unwrap();
	let again = relay
		.receive_operation(submission(1, 0, insert_at(0, "hi", 0)))
		.await
		.unwrap();

	assert_eq!(again, first);
	assert_eq!(relay.snapshot().await, (Revision(2), "hi!".to_owned()));
	assert_eq!(relay.log().len(), 2);

	let received: Vec<Revision> = std::iter::from_fn(|| events.try_recv().ok())
		.map(|relayed| relayed.revision)
		.collect();
	assert_eq!(received, vec![Revision(1), Revision(2)]);
}

#[tokio::test(flavor = "current_thread")]
async fn dedupe_window_is_bounded() {
	let config = RelayConfig {
		dedupe_window: 1,
		..RelayConfig::default()
	};
	let relay = relay_over(Vec::new(), config);

	relay
		.receive_operation(submission(1, 0, insert_at(0, "a", 0)))
		.await
		.unwrap();
	relay
		.receive_operation(submission(2, 1, insert_at(1, "b", 1)))
		.await
		.unwrap();
	let replayed = relay
		.receive_operation(submission(1, 0, insert_at(0, "a", 0)))
		.await
		.unwrap();

	assert_eq!(replayed.revision, Revision(3));
	assert_eq!(relay.log().len(), 3);
}

#[tokio::test(flavor = "current_thread")]
async fn subscribers_see_commits_in_order() {
	let relay = relay_over(Vec::new(), RelayConfig::default());
	let mut events = relay.subscribe();

	relay
		.receive_operation(submission(1, 0, insert_at(0, "a", 0)))
		.await
		.unwrap();
	relay
		.receive_operation(submission(2, 0, insert_at(0, "b", 0)))
		.await
		.unwrap();

	let first: RelayedOperation = events.recv().await.unwrap();
	let second = events.recv().await.unwrap();
	assert_eq!((first.client, first.revision), (ClientId(1), Revision(1)));
	assert_eq!((second.client, second.revision), (ClientId(2), Revision(2)));

	let doc = first.operation.apply("").unwrap();
	assert_eq!(second.operation.apply(&doc).unwrap(), relay.snapshot().await.1);
}

/// Log that yields to the scheduler on every call, so submissions interleave.
struct YieldingLog(MemoryLog);

#[async_trait]
impl RevisionLog for YieldingLog {
	async fn operations_after(&self, revision: Revision) -> Result<Vec<Operation>> {
		tokio::task::yield_now().await;
		self.0.operations_after(revision).await
	}

	async fn append(&self, operation: Operation) -> Result<()> {
		tokio::task::yield_now().await;
		self.0.append(operation).await
	}
}

#[tokio::test(flavor = "current_thread")]
async fn concurrent_submissions_form_one_history() {
	init_tracing();
	let relay = DocumentRelay::new(
		YieldingLog(MemoryLog::new()),
		Revision(0),
		"base",
		RelayConfig::default(),
	);

	let (a, b, c) = tokio::join!(
		relay.receive_operation(submission(1, 0, insert_at(0, "a", 4))),
		relay.receive_operation(submission(2, 0, insert_at(2, "b", 4))),
		relay.receive_operation(submission(3, 0, delete_at(3, 1, 4))),
	);
	let mut revisions = vec![a.unwrap().revision, b.unwrap().revision, c.unwrap().revision];
	revisions.sort();
	assert_eq!(revisions, vec![Revision(1), Revision(2), Revision(3)]);

	let mut doc = String::from("base");
	for op in relay.log().0.operations() {
		doc = op.apply(&doc).unwrap();
	}
	let (revision, snapshot) = relay.snapshot().await;
	assert_eq!(revision, Revision(3));
	assert_eq!(snapshot, doc);
	assert_eq!(snapshot, "ababs");
}
