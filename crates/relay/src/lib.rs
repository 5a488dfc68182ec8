//! Server side of collaborative plain-text editing.
//!
//! A [`DocumentRelay`] is the single authority for one document. Clients
//! submit operations against the revision they last saw; the relay rebases
//! each submission past everything committed since, appends it to the
//! [`RevisionLog`] and fans it out to subscribers. Submissions are serialized
//! per document, which yields one linear history no matter how many clients
//! edit concurrently.

/// Relay configuration.
pub mod config;
/// Relay error types.
pub mod error;
/// Revision log abstraction and in-memory implementation.
pub mod log;
/// The per-document relay.
pub mod relay;

pub use config::RelayConfig;
pub use error::{RelayError, Result};
pub use log::{MemoryLog, RevisionLog};
pub use relay::{ClientId, DocumentRelay, RelayedOperation, Submission};
