//! Client side of collaborative plain-text editing.
//!
//! A [`LocalClient`] sits between an editor ([`EditorSurface`]) and a server
//! connection ([`ServerTransport`]). It keeps at most one local operation in
//! flight ([`ClientState`]), rebases remote edits onto local ones, maintains an
//! undo history that survives remote edits ([`UndoManager`]) and renders the
//! selections of remote peers ([`RemoteClient`]).
//!
//! # Architecture
//!
//! ```text
//!   EditorSurface ──EditorEvent──► LocalClient ◄──ServerEvent── ServerTransport
//!        ▲                          │  Client (revision + ClientState)
//!        │ apply / set_selection    │  UndoManager
//!        └──────────────────────────┤  RemoteClient peers
//!                                   └──send_operation / send_selection──►
//! ```

/// Headless rope-backed editor surface.
pub mod buffer;
/// Client configuration.
pub mod config;
/// Client error types.
pub mod error;
/// Editor/server orchestrator.
pub mod local;
/// Remote peer presence.
pub mod remote;
/// Listener lists.
pub mod signal;
/// Synchronization state machine.
pub mod state;
/// Collaborator traits and events.
pub mod surface;
/// Undo/redo history.
pub mod undo_manager;

pub use buffer::{BufferSurface, MarkerId, PeerMark};
pub use config::{ClientConfig, UndoConfig};
pub use error::{ClientError, Result};
pub use local::LocalClient;
pub use remote::{PeerSummary, RemoteClient};
pub use signal::{Signal, Subscription};
pub use state::{Client, ClientState, ClientStateKind, SyncHost};
pub use surface::{EditorEvent, EditorSurface, PresenceRenderer, ServerEvent, ServerTransport};
pub use undo_manager::{RebasedHistory, UndoManager};
