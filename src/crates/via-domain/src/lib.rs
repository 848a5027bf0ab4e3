//! Shared data model for the Via Canvas intelligence core.
//!
//! This crate holds the plain-data types every other crate in the workspace
//! exchanges: [`Card`], [`Connection`], [`Session`], [`OperationRecord`],
//! [`IndexRecord`] and [`ExtractionCacheEntry`], plus the [`canvas`] module's
//! `CanvasClient` trait for the external canvas CRUD service. None of these
//! types carry behavior beyond small invariant-preserving constructors and
//! mutators — the services that own them (`via-kg-state`, `via-categories`,
//! `via-progress`, ...) implement the logic described in the specification.
//!
//! Ids follow the same thin-newtype-over-`String`/`Uuid` pattern
//! `via_checkpoint::checkpoint::CheckpointConfig` uses for `thread_id` /
//! `checkpoint_id`.

pub mod canvas;
pub mod card;
pub mod category;
pub mod connection;
pub mod error;
pub mod ids;
pub mod operation;
pub mod rag;
pub mod session;

pub use card::{Card, CardData, CardType, SourceType};
pub use category::CategoryProfile;
pub use connection::{Connection, ConnectionType};
pub use error::{DomainError, Result};
pub use ids::{CardId, ConnectionId, OperationId, ProfileId, SessionId};
pub use operation::{OperationRecord, OperationState};
pub use rag::{ExtractionCacheEntry, IndexRecord, IndexStatus};
pub use session::Session;
