//! Canvas CRUD service contract (spec.md §6). The core never owns card or
//! connection rows — it mirrors them via the [`CanvasClient`] trait, which
//! is implemented outside this workspace (HTTP client, test double, ...).
//! Each call has a 10s timeout per the specification; implementers are
//! expected to enforce it at the transport layer (e.g. `reqwest`'s
//! `.timeout(Duration::from_secs(10))`), same posture the teacher takes with
//! `ChatModel` as an externally-implemented trait.

use crate::card::Card;
use crate::connection::{Connection, ConnectionType};
use crate::error::Result;
use crate::ids::CardId;
use async_trait::async_trait;

pub const CANVAS_CLIENT_TIMEOUT_SECS: u64 = 10;

#[async_trait]
pub trait CanvasClient: Send + Sync {
    async fn create_card(&self, card: Card) -> Result<Card>;
    async fn get_card(&self, canvas_id: &str, card_id: &CardId) -> Result<Option<Card>>;
    async fn list_cards(&self, canvas_id: &str) -> Result<Vec<Card>>;
    async fn update_card(&self, card: Card) -> Result<Card>;
    async fn create_connection(
        &self,
        canvas_id: &str,
        source_id: &CardId,
        target_id: &CardId,
        connection_type: ConnectionType,
        similarity_score: Option<f64>,
    ) -> Result<Connection>;
    async fn list_connections(&self, canvas_id: &str) -> Result<Vec<Connection>>;
}
