//! Progress tracking for long-running operations (spec.md §4.8), ported
//! from `progress_tracker.py`. Wraps a [`via_domain::OperationRecord`] with
//! event emission and checkpoint-interval bookkeeping.

use crate::error::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use via_domain::{OperationId, OperationRecord, OperationState};
use via_event_bus::events::{Event, OperationEventPayload, ProgressEventPayload};
use via_event_bus::EventBus;

const CHECKPOINT_INTERVAL_SECS: u64 = 30;
const CHECKPOINT_INTERVAL_CARDS: usize = 10;

struct TrackerState {
    record: OperationRecord,
    last_checkpoint: Instant,
}

/// Tracks one operation's progress and fans out [`Event::ProgressUpdate`] /
/// `OperationComplete` / `OperationFailed` / `OperationCancelled` events on
/// every transition, matching `progress_tracker.py`'s `_emit_progress_event`.
pub struct ProgressTracker {
    state: Mutex<TrackerState>,
    events: Arc<EventBus>,
    started: Instant,
    can_cancel: bool,
}

impl ProgressTracker {
    pub fn new(
        operation_id: OperationId,
        operation_type: impl Into<String>,
        total_steps: Option<usize>,
        canvas_id: Option<String>,
        session_id: Option<String>,
        events: Arc<EventBus>,
    ) -> Self {
        let mut record = OperationRecord::new(operation_id, operation_type.into(), Utc::now());
        record.canvas_id = canvas_id;
        record.session_id = session_id;
        record.total_steps = total_steps;
        Self {
            state: Mutex::new(TrackerState {
                record,
                last_checkpoint: Instant::now(),
            }),
            events,
            started: Instant::now(),
            can_cancel: true,
        }
    }

    pub async fn record(&self) -> OperationRecord {
        self.state.lock().await.record.clone()
    }

    /// Advances `current_step`, clamps `progress` to `[0, 1]`, appends newly
    /// created card ids, and emits a `ProgressUpdate` event. A no-op once the
    /// operation has been cancelled.
    pub async fn update_progress(
        &self,
        step_name: &str,
        progress: f64,
        message: &str,
        cards_created: &[via_domain::CardId],
    ) -> Result<()> {
        let mut guard = self.state.lock().await;
        if guard.record.is_cancelled {
            tracing::warn!(operation_id = %guard.record.operation_id, "operation cancelled, ignoring progress update");
            return Ok(());
        }
        guard.record.current_step = step_name.to_string();
        guard.record.progress = progress.clamp(0.0, 1.0);
        guard.record.message = message.to_string();
        guard.record.cards_created.extend(cards_created.iter().cloned());
        guard.record.updated_at = Utc::now();
        let estimated = self.estimate_remaining(guard.record.progress);
        let payload = ProgressEventPayload {
            operation_id: guard.record.operation_id.to_string(),
            operation_type: guard.record.operation_type.clone(),
            step: step_name.to_string(),
            progress: guard.record.progress,
            message: guard.record.message.clone(),
            cards_created: guard.record.cards_created.len() as u64,
            estimated_remaining_secs: estimated,
            can_cancel: self.can_cancel,
        };
        drop(guard);
        self.events.emit(Event::ProgressUpdate(payload)).await;
        Ok(())
    }

    fn estimate_remaining(&self, progress: f64) -> Option<f64> {
        if progress <= 0.0 {
            return None;
        }
        let elapsed = self.started.elapsed().as_secs_f64();
        if elapsed < 1.0 {
            return None;
        }
        let estimated_total = elapsed / progress;
        Some((estimated_total - elapsed).max(0.0))
    }

    /// `true` once either 30s have elapsed since the last checkpoint or the
    /// card-created count has just crossed a multiple of 10.
    pub async fn should_save_checkpoint(&self) -> bool {
        let guard = self.state.lock().await;
        if guard.last_checkpoint.elapsed().as_secs() >= CHECKPOINT_INTERVAL_SECS {
            return true;
        }
        let count = guard.record.cards_created.len();
        count > 0 && count % CHECKPOINT_INTERVAL_CARDS == 0
    }

    pub async fn mark_checkpointed(&self) {
        self.state.lock().await.last_checkpoint = Instant::now();
    }

    pub async fn complete(&self, final_message: &str) -> Result<()> {
        let mut guard = self.state.lock().await;
        guard.record.progress = 1.0;
        guard.record.message = final_message.to_string();
        guard.record.state = OperationState::Completed;
        guard.record.updated_at = Utc::now();
        let payload = OperationEventPayload {
            operation_id: guard.record.operation_id.to_string(),
            operation_type: guard.record.operation_type.clone(),
            cards_created: guard.record.cards_created.iter().map(|id| id.to_string()).collect(),
            message: Some(final_message.to_string()),
        };
        drop(guard);
        self.events.emit(Event::OperationComplete(payload)).await;
        Ok(())
    }

    pub async fn fail(&self, error_message: &str) -> Result<()> {
        let mut guard = self.state.lock().await;
        guard.record.message = format!("Error: {error_message}");
        guard.record.state = OperationState::Failed;
        guard.record.updated_at = Utc::now();
        let payload = OperationEventPayload {
            operation_id: guard.record.operation_id.to_string(),
            operation_type: guard.record.operation_type.clone(),
            cards_created: guard.record.cards_created.iter().map(|id| id.to_string()).collect(),
            message: Some(error_message.to_string()),
        };
        drop(guard);
        self.events.emit(Event::OperationFailed(payload)).await;
        Ok(())
    }

    pub async fn cancel(&self) -> Result<()> {
        let mut guard = self.state.lock().await;
        guard.record.is_cancelled = true;
        guard.record.state = OperationState::Cancelled;
        guard.record.message = "Operation cancelled by user".to_string();
        guard.record.updated_at = Utc::now();
        let payload = OperationEventPayload {
            operation_id: guard.record.operation_id.to_string(),
            operation_type: guard.record.operation_type.clone(),
            cards_created: guard.record.cards_created.iter().map(|id| id.to_string()).collect(),
            message: None,
        };
        drop(guard);
        self.events.emit(Event::OperationCancelled(payload)).await;
        Ok(())
    }
}
