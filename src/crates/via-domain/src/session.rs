//! Session entity (spec.md §3): per-conversation transient state.

use crate::ids::SessionId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub canvas_id: Option<String>,
    pub messages: Vec<SessionMessage>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// Default idle horizon after which a session is eligible for garbage
/// collection (spec.md §3, §6 "session TTL").
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

impl Session {
    pub fn new(canvas_id: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::generate(),
            canvas_id,
            messages: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    pub fn append_message(&mut self, role: MessageRole, content: impl Into<String>, now: DateTime<Utc>) {
        self.messages.push(SessionMessage {
            role,
            content: content.into(),
            timestamp: now,
        });
        self.last_activity = now;
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_idle(&self, now: DateTime<Utc>, ttl_hours: i64) -> bool {
        now.signed_duration_since(self.last_activity) > Duration::hours(ttl_hours)
    }
}
