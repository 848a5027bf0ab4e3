//! Per-conversation transient state (spec.md §2 component 3, §3 Session
//! entity). Grounded on the teacher's `orchestrator::db::models::session`
//! shape (id, optional parent scope, timestamps) but kept process-local: the
//! specification scopes this store to "transient state", distinct from the
//! durable relational session table the chat-stream endpoint's session id
//! must remain valid against (spec.md §3).

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use via_domain::session::MessageRole;
use via_domain::{Session, SessionId};

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    ttl_hours: i64,
}

impl SessionStore {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl_hours,
        }
    }

    /// Resolves `requested` to an existing session if valid, else creates a
    /// new one — the chat-stream endpoint's "newly generated opaque value...
    /// when no valid one was provided; otherwise echoed" contract (spec.md §6).
    pub async fn resolve(&self, requested: Option<&str>, canvas_id: Option<String>) -> Session {
        if let Some(raw) = requested {
            if let Some(id) = SessionId::parse(raw) {
                let mut sessions = self.sessions.write().await;
                if let Some(existing) = sessions.get(&id) {
                    return existing.clone();
                }
                let session = Session::new(canvas_id, Utc::now());
                let session = Session { id, ..session };
                sessions.insert(id, session.clone());
                return session;
            }
        }
        let session = Session::new(canvas_id, Utc::now());
        self.sessions.write().await.insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: SessionId) -> Option<Session> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn append_message(&self, id: SessionId, role: MessageRole, content: impl Into<String>) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&id) {
            session.append_message(role, content, Utc::now());
        }
    }

    /// Garbage-collects sessions idle past `ttl_hours`, returning how many
    /// were removed.
    pub async fn gc_idle(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_idle(now, self.ttl_hours));
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::info!(removed, "garbage-collected idle sessions");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolve_with_no_id_creates_a_new_session() {
        let store = SessionStore::new(24);
        let session = store.resolve(None, Some("canvas-1".into())).await;
        assert_eq!(store.len().await, 1);
        assert_eq!(session.canvas_id.as_deref(), Some("canvas-1"));
    }

    #[tokio::test]
    async fn resolve_with_invalid_id_falls_back_to_a_new_session() {
        let store = SessionStore::new(24);
        let session = store.resolve(Some("not-a-uuid"), None).await;
        assert_eq!(store.get(session.id).await.unwrap().id, session.id);
    }

    #[tokio::test]
    async fn resolve_with_known_id_echoes_existing_session() {
        let store = SessionStore::new(24);
        let first = store.resolve(None, None).await;
        let second = store.resolve(Some(&first.id.to_string()), None).await;
        assert_eq!(first.id, second.id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn gc_idle_removes_only_expired_sessions() {
        let store = SessionStore::new(24);
        let fresh = store.resolve(None, None).await;
        let stale_id = SessionId::generate();
        {
            let mut sessions = store.sessions.write().await;
            let mut stale = Session::new(None, Utc::now() - chrono::Duration::hours(48));
            stale.id = stale_id;
            sessions.insert(stale_id, stale);
        }
        let removed = store.gc_idle().await;
        assert_eq!(removed, 1);
        assert!(store.get(fresh.id).await.is_some());
        assert!(store.get(stale_id).await.is_none());
    }
}
