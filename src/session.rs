//! In-memory chat session bookkeeping.
//!
//! Sessions associate a generated (or client-supplied) identifier with the
//! turns accumulated so far. History is recorded and returned to the client;
//! answer generation itself stays single-turn.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// One question/answer exchange in a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
}

/// Concurrent in-memory session store.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Vec<ChatTurn>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a session ID, generating a fresh one when absent.
    ///
    /// The session is created (empty) if it does not exist yet, so a
    /// client-supplied ID always resolves to a live session.
    pub fn resolve(&self, session_id: Option<String>) -> String {
        let id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut sessions = self.sessions.write().unwrap();
        sessions.entry(id.clone()).or_default();
        id
    }

    /// Append a turn to a session, creating it if needed.
    pub fn record_turn(&self, session_id: &str, question: &str, answer: &str) {
        let mut sessions = self.sessions.write().unwrap();
        sessions
            .entry(session_id.to_string())
            .or_default()
            .push(ChatTurn {
                question: question.to_string(),
                answer: answer.to_string(),
            });
    }

    /// Get the accumulated turns for a session, in insertion order.
    pub fn history(&self, session_id: &str) -> Vec<ChatTurn> {
        let sessions = self.sessions.read().unwrap();
        sessions.get(session_id).cloned().unwrap_or_default()
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        let sessions = self.sessions.read().unwrap();
        sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_generates_unique_ids() {
        let store = SessionStore::new();
        let a = store.resolve(None);
        let b = store.resolve(None);
        assert_ne!(a, b);
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn test_resolve_keeps_client_id() {
        let store = SessionStore::new();
        let id = store.resolve(Some("mascot-7".to_string()));
        assert_eq!(id, "mascot-7");
        assert!(store.history("mascot-7").is_empty());
    }

    #[test]
    fn test_history_accumulates_in_order() {
        let store = SessionStore::new();
        let id = store.resolve(None);

        store.record_turn(&id, "What is gravity?", "A force of attraction.");
        store.record_turn(&id, "Who described it?", "Isaac Newton.");

        let history = store.history(&id);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].question, "What is gravity?");
        assert_eq!(history[1].answer, "Isaac Newton.");
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        store.record_turn("a", "q1", "a1");
        store.record_turn("b", "q2", "a2");

        assert_eq!(store.history("a").len(), 1);
        assert_eq!(store.history("b").len(), 1);
        assert!(store.history("c").is_empty());
    }
}
