pub mod types;

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
pub use types::{Answer, AnswerMap, Session};

/// Session persistence seam. Lookups return owned copies; writers put the
/// whole session back, last writer wins. `update_sequence` touches only the
/// cached sequence and leaves answers written meanwhile intact.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Session>, StoreError>;
    async fn put(&self, session: Session) -> Result<(), StoreError>;
    /// Returns false when the session does not exist.
    async fn update_sequence(&self, id: &str, sequence: u32) -> Result<bool, StoreError>;
    /// Returns whether a session was removed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// Process-lifetime store. Nothing expires.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn put(&self, session: Session) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session);
        Ok(())
    }

    async fn update_sequence(&self, id: &str, sequence: u32) -> Result<bool, StoreError> {
        match self.sessions.write().await.get_mut(id) {
            Some(session) => {
                session.sequence = sequence;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = InMemorySessionStore::new();
        assert!(store.get("s1").await.unwrap().is_none());

        let mut s = Session::new("s1");
        s.record("q_ai_1", Answer::new("hello", "free_text"));
        store.put(s).await.unwrap();

        let got = store.get("s1").await.unwrap().unwrap();
        assert_eq!(got.answers.len(), 1);

        assert!(store.delete("s1").await.unwrap());
        assert!(!store.delete("s1").await.unwrap());
        assert!(store.get("s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_returns_a_copy() {
        let store = InMemorySessionStore::new();
        store.put(Session::new("s1")).await.unwrap();

        let mut copy = store.get("s1").await.unwrap().unwrap();
        copy.record("q_ai_1", Answer::new("x", "free_text"));

        assert!(store.get("s1").await.unwrap().unwrap().answers.is_empty());
    }

    #[tokio::test]
    async fn test_update_sequence_keeps_answers() {
        let store = InMemorySessionStore::new();
        let mut s = Session::new("s1");
        s.record("q_ai_1", Answer::new("hello", "free_text"));
        store.put(s).await.unwrap();

        assert!(store.update_sequence("s1", 2).await.unwrap());
        let got = store.get("s1").await.unwrap().unwrap();
        assert_eq!(got.sequence, 2);
        assert_eq!(got.answers.len(), 1);

        assert!(!store.update_sequence("missing", 1).await.unwrap());
        assert!(store.get("missing").await.unwrap().is_none());
    }
}
