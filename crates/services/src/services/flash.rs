//! Session-scoped flash data that survives exactly one page render.
//!
//! Flash data is consumed when a page is rendered, not when a request arrives.
//! A version-conflict response never renders, so the data is still there when
//! the client comes back with its full-page reload.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FlashError {
    #[error("flash store unavailable: {0}")]
    Backend(String),
}

#[async_trait]
pub trait FlashStore: Send + Sync {
    /// Stage `value` under `key` for the next render in `session`
    async fn flash(&self, session: &str, key: &str, value: Value) -> Result<(), FlashError>;

    /// Remove and return everything staged for `session`
    async fn take(&self, session: &str) -> Result<Map<String, Value>, FlashError>;
}

#[derive(Debug, Default)]
pub struct InMemoryFlashStore {
    sessions: DashMap<String, Map<String, Value>>,
}

impl InMemoryFlashStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlashStore for InMemoryFlashStore {
    async fn flash(&self, session: &str, key: &str, value: Value) -> Result<(), FlashError> {
        self.sessions
            .entry(session.to_string())
            .or_default()
            .insert(key.to_string(), value);
        debug!(session = %session, key = %key, "Flashed value");
        Ok(())
    }

    async fn take(&self, session: &str) -> Result<Map<String, Value>, FlashError> {
        Ok(self
            .sessions
            .remove(session)
            .map(|(_, data)| data)
            .unwrap_or_default())
    }
}
