//! Read access to the caller's session.
//!
//! The validation layer never owns sessions; it only asks the session that
//! the router attached to the call for a single key.

use crate::Error;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Key-value view of one caller's session.
///
/// Implementations return `Ok(None)` when the key is not set and
/// `Err(Error::SessionStore(..))` when the backing store cannot be reached.
#[async_trait]
pub trait SessionHandle: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, Error>;
}

/// A caller without any session.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

#[async_trait]
impl SessionHandle for NoSession {
    async fn get(&self, _key: &str) -> Result<Option<Value>, Error> {
        Ok(None)
    }
}

#[async_trait]
impl SessionHandle for HashMap<String, Value> {
    async fn get(&self, key: &str) -> Result<Option<Value>, Error> {
        Ok(HashMap::get(self, key).cloned())
    }
}
