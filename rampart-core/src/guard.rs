// Login guard for handler methods

use crate::{Error, SessionHandle};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session key the login record is stored under unless configured otherwise.
pub const DEFAULT_LOGIN_KEY: &str = "login";

/// Default message for a missing login.
pub const DEFAULT_LOGIN_MESSAGE: &str = "please log in first";

/// Method-level marker demanding an active login.
///
/// A handler without a requirement is never checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequirement {
    pub required: bool,
    pub message: String,
}

impl LoginRequirement {
    /// Login required, failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            required: true,
            message: message.into(),
        }
    }

    /// Marker present but switched off.
    pub fn disabled() -> Self {
        Self {
            required: false,
            message: DEFAULT_LOGIN_MESSAGE.to_string(),
        }
    }
}

impl Default for LoginRequirement {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_MESSAGE)
    }
}

/// Checks a [`LoginRequirement`] against the caller's session.
///
/// The session is only consulted when a login is actually required, so a
/// broken session store cannot reject public handlers.
#[derive(Debug, Clone)]
pub struct LoginGuard {
    key: String,
}

impl LoginGuard {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// `Ok` when no login is required or the session holds a login record.
    pub async fn check(
        &self,
        requirement: Option<&LoginRequirement>,
        session: &dyn SessionHandle,
    ) -> Result<(), Error> {
        let requirement = match requirement {
            Some(r) if r.required => r,
            _ => return Ok(()),
        };

        match session.get(&self.key).await? {
            Some(record) if !record.is_null() => Ok(()),
            _ => {
                debug!(key = %self.key, "no login record in session");
                Err(Error::Auth(requirement.message.clone()))
            }
        }
    }
}

impl Default for LoginGuard {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_KEY)
    }
}
