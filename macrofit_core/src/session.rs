//! Session context and on-device session persistence.
//!
//! The current identity lives in an explicitly passed [`SessionContext`]
//! with the lifecycle anonymous → authenticated → expired → anonymous.
//! There is no global session singleton; callers thread the context
//! through every gateway call.
//!
//! Durable state is two key-value files under the data directory, mirroring
//! how the browser client kept them: the serialized user profile without
//! the token, and the raw token separately.

use crate::{local, Result, UserProfile};
use std::path::PathBuf;

/// Lifecycle state of the current identity
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No credential; all persistence is local-only
    Anonymous,
    /// Valid credential; remote operations are attempted first
    Authenticated { user: UserProfile, token: String },
    /// Credential rejected with a 401; caller must re-authenticate
    Expired,
}

/// The current identity, threaded through every persistence call
#[derive(Clone, Debug)]
pub struct SessionContext {
    state: SessionState,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self {
            state: SessionState::Anonymous,
        }
    }

    pub fn authenticated(user: UserProfile, token: impl Into<String>) -> Self {
        Self {
            state: SessionState::Authenticated {
                user,
                token: token.into(),
            },
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    /// Bearer token, present only while authenticated
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match &self.state {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    /// Enter the authenticated state with a fresh credential
    pub fn login(&mut self, user: UserProfile, token: impl Into<String>) {
        self.state = SessionState::Authenticated {
            user,
            token: token.into(),
        };
    }

    /// Drop the credential and return to anonymous
    pub fn logout(&mut self) {
        self.state = SessionState::Anonymous;
    }

    /// Mark the credential rejected; only a 401 triggers this
    pub fn expire(&mut self) {
        if self.is_authenticated() {
            tracing::info!("Session expired, credential invalidated");
            self.state = SessionState::Expired;
        }
    }
}

/// On-disk persistence for the session's two key-value entries
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join("user.json")
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join("token")
    }

    /// Restore the session saved on this device
    ///
    /// Both entries must be present and well-formed; anything else clears
    /// whatever is left and yields an anonymous session.
    pub fn load(&self) -> Result<SessionContext> {
        let user_path = self.user_path();
        let token_path = self.token_path();

        if !user_path.exists() || !token_path.exists() {
            return Ok(SessionContext::anonymous());
        }

        let token = std::fs::read_to_string(&token_path)?.trim().to_string();
        let user_json = std::fs::read_to_string(&user_path)?;

        match serde_json::from_str::<UserProfile>(&user_json) {
            Ok(user) if !token.is_empty() => {
                tracing::debug!("Restored session for {}", user.email);
                Ok(SessionContext::authenticated(user, token))
            }
            Ok(_) => {
                tracing::warn!("Empty token on disk, clearing session");
                self.clear()?;
                Ok(SessionContext::anonymous())
            }
            Err(e) => {
                tracing::warn!("Corrupt session data ({}), clearing session", e);
                self.clear()?;
                Ok(SessionContext::anonymous())
            }
        }
    }

    /// Persist an authenticated session; a non-authenticated one clears disk
    pub fn save(&self, session: &SessionContext) -> Result<()> {
        match session.state() {
            SessionState::Authenticated { user, token } => {
                local::atomic_write(&self.user_path(), serde_json::to_string(user)?.as_bytes())?;
                local::atomic_write(&self.token_path(), token.as_bytes())?;
                tracing::debug!("Saved session for {}", user.email);
                Ok(())
            }
            _ => self.clear(),
        }
    }

    /// Remove both session files
    pub fn clear(&self) -> Result<()> {
        for path in [self.user_path(), self.token_path()] {
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}
