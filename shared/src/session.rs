//! Session context
//!
//! Identity of one signed-in user. Views receive a [`Session`] explicitly
//! at construction instead of reading ambient storage, so every
//! permission check names the session it ran against.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("role '{0}' is not recognized")]
    UnknownRole(String),

    #[error("a {role} session cannot open a {required} view")]
    RoleMismatch { required: Role, role: Role },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Account role, as the login flow stores it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    RestaurantAdmin,
    Deliverer,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::RestaurantAdmin => "restaurantadmin",
            Role::Deliverer => "deliverer",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "restaurantadmin" => Ok(Role::RestaurantAdmin),
            "deliverer" => Ok(Role::Deliverer),
            "customer" => Ok(Role::Customer),
            other => Err(SessionError::UnknownRole(other.to_string())),
        }
    }
}

/// One signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: Role,
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>, role: Role) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            role,
        }
    }

    /// Role gate used by view constructors
    pub fn require_role(&self, required: Role) -> Result<(), SessionError> {
        if self.role == required {
            Ok(())
        } else {
            Err(SessionError::RoleMismatch {
                required,
                role: self.role,
            })
        }
    }
}

/// File-backed session persistence (the browser-storage analog)
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store rooted at `dir`; the session lives in `session.json`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join("session.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(username = %session.username, "Session saved");
        Ok(())
    }

    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let session: Session = serde_json::from_str(&content)?;
        tracing::debug!(username = %session.username, "Session loaded");
        Ok(Some(session))
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            tracing::debug!("Session cleared");
        }
        Ok(())
    }
}
