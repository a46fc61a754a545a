use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::SESSION_FILE;
use crate::error::{TeammateError, TeammateResult};
use crate::logging::log_debug;

/// The logged-in identity. Passed explicitly to everything that needs to know who the user is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "uid")]
    pub user_id: String,
    #[serde(rename = "username")]
    pub user_name: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            token: None,
            user_id: user_id.into(),
            user_name: user_name.into(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// File-backed session persistence, one JSON document per user profile.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store in the user's home directory.
    pub fn default_location() -> TeammateResult<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| TeammateError::ConfigError("Could not find home directory".to_string()))?;
        Ok(Self::new(home_dir.join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> TeammateResult<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        let session: Session = serde_json::from_str(&raw)?;
        Ok(Some(session))
    }

    /// The stored session, or `NotLoggedIn`.
    pub fn require(&self) -> TeammateResult<Session> {
        self.load()?.ok_or(TeammateError::NotLoggedIn)
    }

    pub fn save(&self, session: &Session) -> TeammateResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        log_debug(&format!("Session saved for user {}", session.user_id));
        Ok(())
    }

    /// Forget the stored session. Returns whether there was one.
    pub fn clear(&self) -> TeammateResult<bool> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            return Ok(true);
        }
        Ok(false)
    }
}
