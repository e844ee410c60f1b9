//! Persisted client session.
//!
//! Holds the bearer token issued by `POST /users/login`. The token is read
//! on every API request, saved on login and cleared on logout. When the
//! session is file-backed, the token survives restarts under the fixed key
//! [`TOKEN_KEY`].

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "authToken";

/// Errors from reading or writing the session file.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
}

/// Bearer token holder with load/save/clear lifecycle.
pub struct Session {
    token: RwLock<Option<String>>,
    path: Option<PathBuf>,
}

impl Session {
    /// A session that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            token: RwLock::new(None),
            path: None,
        }
    }

    /// Load the session stored at `path`. A missing file yields an empty session.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let stored = if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            serde_json::from_reader::<_, StoredSession>(reader)?
        } else {
            StoredSession::default()
        };

        tracing::debug!(
            path = %path.display(),
            authenticated = stored.auth_token.is_some(),
            "Session loaded"
        );

        Ok(Self {
            token: RwLock::new(stored.auth_token),
            path: Some(path),
        })
    }

    /// Current bearer token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Store a new token and persist it.
    pub fn save_token(&self, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        *self.token.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.clone());
        self.persist(Some(token))
    }

    /// Forget the token (logout) and remove it from storage.
    pub fn clear(&self) -> Result<(), SessionError> {
        *self.token.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        if let Some(path) = &self.path {
            if path.exists() {
                fs::remove_file(path)?;
            }
            tracing::info!(path = %path.display(), "Session cleared");
        }
        Ok(())
    }

    fn persist(&self, token: Option<String>) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, &StoredSession { auth_token: token })?;
        tracing::debug!(path = %path.display(), "Session saved");
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_lifecycle() {
        let session = Session::in_memory();
        assert!(session.token().is_none());

        session.save_token("abc").unwrap();
        assert_eq!(session.token().as_deref(), Some("abc"));

        session.clear().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let session = Session::load(&path).unwrap();
        assert!(session.token().is_none());
        session.save_token("token-123").unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains(TOKEN_KEY));

        let reloaded = Session::load(&path).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("token-123"));

        reloaded.clear().unwrap();
        assert!(!path.exists());
        assert!(Session::load(&path).unwrap().token().is_none());
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(Session::load(&path), Err(SessionError::Format(_))));
    }

    #[test]
    fn test_debug_hides_token() {
        let session = Session::in_memory();
        session.save_token("secret-token").unwrap();
        assert!(!format!("{:?}", session).contains("secret-token"));
    }
}
