// ── Authenticated session ──
//
// A `Session` is created by a successful login (or restored from disk at
// startup) and torn down at logout. `SessionStore` persists the single
// `{token, user}` entry between runs.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::model::{Credential, User};

/// Bearer token plus the account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    token: SecretString,
    user: User,
}

impl Session {
    pub fn new(token: SecretString, user: User) -> Self {
        Self { token, user }
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn credential(&self) -> Credential {
        self.user.effective_credential()
    }
}

/// On-disk shape of the session file.
#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
    user: User,
}

/// JSON file holding the persisted session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted session. A missing file means "not logged in".
    pub fn load(&self) -> Result<Option<Session>, CoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(session_error(&self.path, &e)),
        };
        let stored: StoredSession =
            serde_json::from_str(&raw).map_err(|e| session_error(&self.path, &e))?;
        debug!(path = %self.path.display(), user = %stored.user.username, "session loaded");
        Ok(Some(Session::new(stored.token.into(), stored.user)))
    }

    /// Write the session, readable by the current user only on Unix.
    pub fn save(&self, session: &Session) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| session_error(parent, &e))?;
        }
        let stored = StoredSession {
            token: session.token.expose_secret().to_owned(),
            user: session.user.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| session_error(&self.path, &e))?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&self.path)
            .map_err(|e| session_error(&self.path, &e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| session_error(&self.path, &e))?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Remove the persisted session. Removing a missing file is not an error.
    pub fn clear(&self) -> Result<(), CoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(session_error(&self.path, &e)),
        }
    }
}

fn session_error(path: &Path, err: &dyn std::fmt::Display) -> CoreError {
    CoreError::Session {
        message: format!("{}: {err}", path.display()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            user_id: Some("U001".into()),
            username: "admin".into(),
            credential: Some(Credential::Admin),
        }
    }

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested/session.json"));

        assert!(store.load().unwrap().is_none());

        store
            .save(&Session::new("tok-1".to_string().into(), user()))
            .unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.token().expose_secret(), "tok-1");
        assert_eq!(loaded.user(), &user());
        assert_eq!(loaded.credential(), Credential::Admin);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let result = SessionStore::new(path).load();
        assert!(matches!(result, Err(CoreError::Session { .. })));
    }
}
