//! File-backed session persistence.
//!
//! One JSON file per profile. A file that no longer parses is treated as
//! "no session" so a bad write never locks the user out of signing in.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use yikang_core::{CoreError, Session, SessionStore};

use crate::{ConfigError, session_path};

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for a named profile in the platform data directory.
    pub fn for_profile(profile_name: &str) -> Self {
        Self::new(session_path(profile_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<Session>, ConfigError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    fn write(&self, session: &Session) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_vec_pretty(session)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(&body)?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn remove(&self) -> Result<(), ConfigError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, CoreError> {
        Ok(self.read()?)
    }

    fn save(&self, session: &Session) -> Result<(), CoreError> {
        Ok(self.write(session)?)
    }

    fn clear(&self) -> Result<(), CoreError> {
        Ok(self.remove()?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use secrecy::ExposeSecret;

    use super::*;

    fn session() -> Session {
        serde_json::from_value(serde_json::json!({
            "access_token": "user-jwt",
            "refresh_token": "refresh-1",
            "expires_at": 4_102_444_800_i64,
            "user": { "id": "8d0f", "email": "admin@example.com" }
        }))
        .unwrap()
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("data").join("session-prod.json"));

        assert!(store.load().unwrap().is_none());
        store.save(&session()).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token.expose_secret(), "user-jwt");
        assert_eq!(loaded.user.email.as_deref(), Some("admin@example.com"));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_reads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session-prod.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(store.load().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session-prod.json"));
        store.save(&session()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
