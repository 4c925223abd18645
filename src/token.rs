//! Durable credential storage. One file holds the raw bearer token; absence
//! (or an empty file) means logged out. No token-shape validation happens
//! here, any non-empty string is accepted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// File-backed store for the persisted bearer credential.
#[derive(Clone, Debug)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted credential. Missing, unreadable, and empty files
    /// all read as "no credential".
    #[must_use]
    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    debug!("credential file unreadable at {}: {err}", self.path.display());
                }
                None
            }
        }
    }

    /// Persists the credential, creating parent directories as needed. The
    /// file is restricted to the owner on unix.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    /// Removes the persisted credential. Clearing an already-absent
    /// credential is a no-op.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::TokenStore;
    use anyhow::Result;
    use std::path::PathBuf;
    use std::process;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn scratch_path(name: &str) -> PathBuf {
        let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "dormitory-console-test-{}-{unique}/{name}",
            process::id()
        ))
    }

    #[test]
    fn load_returns_none_when_missing() {
        let store = TokenStore::new(scratch_path("missing"));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn save_then_load_round_trips() -> Result<()> {
        let store = TokenStore::new(scratch_path("token"));
        store.save("T")?;
        assert_eq!(store.load(), Some("T".to_string()));

        // A fresh store reading the same path observes the persisted value.
        let fresh = TokenStore::new(store.path().to_path_buf());
        assert_eq!(fresh.load(), Some("T".to_string()));

        store.clear()?;
        assert_eq!(store.load(), None);
        Ok(())
    }

    #[test]
    fn clear_is_a_noop_when_absent() -> Result<()> {
        let store = TokenStore::new(scratch_path("absent"));
        store.clear()?;
        store.clear()?;
        Ok(())
    }

    #[test]
    fn blank_file_reads_as_logged_out() -> Result<()> {
        let store = TokenStore::new(scratch_path("blank"));
        store.save("   ")?;
        assert_eq!(store.load(), None);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let store = TokenStore::new(scratch_path("perm"));
        store.save("T")?;
        let mode = std::fs::metadata(store.path())?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        Ok(())
    }
}
