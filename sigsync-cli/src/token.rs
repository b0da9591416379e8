//! Session token persisted between CLI invocations.
//!
//! The token is stored raw in a single file under the data directory. It has
//! no expiry of its own; the API rejects it once the server-side session ends.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sigsync_core::BearerToken;

const TOKEN_FILE: &str = "token";

pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(TOKEN_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored token, or `None` when nobody is logged in.
    pub fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Stored token as a bearer credential.
    pub fn bearer(&self) -> io::Result<Option<BearerToken>> {
        Ok(self.load()?.and_then(|raw| BearerToken::new(raw).ok()))
    }

    pub fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }

    /// Removes the stored token. Returns false if there was none.
    pub fn clear(&self) -> io::Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_without_file() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        assert_eq!(store.load().unwrap(), None);
        assert!(store.bearer().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_data_dir() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested").join("sigsync"));

        store.save("eyJhbGciOiJIUzI1NiJ9.payload.sig").unwrap();

        assert!(store.path().exists());
        assert_eq!(
            store.load().unwrap().as_deref(),
            Some("eyJhbGciOiJIUzI1NiJ9.payload.sig")
        );
        assert_eq!(
            store.bearer().unwrap().unwrap().as_str(),
            "eyJhbGciOiJIUzI1NiJ9.payload.sig"
        );
    }

    #[test]
    fn test_blank_file_is_logged_out() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        std::fs::write(store.path(), "  \n").unwrap();

        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let store = TokenStore::new(dir.path());

        assert!(!store.clear().unwrap());
        store.save("jwt").unwrap();
        assert!(store.clear().unwrap());
        assert_eq!(store.load().unwrap(), None);
    }
}
