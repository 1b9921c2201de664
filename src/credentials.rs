//! Credential storage for opaque Anisette provisioning blobs

use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Store holding named secret blobs. Entries are only ever cleared here;
/// reading them is the job of whatever performs provisioning.
pub trait CredentialStore: Send {
    /// Remove an entry. Returns `true` if something was removed.
    fn clear(&mut self, entry: &str) -> Result<bool>;
}

/// One file per entry inside an owner-only directory
pub struct FileCredentialStore {
    dir: PathBuf,
}

impl FileCredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileCredentialStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an entry (used by provisioning and tests)
    pub fn store(&self, entry: &str, blob: &[u8]) -> Result<()> {
        self.ensure_dir()?;
        fs::write(self.entry_path(entry), blob)?;
        Ok(())
    }

    fn entry_path(&self, entry: &str) -> PathBuf {
        self.dir.join(entry)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700))?;
            }
        }
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn clear(&mut self, entry: &str) -> Result<bool> {
        match fs::remove_file(self.entry_path(entry)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ADI_ENTRY;
    use tempfile::tempdir;

    #[test]
    fn test_clear_removes_entry() {
        let dir = tempdir().unwrap();
        let mut store = FileCredentialStore::new(dir.path().join("credentials"));
        store.store(ADI_ENTRY, b"\x01\x02").unwrap();
        store.store("other", b"keep").unwrap();

        assert!(store.clear(ADI_ENTRY).unwrap());
        assert!(!store.dir().join(ADI_ENTRY).exists());
        assert!(store.dir().join("other").exists());
    }

    #[test]
    fn test_clear_missing_entry_is_not_an_error() {
        let dir = tempdir().unwrap();
        let mut store = FileCredentialStore::new(dir.path());
        assert!(!store.clear(ADI_ENTRY).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_dir_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials"));
        store.store(ADI_ENTRY, b"x").unwrap();
        let mode = fs::metadata(store.dir()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }
}
