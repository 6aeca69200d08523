//! Session cache persisted to a JSON file

use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::domain::{Identity, SessionCache};
use crate::error::Error;

/// Default file name for the remembered session
pub const SESSION_FILE: &str = "session.json";

/// Remembers the signed-in identity in a JSON file between runs
#[derive(Debug, Clone)]
pub struct FileSessionCache {
    path: PathBuf,
}

impl FileSessionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionCache for FileSessionCache {
    fn get(&self) -> Result<Option<Identity>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Storage(format!(
                "failed to read session {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn set(&self, identity: &Identity) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(identity)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
