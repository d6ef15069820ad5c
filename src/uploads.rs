use chrono::Utc;
use std::io;
use std::path::PathBuf;

use crate::error::Result;

/// Disk store for submitted plan files. File names are generated here;
/// nothing client-supplied ever reaches the filesystem.
#[derive(Clone)]
pub struct PlanFileStore {
    dir: PathBuf,
}

impl PlanFileStore {
    /// Open the store, creating the upload directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Write an upload to disk under a fresh generated name and return
    /// that name for storage on the record.
    pub async fn save(&self, extension: &str, bytes: &[u8]) -> Result<String> {
        let name = format!(
            "plan_{}_{:08x}.{}",
            Utc::now().timestamp_millis(),
            rand::random::<u32>(),
            extension
        );
        tokio::fs::write(self.dir.join(&name), bytes).await?;
        Ok(name)
    }

    /// Remove a stored file. Best effort: returns false when the name is
    /// unsafe or the file is already gone.
    pub async fn delete(&self, name: &str) -> bool {
        let Some(path) = self.path_of(name) else {
            tracing::warn!("Refusing to delete unsafe plan file name {:?}", name);
            return false;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!("Failed to delete plan file {:?}: {}", path, e);
                false
            }
        }
    }

    /// Resolve a stored name to its path. Names with separators or parent
    /// components are rejected.
    pub fn path_of(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return None;
        }
        Some(self.dir.join(name))
    }
}
