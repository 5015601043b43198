//! On-disk cache of base64-encoded icons, one `<appid>.b64` file per app.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tokio::fs;

use super::IconError;

/// Encoded icon cache directory
#[derive(Debug, Clone)]
pub struct IconCache {
    dir: PathBuf,
}

impl IconCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<app_id>.b64`
    pub fn entry_path(&self, app_id: &str) -> PathBuf {
        self.dir.join(format!("{app_id}.b64"))
    }

    /// Cached icon for `app_id`, unless `source` was modified after it.
    pub async fn load_fresh(&self, app_id: &str, source: &Path) -> Option<String> {
        let entry = self.entry_path(app_id);
        let cached_at = modified(&entry).await?;
        let source_at = modified(source).await?;
        if source_at > cached_at {
            tracing::debug!(app_id, "icon cache entry is stale");
            return None;
        }

        let encoded = fs::read_to_string(&entry).await.ok()?;
        (!encoded.is_empty()).then_some(encoded)
    }

    /// Persist an encoded icon, creating the cache directory if needed.
    pub async fn store(&self, app_id: &str, encoded: &str) -> Result<(), IconError> {
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.entry_path(app_id), encoded).await?;
        Ok(())
    }
}

async fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).await.ok()?.modified().ok()
}
