//! Game icons for inline terminal display.
//!
//! Steam keeps library artwork under `appcache/librarycache/<appid>/`,
//! named by content hash. The first `<40 hex>.jpg` found is shrunk to a
//! 64x64 PNG by a [`Thumbnailer`], base64-encoded, and cached as
//! `<cache>/<appid>.b64` until the source thumbnail changes.
//!
//! Every failure here yields "no icon"; nothing is fatal.

pub mod cache;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use base64::Engine;
use regex::Regex;
use thiserror::Error;
use walkdir::WalkDir;

use crate::adapters::Thumbnailer;
use crate::config::paths;
use crate::domain::Inventory;

pub use cache::IconCache;

/// Icon edge length in pixels
pub const ICON_SIZE: u32 = 64;

static THUMBNAIL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{40}\.jpg$").expect("thumbnail name pattern is valid")
});

/// Errors that can occur while producing an icon
#[derive(Debug, Error)]
pub enum IconError {
    #[error("No thumbnail for app {0}")]
    NoThumbnail(String),

    #[error("Conversion failed: {0}")]
    Convert(String),

    #[error("Converter produced no output for {0}")]
    EmptyOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Find a hash-named thumbnail for `app_id` under the client root.
///
/// Searches `<root>/appcache/librarycache/<app_id>/` and its immediate
/// subdirectories in file-name order and returns the first match.
pub fn find_thumbnail(root: &Path, app_id: &str) -> Option<PathBuf> {
    WalkDir::new(paths::thumbnail_dir(root, app_id))
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .find(|entry| THUMBNAIL_NAME.is_match(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.into_path())
}

/// Encoded icons keyed by app ID
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    icons: HashMap<String, String>,
}

impl IconSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, app_id: impl Into<String>, encoded: impl Into<String>) {
        self.icons.insert(app_id.into(), encoded.into());
    }

    /// Base64 PNG payload for `app_id`, if one was produced
    pub fn get(&self, app_id: &str) -> Option<&str> {
        self.icons.get(app_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Looks up, converts, and caches icons
pub struct IconResolver {
    root: PathBuf,
    cache: IconCache,
    thumbnailer: Box<dyn Thumbnailer>,
}

impl IconResolver {
    pub fn new(
        root: impl Into<PathBuf>,
        cache: IconCache,
        thumbnailer: Box<dyn Thumbnailer>,
    ) -> Self {
        Self {
            root: root.into(),
            cache,
            thumbnailer,
        }
    }

    /// Encoded icon for `app_id`, or `None` when there is nothing to show.
    pub async fn resolve(&self, app_id: &str) -> Option<String> {
        match self.try_resolve(app_id).await {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                tracing::debug!(app_id, error = %e, "no icon");
                None
            }
        }
    }

    async fn try_resolve(&self, app_id: &str) -> Result<String, IconError> {
        let source = find_thumbnail(&self.root, app_id)
            .ok_or_else(|| IconError::NoThumbnail(app_id.to_string()))?;

        if let Some(encoded) = self.cache.load_fresh(app_id, &source).await {
            tracing::trace!(app_id, "icon cache hit");
            return Ok(encoded);
        }

        let png = self
            .thumbnailer
            .thumbnail(&source, ICON_SIZE)
            .await
            .map_err(|e| IconError::Convert(format!("{e:#}")))?;
        if png.is_empty() {
            return Err(IconError::EmptyOutput(source));
        }

        let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
        if let Err(e) = self.cache.store(app_id, &encoded).await {
            tracing::debug!(app_id, error = %e, "failed to cache icon");
        }
        Ok(encoded)
    }

    /// Resolve icons for every game in the inventory, one at a time.
    pub async fn resolve_all(&self, inventory: &Inventory) -> IconSet {
        let mut icons = IconSet::new();
        for game in inventory.native.iter().chain(&inventory.proton) {
            if icons.get(&game.app_id).is_some() {
                continue;
            }
            if let Some(encoded) = self.resolve(&game.app_id).await {
                icons.insert(game.app_id.clone(), encoded);
            }
        }
        icons
    }
}
