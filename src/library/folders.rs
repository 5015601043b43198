//! Library list parsing (`libraryfolders.vdf`).

use std::path::{Path, PathBuf};

use tokio::fs;

use super::keyvalues::Document;
use super::{is_dir, ScanError};
use crate::config::paths;

/// Every `"path"` value in a library list, at any nesting depth.
pub fn library_paths(text: &str) -> Vec<PathBuf> {
    Document::parse(text)
        .values("path")
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Find the libraries (`<path>/steamapps` directories) listed under `root`.
///
/// `config/libraryfolders.vdf` is read in preference to the copy under
/// `steamapps/`. Entries whose `steamapps` directory is gone are dropped,
/// as are repeats of an already listed library.
pub async fn enumerate_libraries(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let candidates = paths::library_folders_files(root);

    let mut text = None;
    for file in &candidates {
        match fs::read_to_string(file).await {
            Ok(content) => {
                tracing::debug!(file = %file.display(), "reading library list");
                text = Some(content);
                break;
            }
            Err(e) => {
                tracing::debug!(file = %file.display(), error = %e, "library list unavailable")
            }
        }
    }

    let mut libraries: Vec<PathBuf> = Vec::new();
    for path in library_paths(text.as_deref().unwrap_or_default()) {
        let library = paths::steamapps(&path);
        if libraries.contains(&library) {
            continue;
        }
        if is_dir(&library).await {
            tracing::debug!(library = %library.display(), "found library");
            libraries.push(library);
        } else {
            tracing::debug!(library = %library.display(), "skipping stale library entry");
        }
    }

    if libraries.is_empty() {
        return Err(ScanError::NoLibraries {
            checked: candidates.to_vec(),
        });
    }

    Ok(libraries)
}
