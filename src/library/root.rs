//! Steam client root discovery.

use std::path::PathBuf;

use super::{is_dir, ScanError};
use crate::config::paths;

/// Return the first candidate holding a `steamapps` directory.
pub async fn locate_root(candidates: &[PathBuf]) -> Result<PathBuf, ScanError> {
    for candidate in candidates {
        if is_dir(&paths::steamapps(candidate)).await {
            tracing::debug!(root = %candidate.display(), "found Steam root");
            return Ok(candidate.clone());
        }
        tracing::trace!(candidate = %candidate.display(), "not a Steam root");
    }

    Err(ScanError::RootNotFound {
        searched: candidates.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_first_matching_candidate_wins() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let bare = temp.path().join("bare");
        let first = temp.path().join("first");
        let second = temp.path().join("second");
        std::fs::create_dir_all(&bare).unwrap();
        std::fs::create_dir_all(first.join("steamapps")).unwrap();
        std::fs::create_dir_all(second.join("steamapps")).unwrap();

        let root = locate_root(&[missing, bare, first.clone(), second])
            .await
            .unwrap();
        assert_eq!(root, first);
    }

    #[tokio::test]
    async fn test_marker_must_be_a_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("steamapps"), "").unwrap();

        let err = locate_root(&[temp.path().to_path_buf()]).await.unwrap_err();
        match err {
            ScanError::RootNotFound { searched } => assert_eq!(searched.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let err = locate_root(&[]).await.unwrap_err();
        assert!(matches!(err, ScanError::RootNotFound { .. }));
    }
}
