//! Steam library discovery.
//!
//! # Storage Layout
//!
//! ```text
//! <root>/                              # ~/.local/share/Steam, flatpak, snap...
//! ├── config/libraryfolders.vdf        # "path" entries, one per library
//! └── steamapps/                       # marker: a root is also a library
//!
//! <library path>/steamapps/
//! ├── appmanifest_<id>.acf             # appid, installdir, name
//! ├── common/<installdir>/             # the install itself
//! └── compatdata/<id>/
//!     ├── pfx/                         # present => run through Proton
//!     └── config_info                  # first line: Proton version
//! ```
//!
//! Root → libraries → manifests, each step reading only.

pub mod folders;
pub mod keyvalues;
pub mod manifest;
pub mod root;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use folders::enumerate_libraries;
pub use keyvalues::Document;
pub use manifest::{parse_manifest, scan_libraries, scan_library, ManifestFields};
pub use root::locate_root;

/// Fatal discovery errors; anything finer-grained degrades silently
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Steam installation not found (searched: {})", display_paths(.searched))]
    RootNotFound { searched: Vec<PathBuf> },

    #[error("No Steam libraries found (library list: {})", display_paths(.checked))]
    NoLibraries { checked: Vec<PathBuf> },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Existence check that treats every IO error as "absent"
pub(crate) async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}
