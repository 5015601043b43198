//! Canonical Steam and steamls paths.
//!
//! Single source of truth - import this instead of hardcoding paths.
//!
//! ## Layout
//!
//! | Path | Owner | Purpose |
//! |------|-------|---------|
//! | `<root>/steamapps` | Steam | Marks a client root / library |
//! | `<root>/config/libraryfolders.vdf` | Steam | Authoritative library list |
//! | `<root>/steamapps/libraryfolders.vdf` | Steam | Runtime copy, may be stale |
//! | `<root>/appcache/librarycache/<id>/` | Steam | Thumbnail sources |
//! | `<cache>/steamls/icons/<id>.b64` | steamls | Encoded icon cache |

use std::path::{Path, PathBuf};

/// Directory that marks both a client root and a library
pub const STEAMAPPS: &str = "steamapps";

/// Library list file name
pub const LIBRARY_FOLDERS: &str = "libraryfolders.vdf";

/// Namespace under the user's cache directory
pub const CACHE_NAMESPACE: &str = "steamls";

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"))
}

/// Client roots to probe, in order:
/// user-local, flatpak, snap, then the legacy `~/.steam/root` symlink.
pub fn root_candidates() -> Vec<PathBuf> {
    let home = home();
    vec![
        home.join(".steam/steam"),
        home.join(".local/share/Steam"),
        home.join(".var/app/com.valvesoftware.Steam/.local/share/Steam"),
        home.join("snap/steam/common/.local/share/Steam"),
        home.join(".steam/root"),
    ]
}

/// `<dir>/steamapps`
pub fn steamapps(dir: &Path) -> PathBuf {
    dir.join(STEAMAPPS)
}

/// Library list locations under a root, authoritative first
pub fn library_folders_files(root: &Path) -> [PathBuf; 2] {
    [
        root.join("config").join(LIBRARY_FOLDERS),
        steamapps(root).join(LIBRARY_FOLDERS),
    ]
}

/// Thumbnail directory for an app (`<root>/appcache/librarycache/<id>`)
pub fn thumbnail_dir(root: &Path, app_id: &str) -> PathBuf {
    root.join("appcache").join("librarycache").join(app_id)
}

/// Default encoded-icon cache (`<user cache>/steamls/icons`)
pub fn default_icon_cache() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| home().join(".cache"))
        .join(CACHE_NAMESPACE)
        .join("icons")
}

/// Default config file (`<user config>/steamls/config.yaml`)
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CACHE_NAMESPACE).join("config.yaml"))
}

/// Expand a leading `~/` to the home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return home();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home().join(rest),
        None => PathBuf::from(path),
    }
}
