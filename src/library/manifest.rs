//! App manifest scanning and native/Proton classification.

use std::path::{Path, PathBuf};

use glob::Pattern;
use tokio::fs;

use super::is_dir;
use super::keyvalues::Document;
use crate::config::has_excluded_prefix;
use crate::domain::game::{compat_data_dir, compat_prefix};
use crate::domain::{InstalledGame, Inventory, UNKNOWN_VERSION};

/// Manifest file names within a library; the `*` must be a numeric app ID
const MANIFEST_PATTERN: &str = "appmanifest_*.acf";

/// The three fields steamls needs from an `appmanifest_<id>.acf`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFields {
    pub app_id: String,
    pub install_dir: String,
    pub name: String,
}

/// Project a manifest onto [`ManifestFields`].
///
/// `appid` is the first occurrence at any depth; nested records may carry
/// their own `appid` and are ignored. `installdir` and `name` are read from
/// the top-level `AppState` block, with a repeated `name` taking the later
/// value. Returns `None` when `installdir` or `name` is missing or empty.
pub fn parse_manifest(text: &str) -> Option<ManifestFields> {
    let doc = Document::parse(text);

    let install_dir = doc.first_at_depth("installdir", 1).unwrap_or_default();
    let name = doc.last_at_depth("name", 1).unwrap_or_default();
    if install_dir.is_empty() || name.is_empty() {
        return None;
    }

    Some(ManifestFields {
        app_id: doc.first("appid").unwrap_or_default().to_string(),
        install_dir: install_dir.to_string(),
        name: name.to_string(),
    })
}

/// App ID embedded in a manifest file name (`appmanifest_620.acf` → `620`)
fn app_id_from_file_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix("appmanifest_")?
        .strip_suffix(".acf")
        .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
}

/// Read the Proton version for an app, or [`UNKNOWN_VERSION`]
async fn compat_version(library: &Path, app_id: &str) -> String {
    let config_info = compat_data_dir(library, app_id).join("config_info");
    fs::read_to_string(&config_info)
        .await
        .ok()
        .and_then(|text| text.lines().next().map(|l| l.trim().to_string()))
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
}

/// Manifest paths in a library, in directory enumeration order
async fn manifest_files(library: &Path) -> Vec<PathBuf> {
    let pattern = match Pattern::new(MANIFEST_PATTERN) {
        Ok(pattern) => pattern,
        Err(e) => {
            tracing::error!(error = %e, "invalid manifest pattern");
            return Vec::new();
        }
    };

    let mut entries = match fs::read_dir(library).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(library = %library.display(), error = %e, "cannot read library");
            return Vec::new();
        }
    };

    let mut files = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        if pattern.matches(&file_name) && app_id_from_file_name(&file_name).is_some() {
            files.push(entry.path());
        }
    }
    files
}

/// Scan one library, dropping incomplete manifests and excluded names.
pub async fn scan_library(library: &Path, excluded: &[String]) -> Vec<InstalledGame> {
    let mut games = Vec::new();

    for path in manifest_files(library).await {
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(manifest = %path.display(), error = %e, "unreadable manifest");
                continue;
            }
        };

        let Some(mut fields) = parse_manifest(&text) else {
            tracing::debug!(manifest = %path.display(), "incomplete manifest");
            continue;
        };

        if has_excluded_prefix(&fields.name, excluded) {
            tracing::trace!(name = %fields.name, "excluded tool");
            continue;
        }

        if fields.app_id.is_empty() {
            let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
            match file_name.as_deref().and_then(app_id_from_file_name) {
                Some(id) => fields.app_id = id.to_string(),
                None => continue,
            }
        }

        let game = InstalledGame::new(fields.app_id, fields.install_dir, fields.name, library);
        let game = if is_dir(&compat_prefix(library, &game.app_id)).await {
            let version = compat_version(library, &game.app_id).await;
            game.with_compat(version)
        } else {
            game
        };

        games.push(game);
    }

    tracing::debug!(library = %library.display(), count = games.len(), "scanned library");
    games
}

/// Scan every library in order, splitting games into native and Proton.
pub async fn scan_libraries(libraries: &[PathBuf], excluded: &[String]) -> Inventory {
    let mut inventory = Inventory::new();
    for library in libraries {
        for game in scan_library(library, excluded).await {
            inventory.push(game);
        }
    }
    inventory
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest_fields() {
        let text = r#"
"AppState"
{
	"appid"		"620"
	"name"		"Portal 2"
	"StateFlags"		"4"
	"installdir"		"Portal 2"
}
"#;
        assert_eq!(
            parse_manifest(text),
            Some(ManifestFields {
                app_id: "620".to_string(),
                install_dir: "Portal 2".to_string(),
                name: "Portal 2".to_string(),
            })
        );
    }

    #[test]
    fn test_first_appid_wins_and_last_name_wins() {
        let text = r#"
"AppState"
{
	"appid"		"1091500"
	"name"		"Old Title"
	"installdir"		"Cyberpunk 2077"
	"SharedDepots"
	{
		"appid"		"228980"
		"name"		"nested, ignored"
	}
	"name"		"Cyberpunk 2077"
}
"#;
        let fields = parse_manifest(text).unwrap();
        assert_eq!(fields.app_id, "1091500");
        assert_eq!(fields.name, "Cyberpunk 2077");
    }

    #[test]
    fn test_incomplete_manifests_are_rejected() {
        let no_name = "\"AppState\"\n{\n\t\"appid\"\t\"1\"\n\t\"installdir\"\t\"x\"\n}\n";
        let empty_dir =
            "\"AppState\"\n{\n\t\"appid\"\t\"1\"\n\t\"installdir\"\t\"\"\n\t\"name\"\t\"X\"\n}\n";
        assert_eq!(parse_manifest(no_name), None);
        assert_eq!(parse_manifest(empty_dir), None);
        assert_eq!(parse_manifest(""), None);
    }

    #[test]
    fn test_app_id_from_file_name() {
        assert_eq!(app_id_from_file_name("appmanifest_620.acf"), Some("620"));
        assert_eq!(app_id_from_file_name("appmanifest_.acf"), None);
        assert_eq!(app_id_from_file_name("appmanifest_foo.acf"), None);
        assert_eq!(app_id_from_file_name("appmanifest_12a.acf"), None);
        assert_eq!(app_id_from_file_name("libraryfolders.vdf"), None);
    }
}
