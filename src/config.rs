//! Configuration for steamls.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI via [`ResolvedConfig::apply_overrides`])
//! 2. Environment variables (STEAMLS_ROOT, STEAMLS_CACHE, NO_COLOR)
//! 3. Config file (`~/.config/steamls/config.yaml`, or STEAMLS_CONFIG)
//! 4. Defaults (probe the usual Steam roots, `~/.cache/steamls/icons`)

pub mod paths;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Display names starting with any of these are Steam tooling, not games
pub const EXCLUDED_NAME_PREFIXES: &[&str] = &[
    "Proton",
    "Steam Linux Runtime",
    "Steamworks Common Redistributables",
    "Steamworks Shared",
];

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Steam client root; skips probing when set
    pub steam_root: Option<String>,
    /// Encoded icon cache directory
    pub icon_cache: Option<String>,
    /// Show full paths instead of directory names
    pub full_paths: Option<bool>,
    /// Render inline icons when the terminal supports them
    pub icons: Option<bool>,
    /// Extra name prefixes to hide, added to [`EXCLUDED_NAME_PREFIXES`]
    #[serde(default)]
    pub exclude_prefixes: Vec<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Explicit Steam root, if configured
    pub steam_root: Option<PathBuf>,
    /// Directory holding `<appid>.b64` icon cache entries
    pub icon_cache: PathBuf,
    pub full_paths: bool,
    pub icons: bool,
    /// Emit SGR colors
    pub color: bool,
    /// Built-in plus configured name prefixes to exclude
    pub exclude_prefixes: Vec<String>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            steam_root: None,
            icon_cache: paths::default_icon_cache(),
            full_paths: false,
            icons: true,
            color: true,
            exclude_prefixes: EXCLUDED_NAME_PREFIXES.iter().map(|s| s.to_string()).collect(),
            config_file: None,
        }
    }
}

/// Flag values from the command line; `None`/`false` leave config untouched.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub steam_root: Option<PathBuf>,
    pub full_paths: bool,
    pub no_icons: bool,
}

impl ResolvedConfig {
    /// Load from the config file and process environment
    pub fn load() -> Result<Self> {
        let config_file = std::env::var("STEAMLS_CONFIG")
            .ok()
            .map(|p| paths::expand_tilde(&p))
            .or_else(paths::default_config_file)
            .filter(|p| p.exists());

        let file = match &config_file {
            Some(path) => Some(load_config_file(path)?),
            None => None,
        };

        let mut config = resolve(file, |key| std::env::var(key).ok());
        config.config_file = config_file;
        Ok(config)
    }

    /// Apply command-line flags on top of file and environment settings
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(root) = overrides.steam_root {
            self.steam_root = Some(root);
        }
        if overrides.full_paths {
            self.full_paths = true;
        }
        if overrides.no_icons {
            self.icons = false;
        }
    }
}

/// True if `name` starts with any of `prefixes`
pub fn has_excluded_prefix(name: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Merge an optional config file with environment lookups over the defaults
fn resolve(file: Option<ConfigFile>, env: impl Fn(&str) -> Option<String>) -> ResolvedConfig {
    let mut config = ResolvedConfig::default();

    if let Some(file) = file {
        if let Some(root) = file.steam_root {
            config.steam_root = Some(paths::expand_tilde(&root));
        }
        if let Some(cache) = file.icon_cache {
            config.icon_cache = paths::expand_tilde(&cache);
        }
        if let Some(full_paths) = file.full_paths {
            config.full_paths = full_paths;
        }
        if let Some(icons) = file.icons {
            config.icons = icons;
        }
        config.exclude_prefixes.extend(file.exclude_prefixes);
    }

    if let Some(root) = env("STEAMLS_ROOT").filter(|s| !s.is_empty()) {
        config.steam_root = Some(paths::expand_tilde(&root));
    }
    if let Some(cache) = env("STEAMLS_CACHE").filter(|s| !s.is_empty()) {
        config.icon_cache = paths::expand_tilde(&cache);
    }
    // https://no-color.org: any non-empty value disables color
    if env("NO_COLOR").is_some_and(|s| !s.is_empty()) {
        config.color = false;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = resolve(None, no_env);
        assert!(config.steam_root.is_none());
        assert!(config.icons);
        assert!(!config.full_paths);
        assert!(config.color);
        assert_eq!(config.icon_cache, paths::default_icon_cache());
        let excluded = &config.exclude_prefixes;
        assert!(has_excluded_prefix("Proton Experimental", excluded));
        assert!(has_excluded_prefix("Steam Linux Runtime 3.0 (sniper)", excluded));
        assert!(!has_excluded_prefix("Portal 2", excluded));
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
steam_root: /srv/steam
full_paths: true
icons: false
exclude_prefixes:
  - "Soundtrack"
"#
        )
        .unwrap();

        let parsed = load_config_file(&config_path).unwrap();
        assert_eq!(parsed.steam_root.as_deref(), Some("/srv/steam"));

        let config = resolve(Some(parsed), no_env);
        assert_eq!(config.steam_root, Some(PathBuf::from("/srv/steam")));
        assert!(config.full_paths);
        assert!(!config.icons);
        assert!(has_excluded_prefix("Soundtrack: Portal 2", &config.exclude_prefixes));
        assert!(has_excluded_prefix("Proton 9.0", &config.exclude_prefixes));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = ConfigFile {
            steam_root: Some("/from/file".to_string()),
            ..Default::default()
        };
        let env: HashMap<&str, &str> = [
            ("STEAMLS_ROOT", "/from/env"),
            ("STEAMLS_CACHE", "/tmp/icons"),
            ("NO_COLOR", "1"),
        ]
        .into_iter()
        .collect();

        let config = resolve(Some(file), |key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.steam_root, Some(PathBuf::from("/from/env")));
        assert_eq!(config.icon_cache, PathBuf::from("/tmp/icons"));
        assert!(!config.color);
    }

    #[test]
    fn test_empty_no_color_keeps_color() {
        let config = resolve(None, |key| (key == "NO_COLOR").then(String::new));
        assert!(config.color);
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = resolve(
            Some(ConfigFile {
                full_paths: Some(false),
                icons: Some(true),
                ..Default::default()
            }),
            no_env,
        );
        config.apply_overrides(Overrides {
            steam_root: Some(PathBuf::from("/cli/root")),
            full_paths: true,
            no_icons: true,
        });

        assert_eq!(config.steam_root, Some(PathBuf::from("/cli/root")));
        assert!(config.full_paths);
        assert!(!config.icons);
    }
}
