//! Installed games discovered from Steam app manifests.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Version shown when a Proton prefix has no readable `config_info`
pub const UNKNOWN_VERSION: &str = "?";

/// How a game is run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Linux-native build
    Native,

    /// Windows build run through Proton
    Proton,
}

/// Proton prefix details for a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatLayer {
    /// `<library>/compatdata/<appid>/pfx`
    pub path: PathBuf,

    /// First line of `compatdata/<appid>/config_info`, or [`UNKNOWN_VERSION`]
    pub version: String,
}

/// A game found in a library's `appmanifest_<id>.acf`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledGame {
    /// Steam app ID
    pub app_id: String,

    /// Directory name under `<library>/common/`
    pub install_dir_name: String,

    /// Human-readable title
    pub name: String,

    /// The `steamapps` directory holding the manifest
    pub library: PathBuf,

    /// `<library>/common/<install_dir_name>`
    pub install_path: PathBuf,

    /// Present only for Proton games
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compat: Option<CompatLayer>,
}

impl InstalledGame {
    /// Create a native game entry
    pub fn new(
        app_id: impl Into<String>,
        install_dir_name: impl Into<String>,
        name: impl Into<String>,
        library: impl Into<PathBuf>,
    ) -> Self {
        let library = library.into();
        let install_dir_name = install_dir_name.into();
        let install_path = library.join("common").join(&install_dir_name);

        Self {
            app_id: app_id.into(),
            install_dir_name,
            name: name.into(),
            library,
            install_path,
            compat: None,
        }
    }

    /// Attach Proton prefix details
    pub fn with_compat(mut self, version: impl Into<String>) -> Self {
        self.compat = Some(CompatLayer {
            path: compat_prefix(&self.library, &self.app_id),
            version: version.into(),
        });
        self
    }

    pub fn variant(&self) -> Variant {
        if self.compat.is_some() {
            Variant::Proton
        } else {
            Variant::Native
        }
    }

    pub fn compat_path(&self) -> Option<&Path> {
        self.compat.as_ref().map(|c| c.path.as_path())
    }

    pub fn compat_version(&self) -> Option<&str> {
        self.compat.as_ref().map(|c| c.version.as_str())
    }
}

/// `<library>/compatdata/<app_id>`
pub fn compat_data_dir(library: &Path, app_id: &str) -> PathBuf {
    library.join("compatdata").join(app_id)
}

/// `<library>/compatdata/<app_id>/pfx`
pub fn compat_prefix(library: &Path, app_id: &str) -> PathBuf {
    compat_data_dir(library, app_id).join("pfx")
}

/// Games from every library, split by [`Variant`], in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    pub native: Vec<InstalledGame>,
    pub proton: Vec<InstalledGame>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a game under its variant
    pub fn push(&mut self, game: InstalledGame) {
        match game.variant() {
            Variant::Native => self.native.push(game),
            Variant::Proton => self.proton.push(game),
        }
    }

    pub fn len(&self) -> usize {
        self.native.len() + self.proton.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of this inventory with both lists sorted by display name.
    ///
    /// Uses a stable sort, so games sharing a name keep their discovery order.
    pub fn sorted(&self) -> Self {
        let mut sorted = self.clone();
        sorted.native.sort_by(|a, b| a.name.cmp(&b.name));
        sorted.proton.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }
}
