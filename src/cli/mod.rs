//! Command-line interface for steamls.
//!
//! One command: find the Steam root, read its libraries, classify every
//! installed game and print the report (or JSON).

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::adapters::{MagickThumbnailer, Thumbnailer};
use crate::config::{paths, Overrides, ResolvedConfig};
use crate::domain::Inventory;
use crate::icons::{IconCache, IconResolver, IconSet};
use crate::library::{enumerate_libraries, locate_root, scan_libraries};
use crate::report::{render, render_json, RenderOptions};
use crate::terminal::{detect_graphics_support, Style};

/// steamls - list installed Steam games, native and Proton
#[derive(Parser, Debug)]
#[command(name = "steamls")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show full paths instead of directory names
    #[arg(short, long)]
    pub full: bool,

    /// Don't render game icons
    #[arg(short = 'n', long)]
    pub no_icons: bool,

    /// Print the game list as JSON
    #[arg(long)]
    pub json: bool,

    /// Steam client root (skips probing the usual locations)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let mut config = ResolvedConfig::load()?;
        config.apply_overrides(Overrides {
            steam_root: self.root,
            full_paths: self.full,
            no_icons: self.no_icons,
        });
        tracing::debug!(?config, "resolved configuration");

        let (root, inventory) = discover(&config).await?;

        let is_terminal = io::stdout().is_terminal();

        if self.json {
            let mut out = io::stdout().lock();
            render_json(&mut out, &inventory).context("Failed to write JSON")?;
            return Ok(());
        }

        let icons = if is_terminal {
            Some(prepare_icons(&root, &config, &inventory).await)
        } else {
            None
        };

        let opts = RenderOptions {
            full_paths: config.full_paths,
            style: Style::new(config.color && is_terminal),
            hyperlinks: is_terminal,
            icons: icons.as_ref(),
        };
        let mut out = io::stdout().lock();
        render(&mut out, &inventory, &opts).context("Failed to write report")?;
        out.flush()?;

        Ok(())
    }
}

/// Root → libraries → classified games
pub async fn discover(config: &ResolvedConfig) -> Result<(PathBuf, Inventory)> {
    let candidates = match &config.steam_root {
        Some(root) => vec![root.clone()],
        None => paths::root_candidates(),
    };

    let root = locate_root(&candidates).await?;
    let libraries = enumerate_libraries(&root).await?;
    let inventory = scan_libraries(&libraries, &config.exclude_prefixes).await;

    tracing::debug!(
        root = %root.display(),
        libraries = libraries.len(),
        native = inventory.native.len(),
        proton = inventory.proton.len(),
        "scan complete"
    );

    Ok((root, inventory))
}

/// Icons to draw on a terminal.
///
/// Disabled icons, a missing converter and a terminal without graphics
/// support all yield an empty set, which renders as blank padding.
async fn prepare_icons(root: &Path, config: &ResolvedConfig, inventory: &Inventory) -> IconSet {
    if !config.icons {
        return IconSet::new();
    }

    let Some(thumbnailer) = MagickThumbnailer::discover() else {
        eprintln!("warning: ImageMagick (`magick` or `convert`) not found, icons disabled");
        return IconSet::new();
    };

    let supported = tokio::task::spawn_blocking(detect_graphics_support)
        .await
        .unwrap_or(false);
    if !supported {
        tracing::debug!("terminal lacks inline graphics");
        return IconSet::new();
    }

    let cache = IconCache::new(&config.icon_cache);
    tracing::debug!(
        converter = thumbnailer.name(),
        cache = %cache.dir().display(),
        "resolving icons"
    );
    let resolver = IconResolver::new(root, cache, Box::new(thumbnailer));
    resolver.resolve_all(inventory).await
}
