//! steamls - list installed Steam games
//!
//! Finds the Steam client, reads every library it knows about, and splits
//! the installed games into native builds and those run through Proton.
//!
//! # Pipeline
//!
//! - Root: probe the usual install locations for a `steamapps` directory
//! - Libraries: `"path"` entries of `libraryfolders.vdf`
//! - Manifests: `appmanifest_<id>.acf` in each library, classified by the
//!   presence of `compatdata/<id>/pfx`
//! - Report: two sorted tables, optionally with inline icons on terminals
//!   that speak the kitty graphics protocol
//!
//! # Modules
//!
//! - `adapters`: External tools (ImageMagick thumbnailer)
//! - `config`: Configuration and canonical paths
//! - `domain`: Data structures (InstalledGame, Inventory)
//! - `library`: Root, library and manifest discovery
//! - `icons`: Thumbnail lookup and encoded icon cache
//! - `terminal`: Escape sequences and graphics capability probe
//! - `report`: Table and JSON rendering
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! steamls            # short paths, icons where supported
//! steamls --full     # full install and prefix paths
//! steamls -n --json  # machine-readable, no icons
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod icons;
pub mod library;
pub mod report;
pub mod terminal;

// Re-export main types at crate root for convenience
pub use config::ResolvedConfig;
pub use domain::{CompatLayer, InstalledGame, Inventory, Variant};
pub use icons::{IconCache, IconResolver, IconSet};
pub use library::ScanError;
