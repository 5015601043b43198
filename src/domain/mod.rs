//! Domain types for steamls.
//!
//! - Game: a single installed app and its Proton prefix, if any
//! - Inventory: every game found, split into native and Proton

pub mod game;

// Re-export commonly used types
pub use game::{CompatLayer, InstalledGame, Inventory, Variant, UNKNOWN_VERSION};
