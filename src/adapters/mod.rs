//! Adapter interfaces for external tools.
//!
//! Thumbnail conversion is delegated to an image tool (ImageMagick) so
//! steamls never decodes images itself.

pub mod magick;

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

// Re-export the ImageMagick adapter
pub use magick::MagickThumbnailer;

/// Trait for thumbnail converters
#[async_trait]
pub trait Thumbnailer: Send + Sync {
    /// Human-readable converter name
    fn name(&self) -> &str;

    /// Resize `source` to fit a `size`x`size` square and return PNG bytes.
    async fn thumbnail(&self, source: &Path, size: u32) -> Result<Vec<u8>>;
}
