//! ImageMagick adapter for thumbnail conversion.
//!
//! Runs `magick <source> -resize <N>x<N> png:-` (ImageMagick 7) or the
//! equivalent `convert` (ImageMagick 6) and collects PNG bytes from stdout.
//! There is no timeout: a hung converter blocks the run.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

use super::Thumbnailer;

/// Converter binaries in order of preference
const BINARIES: &[&str] = &["magick", "convert"];

/// ImageMagick thumbnailer using subprocess mode
pub struct MagickThumbnailer {
    /// Path to the ImageMagick binary
    binary_path: PathBuf,
}

impl MagickThumbnailer {
    /// Find ImageMagick on `PATH`, preferring `magick` over `convert`.
    ///
    /// Returns `None` when neither is installed.
    pub fn discover() -> Option<Self> {
        BINARIES.iter().find_map(|exe| {
            which::which(exe).ok().map(|binary_path| {
                tracing::debug!(binary = %binary_path.display(), "found ImageMagick");
                Self { binary_path }
            })
        })
    }

    /// Create a thumbnailer with a custom binary path
    pub fn with_binary_path(binary_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }
}

#[async_trait]
impl Thumbnailer for MagickThumbnailer {
    fn name(&self) -> &str {
        "imagemagick"
    }

    async fn thumbnail(&self, source: &Path, size: u32) -> Result<Vec<u8>> {
        let output = Command::new(&self.binary_path)
            .arg(source)
            .arg("-resize")
            .arg(format!("{size}x{size}"))
            .arg("png:-")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.binary_path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            anyhow::bail!(
                "Thumbnail conversion of {} failed with exit code {}: {}",
                source.display(),
                exit_code,
                stderr.trim()
            );
        }

        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_binary_path() {
        let thumbnailer = MagickThumbnailer::with_binary_path("/opt/im/bin/magick");
        assert_eq!(thumbnailer.binary_path(), Path::new("/opt/im/bin/magick"));
        assert_eq!(thumbnailer.name(), "imagemagick");
    }

    #[tokio::test]
    async fn test_missing_binary_is_an_error() {
        let thumbnailer = MagickThumbnailer::with_binary_path("/nonexistent/steamls-magick");
        let result = thumbnailer.thumbnail(Path::new("/nonexistent.jpg"), 64).await;
        assert!(result.is_err());
    }

    // Note: conversions against a real ImageMagick are not exercised here
}
