//! Icon Cache Integration Tests
//!
//! Exercises thumbnail lookup, conversion and cache reuse with a scripted
//! thumbnailer in place of ImageMagick.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use base64::Engine;
use filetime::FileTime;
use steamls::adapters::Thumbnailer;
use steamls::icons::{IconCache, IconResolver, ICON_SIZE};
use steamls::{InstalledGame, Inventory};
use tempfile::TempDir;

const HASH: &str = "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3";

/// Returns fixed bytes and counts invocations
struct ScriptedThumbnailer {
    output: Result<Vec<u8>, String>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Thumbnailer for ScriptedThumbnailer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn thumbnail(&self, _source: &Path, size: u32) -> Result<Vec<u8>> {
        assert_eq!(size, ICON_SIZE);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.output.clone().map_err(anyhow::Error::msg)
    }
}

struct Fixture {
    _temp: TempDir,
    root: PathBuf,
    cache_dir: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("Steam");
        let cache_dir = temp.path().join("cache/steamls/icons");
        fs::create_dir_all(&root).unwrap();
        Self {
            _temp: temp,
            root,
            cache_dir,
        }
    }

    fn add_thumbnail(&self, app_id: &str) -> PathBuf {
        let dir = self.root.join("appcache/librarycache").join(app_id);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{HASH}.jpg"));
        fs::write(&path, b"\xff\xd8\xff").unwrap();
        path
    }

    fn resolver(&self, output: Result<Vec<u8>, String>) -> (IconResolver, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let thumbnailer = ScriptedThumbnailer {
            output,
            calls: Arc::clone(&calls),
        };
        let resolver = IconResolver::new(
            &self.root,
            IconCache::new(&self.cache_dir),
            Box::new(thumbnailer),
        );
        (resolver, calls)
    }
}

fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[tokio::test]
async fn test_conversion_is_encoded_and_cached() {
    let fixture = Fixture::new();
    let source = fixture.add_thumbnail("620");
    filetime::set_file_mtime(&source, FileTime::from_unix_time(1_000, 0)).unwrap();
    let (resolver, calls) = fixture.resolver(Ok(b"\x89PNG fake".to_vec()));

    let icon = resolver.resolve("620").await.unwrap();
    assert_eq!(icon, encode(b"\x89PNG fake"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let cached = fs::read_to_string(fixture.cache_dir.join("620.b64")).unwrap();
    assert_eq!(cached, icon);
}

#[tokio::test]
async fn test_cached_entry_returned_verbatim() {
    let fixture = Fixture::new();
    let source = fixture.add_thumbnail("620");
    filetime::set_file_mtime(&source, FileTime::from_unix_time(1_000, 0)).unwrap();

    let (first, _) = fixture.resolver(Ok(b"first".to_vec()));
    let icon = first.resolve("620").await.unwrap();

    // A second resolver whose converter would fail must not be consulted
    let (second, calls) = fixture.resolver(Err("converter exploded".to_string()));
    assert_eq!(second.resolve("620").await, Some(icon));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_newer_thumbnail_triggers_reconversion() {
    let fixture = Fixture::new();
    let source = fixture.add_thumbnail("620");

    let (first, _) = fixture.resolver(Ok(b"old".to_vec()));
    first.resolve("620").await.unwrap();
    filetime::set_file_mtime(fixture.cache_dir.join("620.b64"), FileTime::from_unix_time(1_000, 0))
        .unwrap();
    filetime::set_file_mtime(&source, FileTime::from_unix_time(2_000, 0)).unwrap();

    let (second, calls) = fixture.resolver(Ok(b"new".to_vec()));
    assert_eq!(second.resolve("620").await, Some(encode(b"new")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failures_yield_no_icon() {
    let fixture = Fixture::new();
    fixture.add_thumbnail("620");

    let (failing, _) = fixture.resolver(Err("boom".to_string()));
    assert_eq!(failing.resolve("620").await, None);

    let (empty, _) = fixture.resolver(Ok(Vec::new()));
    assert_eq!(empty.resolve("620").await, None);
    assert!(!fixture.cache_dir.join("620.b64").exists());

    let (working, calls) = fixture.resolver(Ok(b"png".to_vec()));
    assert_eq!(working.resolve("440").await, None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_resolve_all_covers_both_tables() {
    let fixture = Fixture::new();
    fixture.add_thumbnail("1");
    fixture.add_thumbnail("2");

    let mut inventory = Inventory::new();
    inventory.push(InstalledGame::new("1", "a", "A", "/lib"));
    inventory.push(InstalledGame::new("2", "b", "B", "/lib").with_compat("?"));
    inventory.push(InstalledGame::new("3", "c", "C", "/lib"));
    inventory.push(InstalledGame::new("1", "a", "A", "/other"));

    let (resolver, calls) = fixture.resolver(Ok(b"png".to_vec()));
    let icons = resolver.resolve_all(&inventory).await;

    assert_eq!(icons.len(), 2);
    assert!(icons.get("1").is_some());
    assert!(icons.get("2").is_some());
    assert!(icons.get("3").is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
