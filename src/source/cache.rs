use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::debug;

/// Configuration for the downloaded-dataset cache
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub enabled: bool, // false when --no-cache
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: get_cache_path(),
        }
    }
}

/// Get the platform-appropriate cache directory for dongjeop
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("dongjeop/http-cache"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/dongjeop/http-cache",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the cache directory
pub fn clear_cache(config: &CacheConfig) -> Result<()> {
    match std::fs::remove_dir_all(&config.path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// Last successfully downloaded body for `url`, if any
pub fn read_cached(config: &CacheConfig, url: &str) -> Option<String> {
    if !config.enabled {
        return None;
    }
    let bytes = cacache::read_sync(&config.path, url).ok()?;
    String::from_utf8(bytes).ok()
}

/// Remember a downloaded body. Cache write failures are not fatal.
pub fn write_cached(config: &CacheConfig, url: &str, body: &str) {
    if !config.enabled {
        return;
    }
    if let Err(e) = cacache::write_sync(&config.path, url, body.as_bytes()) {
        debug!(url, error = %e, "failed to write dataset cache");
    }
}
