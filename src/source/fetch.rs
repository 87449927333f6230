use anyhow::{Context, Result};
use futures::future::try_join_all;
use std::path::Path;
use tracing::{debug, info, warn};

use super::cache::{read_cached, write_cached, CacheConfig};
use super::DataSource;
use crate::records::{parse_jsonl, RecordKind, SourceRecord};

/// Load and parse one JSONL source.
///
/// A missing local file or an unreachable URL degrades to an empty (or
/// cached) dataset with a warning. Only local read errors on an existing
/// file are returned as errors.
pub async fn load_records(
    source: &DataSource,
    kind: RecordKind,
    cache: &CacheConfig,
) -> Result<Vec<SourceRecord>> {
    let content = match source {
        DataSource::File(path) => read_local(path).await?,
        DataSource::Url(url) => fetch_remote(url, cache).await,
    };
    let records = parse_jsonl(&content, kind);
    info!(source = %source, count = records.len(), "loaded records");
    Ok(records)
}

/// Load several sources concurrently, results in request order
pub async fn load_many(
    requests: &[(DataSource, RecordKind)],
    cache: &CacheConfig,
) -> Result<Vec<Vec<SourceRecord>>> {
    try_join_all(
        requests
            .iter()
            .map(|(source, kind)| load_records(source, *kind, cache)),
    )
    .await
}

async fn read_local(path: &Path) -> Result<String> {
    if !path.exists() {
        warn!(path = %path.display(), "data file not found, continuing with empty dataset");
        return Ok(String::new());
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read data file at {}", path.display()))
}

/// Download a dataset body, falling back to the last cached copy and then to
/// an empty body. Successful downloads refresh the cache.
pub async fn fetch_remote(url: &str, cache: &CacheConfig) -> String {
    match fetch_text(url).await {
        Ok(body) => {
            write_cached(cache, url, &body);
            body
        }
        Err(e) => {
            if let Some(cached) = read_cached(cache, url) {
                warn!(url, error = %format!("{:#}", e), "fetch failed, using cached copy");
                cached
            } else {
                warn!(url, error = %format!("{:#}", e), "fetch failed, continuing with empty dataset");
                String::new()
            }
        }
    }
}

async fn fetch_text(url: &str) -> Result<String> {
    let client = http_client()?;
    debug!(url, "fetching dataset");
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?
        .error_for_status()
        .with_context(|| format!("Server rejected request for {}", url))?;
    response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from {}", url))
}

fn http_client() -> Result<reqwest::Client> {
    // Already installed by main; tests and library callers may not have done it
    let _ = rustls::crypto::ring::default_provider().install_default();
    reqwest::Client::builder()
        .user_agent(concat!("dongjeop/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}
