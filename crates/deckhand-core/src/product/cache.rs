//! Persistent cache of resolved template bundles
//!
//! Bundles are keyed by the content hash of the product they were computed
//! from, so a cached entry never needs invalidation: changed content means a
//! new key. Two processes resolving the same product may race to store the
//! same bundle; either write is fine, and a failed store is not an error for
//! the caller.

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::template::ResolvedBundle;

/// Bumped whenever the bundle layout changes; older records are ignored.
const RECORD_FORMAT: u32 = 1;

/// Storage for resolved bundles.
pub trait ResultCache {
    /// Cached bundle for `key`, if any. Unreadable entries count as missing.
    fn read(&self, key: &str) -> Option<ResolvedBundle>;

    /// Store `bundle` under `key`.
    fn store(&self, key: &str, bundle: &ResolvedBundle) -> anyhow::Result<()>;
}

/// Cache that never holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ResultCache for NoCache {
    fn read(&self, _key: &str) -> Option<ResolvedBundle> {
        None
    }

    fn store(&self, _key: &str, _bundle: &ResolvedBundle) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    format: u32,
    key: String,
    created_at: DateTime<Utc>,
    bundle: ResolvedBundle,
}

/// One JSON file per key below a cache directory.
///
/// Stores write a uniquely named temporary file and rename it into place.
#[derive(Debug, Clone)]
pub struct FileResultCache {
    dir: PathBuf,
}

impl FileResultCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default cache directory
    ///
    /// # Returns
    /// - Linux: `$XDG_CACHE_HOME/deckhand/templates` or `~/.cache/deckhand/templates`
    /// - macOS: `~/Library/Caches/deckhand/templates`
    /// - Windows: `%LOCALAPPDATA%\deckhand\templates`
    pub fn default_dir() -> anyhow::Result<PathBuf> {
        let base = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot determine cache directory"))?;
        Ok(base.join("deckhand").join("templates"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl ResultCache for FileResultCache {
    fn read(&self, key: &str) -> Option<ResolvedBundle> {
        let path = self.entry_path(key);
        let bytes = fs::read(&path).ok()?;

        match serde_json::from_slice::<CacheRecord>(&bytes) {
            Ok(record) if record.format == RECORD_FORMAT && record.key == key => {
                debug!(key, created_at = %record.created_at, "Using cached template resolution");
                Some(record.bundle)
            }
            Ok(record) => {
                debug!(key, format = record.format, "Ignoring stale cache record");
                None
            }
            Err(err) => {
                debug!(key, error = %err, "Ignoring unreadable cache record");
                None
            }
        }
    }

    fn store(&self, key: &str, bundle: &ResolvedBundle) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create cache directory: {}", self.dir.display())
        })?;

        let record = CacheRecord {
            format: RECORD_FORMAT,
            key: key.to_string(),
            created_at: Utc::now(),
            bundle: bundle.clone(),
        };
        let bytes = serde_json::to_vec(&record).context("Failed to serialize cache record")?;

        let target = self.entry_path(key);
        let tmp = self.dir.join(format!("{}.{}.tmp", key, unique_suffix()));
        fs::write(&tmp, bytes)
            .with_context(|| format!("Failed to write cache file: {}", tmp.display()))?;

        if let Err(err) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(err).with_context(|| {
                format!("Failed to move cache file into place: {}", target.display())
            });
        }
        Ok(())
    }
}

fn unique_suffix() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!(
        "{}-{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}
