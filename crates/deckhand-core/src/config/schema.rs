//! Configuration schema for deckhand.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::template::{DEFAULT_MAX_DEPTH, ResolveOptions};

/// Root configuration structure for deckhand.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckhandConfig {
    /// Template resolution settings
    #[serde(default)]
    pub resolution: ResolutionConfig,

    /// Resolution result cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Longest application template chain accepted before giving up
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Cache directory; the platform cache directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            dir: None,
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

impl DeckhandConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration values
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.resolution.max_depth == 0 {
            anyhow::bail!("resolution.max_depth must be at least 1");
        }
        if let Some(dir) = &self.cache.dir
            && dir.as_os_str().is_empty()
        {
            anyhow::bail!("cache.dir must not be empty");
        }
        Ok(())
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            max_depth: self.resolution.max_depth,
        }
    }
}
