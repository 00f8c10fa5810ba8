//! Configuration for deckhand
//!
//! A single `deckhand.toml` controls template resolution limits and where
//! resolution results are cached. Every setting has a default, so a missing
//! file is valid.

pub mod parser;
pub mod schema;
pub mod store;

use std::path::PathBuf;

use crate::product::{FileResultCache, NoCache, ResultCache};

pub use parser::{parse_config_toml, parse_config_toml_str, to_toml};
pub use schema::{CacheConfig, DeckhandConfig, ResolutionConfig};
pub use store::ConfigStore;

impl DeckhandConfig {
    /// Cache directory to use, if caching is enabled.
    pub fn cache_dir(&self) -> anyhow::Result<Option<PathBuf>> {
        if !self.cache.enabled {
            return Ok(None);
        }
        match &self.cache.dir {
            Some(dir) => Ok(Some(dir.clone())),
            None => FileResultCache::default_dir().map(Some),
        }
    }

    /// Result cache described by this configuration.
    pub fn result_cache(&self) -> anyhow::Result<Box<dyn ResultCache>> {
        Ok(match self.cache_dir()? {
            Some(dir) => Box::new(FileResultCache::new(dir)),
            None => Box::new(NoCache),
        })
    }
}
