//! Product templates: loading, resolution and caching
//!
//! [`ProductTemplates`] is what callers (instance creation, ad-hoc "add from
//! template") work with. It is built once per product version; resolution
//! results are looked up in a [`ResultCache`] by content key first.

pub mod cache;
pub mod loader;

use std::path::Path;
use tracing::{debug, info};

use crate::descriptor::{
    ApplicationTemplateDescriptor, InstanceTemplateDescriptor, ParameterTemplateDescriptor,
    RawProductTemplates,
};
use crate::fs::tree_hash::hash_tree;
use crate::template::{ResolveOptions, ResolvedBundle, resolve_bundle};

pub use cache::{FileResultCache, NoCache, ResultCache};
pub use loader::load_product_dir;

/// Resolved templates of one product version.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductTemplates {
    key: String,
    bundle: ResolvedBundle,
}

impl ProductTemplates {
    /// Load and resolve the product at `product_dir`, consulting `cache` first.
    pub fn load(
        product_dir: &Path,
        cache: &dyn ResultCache,
        options: &ResolveOptions,
    ) -> anyhow::Result<Self> {
        if !product_dir.is_dir() {
            anyhow::bail!("Product directory not found: {}", product_dir.display());
        }
        let key = content_key(product_dir, options)?;

        if let Some(bundle) = cache.read(&key) {
            return Ok(Self { key, bundle });
        }

        let raw = load_product_dir(product_dir)?;
        let bundle = resolve_bundle(&raw, options);
        info!(
            product = %product_dir.display(),
            instance_templates = bundle.instance_templates.len(),
            application_templates = bundle.application_templates.len(),
            "Resolved product templates"
        );

        if let Err(err) = cache.store(&key, &bundle) {
            // another resolution of the same content may have won the race
            debug!(key = %key, error = %err, "Cannot store resolved templates");
        }

        Ok(Self { key, bundle })
    }

    /// Resolve descriptors that are already in memory; nothing is cached.
    pub fn from_raw(
        key: impl Into<String>,
        raw: &RawProductTemplates,
        options: &ResolveOptions,
    ) -> Self {
        Self {
            key: key.into(),
            bundle: resolve_bundle(raw, options),
        }
    }

    /// Content key the bundle was resolved (or cached) under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Instance templates with fully resolved, template-free applications.
    pub fn instance_templates(&self) -> &[InstanceTemplateDescriptor] {
        &self.bundle.instance_templates
    }

    /// Flattened application template catalogue.
    pub fn application_templates(&self) -> &[ApplicationTemplateDescriptor] {
        &self.bundle.application_templates
    }

    /// Parameter templates, as loaded.
    pub fn parameter_templates(&self) -> &[ParameterTemplateDescriptor] {
        &self.bundle.parameter_templates
    }

    pub fn bundle(&self) -> &ResolvedBundle {
        &self.bundle
    }

    pub fn into_bundle(self) -> ResolvedBundle {
        self.bundle
    }
}

/// Cache key for a product directory resolved with `options`.
///
/// Combines the directory's content hash with everything else the result
/// depends on.
pub fn content_key(product_dir: &Path, options: &ResolveOptions) -> anyhow::Result<String> {
    let tree = hash_tree(product_dir)?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(tree.as_bytes());
    hasher.update(&(options.max_depth as u64).to_le_bytes());
    hasher.update(env!("CARGO_PKG_VERSION").as_bytes());
    Ok(hasher.finalize().to_hex().to_string())
}
