//! Deterministic content hashing of product directories
//!
//! The hash identifies a product version's template content and is used as
//! the key of the resolution cache.

use anyhow::Context;
use std::fs;
use std::path::Path;

use super::entry::{ContentEntry, content_entry};

/// Compute a deterministic hash over a directory tree
///
/// # Algorithm
/// - Recursive traversal, entries sorted by file name
/// - Directories: `blake3(relative_path || 0xFF)`, then their contents
/// - Files: `blake3(relative_path || 0x00 || len || content)`
/// - Only entries accepted by [`content_entry`] are hashed: hidden entries are
///   skipped and symlinked files are hashed by their target's content
/// - Output: hex string
///
/// # Example
/// ```no_run
/// use deckhand_core::fs::tree_hash::hash_tree;
/// use std::path::Path;
///
/// let hash = hash_tree(Path::new("/path/to/product"))?;
/// assert_eq!(hash.len(), 64); // blake3 hex output
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn hash_tree(path: &Path) -> anyhow::Result<String> {
    let mut hasher = blake3::Hasher::new();
    hash_dir_recursive(&mut hasher, path, "")?;
    Ok(hasher.finalize().to_hex().to_string())
}

fn hash_dir_recursive(hasher: &mut blake3::Hasher, dir: &Path, base: &str) -> anyhow::Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read directory entries: {}", dir.display()))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let Some(kind) = content_entry(&entry) else {
            continue;
        };
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let rel_path = if base.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", base, name)
        };

        match kind {
            ContentEntry::Dir => {
                hasher.update(rel_path.as_bytes());
                hasher.update(&[0xFF]);
                hash_dir_recursive(hasher, &entry.path(), &rel_path)?;
            }
            ContentEntry::File => {
                let content = fs::read(entry.path())
                    .with_context(|| format!("Failed to read file: {}", entry.path().display()))?;
                hasher.update(rel_path.as_bytes());
                hasher.update(&[0x00]);
                // length prefix keeps file boundaries unambiguous
                hasher.update(&(content.len() as u64).to_le_bytes());
                hasher.update(&content);
            }
        }
    }

    Ok(())
}
