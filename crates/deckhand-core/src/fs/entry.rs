//! Which directory entries belong to a product's template content
//!
//! The content hash and the descriptor loader must agree on the files they
//! look at, otherwise an edit can go unnoticed by the result cache.

use std::fs::{self, DirEntry};
use tracing::warn;

/// Kind of a directory entry that is part of the product content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEntry {
    Dir,
    File,
}

/// Classify `entry`, or `None` if it is not part of the product content.
///
/// - Hidden entries (leading `.`) are skipped.
/// - Symlinks to files count as the file they point to.
/// - Symlinks to directories, dangling symlinks and special files are
///   skipped with a warning.
pub fn content_entry(entry: &DirEntry) -> Option<ContentEntry> {
    if entry.file_name().to_string_lossy().starts_with('.') {
        return None;
    }

    let path = entry.path();
    let ty = match entry.file_type() {
        Ok(ty) => ty,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Cannot stat product file, skipping");
            return None;
        }
    };

    if ty.is_dir() {
        return Some(ContentEntry::Dir);
    }
    if ty.is_file() {
        return Some(ContentEntry::File);
    }
    if ty.is_symlink() {
        return match fs::metadata(&path) {
            Ok(target) if target.is_file() => Some(ContentEntry::File),
            Ok(_) => {
                warn!(path = %path.display(), "Skipping symlink to a directory");
                None
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Skipping dangling symlink");
                None
            }
        };
    }

    warn!(path = %path.display(), "Skipping unsupported filesystem entry");
    None
}
