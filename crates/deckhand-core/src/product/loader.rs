//! Loading raw template descriptors from a product directory
//!
//! Layout:
//! ```text
//! <product>/
//!   instance-templates/           InstanceTemplateDescriptor, one per file
//!   application-templates/        ApplicationTemplateDescriptor
//!   parameter-templates/          ParameterTemplateDescriptor
//!   instance-variable-templates/  InstanceVariableTemplateDescriptor
//! ```
//! Each directory is scanned recursively for `*.yaml` / `*.yml` files in
//! sorted order, looking at the same entries the content hash covers. A file
//! that cannot be read or parsed is logged and skipped.

use anyhow::Context;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::descriptor::RawProductTemplates;
use crate::fs::entry::{ContentEntry, content_entry};

pub const INSTANCE_TEMPLATES_DIR: &str = "instance-templates";
pub const APPLICATION_TEMPLATES_DIR: &str = "application-templates";
pub const PARAMETER_TEMPLATES_DIR: &str = "parameter-templates";
pub const VARIABLE_TEMPLATES_DIR: &str = "instance-variable-templates";

/// Load all raw descriptors of the product at `root`.
///
/// Fails only if `root` itself is not a readable directory.
pub fn load_product_dir(root: &Path) -> anyhow::Result<RawProductTemplates> {
    if !root.is_dir() {
        anyhow::bail!("Product directory not found: {}", root.display());
    }

    let raw = RawProductTemplates {
        instance_templates: load_documents(&root.join(INSTANCE_TEMPLATES_DIR), "instance")?,
        application_templates: load_documents(
            &root.join(APPLICATION_TEMPLATES_DIR),
            "application",
        )?,
        parameter_templates: load_documents(&root.join(PARAMETER_TEMPLATES_DIR), "parameter")?,
        variable_templates: load_documents(
            &root.join(VARIABLE_TEMPLATES_DIR),
            "instance variable",
        )?,
    };

    debug!(
        product = %root.display(),
        instance_templates = raw.instance_templates.len(),
        application_templates = raw.application_templates.len(),
        parameter_templates = raw.parameter_templates.len(),
        variable_templates = raw.variable_templates.len(),
        "Loaded product templates"
    );
    Ok(raw)
}

/// Parse every YAML document below `dir`; missing directories yield nothing.
pub fn load_documents<T: DeserializeOwned>(dir: &Path, kind: &str) -> anyhow::Result<Vec<T>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    collect_yaml_files(dir, &mut files)?;

    let mut documents = Vec::with_capacity(files.len());
    for file in files {
        match parse_document(&file) {
            Ok(doc) => documents.push(doc),
            Err(err) => {
                let error = format!("{err:#}");
                warn!(file = %file.display(), error = %error, "Cannot load {} template", kind);
            }
        }
    }
    Ok(documents)
}

/// Parse a single YAML descriptor file.
pub fn parse_document<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template file: {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse template file: {}", path.display()))
}

fn collect_yaml_files(dir: &Path, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read directory entries: {}", dir.display()))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        match content_entry(&entry) {
            Some(ContentEntry::Dir) => collect_yaml_files(&path, out)?,
            Some(ContentEntry::File) if is_yaml(&path) => out.push(path),
            _ => {}
        }
    }
    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ApplicationTemplateDescriptor;
    use tempfile::TempDir;

    #[test]
    fn test_is_yaml() {
        assert!(is_yaml(Path::new("a.yaml")));
        assert!(is_yaml(Path::new("a.YML")));
        assert!(!is_yaml(Path::new("a.json")));
        assert!(!is_yaml(Path::new("yaml")));
    }

    #[test]
    fn test_load_documents_sorted_and_recursive() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(APPLICATION_TEMPLATES_DIR);
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("b.yaml"), "id: b\napplication: app\n").unwrap();
        fs::write(dir.join("a.yml"), "id: a\napplication: app\n").unwrap();
        fs::write(dir.join("nested/c.yaml"), "id: c\napplication: app\n").unwrap();
        fs::write(dir.join("readme.txt"), "not a template").unwrap();

        let docs: Vec<ApplicationTemplateDescriptor> =
            load_documents(&dir, "application").unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let docs: Vec<ApplicationTemplateDescriptor> =
            load_documents(&tmp.path().join("missing"), "application").unwrap();
        assert!(docs.is_empty());
    }
}
