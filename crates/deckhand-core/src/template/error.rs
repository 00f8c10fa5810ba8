//! Structural errors raised while resolving application templates

use thiserror::Error;

/// Errors which abort resolution of a single template root.
///
/// Dangling references are not errors: the affected application is dropped
/// and resolution of its siblings continues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("circular application template definition: {}", .chain.join(" -> "))]
    CircularReference { chain: Vec<String> },

    #[error("template '{name}' has neither an application nor a template reference")]
    MissingReference { name: String },

    #[error("application template chain deeper than {max_depth} levels at '{id}'")]
    DepthExceeded { id: String, max_depth: usize },
}

impl TemplateError {
    pub fn is_cycle(&self) -> bool {
        matches!(self, TemplateError::CircularReference { .. })
    }
}
