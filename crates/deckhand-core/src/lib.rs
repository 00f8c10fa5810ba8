//! Deckhand Core Library
//!
//! Resolves a product's inheritable, parameterized instance and application
//! templates into concrete, template-free configuration ready to be
//! instantiated on worker nodes.

pub mod config;
pub mod descriptor;
pub mod fs;
pub mod product;
pub mod template;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, DeckhandConfig};

    // Descriptors
    pub use crate::descriptor::{
        ApplicationTemplateDescriptor, InstanceTemplateDescriptor, InstanceTemplateGroup,
        InstanceVariableTemplateDescriptor, ParameterTemplateDescriptor, RawProductTemplates,
        TemplateApplication, TemplateOverride, TemplateParameter, TemplateVariable,
        TemplateableVariable,
    };

    // Resolution
    pub use crate::template::{
        OverrideSet, ResolveOptions, ResolvedBundle, TemplateError, TemplateResolver,
        resolve_bundle,
    };

    // Products
    pub use crate::product::{FileResultCache, NoCache, ProductTemplates, ResultCache};
}
