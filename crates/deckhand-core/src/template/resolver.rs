//! Application template inheritance resolution
//!
//! Walks an application's template chain (application entry → template →
//! parent template → ...) and produces a single template-free configuration.
//!
//! # Algorithm
//! For every level of the chain:
//! 1. Clone the level's application; descriptors are shared and never mutated.
//! 2. Record the level's ID (if it has one) for cycle detection.
//! 3. Merge the overrides pushed down from more specific levels with the
//!    level's own `fixedVariables`. IDs that are already fixed keep their value.
//! 4. Substitute fixed values into `name` and all start parameter values.
//! 5. Resolve the parent with the merged overrides, surface the parent's free
//!    variables, and fill every gap of this level from the resolved parent.
//!
//! A template reference that cannot be found drops the application
//! (`Ok(None)`); a cycle or an entry with neither an application nor a
//! template is an error for the whole chain.

use tracing::debug;

use crate::descriptor::{ApplicationTemplateDescriptor, TemplateApplication, TemplateVariable};

use super::error::TemplateError;
use super::overrides::OverrideSet;

/// Default limit for the length of a template chain.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Something that can be resolved: a bare application entry, or an
/// identified application template.
///
/// Only identified nodes take part in cycle detection.
#[derive(Debug, Clone, Copy)]
pub enum ResolvableNode<'a> {
    Application(&'a TemplateApplication),
    Template(&'a ApplicationTemplateDescriptor),
}

impl<'a> ResolvableNode<'a> {
    pub fn identity(&self) -> Option<&'a str> {
        match self {
            ResolvableNode::Application(_) => None,
            ResolvableNode::Template(desc) => Some(desc.id.as_str()),
        }
    }

    pub fn application(&self) -> &'a TemplateApplication {
        match self {
            ResolvableNode::Application(app) => app,
            ResolvableNode::Template(desc) => &desc.app,
        }
    }

    /// Human readable label for diagnostics.
    pub fn label(&self) -> &'a str {
        self.identity()
            .or(self.application().name.as_deref())
            .or(self.application().application.as_deref())
            .unwrap_or("<unnamed>")
    }
}

impl<'a> From<&'a TemplateApplication> for ResolvableNode<'a> {
    fn from(app: &'a TemplateApplication) -> Self {
        ResolvableNode::Application(app)
    }
}

impl<'a> From<&'a ApplicationTemplateDescriptor> for ResolvableNode<'a> {
    fn from(desc: &'a ApplicationTemplateDescriptor) -> Self {
        ResolvableNode::Template(desc)
    }
}

/// Resolves template chains against a catalogue of application templates.
#[derive(Debug, Clone, Copy)]
pub struct TemplateResolver<'a> {
    catalogue: &'a [ApplicationTemplateDescriptor],
    max_depth: usize,
}

impl<'a> TemplateResolver<'a> {
    pub fn new(catalogue: &'a [ApplicationTemplateDescriptor]) -> Self {
        Self {
            catalogue,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn find(&self, id: &str) -> Option<&'a ApplicationTemplateDescriptor> {
        self.catalogue.iter().find(|t| t.id == id)
    }

    /// Resolve `node` into a template-free application.
    ///
    /// # Arguments
    /// * `exposed` - Free variables of the caller. Variables of every template
    ///   in the chain that remain unfixed are appended (deduplicated by ID).
    /// * `inherited` - Overrides fixed by the caller; they win over any value
    ///   fixed inside the chain.
    ///
    /// # Returns
    /// `Ok(None)` if some template in the chain does not exist.
    pub fn resolve<'n>(
        &self,
        node: impl Into<ResolvableNode<'n>>,
        exposed: &mut Vec<TemplateVariable>,
        inherited: &OverrideSet,
    ) -> Result<Option<TemplateApplication>, TemplateError>
    where
        'a: 'n,
    {
        let mut visited = Vec::new();
        self.resolve_node(node.into(), exposed, inherited, &mut visited)
    }

    fn resolve_node<'n>(
        &self,
        node: ResolvableNode<'n>,
        exposed: &mut Vec<TemplateVariable>,
        inherited: &OverrideSet,
        visited: &mut Vec<String>,
    ) -> Result<Option<TemplateApplication>, TemplateError>
    where
        'a: 'n,
    {
        let mut app = node.application().clone();

        if let Some(id) = node.identity() {
            if visited.iter().any(|v| v == id) {
                let mut chain = visited.clone();
                chain.push(id.to_string());
                return Err(TemplateError::CircularReference { chain });
            }
            visited.push(id.to_string());
        }

        if visited.len() > self.max_depth {
            return Err(TemplateError::DepthExceeded {
                id: node.label().to_string(),
                max_depth: self.max_depth,
            });
        }

        if app.application.is_none() && app.template.is_none() {
            return Err(TemplateError::MissingReference {
                name: node.label().to_string(),
            });
        }

        let merged = inherited.merged_with(&app.fixed_variables);

        app.name = app.name.map(|name| merged.apply(&name));
        for param in &mut app.start_parameters {
            param.value = param.value.take().map(|value| merged.apply(&value));
        }

        if let Some(parent_id) = app.template.clone() {
            let Some(parent) = self.find(&parent_id) else {
                debug!(
                    template = %parent_id,
                    referenced_by = node.label(),
                    "Cannot find application template"
                );
                return Ok(None);
            };

            let mut parent_vars = parent.template_variables.clone();
            let Some(resolved_parent) = self.resolve_node(
                ResolvableNode::Template(parent),
                &mut parent_vars,
                &merged,
                visited,
            )?
            else {
                return Ok(None);
            };

            for variable in parent_vars {
                let known = exposed.iter().any(|v| v.id == variable.id);
                if !known && !inherited.contains(&variable.id) {
                    exposed.push(variable);
                }
            }

            app.inherit_from(resolved_parent);
        }

        if node.identity().is_some() {
            // what this template fixes itself is not free above it
            exposed.retain(|v| !merged.contains(&v.id));
        }

        Ok(Some(app))
    }
}
