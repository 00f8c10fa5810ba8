//! Application template descriptors
//!
//! A [`TemplateApplication`] is the unit being resolved. It either names the
//! application to instantiate directly, or references a parent
//! [`ApplicationTemplateDescriptor`] through `template` and inherits from it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{required_scalar_string, scalar_string};

/// A user-facing free parameter declared by a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVariable {
    /// Unique within the declaring template
    #[serde(alias = "uid")]
    pub id: String,

    /// Short human readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Shown to the user when asking for a value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Type-erased default, interpreted by the consuming parameter
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<String>,

    /// Values offered by the input field
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_values: Vec<String>,
}

impl TemplateVariable {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            default_value: None,
            suggested_values: Vec::new(),
        }
    }
}

/// Forces a variable to a fixed value so it is no longer asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOverride {
    pub id: String,
    #[serde(deserialize_with = "required_scalar_string")]
    pub value: String,
}

impl TemplateOverride {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// A start parameter set on the process created from a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParameter {
    #[serde(alias = "uid")]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
}

impl TemplateParameter {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: Some(value.into()),
        }
    }
}

/// Process configuration template, possibly based on another template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateApplication {
    /// ID of the application to instantiate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,

    /// ID of the application template this one is based on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Name of the resulting process configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Process control group to put the process into, if it exists on the node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_process_control_group: Option<String>,

    /// Partial process control settings, opaque to resolution
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub process_control: BTreeMap<String, serde_yaml::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub start_parameters: Vec<TemplateParameter>,

    /// Variable values fixed at this level of the template chain
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixed_variables: Vec<TemplateOverride>,
}

impl TemplateApplication {
    /// Concrete application entry without a parent template.
    pub fn for_application(application: impl Into<String>) -> Self {
        Self {
            application: Some(application.into()),
            ..Self::default()
        }
    }

    /// Application entry based on the given template.
    pub fn from_template(template: impl Into<String>) -> Self {
        Self {
            template: Some(template.into()),
            ..Self::default()
        }
    }

    pub fn start_parameter(&self, id: &str) -> Option<&TemplateParameter> {
        self.start_parameters.iter().find(|p| p.id == id)
    }

    /// Whether the application is fully resolved (no parent, application set).
    pub fn is_resolved(&self) -> bool {
        self.template.is_none() && self.application.is_some()
    }

    /// Fill every gap in `self` from `parent`; values present here win.
    pub(crate) fn inherit_from(&mut self, parent: TemplateApplication) {
        fill(&mut self.application, parent.application);
        fill(&mut self.name, parent.name);
        fill(&mut self.description, parent.description);
        fill(
            &mut self.preferred_process_control_group,
            parent.preferred_process_control_group,
        );

        for (key, value) in parent.process_control {
            self.process_control.entry(key).or_insert(value);
        }

        for param in parent.start_parameters {
            if self.start_parameter(&param.id).is_none() {
                self.start_parameters.push(param);
            }
        }

        self.template = None;
    }
}

fn fill(ours: &mut Option<String>, theirs: Option<String>) {
    if ours.is_none() {
        *ours = theirs;
    }
}

/// A named, identified application template which others may be based on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationTemplateDescriptor {
    /// Stable ID used by `template` references
    pub id: String,

    #[serde(flatten)]
    pub app: TemplateApplication,

    /// Free variables this template asks for
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub template_variables: Vec<TemplateVariable>,
}

impl ApplicationTemplateDescriptor {
    pub fn new(id: impl Into<String>, app: TemplateApplication) -> Self {
        Self {
            id: id.into(),
            app,
            template_variables: Vec::new(),
        }
    }

    /// Name shown to users; falls back to the ID for unnamed templates.
    pub fn display_name(&self) -> &str {
        self.app.name.as_deref().unwrap_or(&self.id)
    }
}
