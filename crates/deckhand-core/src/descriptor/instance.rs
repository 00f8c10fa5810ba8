//! Instance template descriptors

use serde::{Deserialize, Serialize};

use super::application::{TemplateApplication, TemplateVariable};
use super::scalar_string;

/// Kind of node an instance template group is deployed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationType {
    #[default]
    Server,
    Client,
}

/// Template for populating an entire instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceTemplateDescriptor {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Free variables the user is asked for when applying the template
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub template_variables: Vec<TemplateVariable>,

    /// Instance variables created with the instance
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instance_variables: Vec<TemplateableVariable>,

    /// Value overrides applied after variable templates are expanded
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instance_variable_defaults: Vec<InstanceVariableDefault>,

    #[serde(default)]
    pub groups: Vec<InstanceTemplateGroup>,
}

impl InstanceTemplateDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            template_variables: Vec::new(),
            instance_variables: Vec::new(),
            instance_variable_defaults: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn group(&self, name: &str) -> Option<&InstanceTemplateGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn template_variable(&self, id: &str) -> Option<&TemplateVariable> {
        self.template_variables.iter().find(|v| v.id == id)
    }
}

/// A named set of applications that is mapped onto one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceTemplateGroup {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, rename = "type")]
    pub group_type: ApplicationType,

    #[serde(default)]
    pub applications: Vec<TemplateApplication>,
}

impl InstanceTemplateGroup {
    pub fn new(name: impl Into<String>, applications: Vec<TemplateApplication>) -> Self {
        Self {
            name: name.into(),
            description: None,
            group_type: ApplicationType::default(),
            applications,
        }
    }
}

/// An instance variable, or a reference to an instance variable template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateableVariable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// ID of an [`InstanceVariableTemplateDescriptor`] to splice in here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<String>,
}

impl TemplateableVariable {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn template_ref(template: impl Into<String>) -> Self {
        Self {
            template: Some(template.into()),
            ..Self::default()
        }
    }

    pub fn is_template_ref(&self) -> bool {
        self.template.is_some()
    }
}

/// Default value for an instance variable, keyed by variable ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceVariableDefault {
    pub id: String,
    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
}

/// Reusable list of instance variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceVariableTemplateDescriptor {
    pub id: String,
    #[serde(default)]
    pub instance_variables: Vec<TemplateableVariable>,
}
