//! Descriptor types read from product template files
//!
//! Every descriptor is deserialized from one YAML document using camelCase keys:
//! - Instance templates: how to populate a whole instance
//! - Application templates: reusable, inheritable process configurations
//! - Instance variable templates: reusable lists of instance variables
//! - Parameter templates: reusable parameter snippets (not resolved)

pub mod application;
pub mod instance;
pub mod parameter;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

pub use application::{
    ApplicationTemplateDescriptor, TemplateApplication, TemplateOverride, TemplateParameter,
    TemplateVariable,
};
pub use instance::{
    ApplicationType, InstanceTemplateDescriptor, InstanceTemplateGroup, InstanceVariableDefault,
    InstanceVariableTemplateDescriptor, TemplateableVariable,
};
pub use parameter::{ParameterDefinition, ParameterTemplateDescriptor};

/// All raw (unresolved) descriptors of one product version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawProductTemplates {
    pub instance_templates: Vec<InstanceTemplateDescriptor>,
    pub application_templates: Vec<ApplicationTemplateDescriptor>,
    pub parameter_templates: Vec<ParameterTemplateDescriptor>,
    pub variable_templates: Vec<InstanceVariableTemplateDescriptor>,
}

impl RawProductTemplates {
    pub fn is_empty(&self) -> bool {
        self.instance_templates.is_empty()
            && self.application_templates.is_empty()
            && self.parameter_templates.is_empty()
            && self.variable_templates.is_empty()
    }
}

/// Accept any YAML scalar for a string-typed value.
///
/// Template authors write `defaultValue: 8080` or `value: true` as often as
/// they quote them; all of those are carried as strings.
pub(crate) fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a scalar value, found {}",
            describe(&other)
        ))),
    }
}

/// Like [`scalar_string`], but a value must be present.
pub(crate) fn required_scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_string(deserializer)?.ok_or_else(|| D::Error::custom("value must not be null"))
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
        _ => "a scalar",
    }
}
