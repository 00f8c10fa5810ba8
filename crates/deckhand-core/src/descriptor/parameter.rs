//! Parameter templates: reusable parameter definitions.
//!
//! These are not part of the inheritance graph and are handed to callers as
//! loaded.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::scalar_string;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterTemplateDescriptor {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
}

/// A single parameter definition; attributes beyond the common ones are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(
        default,
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<String>,

    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_yaml::Value>,
}
