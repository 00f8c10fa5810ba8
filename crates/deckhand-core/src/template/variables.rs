//! Instance variable template expansion
//!
//! Entries of an instance template's variable list may reference an
//! [`InstanceVariableTemplateDescriptor`] instead of declaring a variable. Such
//! references are replaced in place by the referenced template's entries.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::descriptor::{
    InstanceVariableDefault, InstanceVariableTemplateDescriptor, TemplateableVariable,
};

/// Expand all variable template references in `entries`, then apply `defaults`.
///
/// - Spliced entries never replace an entry whose ID is already in the list.
/// - References inside spliced templates are expanded as well; each template
///   is spliced at most once.
/// - Unknown template IDs and unknown default IDs are logged and skipped.
pub fn expand_instance_variables(
    mut entries: Vec<TemplateableVariable>,
    templates: &[InstanceVariableTemplateDescriptor],
    defaults: &[InstanceVariableDefault],
) -> Vec<TemplateableVariable> {
    let mut expanded: HashSet<String> = HashSet::new();

    while let Some(index) = entries.iter().position(TemplateableVariable::is_template_ref) {
        let Some(template_id) = entries.remove(index).template else {
            continue;
        };

        if !expanded.insert(template_id.clone()) {
            debug!(template = %template_id, "Instance variable template already expanded");
            continue;
        }

        let Some(template) = templates.iter().find(|t| t.id == template_id) else {
            warn!(template = %template_id, "No instance variable template found");
            continue;
        };

        let replacements: Vec<TemplateableVariable> = template
            .instance_variables
            .iter()
            .filter(|candidate| !is_declared(&entries, candidate))
            .cloned()
            .collect();

        entries.splice(index..index, replacements);
    }

    for default in defaults {
        match entries
            .iter_mut()
            .find(|v| v.id.as_deref() == Some(default.id.as_str()))
        {
            Some(variable) => variable.value = default.value.clone(),
            None => warn!(
                variable = %default.id,
                "Variable not found while applying default value override"
            ),
        }
    }

    entries
}

fn is_declared(entries: &[TemplateableVariable], candidate: &TemplateableVariable) -> bool {
    candidate
        .id
        .as_deref()
        .is_some_and(|id| entries.iter().any(|e| e.id.as_deref() == Some(id)))
}
