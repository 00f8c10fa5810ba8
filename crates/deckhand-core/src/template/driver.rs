//! Resolution of all templates of one product version

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::descriptor::{
    ApplicationTemplateDescriptor, InstanceTemplateDescriptor, InstanceTemplateGroup,
    ParameterTemplateDescriptor, RawProductTemplates,
};

use super::overrides::OverrideSet;
use super::resolver::{DEFAULT_MAX_DEPTH, TemplateResolver};
use super::variables::expand_instance_variables;

/// Knobs for a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Template-free descriptors, ready for instantiation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBundle {
    pub instance_templates: Vec<InstanceTemplateDescriptor>,
    pub application_templates: Vec<ApplicationTemplateDescriptor>,
    pub parameter_templates: Vec<ParameterTemplateDescriptor>,
}

/// Resolve every instance template and the application template catalogue.
///
/// Problems with individual applications are logged and the application is
/// dropped; groups and instance templates left without applications are
/// dropped as well. The result is sorted by name.
pub fn resolve_bundle(raw: &RawProductTemplates, options: &ResolveOptions) -> ResolvedBundle {
    let resolver =
        TemplateResolver::new(&raw.application_templates).with_max_depth(options.max_depth);

    let mut instance_templates: Vec<_> = raw
        .instance_templates
        .iter()
        .filter_map(|itd| resolve_instance_template(&resolver, itd, raw))
        .collect();
    instance_templates.sort_by(|a, b| a.name.cmp(&b.name));

    let mut application_templates: Vec<_> = raw
        .application_templates
        .iter()
        .filter_map(|atd| resolve_catalogue_entry(&resolver, atd))
        .collect();
    application_templates.sort_by(|a, b| a.display_name().cmp(b.display_name()));

    ResolvedBundle {
        instance_templates,
        application_templates,
        parameter_templates: raw.parameter_templates.clone(),
    }
}

fn resolve_instance_template(
    resolver: &TemplateResolver<'_>,
    itd: &InstanceTemplateDescriptor,
    raw: &RawProductTemplates,
) -> Option<InstanceTemplateDescriptor> {
    let mut exposed = itd.template_variables.clone();
    let mut groups = Vec::with_capacity(itd.groups.len());

    for group in &itd.groups {
        let mut applications = Vec::with_capacity(group.applications.len());
        for app in &group.applications {
            match resolver.resolve(app, &mut exposed, &OverrideSet::new()) {
                Ok(Some(resolved)) => applications.push(resolved),
                Ok(None) => debug!(
                    instance_template = %itd.name,
                    group = %group.name,
                    application = app.name.as_deref().unwrap_or("<unnamed>"),
                    "Dropping application with unresolvable template"
                ),
                Err(err) => error!(
                    instance_template = %itd.name,
                    group = %group.name,
                    application = app.name.as_deref().unwrap_or("<unnamed>"),
                    error = %err,
                    "Cannot resolve application template"
                ),
            }
        }

        if applications.is_empty() {
            debug!(instance_template = %itd.name, group = %group.name, "Dropping empty group");
            continue;
        }
        groups.push(InstanceTemplateGroup {
            applications,
            ..group.clone()
        });
    }

    if groups.is_empty() {
        debug!(instance_template = %itd.name, "Dropping instance template without applications");
        return None;
    }

    Some(InstanceTemplateDescriptor {
        name: itd.name.clone(),
        description: itd.description.clone(),
        template_variables: exposed,
        instance_variables: expand_instance_variables(
            itd.instance_variables.clone(),
            &raw.variable_templates,
            &itd.instance_variable_defaults,
        ),
        instance_variable_defaults: itd.instance_variable_defaults.clone(),
        groups,
    })
}

fn resolve_catalogue_entry(
    resolver: &TemplateResolver<'_>,
    atd: &ApplicationTemplateDescriptor,
) -> Option<ApplicationTemplateDescriptor> {
    let mut exposed = atd.template_variables.clone();
    match resolver.resolve(atd, &mut exposed, &OverrideSet::new()) {
        Ok(Some(app)) => Some(ApplicationTemplateDescriptor {
            id: atd.id.clone(),
            app,
            template_variables: exposed,
        }),
        Ok(None) => {
            debug!(template = %atd.id, "Dropping application template with unresolvable parent");
            None
        }
        Err(err) => {
            error!(template = %atd.id, error = %err, "Cannot resolve application template");
            None
        }
    }
}
