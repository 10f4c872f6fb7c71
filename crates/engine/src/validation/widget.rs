//! Completeness checks for the organization and individual profile widgets.

use formbridge_types::{DataSourceKind, ResourceKind, WidgetRequirements};
use serde_json::Value;
use tracing::debug;

use super::FieldOutcome;
use crate::resolve::{format_value, has_entries, resolve};

const INCOMPLETE_FIELDS_KEY: &str = "incompleteRequiredFields";
const INCOMPLETE_RESOURCES_KEY: &str = "incompleteRequiredResources";
const REQUIRED_RESOURCES_KEY: &str = "requiredResources";

/// What a widget reports about its own completeness alongside the record it posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetReport {
    pub incomplete_required_fields: Vec<Value>,
    pub incomplete_required_resources: Vec<Value>,
    /// `None` when the widget does not enumerate its required resources.
    pub required_resources: Option<Vec<ResourceKind>>,
}

impl WidgetReport {
    /// Reads each report key on its own, so one oddly shaped key never hides the others.
    ///
    /// Keys may hold a list or an object of flags (`{"phones": true}`), in
    /// which case the keys with a set flag are the entries.
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            incomplete_required_fields: entries(payload.get(INCOMPLETE_FIELDS_KEY)).unwrap_or_default(),
            incomplete_required_resources: entries(payload.get(INCOMPLETE_RESOURCES_KEY)).unwrap_or_default(),
            required_resources: entries(payload.get(REQUIRED_RESOURCES_KEY)).map(|listed| {
                listed
                    .iter()
                    .filter_map(|entry| resource_name(entry).and_then(|name| ResourceKind::from_widget_name(&name)))
                    .collect()
            }),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.outstanding().is_empty()
    }

    /// Human-readable names of everything the widget still lists as incomplete.
    pub fn outstanding(&self) -> Vec<String> {
        let fields = self.incomplete_required_fields.iter().map(describe_field);
        let resources = self.incomplete_required_resources.iter().map(describe_resource);
        fields.chain(resources).collect()
    }
}

/// Gate applied when the user clicks past the widget's page.
///
/// A `true` or absent flag is trusted. A `false` flag may have been written
/// before the widget's last asynchronous update, so the payload decides.
pub fn check_next_clicked(flag: Option<bool>, payload: Option<&Value>) -> FieldOutcome {
    if flag != Some(false) {
        if let Some(payload) = payload
            && !WidgetReport::from_payload(payload).is_complete()
        {
            debug!(?flag, "validation flag trusted although widget payload lists incomplete items");
        }
        return FieldOutcome::Pass;
    }
    let Some(payload) = payload else {
        debug!("validation flag is false but no widget payload was posted; allowing");
        return FieldOutcome::Pass;
    };

    let outstanding = WidgetReport::from_payload(payload).outstanding();
    if outstanding.is_empty() {
        debug!("stale validation flag overridden by complete widget payload");
        return FieldOutcome::Pass;
    }
    FieldOutcome::Fail(incomplete_message(&outstanding))
}

/// Full completeness check for a single-step form's final submit.
pub fn check_full(requirements: &WidgetRequirements, payload: &Value, kind: DataSourceKind) -> FieldOutcome {
    let report = WidgetReport::from_payload(payload);
    let mut outstanding = report.outstanding();

    for path in &requirements.required_fields {
        if resolve(payload, path, kind).trim().is_empty() && !outstanding.contains(path) {
            outstanding.push(path.clone());
        }
    }

    let resources = requirements
        .required_resources
        .clone()
        .or(report.required_resources)
        .unwrap_or_else(|| ResourceKind::ALL.to_vec());
    for resource in resources {
        let label = resource.label().to_string();
        if !has_entries(payload, resource.collection(), kind) && !outstanding.contains(&label) {
            outstanding.push(label);
        }
    }

    if outstanding.is_empty() {
        FieldOutcome::Pass
    } else {
        FieldOutcome::Fail(incomplete_message(&outstanding))
    }
}

fn incomplete_message(outstanding: &[String]) -> String {
    if outstanding.is_empty() {
        return "Please complete all required information before continuing.".to_string();
    }
    format!("Please complete the following required information: {}.", outstanding.join(", "))
}

fn describe_field(value: &Value) -> String {
    match value {
        Value::Object(entry) => entry
            .get("label")
            .or_else(|| entry.get("name"))
            .map(format_value)
            .unwrap_or_else(|| format_value(value)),
        other => format_value(other),
    }
}

fn describe_resource(value: &Value) -> String {
    let name = resource_name(value).unwrap_or_else(|| format_value(value));
    ResourceKind::from_widget_name(&name)
        .map(|resource| resource.label().to_string())
        .unwrap_or(name)
}

/// A list as posted, or the keys of an object whose flag is set.
fn entries(value: Option<&Value>) -> Option<Vec<Value>> {
    match value? {
        Value::Array(items) => Some(items.clone()),
        Value::Object(flags) => Some(
            flags
                .iter()
                .filter(|(_, flag)| !matches!(flag, Value::Null | Value::Bool(false)))
                .map(|(name, _)| Value::String(name.clone()))
                .collect(),
        ),
        _ => None,
    }
}

/// Resource entries are names (`"phones"`) or objects naming one (`{"type": "phone"}`).
fn resource_name(entry: &Value) -> Option<String> {
    match entry {
        Value::String(name) => Some(name.clone()),
        Value::Object(resource) => ["type", "name", "resource"]
            .iter()
            .find_map(|key| resource.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}
