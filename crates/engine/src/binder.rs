//! Fills bound fields from MDP records (render time) and from widget JSON (submit time).

use std::collections::HashMap;

use formbridge_types::{
    BindingSource, DataSourceKind, FieldId, FormDefinition, PostValue, Submission, submission::input_key,
};
use formbridge_util::structured_json;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::FormBridgeConfig,
    provider::MdpSource,
    resolve::resolve_or,
    validation::handler_for,
};

/// Identifies the records a render is for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingContext {
    pub person_uuid: Option<String>,
    pub organization_uuid: Option<String>,
}

pub struct FieldBinder<'s, S: MdpSource + ?Sized> {
    source: &'s S,
    config: &'s FormBridgeConfig,
}

impl<'s, S: MdpSource + ?Sized> FieldBinder<'s, S> {
    pub fn new(source: &'s S, config: &'s FormBridgeConfig) -> Self {
        Self { source, config }
    }

    /// Resolves every MDP-bound field of `form`.
    ///
    /// Each data source is fetched at most once. A missing uuid or a failed
    /// fetch is logged and the affected fields receive their fallback.
    pub fn populate(&self, form: &FormDefinition, context: &BindingContext) -> IndexMap<FieldId, String> {
        let mut payloads: HashMap<DataSourceKind, Option<Value>> = HashMap::new();
        let mut values = IndexMap::new();

        for field in &form.fields {
            let Some(binding) = &field.binding else {
                continue;
            };
            let BindingSource::Mdp { mdp: kind } = binding.source else {
                continue;
            };
            let payload = payloads.entry(kind).or_insert_with(|| self.fetch(kind, context));
            let fallback = binding.fallback.as_deref().unwrap_or(&self.config.default_fallback);
            values.insert(field.id, resolve_or(payload.as_ref(), &binding.path, kind, fallback));
        }
        values
    }

    fn fetch(&self, kind: DataSourceKind, context: &BindingContext) -> Option<Value> {
        let (uuid, result) = match kind {
            DataSourceKind::PersonProfile | DataSourceKind::AdditionalInfo => {
                let Some(uuid) = context.person_uuid.as_deref() else {
                    warn!(%kind, "no person uuid available; bound fields use fallbacks");
                    return None;
                };
                let includes = self.config.person_includes(kind == DataSourceKind::AdditionalInfo);
                (uuid, self.source.fetch_person_profile(uuid, &includes))
            }
            DataSourceKind::Organization => {
                let Some(uuid) = context.organization_uuid.as_deref() else {
                    warn!(%kind, "no organization uuid available; bound fields use fallbacks");
                    return None;
                };
                (uuid, self.source.fetch_organization(uuid, &self.config.includes.organization))
            }
        };

        match result {
            Ok(payload) => Some(payload),
            Err(error) => {
                warn!(%kind, uuid, %error, "MDP fetch failed; bound fields use fallbacks");
                None
            }
        }
    }
}

/// Returns a copy of `submission` with widget-bound fields set from the JSON
/// their widget posted.
///
/// A widget that posted nothing, or text that is not a JSON object/array,
/// leaves the bound field as submitted.
pub fn bind_from_widgets(form: &FormDefinition, submission: &Submission, default_fallback: &str) -> Submission {
    let mut bound = submission.clone();

    for field in &form.fields {
        let Some(binding) = &field.binding else {
            continue;
        };
        let BindingSource::Widget { widget: widget_id } = binding.source else {
            continue;
        };
        let Some(widget) = form.field(widget_id) else {
            warn!(form_id = form.id, field_id = field.id, widget_id, "binding references an unknown field");
            continue;
        };
        let payload = submission
            .field_value(widget_id)
            .and_then(PostValue::as_text)
            .and_then(structured_json);
        let Some(payload) = payload else {
            debug!(form_id = form.id, field_id = field.id, widget_id, "widget posted no JSON; field left as submitted");
            continue;
        };

        let kind = handler_for(&widget.kind).payload_kind.unwrap_or(DataSourceKind::PersonProfile);
        let fallback = binding.fallback.as_deref().unwrap_or(default_fallback);
        bound.insert(input_key(field.id), resolve_or(Some(&payload), &binding.path, kind, fallback));
    }
    bound
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::provider::{FetchError, NullSource, StaticSource};
    use formbridge_types::{FieldBinding, FieldDefinition, FieldKind, WidgetRequirements};
    use serde_json::json;

    fn bound_field(id: FieldId, source: BindingSource, path: &str, fallback: Option<&str>) -> FieldDefinition {
        FieldDefinition {
            id,
            label: String::new(),
            kind: FieldKind::Hidden,
            is_required: false,
            page_number: 1,
            binding: Some(FieldBinding {
                source,
                path: path.into(),
                fallback: fallback.map(str::to_string),
            }),
        }
    }

    fn form(fields: Vec<FieldDefinition>) -> FormDefinition {
        FormDefinition {
            id: 1,
            title: String::new(),
            fields,
        }
    }

    struct CountingSource {
        calls: AtomicUsize,
        payload: Value,
    }

    impl MdpSource for CountingSource {
        fn fetch_person_profile(&self, _person_uuid: &str, _includes: &[String]) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.payload.clone())
        }

        fn fetch_organization(&self, _organization_uuid: &str, _includes: &[String]) -> Result<Value, FetchError> {
            Err(FetchError::transport("connection refused"))
        }
    }

    #[test]
    fn populate_fetches_each_source_once() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
            payload: json!({"data": {"attributes": {"given_name": "Ada", "family_name": "Lovelace"}}}),
        };
        let config = FormBridgeConfig::default();
        let form = form(vec![
            bound_field(1, BindingSource::Mdp { mdp: DataSourceKind::PersonProfile }, "given_name", None),
            bound_field(2, BindingSource::Mdp { mdp: DataSourceKind::PersonProfile }, "full_name", None),
            bound_field(3, BindingSource::Mdp { mdp: DataSourceKind::Organization }, "legal_name", Some("unknown")),
        ]);
        let context = BindingContext {
            person_uuid: Some("p-1".into()),
            organization_uuid: Some("o-1".into()),
        };

        let values = FieldBinder::new(&source, &config).populate(&form, &context);
        assert_eq!(values.get(&1).map(String::as_str), Some("Ada"));
        assert_eq!(values.get(&2).map(String::as_str), Some("Ada Lovelace"));
        assert_eq!(values.get(&3).map(String::as_str), Some("unknown"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    struct RecordingSource {
        fetches: Mutex<Vec<Vec<String>>>,
        payload: Value,
    }

    impl MdpSource for RecordingSource {
        fn fetch_person_profile(&self, _person_uuid: &str, includes: &[String]) -> Result<Value, FetchError> {
            self.fetches.lock().expect("fetch log").push(includes.to_vec());
            Ok(self.payload.clone())
        }

        fn fetch_organization(&self, organization_uuid: &str, _includes: &[String]) -> Result<Value, FetchError> {
            Err(FetchError::not_found("organization", organization_uuid))
        }
    }

    #[test]
    fn additional_info_fetches_person_profile_with_data_fields() {
        let source = RecordingSource {
            fetches: Mutex::new(Vec::new()),
            payload: json!({
                "data": {
                    "attributes": {
                        "given_name": "Ada",
                        "data_fields": [{"schema_slug": "dietary", "data": {"allergies": "peanuts"}}]
                    }
                }
            }),
        };
        let mut config = FormBridgeConfig::default();
        config.includes.person_profile = vec!["emails".into()];
        let form = form(vec![
            bound_field(1, BindingSource::Mdp { mdp: DataSourceKind::PersonProfile }, "given_name", None),
            bound_field(2, BindingSource::Mdp { mdp: DataSourceKind::AdditionalInfo }, "dietary.allergies", None),
            bound_field(3, BindingSource::Mdp { mdp: DataSourceKind::AdditionalInfo }, "data_fields.dietary.allergies", None),
        ]);
        let context = BindingContext {
            person_uuid: Some("p-1".into()),
            organization_uuid: None,
        };

        let values = FieldBinder::new(&source, &config).populate(&form, &context);
        assert_eq!(values.get(&1).map(String::as_str), Some("Ada"));
        assert_eq!(values.get(&2).map(String::as_str), Some("peanuts"));
        assert_eq!(values.get(&3).map(String::as_str), Some("peanuts"));

        let fetches = source.fetches.lock().expect("fetch log");
        assert_eq!(fetches.len(), 2);
        assert_eq!(fetches[0], vec!["emails".to_string()]);
        assert_eq!(fetches[1], vec!["emails".to_string(), "data_fields".to_string()]);
    }

    #[test]
    fn populate_uses_default_fallback_without_data() {
        let config = FormBridgeConfig {
            default_fallback: "-".into(),
            ..FormBridgeConfig::default()
        };
        let form = form(vec![bound_field(1, BindingSource::Mdp { mdp: DataSourceKind::PersonProfile }, "given_name", None)]);
        let context = BindingContext {
            person_uuid: Some("p-1".into()),
            organization_uuid: None,
        };
        let values = FieldBinder::new(&NullSource, &config).populate(&form, &context);
        assert_eq!(values.get(&1).map(String::as_str), Some("-"));

        let source = StaticSource::new(Some(json!({"data": {"given_name": "Ada"}})), None);
        let values = FieldBinder::new(&source, &config).populate(&form, &BindingContext::default());
        assert_eq!(values.get(&1).map(String::as_str), Some("-"));
    }

    #[test]
    fn binds_from_widget_json() {
        let mut widget = bound_field(1, BindingSource::Widget { widget: 0 }, "", None);
        widget.kind = FieldKind::OrganizationProfile(WidgetRequirements::default());
        widget.binding = None;
        let form = form(vec![
            widget,
            bound_field(2, BindingSource::Widget { widget: 1 }, "legal_name", None),
            bound_field(3, BindingSource::Widget { widget: 1 }, "primary_web_address.url", Some("none")),
        ]);
        let submission = Submission::from_pairs([
            ("input_1", r#"{"legal_name":"Acme","web_addresses":[{"url":"https://acme.test","primary":true}]}"#),
            ("input_2", "stale"),
        ]);

        let bound = bind_from_widgets(&form, &submission, "");
        assert_eq!(bound.text("input_2"), Some("Acme"));
        assert_eq!(bound.text("input_3"), Some("https://acme.test"));
        assert_eq!(submission.text("input_2"), Some("stale"));
    }

    #[test]
    fn widget_without_json_leaves_field_alone() {
        let mut widget = bound_field(1, BindingSource::Widget { widget: 0 }, "", None);
        widget.binding = None;
        let form = form(vec![widget, bound_field(2, BindingSource::Widget { widget: 1 }, "legal_name", Some("x"))]);
        let submission = Submission::from_pairs([("input_1", "not json"), ("input_2", "kept")]);
        assert_eq!(bind_from_widgets(&form, &submission, ""), submission);
    }
}
