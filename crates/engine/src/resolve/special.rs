//! Composite fields computed from several attributes or resources.

use std::borrow::Cow;

use formbridge_types::DataSourceKind;
use serde_json::Value;

use super::document::{Document, field, is_truthy};

/// Resolves a composite field name for the given data source, if it names one.
pub(crate) fn lookup<'a, 'n>(document: &Document<'a>, node: &'n Value, name: &str, kind: DataSourceKind) -> Option<Cow<'n, Value>>
where
    'a: 'n,
{
    use DataSourceKind::{Organization, PersonProfile};

    match (kind, name) {
        (PersonProfile, "full_name") => full_name(node).map(Cow::Owned),
        (PersonProfile | Organization, "primary_email") => {
            let emails = document.collection(node, "emails")?;
            let first = emails.as_array()?.iter().find(|email| !email.is_null())?;
            field(first, "address").cloned().map(Cow::Owned)
        }
        (PersonProfile | Organization, "primary_address") => preferred_entry(document, node, "addresses"),
        (PersonProfile | Organization, "primary_phone") => preferred_entry(document, node, "phones"),
        (Organization, "primary_web_address") => preferred_entry(document, node, "web_addresses"),
        _ => None,
    }
}

/// `given_name` and `family_name` joined by a space, skipping blanks.
fn full_name(node: &Value) -> Option<Value> {
    let parts: Vec<&str> = ["given_name", "family_name"]
        .iter()
        .filter_map(|key| field(node, key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    (!parts.is_empty()).then(|| Value::String(parts.join(" ")))
}

/// Picks the best entry of a collection: `primary && active`, then `active`, then the first.
fn preferred_entry<'a, 'n>(document: &Document<'a>, node: &'n Value, collection: &str) -> Option<Cow<'n, Value>>
where
    'a: 'n,
{
    let entries = document.collection(node, collection)?;
    let chosen = select_preferred(entries.as_array()?)?.clone();
    Some(Cow::Owned(chosen))
}

pub(crate) fn select_preferred(entries: &[Value]) -> Option<&Value> {
    let present = || entries.iter().filter(|entry| !entry.is_null());
    let primary = |entry: &&Value| is_truthy(field(entry, "primary"));
    let active = |entry: &&Value| is_truthy(field(entry, "active"));

    present()
        .find(|entry| primary(entry) && active(entry))
        .or_else(|| present().find(|entry| active(entry)))
        .or_else(|| present().next())
}
