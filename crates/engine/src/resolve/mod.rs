//! # Field Path Resolution
//!
//! Resolves dot-notation field paths against JSON:API-shaped MDP payloads
//! (`{ data, included }`) and against the flatter JSON that widgets post.
//!
//! ## Path Format
//!
//! - Numeric segments index into lists: `organizations.0.legal_name`
//! - `attributes` is optional: `attributes.given_name` and `given_name` resolve alike
//! - Other segments try, in order: a direct key, `attributes.<segment>`, a
//!   relationship resolved through `included`, a `data_fields` record's
//!   `data.<segment>`, and finally a composite field such as `full_name` or
//!   `primary_address`
//! - On a list, a non-numeric segment selects the `data_fields` record whose
//!   `schema_slug` matches: `data_fields.<schema_slug>.<key>`
//!
//! Resolution never fails loudly. An unresolvable path yields an empty
//! string and the caller decides on a fallback.
//!
//! ## Usage
//!
//! ```rust
//! use formbridge_engine::resolve::resolve;
//! use formbridge_types::DataSourceKind;
//! use serde_json::json;
//!
//! let payload = json!({ "data": { "attributes": { "given_name": "Ada" } } });
//! assert_eq!(resolve(&payload, "attributes.given_name", DataSourceKind::PersonProfile), "Ada");
//! assert_eq!(resolve(&payload, "given_name", DataSourceKind::PersonProfile), "Ada");
//! ```

mod document;
mod special;

use std::borrow::Cow;

use formbridge_types::DataSourceKind;
use serde_json::Value;
use tracing::debug;

use document::{ATTRIBUTES, Document, field};

const DATA_FIELDS: &str = "data_fields";
const SCHEMA_SLUG: &str = "schema_slug";

/// Resolves `path` against `payload` and renders the result as text.
///
/// Returns an empty string when any segment cannot be resolved.
pub fn resolve(payload: &Value, path: &str, kind: DataSourceKind) -> String {
    resolve_value(payload, path, kind)
        .map(|value| format_value(&value))
        .unwrap_or_default()
}

/// Like [`resolve`], substituting `fallback` for an empty result or a missing payload.
pub fn resolve_or(payload: Option<&Value>, path: &str, kind: DataSourceKind, fallback: &str) -> String {
    let resolved = payload.map(|payload| resolve(payload, path, kind)).unwrap_or_default();
    if resolved.is_empty() {
        debug!(path, %kind, has_payload = payload.is_some(), "field path unresolved; using fallback");
        return fallback.to_string();
    }
    resolved
}

/// Resolves `path` to the raw JSON value it addresses.
pub fn resolve_value(payload: &Value, path: &str, kind: DataSourceKind) -> Option<Value> {
    let (document, root) = Document::open(payload);
    let segments: Vec<&str> = path.split('.').map(str::trim).filter(|segment| !segment.is_empty()).collect();

    let mut current = Cow::Borrowed(root);
    for segment in segments {
        current = match current {
            Cow::Borrowed(node) => step(&document, node, segment, kind)?,
            Cow::Owned(node) => Cow::Owned(step(&document, &node, segment, kind)?.into_owned()),
        };
    }
    Some(current.into_owned())
}

/// True when the collection (`addresses`, `emails`, ...) holds at least one present entry.
pub fn has_entries(payload: &Value, collection: &str, kind: DataSourceKind) -> bool {
    match resolve_value(payload, collection, kind) {
        Some(Value::Array(entries)) => entries.iter().any(|entry| !entry.is_null()),
        _ => false,
    }
}

/// Renders a resolved value the way a form input expects it.
///
/// Strings are verbatim, numbers use their JSON text, `true` becomes `"1"`,
/// `false` and `null` become empty, and lists/objects are serialized as
/// compact JSON with Unicode and slashes left unescaped.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        compound => serde_json::to_string(compound).unwrap_or_default(),
    }
}

fn step<'a, 'n>(document: &Document<'a>, node: &'n Value, segment: &str, kind: DataSourceKind) -> Option<Cow<'n, Value>>
where
    'a: 'n,
{
    if segment.bytes().all(|byte| byte.is_ascii_digit()) {
        let index = segment.parse::<usize>().ok()?;
        return node.as_array()?.get(index).map(Cow::Borrowed);
    }

    if segment == ATTRIBUTES {
        let attributes = node.get(ATTRIBUTES).filter(|attributes| attributes.is_object());
        return Some(Cow::Borrowed(attributes.unwrap_or(node)));
    }

    if let Value::Array(records) = node {
        return find_data_field(records, segment).map(Cow::Borrowed);
    }

    if let Some(found) = field(node, segment) {
        return Some(Cow::Borrowed(found));
    }
    if let Some(found) = document.relationship(node, segment) {
        return Some(found);
    }
    if let Some(found) = data_field_value(node, segment) {
        return Some(Cow::Borrowed(found));
    }
    if kind == DataSourceKind::AdditionalInfo
        && let Some(found) = implicit_data_field(document, node, segment)
    {
        return Some(found);
    }

    special::lookup(document, node, segment, kind)
}

/// The `data_fields` record whose `schema_slug` equals `slug`.
fn find_data_field<'n>(records: &'n [Value], slug: &str) -> Option<&'n Value> {
    records
        .iter()
        .find(|record| field(record, SCHEMA_SLUG).and_then(Value::as_str) == Some(slug))
}

/// Looks `key` up inside a `data_fields` record's `data` object.
fn data_field_value<'n>(record: &'n Value, key: &str) -> Option<&'n Value> {
    field(record, SCHEMA_SLUG)?;
    field(record, "data")?.get(key).filter(|value| !value.is_null())
}

/// Additional-info paths may omit the leading `data_fields` segment.
fn implicit_data_field<'a, 'n>(document: &Document<'a>, node: &'n Value, slug: &str) -> Option<Cow<'n, Value>>
where
    'a: 'n,
{
    match document.collection(node, DATA_FIELDS)? {
        Cow::Borrowed(records) => find_data_field(records.as_array()?, slug).map(Cow::Borrowed),
        Cow::Owned(records) => find_data_field(records.as_array()?, slug).cloned().map(Cow::Owned),
    }
}
