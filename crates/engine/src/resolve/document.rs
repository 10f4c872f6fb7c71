//! JSON:API document access: the `included` side table and relationship lookups.

use std::borrow::Cow;

use serde_json::Value;

pub(crate) const ATTRIBUTES: &str = "attributes";
const RELATIONSHIPS: &str = "relationships";
const INCLUDED: &str = "included";

/// The side table of a payload, shared by every step of a walk.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Document<'a> {
    included: &'a [Value],
}

impl<'a> Document<'a> {
    /// Splits a payload into its working root (`data` when wrapped) and its side table.
    pub(crate) fn open(payload: &'a Value) -> (Self, &'a Value) {
        let included = payload
            .get(INCLUDED)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let root = match payload {
            Value::Object(map) => map.get("data").unwrap_or(payload),
            _ => payload,
        };
        (Self { included }, root)
    }

    /// Attributes of the included resource named by a `{type, id}` identifier.
    pub(crate) fn attributes_of(&self, identifier: &Value) -> Option<&'a Value> {
        let resource_type = identifier.get("type").and_then(Value::as_str)?;
        let resource_id = identifier_id(identifier)?;
        self.included
            .iter()
            .find(|resource| {
                resource.get("type").and_then(Value::as_str) == Some(resource_type)
                    && identifier_id(resource).as_deref() == Some(resource_id.as_str())
            })
            .and_then(|resource| resource.get(ATTRIBUTES))
    }

    /// Resolves `node.relationships.<name>` through the side table.
    ///
    /// To-one relationships yield the target's attributes, or `None` when the
    /// target is absent. To-many relationships yield a list of attributes with
    /// `null` standing in for absent targets so indices stay stable.
    pub(crate) fn relationship<'n>(&self, node: &'n Value, name: &str) -> Option<Cow<'n, Value>>
    where
        'a: 'n,
    {
        let linkage = node.get(RELATIONSHIPS)?.get(name)?.get("data")?;
        match linkage {
            Value::Array(identifiers) => Some(Cow::Owned(Value::Array(
                identifiers
                    .iter()
                    .map(|identifier| self.attributes_of(identifier).cloned().unwrap_or(Value::Null))
                    .collect(),
            ))),
            Value::Object(_) => self.attributes_of(linkage).map(Cow::Borrowed),
            _ => None,
        }
    }

    /// Finds a list named `name` on `node`: directly, under `attributes`, or as a relationship.
    pub(crate) fn collection<'n>(&self, node: &'n Value, name: &str) -> Option<Cow<'n, Value>>
    where
        'a: 'n,
    {
        if let Some(list @ Value::Array(_)) = node.get(name) {
            return Some(Cow::Borrowed(list));
        }
        if let Some(list @ Value::Array(_)) = node.get(ATTRIBUTES).and_then(|attributes| attributes.get(name)) {
            return Some(Cow::Borrowed(list));
        }
        self.relationship(node, name).filter(|resolved| resolved.is_array())
    }
}

/// Resource ids may be posted as strings or numbers; compare them as text.
fn identifier_id(value: &Value) -> Option<String> {
    match value.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Looks `key` up on `node` or its `attributes`. A `null` value counts as absent.
pub(crate) fn field<'n>(node: &'n Value, key: &str) -> Option<&'n Value> {
    let present = |value: &&Value| !value.is_null();
    node.get(key)
        .filter(present)
        .or_else(|| node.get(ATTRIBUTES).and_then(|attributes| attributes.get(key)).filter(present))
}

/// Flags posted as booleans, numbers, or strings.
pub(crate) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|number| number != 0.0),
        Some(Value::String(text)) => matches!(text.trim().to_ascii_lowercase().as_str(), "1" | "true"),
        _ => false,
    }
}
