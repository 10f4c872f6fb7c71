//! Raw form submission data.
//!
//! A [`Submission`] is the flat key/value map a browser POSTs for a single
//! request. Key order is preserved so that re-encoding a submission yields
//! the same layout the host delivered.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{FieldId, FormId};

/// Keys that signal the user explicitly asked to advance a page.
pub const NEXT_ACTION_KEYS: &[&str] = &["gform_save", "gform_next_button"];

/// Suffix of the widget validation flag inputs (`input_<id>_validation`).
pub const VALIDATION_SUFFIX: &str = "_validation";

/// Default prefix of field value inputs (`input_<id>`).
pub const INPUT_PREFIX: &str = "input_";

/// A single posted value.
///
/// Plain inputs arrive as text. Checkbox groups and multi-selects arrive as
/// lists or keyed maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostValue {
    Text(String),
    List(Vec<PostValue>),
    Map(IndexMap<String, PostValue>),
}

impl PostValue {
    /// Returns the text content when this is a plain text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Applies `transform` to every text leaf, returning a new value.
    pub fn map_text(&self, transform: &impl Fn(&str) -> String) -> PostValue {
        match self {
            Self::Text(text) => Self::Text(transform(text)),
            Self::List(items) => Self::List(items.iter().map(|item| item.map_text(transform)).collect()),
            Self::Map(entries) => Self::Map(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.map_text(transform)))
                    .collect(),
            ),
        }
    }

    /// True when the value carries no content (empty text, or a list/map whose leaves are all empty).
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::List(items) => items.iter().all(PostValue::is_blank),
            Self::Map(entries) => entries.values().all(PostValue::is_blank),
        }
    }
}

impl From<&str> for PostValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PostValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A flat mapping of posted keys to values for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission {
    values: IndexMap<String, PostValue>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a submission from `(key, text)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<PostValue>,
    {
        Self {
            values: pairs.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PostValue> {
        self.values.get(key)
    }

    /// Returns the text value for `key`, ignoring list and map values.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(PostValue::as_text)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Inserts or replaces a value, keeping the original position of existing keys.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PostValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PostValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns a copy with `transform` applied to every text leaf.
    pub fn map_text(&self, transform: impl Fn(&str) -> String) -> Submission {
        Submission {
            values: self
                .values
                .iter()
                .map(|(key, value)| (key.clone(), value.map_text(&transform)))
                .collect(),
        }
    }

    /// Posted value of a field (`input_<id>`).
    pub fn field_value(&self, field_id: FieldId) -> Option<&PostValue> {
        self.values.get(&input_key(field_id))
    }

    /// Reads the tri-state widget validation flag for a field.
    ///
    /// `"true"`/`"1"` map to `Some(true)`, `"false"`/`"0"` to `Some(false)`,
    /// anything else (including absence) to `None`.
    pub fn validation_flag(&self, field_id: FieldId) -> Option<bool> {
        match self.text(&validation_key(field_id))?.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }

    /// Parses a posted page number marker.
    pub fn page_number(&self, key: &str) -> Option<u32> {
        self.text(key)?.trim().parse().ok()
    }

    /// True when any of the "next page" action markers was posted.
    pub fn next_requested(&self) -> bool {
        NEXT_ACTION_KEYS.iter().any(|key| self.values.contains_key(*key))
    }
}

/// Key of the embedded state blob for a form.
pub fn state_key(form_id: FormId) -> String {
    format!("state_{form_id}")
}

/// Key of a field's posted value.
pub fn input_key(field_id: FieldId) -> String {
    format!("{INPUT_PREFIX}{field_id}")
}

/// Key of a field's widget validation flag.
pub fn validation_key(field_id: FieldId) -> String {
    format!("{INPUT_PREFIX}{field_id}{VALIDATION_SUFFIX}")
}

pub fn source_page_key(form_id: FormId) -> String {
    format!("gform_source_page_number_{form_id}")
}

pub fn target_page_key(form_id: FormId) -> String {
    format!("gform_target_page_number_{form_id}")
}
