//! Field state map carried inside the checksummed state blob.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Hashes authorized for a single field.
///
/// A field starts with one hash computed at render time and grows into a
/// list when additional values (page revisits, widget edits) are authorized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldStateEntry {
    Single(String),
    Many(Vec<String>),
}

impl FieldStateEntry {
    pub fn contains(&self, hash: &str) -> bool {
        match self {
            Self::Single(existing) => existing == hash,
            Self::Many(existing) => existing.iter().any(|candidate| candidate == hash),
        }
    }

    /// Adds `hash` to the authorized set. Returns `true` when the entry changed.
    ///
    /// A list gains the hash if it is not already present; a differing
    /// single hash is promoted to `[old, new]`.
    pub fn authorize(&mut self, hash: &str) -> bool {
        match self {
            Self::Many(existing) => {
                if existing.iter().any(|candidate| candidate == hash) {
                    return false;
                }
                existing.push(hash.to_string());
                true
            }
            Self::Single(existing) => {
                if existing == hash {
                    return false;
                }
                let previous = std::mem::take(existing);
                *self = Self::Many(vec![previous, hash.to_string()]);
                true
            }
        }
    }
}

/// Field id → authorized hashes, in the order the host encoded them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldStateMap {
    entries: IndexMap<String, FieldStateEntry>,
}

impl FieldStateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the serialized map.
    ///
    /// Hosts that encode an empty or sequentially keyed map emit a JSON list;
    /// list indices become the field keys in that case.
    pub fn from_json(serialized: &str) -> Result<Self, serde_json::Error> {
        if serialized.trim_start().starts_with('[') {
            let items: Vec<FieldStateEntry> = serde_json::from_str(serialized)?;
            let entries = items
                .into_iter()
                .enumerate()
                .map(|(index, entry)| (index.to_string(), entry))
                .collect();
            return Ok(Self { entries });
        }
        Ok(Self {
            entries: serde_json::from_str(serialized)?,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    pub fn get(&self, field_key: &str) -> Option<&FieldStateEntry> {
        self.entries.get(field_key)
    }

    pub fn insert(&mut self, field_key: impl Into<String>, entry: FieldStateEntry) {
        self.entries.insert(field_key.into(), entry);
    }

    /// Authorizes `hash` for `field_key`, creating a singleton list for unknown fields.
    /// Returns `true` when the map changed.
    pub fn authorize(&mut self, field_key: &str, hash: &str) -> bool {
        match self.entries.get_mut(field_key) {
            Some(entry) => entry.authorize(hash),
            None => {
                self.entries
                    .insert(field_key.to_string(), FieldStateEntry::Many(vec![hash.to_string()]));
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
