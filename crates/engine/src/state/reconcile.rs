//! Keeps the host's tamper-evident state in sync with widget-authored values.
//!
//! The host hashes every protected field value at render time and rejects a
//! submission whose values are missing from the sealed state. Widgets write
//! JSON into their inputs after render, so their hashes are never in that
//! state. The reconciler recognizes structured JSON values, authorizes their
//! hashes, and reseals the state. It only ever patches a blob it could
//! verify: any decode or checksum failure leaves the state exactly as posted.

use formbridge_types::{FormId, Submission, submission::state_key};
use formbridge_util::{KeyedHasher, is_structured_json, strip_slashes};
use tracing::{debug, warn};

use super::{StateBlob, StateError};
use crate::config::{ConfigError, FormBridgeConfig};

/// Recognizes keys that carry a whole field value (`input_<id>` and configured alternates).
#[derive(Debug, Clone)]
pub struct InputKeyMatcher {
    prefixes: Vec<String>,
}

impl InputKeyMatcher {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    /// Returns the field id portion of `key`.
    ///
    /// Only all-digit ids match, so sub-inputs (`input_5_1`) and validation
    /// flags (`input_5_validation`) are never treated as field values.
    pub fn field_key<'k>(&self, key: &'k str) -> Option<&'k str> {
        self.prefixes.iter().find_map(|prefix| {
            let field_key = key.strip_prefix(prefix.as_str())?;
            (!field_key.is_empty() && field_key.bytes().all(|byte| byte.is_ascii_digit())).then_some(field_key)
        })
    }
}

#[derive(Debug, Clone)]
pub struct StateReconciler {
    hasher: KeyedHasher,
    input_keys: InputKeyMatcher,
}

impl StateReconciler {
    pub fn new(config: &FormBridgeConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_hasher(config.hasher()?, InputKeyMatcher::new(config.input_prefixes())))
    }

    pub fn with_hasher(hasher: KeyedHasher, input_keys: InputKeyMatcher) -> Self {
        Self { hasher, input_keys }
    }

    pub fn hasher(&self) -> &KeyedHasher {
        &self.hasher
    }

    /// Returns an unslashed copy of `raw` whose `state_<form_id>` authorizes
    /// every structured JSON field value.
    ///
    /// Never fails: a missing, malformed, or unverifiable blob is passed
    /// through untouched. `raw` itself is never modified.
    pub fn reconcile(&self, raw: &Submission, form_id: FormId) -> Submission {
        let mut submission = raw.map_text(strip_slashes);
        match self.patched_state(&submission, form_id) {
            Ok(Some(encoded)) => submission.insert(state_key(form_id), encoded),
            Ok(None) => {}
            Err(error) => warn!(form_id, %error, "form state left untouched"),
        }
        submission
    }

    /// Computes the re-encoded blob, or `None` when nothing needed authorizing.
    fn patched_state(&self, submission: &Submission, form_id: FormId) -> Result<Option<String>, StateError> {
        let Some(encoded) = submission.text(&state_key(form_id)) else {
            debug!(form_id, "no form state posted");
            return Ok(None);
        };

        let blob = StateBlob::decode(encoded)?;
        blob.verify(&self.hasher)?;
        let mut field_states = blob.field_state_map()?;

        let mut changed = false;
        for (key, value) in submission.iter() {
            let Some(field_key) = self.input_keys.field_key(key) else {
                continue;
            };
            let Some(text) = value.as_text() else {
                continue;
            };
            if !is_structured_json(text) {
                continue;
            }
            let hash = self.hasher.hash(text);
            if field_states.authorize(field_key, &hash) {
                debug!(form_id, field_id = field_key, "authorized widget value");
                changed = true;
            }
        }

        if !changed {
            return Ok(None);
        }
        let resealed = StateBlob::seal(&field_states, &self.hasher)?;
        Ok(Some(resealed.encode()?))
    }
}
