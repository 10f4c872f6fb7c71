use serde::{Deserialize, Serialize};

use crate::FieldId;

/// A field that failed validation, with the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedField {
    pub id: FieldId,
    pub message: String,
}

/// Outcome of validating one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub failed_fields: Vec<FailedField>,
}

impl Default for ValidationVerdict {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidationVerdict {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            failed_fields: Vec::new(),
        }
    }

    /// Records a failure. Empty messages are replaced with a generic one.
    pub fn fail(&mut self, id: FieldId, message: impl Into<String>) {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "This field is invalid.".to_string();
        }
        self.is_valid = false;
        self.failed_fields.push(FailedField { id, message });
    }

    pub fn failure_for(&self, id: FieldId) -> Option<&FailedField> {
        self.failed_fields.iter().find(|failed| failed.id == id)
    }
}
