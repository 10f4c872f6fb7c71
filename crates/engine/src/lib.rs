//! # FormBridge Engine
//!
//! The FormBridge Engine keeps a host form's tamper-evident page state in sync
//! with JSON values that MDP widgets write asynchronously, resolves field
//! bindings against JSON:API-shaped MDP records, and validates multi-step
//! submissions according to the page transition being attempted.
//!
//! ## Key Features
//!
//! - **State Reconciliation**: Authorizes widget-authored JSON values inside the
//!   checksummed `state_<formId>` blob, failing closed on any inconsistency
//! - **Path Resolution**: Dot-notation lookups through `attributes`,
//!   relationships, `included` resources, and composite fields
//! - **Field Binding**: Populates bound fields from MDP records or widget JSON
//! - **Page-Transition Validation**: Widget completeness checks gated by
//!   `InitialLoad`, `NextClicked`, and `FinalSubmit`
//!
//! ## Usage
//!
//! ```rust
//! use formbridge_engine::{FormBridgeConfig, FormProcessor};
//! use formbridge_types::{FormDefinition, Submission};
//!
//! let config = FormBridgeConfig {
//!     hash_secret: "salt".into(),
//!     ..FormBridgeConfig::default()
//! };
//! let processor = FormProcessor::new(config)?;
//! let form: FormDefinition = serde_yaml::from_str("id: 1\nfields: [{id: 1}]")?;
//! let submission = Submission::from_pairs([("input_1", "hello")]);
//!
//! let processed = processor.process(&form, &submission);
//! assert!(processed.verdict.is_valid);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`state`**: State blob codec and the reconciler
//! - **`resolve`**: Field path resolution over MDP payloads
//! - **`binder`**: Render-time and submit-time field binding
//! - **`validation`**: Page-transition state machine and per-kind handlers
//! - **`provider`**: The `MdpSource` collaborator seam
//! - **`config`**: Configuration loading and validation

use std::{fs, path::Path};

use anyhow::{Context, Result};
use formbridge_types::{FormDefinition, Submission, ValidationVerdict};
use serde::Serialize;
use tracing::debug;

pub mod binder;
pub mod config;
pub mod provider;
pub mod resolve;
pub mod state;
pub mod validation;

pub use binder::{BindingContext, FieldBinder, bind_from_widgets};
pub use config::{ConfigError, FormBridgeConfig, load_config, load_config_from_path};
pub use provider::{FetchError, MdpSource, NullSource, StaticSource};
pub use resolve::{resolve, resolve_or};
pub use state::{StateBlob, StateError, StateReconciler};
pub use validation::{PageTransition, validate_form};

/// A submission after the submit pipeline, with the verdict it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedSubmission {
    pub submission: Submission,
    pub verdict: ValidationVerdict,
}

/// Runs the submit pipeline: reconcile state, bind widget values, validate.
#[derive(Debug, Clone)]
pub struct FormProcessor {
    reconciler: StateReconciler,
    config: FormBridgeConfig,
}

impl FormProcessor {
    pub fn new(config: FormBridgeConfig) -> Result<Self, ConfigError> {
        let reconciler = StateReconciler::new(&config)?;
        Ok(Self { reconciler, config })
    }

    pub fn reconciler(&self) -> &StateReconciler {
        &self.reconciler
    }

    pub fn config(&self) -> &FormBridgeConfig {
        &self.config
    }

    /// Processes `raw` without modifying it.
    pub fn process(&self, form: &FormDefinition, raw: &Submission) -> ProcessedSubmission {
        let reconciled = self.reconciler.reconcile(raw, form.id);
        let submission = bind_from_widgets(form, &reconciled, &self.config.default_fallback);
        let verdict = validate_form(form, &submission);
        debug!(
            form_id = form.id,
            is_valid = verdict.is_valid,
            failures = verdict.failed_fields.len(),
            "submission processed"
        );
        ProcessedSubmission { submission, verdict }
    }
}

/// Loads a form definition from a YAML or JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not describe a form.
pub fn parse_form_file(file_path: impl AsRef<Path>) -> Result<FormDefinition> {
    let file_path = file_path.as_ref();
    let content = fs::read_to_string(file_path).with_context(|| format!("Failed to read form file: {}", file_path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("Invalid form definition: {}", file_path.display()))
}
