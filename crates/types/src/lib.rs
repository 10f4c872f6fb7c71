//! Shared type definitions for FormBridge.
//!
//! - `submission`: raw POST data and the well-known keys inside it
//! - `state`: the field state map carried in the checksummed state blob
//! - `form`: form and field definitions, bindings, and data-source kinds
//! - `verdict`: validation results handed back to the rendering layer

pub mod form;
pub mod state;
pub mod submission;
pub mod verdict;

pub use form::{
    BindingSource, DataSourceKind, FieldBinding, FieldDefinition, FieldKind, FormDefinition, ParseDataSourceKindError, ResourceKind,
    WidgetRequirements,
};
pub use state::{FieldStateEntry, FieldStateMap};
pub use submission::{PostValue, Submission};
pub use verdict::{FailedField, ValidationVerdict};

/// Numeric form identifier.
pub type FormId = u32;

/// Numeric field identifier within a form.
pub type FieldId = u32;
