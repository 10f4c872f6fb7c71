//! Checksummed form state and its reconciliation with widget-authored values.
//!
//! - `blob`: decoding, verifying, and sealing the `state_<formId>` blob
//! - `reconcile`: authorizing structured JSON values inside a verified blob

mod blob;
mod reconcile;

pub use blob::{StateBlob, StateError};
pub use reconcile::{InputKeyMatcher, StateReconciler};
