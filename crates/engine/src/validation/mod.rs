//! Page-transition-aware validation of a submission.
//!
//! The transition decides which fields are checked at all: nothing on the
//! initial load, the source page's fields when the user clicks "next", and
//! every field on the final submit. Each checked field is then dispatched to
//! its kind's [`FieldHandler`].

mod handlers;
mod transition;
mod widget;

pub use handlers::{FieldContext, FieldHandler, FieldOutcome, REQUIRED_MESSAGE, handler_for};
pub use transition::PageTransition;
pub use widget::{WidgetReport, check_full, check_next_clicked};

use formbridge_types::{FieldKind, FormDefinition, Submission, ValidationVerdict};
use tracing::debug;

pub fn validate_form(form: &FormDefinition, submission: &Submission) -> ValidationVerdict {
    let transition = PageTransition::from_submission(submission, form.id);
    let mut verdict = ValidationVerdict::valid();

    let page_filter = match transition {
        PageTransition::InitialLoad => {
            debug!(form_id = form.id, "initial load; skipping validation");
            return verdict;
        }
        PageTransition::NextClicked { source_page, .. } => Some(source_page),
        PageTransition::FinalSubmit => None,
    };

    let checked = form
        .fields
        .iter()
        .filter(|field| !matches!(field.kind, FieldKind::Page))
        .filter(|field| page_filter.is_none_or(|page| field.page_number == page));

    for field in checked {
        let context = FieldContext {
            form,
            field,
            submission,
            transition,
        };
        if let FieldOutcome::Fail(message) = (handler_for(&field.kind).validate)(&context) {
            debug!(form_id = form.id, field_id = field.id, %message, "field failed validation");
            verdict.fail(field.id, message);
        }
    }
    verdict
}
