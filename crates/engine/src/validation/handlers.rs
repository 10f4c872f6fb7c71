//! Per-kind field behavior, dispatched through a static table.

use formbridge_types::{DataSourceKind, FieldDefinition, FieldKind, FormDefinition, PostValue, Submission};
use formbridge_util::structured_json;
use serde_json::Value;

use super::{
    transition::PageTransition,
    widget::{check_full, check_next_clicked},
};
use crate::resolve::format_value;

pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Everything a handler may consult while validating one field.
pub struct FieldContext<'a> {
    pub form: &'a FormDefinition,
    pub field: &'a FieldDefinition,
    pub submission: &'a Submission,
    pub transition: PageTransition,
}

impl FieldContext<'_> {
    pub fn value(&self) -> Option<&PostValue> {
        self.submission.field_value(self.field.id)
    }

    pub fn is_blank(&self) -> bool {
        self.value().is_none_or(PostValue::is_blank)
    }

    /// The posted value parsed as a JSON object or array.
    pub fn payload(&self) -> Option<Value> {
        self.value()?.as_text().and_then(structured_json)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    Pass,
    Fail(String),
}

pub struct FieldHandler {
    /// How JSON posted by (or bound from) this field is interpreted.
    pub payload_kind: Option<DataSourceKind>,
    pub validate: fn(&FieldContext<'_>) -> FieldOutcome,
}

static STANDARD: FieldHandler = FieldHandler {
    payload_kind: None,
    validate: validate_required,
};

static PAGE: FieldHandler = FieldHandler {
    payload_kind: None,
    validate: always_pass,
};

static ORGANIZATION_PROFILE: FieldHandler = FieldHandler {
    payload_kind: Some(DataSourceKind::Organization),
    validate: validate_profile_widget,
};

static INDIVIDUAL_PROFILE: FieldHandler = FieldHandler {
    payload_kind: Some(DataSourceKind::PersonProfile),
    validate: validate_profile_widget,
};

static ADDITIONAL_INFO: FieldHandler = FieldHandler {
    payload_kind: Some(DataSourceKind::AdditionalInfo),
    validate: validate_required,
};

static ORGANIZATION_SEARCH: FieldHandler = FieldHandler {
    payload_kind: Some(DataSourceKind::Organization),
    validate: validate_organization_search,
};

pub fn handler_for(kind: &FieldKind) -> &'static FieldHandler {
    match kind {
        FieldKind::Standard | FieldKind::Hidden => &STANDARD,
        FieldKind::Page => &PAGE,
        FieldKind::OrganizationProfile(_) => &ORGANIZATION_PROFILE,
        FieldKind::IndividualProfile(_) => &INDIVIDUAL_PROFILE,
        FieldKind::AdditionalInfo => &ADDITIONAL_INFO,
        FieldKind::OrganizationSearch => &ORGANIZATION_SEARCH,
    }
}

fn always_pass(_context: &FieldContext<'_>) -> FieldOutcome {
    FieldOutcome::Pass
}

fn validate_required(context: &FieldContext<'_>) -> FieldOutcome {
    if context.field.is_required && context.is_blank() {
        FieldOutcome::Fail(REQUIRED_MESSAGE.to_string())
    } else {
        FieldOutcome::Pass
    }
}

fn validate_profile_widget(context: &FieldContext<'_>) -> FieldOutcome {
    if let failed @ FieldOutcome::Fail(_) = validate_required(context) {
        return failed;
    }
    let Some(requirements) = context.field.kind.widget_requirements() else {
        return FieldOutcome::Pass;
    };

    match context.transition {
        PageTransition::InitialLoad => FieldOutcome::Pass,
        PageTransition::NextClicked { .. } => {
            check_next_clicked(context.submission.validation_flag(context.field.id), context.payload().as_ref())
        }
        // Already gated when the user clicked past the widget's page.
        PageTransition::FinalSubmit if context.form.is_multi_step() => FieldOutcome::Pass,
        PageTransition::FinalSubmit => {
            if context.is_blank() {
                return FieldOutcome::Pass;
            }
            let kind = handler_for(&context.field.kind)
                .payload_kind
                .unwrap_or(DataSourceKind::PersonProfile);
            let payload = context.payload().unwrap_or(Value::Null);
            check_full(requirements, &payload, kind)
        }
    }
}

fn validate_organization_search(context: &FieldContext<'_>) -> FieldOutcome {
    if !context.field.is_required {
        return FieldOutcome::Pass;
    }
    let selected = match context.payload() {
        Some(payload) => payload
            .get("id")
            .is_some_and(|id| !format_value(id).trim().is_empty()),
        None => !context.is_blank(),
    };
    if selected {
        FieldOutcome::Pass
    } else {
        FieldOutcome::Fail("Please select an organization.".to_string())
    }
}
