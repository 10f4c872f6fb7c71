use formbridge_engine::{FormBridgeConfig, FormProcessor, StateBlob};
use formbridge_types::{FieldStateMap, FormDefinition, Submission};

fn processor() -> FormProcessor {
    FormProcessor::new(FormBridgeConfig {
        hash_secret: "page-salt".into(),
        ..FormBridgeConfig::default()
    })
    .expect("processor")
}

fn multi_step_form() -> FormDefinition {
    serde_yaml::from_str(
        r#"
id: 12
title: Membership
fields:
  - id: 1
    label: Organization
    is_required: true
    kind:
      type: organization_profile
  - id: 2
    label: Organization name
    kind:
      type: hidden
    binding:
      source:
        widget: 1
      path: legal_name
  - id: 3
    kind:
      type: page
    page_number: 2
  - id: 4
    label: Notes
    page_number: 2
"#,
    )
    .expect("form")
}

fn single_step_form() -> FormDefinition {
    serde_yaml::from_str(
        r#"
id: 13
fields:
  - id: 1
    kind:
      type: organization_profile
      required_fields: [legal_name]
"#,
    )
    .expect("form")
}

#[test]
fn next_click_overrides_stale_false_flag() {
    let submission = Submission::from_pairs([
        ("gform_source_page_number_12", "1"),
        ("gform_target_page_number_12", "2"),
        ("gform_next_button", "Next"),
        ("input_1", r#"{"legal_name":"Acme","incompleteRequiredFields":[],"incompleteRequiredResources":[]}"#),
        ("input_1_validation", "false"),
    ]);

    let processed = processor().process(&multi_step_form(), &submission);
    assert!(processed.verdict.is_valid, "{:?}", processed.verdict);
    assert_eq!(processed.submission.text("input_2"), Some("Acme"));
}

#[test]
fn next_click_blocks_while_widget_is_incomplete() {
    let submission = Submission::from_pairs([
        ("gform_source_page_number_12", "1"),
        ("gform_target_page_number_12", "2"),
        ("gform_save", ""),
        ("input_1", r#"{"incompleteRequiredResources":["emails"]}"#),
        ("input_1_validation", "0"),
    ]);

    let verdict = processor().process(&multi_step_form(), &submission).verdict;
    let failure = verdict.failure_for(1).expect("organization field fails");
    assert!(!failure.message.is_empty());
}

#[test]
fn next_without_explicit_action_is_initial_load() {
    let submission = Submission::from_pairs([
        ("gform_source_page_number_12", "1"),
        ("gform_target_page_number_12", "2"),
        ("input_1_validation", "false"),
    ]);
    assert!(processor().process(&multi_step_form(), &submission).verdict.is_valid);
}

#[test]
fn final_submit_on_multi_step_form_skips_widget_completeness() {
    let submission = Submission::from_pairs([
        ("gform_source_page_number_12", "2"),
        ("gform_target_page_number_12", "0"),
        ("input_1", r#"{"incompleteRequiredFields":["legal_name"],"incompleteRequiredResources":["addresses"]}"#),
        ("input_1_validation", "false"),
    ]);
    assert!(processor().process(&multi_step_form(), &submission).verdict.is_valid);
}

#[test]
fn final_submit_on_single_step_form_runs_full_check() {
    let incomplete = Submission::from_pairs([
        ("gform_target_page_number_13", "0"),
        ("input_1", r#"{"legal_name":"Acme","addresses":[{"city":"Leeds"}]}"#),
    ]);
    let verdict = processor().process(&single_step_form(), &incomplete).verdict;
    assert!(!verdict.is_valid);

    let complete = Submission::from_pairs([(
        "input_1",
        r#"{"legal_name":"Acme","addresses":[{"city":"Leeds"}],"emails":[{"address":"a@acme.test"}],"phones":[{"number":"1"}],"web_addresses":[{"url":"https://acme.test"}]}"#,
    )]);
    assert!(processor().process(&single_step_form(), &complete).verdict.is_valid);
}

#[test]
fn processing_authorizes_widget_json_in_state() {
    let processor = processor();
    let state = StateBlob::seal(&FieldStateMap::new(), processor.reconciler().hasher())
        .and_then(|blob| blob.encode())
        .expect("state");
    let raw = Submission::from_pairs([
        ("state_12", state.as_str()),
        ("gform_source_page_number_12", "1"),
        ("gform_target_page_number_12", "1"),
        ("input_1", r#"{"legal_name":"Acme"}"#),
    ]);

    let processed = processor.process(&multi_step_form(), &raw);
    let blob = StateBlob::decode(processed.submission.text("state_12").expect("state")).expect("blob");
    let map = blob.field_state_map().expect("map");
    assert!(map.get("1").expect("entry").contains(&processor.reconciler().hasher().hash(r#"{"legal_name":"Acme"}"#)));
}
