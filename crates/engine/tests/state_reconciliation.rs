use formbridge_engine::{FormBridgeConfig, StateBlob, StateReconciler};
use formbridge_types::{FieldStateEntry, FieldStateMap, Submission};
use formbridge_util::{KeyedHasher, crc32, encode_base64};

const SALT: &str = "integration-salt";

fn reconciler() -> StateReconciler {
    let config = FormBridgeConfig {
        hash_secret: SALT.into(),
        ..FormBridgeConfig::default()
    };
    StateReconciler::new(&config).expect("reconciler")
}

/// Builds the blob by hand the way the host does: `base64(json([json(map), hash(crc32(json(map)))]))`.
fn host_state(field_states: &str) -> String {
    let hasher = KeyedHasher::new(SALT).expect("hasher");
    let checksum = hasher.hash(&crc32(field_states).to_string());
    let pair = serde_json::to_string(&[field_states, checksum.as_str()]).expect("pair");
    encode_base64(&pair)
}

fn states_of(submission: &Submission, key: &str) -> (StateBlob, FieldStateMap) {
    let blob = StateBlob::decode(submission.text(key).expect("state")).expect("decode");
    let map = blob.field_state_map().expect("map");
    (blob, map)
}

#[test]
fn widget_value_is_appended_to_existing_hash() {
    let reconciler = reconciler();
    let raw = Submission::from_pairs([("state_7", host_state(r#"{"5":"abc"}"#)), ("input_5", r#"{"a":1}"#.to_string())]);

    let reconciled = reconciler.reconcile(&raw, 7);

    let (_, map) = states_of(&reconciled, "state_7");
    let expected = FieldStateEntry::Many(vec!["abc".into(), reconciler.hasher().hash(r#"{"a":1}"#)]);
    assert_eq!(map.get("5"), Some(&expected));
    assert_eq!(reconciled.text("input_5"), Some(r#"{"a":1}"#));
}

#[test]
fn resealed_checksum_matches_field_states() {
    let reconciler = reconciler();
    let raw = Submission::from_pairs([
        ("state_7", host_state(r#"{"1":"x","5":["abc"]}"#)),
        ("input_5", r#"[{"id":"e-1"}]"#.to_string()),
        ("input_9", r#"{"legal_name":"Acme"}"#.to_string()),
    ]);

    let (blob, map) = states_of(&reconciler.reconcile(&raw, 7), "state_7");
    let hasher = KeyedHasher::new(SALT).expect("hasher");
    assert_eq!(blob.checksum, hasher.hash(&crc32(&blob.field_states).to_string()));
    assert_eq!(map.len(), 3);
    assert_eq!(map.get("1"), Some(&FieldStateEntry::Single("x".into())));
}

#[test]
fn reconciling_twice_is_idempotent() {
    let reconciler = reconciler();
    let raw = Submission::from_pairs([("state_7", host_state(r#"{"5":"abc"}"#)), ("input_5", r#"{"a":1}"#.to_string())]);

    let once = reconciler.reconcile(&raw, 7);
    let twice = reconciler.reconcile(&once, 7);
    assert_eq!(once, twice);
}

#[test]
fn list_encoded_state_is_accepted() {
    let reconciler = reconciler();
    let raw = Submission::from_pairs([("state_2", host_state("[]")), ("input_0", r#"{"a":1}"#.to_string())]);

    let (_, map) = states_of(&reconciler.reconcile(&raw, 2), "state_2");
    assert!(map.get("0").is_some());
}

#[test]
fn any_corrupted_character_leaves_submission_unchanged() {
    let reconciler = reconciler();
    let state = host_state(r#"{"5":"abc"}"#);

    for (index, character) in state.char_indices().filter(|(_, character)| *character != '=') {
        let replacement = if character == 'A' { 'B' } else { 'A' };
        let mut corrupted = state.clone();
        corrupted.replace_range(index..index + 1, &replacement.to_string());

        let raw = Submission::from_pairs([("state_7", corrupted), ("input_5", r#"{"a":1}"#.to_string())]);
        assert_eq!(reconciler.reconcile(&raw, 7), raw, "corruption at byte {index} was not rejected");
    }
}

#[test]
fn malformed_blobs_fail_closed() {
    let reconciler = reconciler();
    let wrong_arity = encode_base64(r#"["{}"]"#);
    let not_strings = encode_base64(r#"[{"5":"abc"}, "deadbeef"]"#);
    let bad_entries = host_state(r#"{"5":42}"#);

    for state in ["%%%not-base64%%%".to_string(), wrong_arity, not_strings, bad_entries] {
        let raw = Submission::from_pairs([("state_7", state), ("input_5", r#"{"a":1}"#.to_string())]);
        assert_eq!(reconciler.reconcile(&raw, 7), raw);
    }
}

#[test]
fn slashes_are_stripped_even_when_state_is_rejected() {
    let reconciler = reconciler();
    let raw = Submission::from_pairs([("state_7", "garbage"), ("input_3", r#"O\'Brien"#)]);

    let reconciled = reconciler.reconcile(&raw, 7);
    assert_eq!(reconciled.text("input_3"), Some("O'Brien"));
    assert_eq!(reconciled.text("state_7"), Some("garbage"));
}
