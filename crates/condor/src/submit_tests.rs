// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample() -> SubmitDescription {
    let mut d = SubmitDescription::new();
    d.set("universe", "container");
    d.set("+should_transfer_container", "\"no\"");
    d.set("request_cpus", "1");
    d.set("priority", 50i64);
    d
}

#[test]
fn preserves_insertion_order() {
    let d = sample();
    let keys: Vec<&str> = d.keys().collect();
    assert_eq!(
        keys,
        vec![
            "universe",
            "+should_transfer_container",
            "request_cpus",
            "priority"
        ]
    );
}

#[test]
fn renders_submit_file_with_queue_statement() {
    let rendered = sample().to_submit_file(3);
    assert_eq!(
        rendered,
        "universe = container\n\
         +should_transfer_container = \"no\"\n\
         request_cpus = 1\n\
         priority = 50\n\
         \nqueue 3\n"
    );
}

#[test]
fn json_form_keeps_value_types() {
    let json = sample().to_json();
    assert_eq!(json["universe"], serde_json::json!("container"));
    assert_eq!(json["priority"], serde_json::json!(50));
    assert_eq!(json["request_cpus"], serde_json::json!("1"));
}

#[test]
fn identical_inputs_produce_identical_descriptions() {
    assert_eq!(sample(), sample());
    assert_eq!(sample().to_json(), sample().to_json());
}

#[test]
fn overwrite_keeps_position() {
    let mut d = sample();
    d.set("universe", "vanilla");
    let keys: Vec<&str> = d.keys().collect();
    assert_eq!(keys[0], "universe");
    assert_eq!(d.get_str("universe"), Some("vanilla"));
}
