// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    plain        = { "abc123", "abc123" },
    path         = { "/cvmfs/foo.sif:v1", "/cvmfs/foo.sif:v1" },
    empty        = { "", "''" },
    with_space   = { "foo bar", "'foo bar'" },
    with_dollar  = { "$HOME", "'$HOME'" },
    with_quote   = { "it's", r#"'it'"'"'s'"# },
)]
fn quote(input: &str, expected: &str) {
    assert_eq!(shell_quote(input), expected);
}

#[test]
fn env_val_string_casts() {
    assert_eq!(EnvVal::Bool(true).to_env_string(), "True");
    assert_eq!(EnvVal::Bool(false).to_env_string(), "False");
    assert_eq!(EnvVal::Int(932).to_env_string(), "932");
    assert_eq!(EnvVal::Text("x".into()).to_env_string(), "x");
    assert_eq!(
        EnvVal::List(vec!["q1".into(), "q2".into()]).to_env_string(),
        "q1;q2"
    );
}

#[test]
fn env_val_deserializes_scalar_or_list() {
    let v: EnvVal = serde_json::from_str("true").unwrap();
    assert_eq!(v, EnvVal::Bool(true));

    let v: EnvVal = serde_json::from_str("932").unwrap();
    assert_eq!(v, EnvVal::Int(932));

    let v: EnvVal = serde_json::from_str("\"hello\"").unwrap();
    assert_eq!(v, EnvVal::Text("hello".into()));

    let v: EnvVal = serde_json::from_str(r#"["a", "b"]"#).unwrap();
    assert_eq!(v, EnvVal::List(vec!["a".into(), "b".into()]));
}

fn env(entries: &[(&str, EnvVal)]) -> BTreeMap<String, EnvVal> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn renders_sorted_exports_between_tracing_toggles() {
    let rendered = render_envfile(&env(&[
        ("ZED", EnvVal::Text("last".into())),
        ("ABC", EnvVal::Int(1)),
    ]));

    let export_lines: Vec<&str> = rendered
        .lines()
        .filter(|l| l.starts_with("export "))
        .collect();
    assert_eq!(export_lines, vec!["export ABC=1", "export ZED=last"]);

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "#!/bin/bash");
    let set_x = lines.iter().position(|l| *l == "set -x").unwrap();
    let set_plus = lines.iter().position(|l| *l == "set +x").unwrap();
    assert!(set_x < set_plus);
    assert_eq!(*lines.last().unwrap(), "# End of environment file");
}

#[test]
fn output_is_byte_stable() {
    let e = env(&[
        ("B", EnvVal::Text("two words".into())),
        ("A", EnvVal::List(vec!["x".into(), "y".into()])),
    ]);
    assert_eq!(render_envfile(&e), render_envfile(&e));
}

#[test]
fn newlines_collapse_to_spaces() {
    let rendered = render_envfile(&env(&[("K", EnvVal::Text("line1\nline2".into()))]));
    assert!(rendered.contains("export K='line1 line2'"));
}

#[test]
fn list_values_join_with_semicolons() {
    let rendered = render_envfile(&env(&[(
        "EWMS_PILOT_QUEUE_INCOMING",
        EnvVal::List(vec!["queue-a".into(), "queue-b".into()]),
    )]));
    assert!(rendered.contains("export EWMS_PILOT_QUEUE_INCOMING='queue-a;queue-b'\n"));
}
