use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use uplink_decoder_core::{
    CounterError, DecodeError, DecodedPayload, UplinkInput, UplinkOutput, decode_uplink,
};

fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

fn load_input(path: &Path) -> UplinkInput {
    let raw = fs::read_to_string(path).expect("read input.json");
    serde_json::from_str(&raw).expect("parse input")
}

fn load_expected_output(dir: &str) -> UplinkOutput {
    let expected_path = repo_root().join(dir).join("expected_output.json");
    let expected_json = fs::read_to_string(&expected_path).expect("read expected_output.json");
    serde_json::from_str(&expected_json).expect("parse expected output")
}

fn load_expected_value(dir: &str) -> Value {
    let expected_path = repo_root().join(dir).join("expected_output.json");
    let expected_json = fs::read_to_string(&expected_path).expect("read expected_output.json");
    serde_json::from_str(&expected_json).expect("parse expected json")
}

fn run_golden(dir: &str) {
    let input = load_input(&repo_root().join(dir).join("input.json"));
    let expected_value = load_expected_value(dir);

    let actual = decode_uplink(&input).expect("decode uplink");
    let actual_value = serde_json::to_value(actual).expect("serialize actual");

    assert_eq!(actual_value, expected_value, "golden mismatch in {dir}");
}

#[test]
fn golden_counter_reference() {
    run_golden("tests/golden/counter_reference");
}

#[test]
fn golden_counter_zero() {
    run_golden("tests/golden/counter_zero");
}

#[test]
fn golden_counter_whole() {
    run_golden("tests/golden/counter_whole");
}

#[test]
fn golden_other_port() {
    run_golden("tests/golden/other_port");
}

#[test]
fn golden_other_port_empty() {
    run_golden("tests/golden/other_port_empty");
}

#[test]
fn golden_counter_reference_has_scaled_value() {
    let output = load_expected_output("tests/golden/counter_reference");
    assert_eq!(
        output.data,
        DecodedPayload::Counter {
            count: 65510,
            float: 655.1
        }
    );
}

#[test]
fn golden_other_port_has_no_fields() {
    let output = load_expected_output("tests/golden/other_port");
    assert!(output.data.is_empty());
}

#[test]
fn golden_fixtures_match_output_model() {
    for dir in [
        "tests/golden/counter_reference",
        "tests/golden/counter_zero",
        "tests/golden/counter_whole",
        "tests/golden/other_port",
        "tests/golden/other_port_empty",
    ] {
        let raw = load_expected_value(dir);
        let typed = serde_json::to_value(load_expected_output(dir)).expect("serialize expected");
        assert_eq!(raw, typed, "fixture {dir} carries fields outside the output model");
    }
}

#[test]
fn invalid_counter_empty_is_rejected() {
    let input = load_input(&repo_root().join("tests/invalid/counter_empty.json"));
    let err = decode_uplink(&input).unwrap_err();
    assert_eq!(
        err,
        DecodeError::InvalidInput {
            f_port: 1,
            source: CounterError::TooShort {
                needed: 2,
                actual: 0
            },
        }
    );
}
