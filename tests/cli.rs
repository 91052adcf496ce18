use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

fn jsonjoin() -> Command {
    Command::cargo_bin("jsonjoin").unwrap()
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn inner_join_of_sample_files() {
    let result = stdout_json(
        jsonjoin()
            .arg("join")
            .arg(data("customers.json"))
            .arg(data("orders.json"))
            .args(["-l", "cid", "-r", "customer_id"]),
    );
    assert_eq!(
        result,
        json!([
            {"cid": 1, "name": "Ada Lovelace", "city": "London", "order_id": 100, "customer_id": 1, "amount": 25.5},
            {"cid": 3, "name": "Alan Turing", "city": "Manchester", "order_id": 101, "customer_id": 3, "amount": 12.0},
            {"cid": 1, "name": "Ada Lovelace", "city": "London", "order_id": 102, "customer_id": 1, "amount": 7.25}
        ])
    );
}

#[test]
fn full_join_appends_unmatched_left_records() {
    let result = stdout_json(
        jsonjoin()
            .arg("join")
            .arg(data("customers.json"))
            .arg(data("orders.json"))
            .args(["-l", "cid", "-r", "customer_id", "-t", "full"]),
    );
    let records = result.as_array().unwrap();
    assert_eq!(records.len(), 5);
    assert_eq!(records[3], json!({"order_id": 103, "customer_id": 9, "amount": 40.0}));
    assert_eq!(records[4], json!({"cid": 2, "name": "Grace Hopper", "city": "New York"}));
}

#[test]
fn reads_right_side_from_stdin() {
    let result = stdout_json(
        jsonjoin()
            .arg("join")
            .arg(data("customers.json"))
            .arg("-")
            .args(["-l", "cid", "-r", "customer_id", "-f", "compact"])
            .write_stdin(r#"[{"customer_id": 2, "note": "hi"}]"#),
    );
    assert_eq!(
        result,
        json!([{"cid": 2, "name": "Grace Hopper", "city": "New York", "customer_id": 2, "note": "hi"}])
    );
}

#[test]
fn missing_key_field_fails_without_output() {
    jsonjoin()
        .arg("join")
        .arg(data("customers.json"))
        .arg(data("orders.json"))
        .args(["-k", "cid"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("right record #0 has no field 'cid'"));
}

#[test]
fn rejects_unknown_join_kind() {
    jsonjoin()
        .arg("join")
        .arg(data("customers.json"))
        .arg(data("orders.json"))
        .args(["-k", "cid", "-t", "cross"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown join kind 'cross'"));
}

#[test]
fn rejects_non_array_input() {
    jsonjoin()
        .arg("join")
        .arg("-")
        .arg(data("orders.json"))
        .args(["-l", "cid", "-r", "customer_id"])
        .write_stdin(r#"{"cid": 1}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must contain a JSON array of objects"));
}

#[test]
fn writes_tsv_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("joined.tsv");
    jsonjoin()
        .arg("join")
        .arg(data("customers.json"))
        .arg(data("orders.json"))
        .args(["-l", "cid", "-r", "customer_id", "-t", "right", "-f", "tsv", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "cid\tname\tcity\torder_id\tcustomer_id\tamount");
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[4], "\t\t\t103\t9\t40.0");
}

#[test]
fn pretty_prints_table() {
    jsonjoin()
        .arg("pretty")
        .arg(data("orders.json"))
        .args(["-r", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| order_id | customer_id | amount |"))
        .stdout(predicate::str::contains("| 100      | 1           | 25.5   |"))
        .stdout(predicate::str::contains("| 101      | 3           | 12     |"));
}
