mod common;

use common::cli::{error_json, run_report};
use common::{ResultsDir, RunFixture};
use serde_json::Value;

/// Run "1" passes all five tests; the newer run "2" fails `Suite test 3`.
fn regression_scenario() -> ResultsDir {
    let results = ResultsDir::new();
    let mut base = RunFixture::new("1", "2025-04-01T08:00:00Z");
    let mut head = RunFixture::new("2", "2025-04-02T08:00:00Z");
    for i in 1..=5 {
        let leaf = format!("test {i}");
        base = base.spec("Suite", &leaf, "passed", 1.0);
        let state = if i == 3 { "failed" } else { "passed" };
        head = head.spec("Suite", &leaf, state, 1.0);
    }
    results.add(&base);
    results.add(&head);
    results
}

#[test]
fn e2e_compare_defaults_to_previous_and_latest() {
    let results = regression_scenario();
    let run = run_report(&results.root, ["compare", "."]);

    assert!(run.status.success(), "compare failed: {}", run.stderr);
    assert!(run.stdout.contains("Comparing run 1 -> run 2"));
    assert!(run.stdout.contains("Tests compared: 5"));
    assert!(run.stdout.contains("New failures (1)"));
    assert!(run.stdout.contains("Suite test 3"));
    assert!(run.stdout.contains("Fixed (0)"));
    assert!(run.stdout.contains("No fixed tests"));
}

#[test]
fn e2e_compare_json() {
    let results = regression_scenario();
    let run = run_report(&results.root, ["compare", ".", "--json"]);

    assert!(run.status.success(), "compare failed: {}", run.stderr);
    let payload: Value = serde_json::from_str(&run.stdout).expect("json output");
    assert_eq!(payload["run_a"], "1");
    assert_eq!(payload["run_b"], "2");
    assert_eq!(payload["tests_compared"], 5);
    let failures = payload["new_failures"].as_array().expect("array");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["test_name"], "Suite test 3");
    assert_eq!(failures[0]["state_a"], "passed");
    assert_eq!(failures[0]["state_b"], "failed");
    assert!(payload["fixed"].as_array().expect("array").is_empty());
}

#[test]
fn e2e_compare_explicit_reverse_direction() {
    let results = regression_scenario();
    let run = run_report(
        &results.root,
        ["compare", ".", "--base", "2", "--head", "1", "--json"],
    );

    assert!(run.status.success(), "compare failed: {}", run.stderr);
    let payload: Value = serde_json::from_str(&run.stdout).expect("json output");
    assert!(payload["new_failures"].as_array().expect("array").is_empty());
    assert_eq!(payload["fixed"][0]["test_name"], "Suite test 3");
}

#[test]
fn e2e_compare_unknown_run() {
    let results = regression_scenario();
    let run = run_report(&results.root, ["compare", ".", "--base", "99"]);

    assert_eq!(run.status.code(), Some(2));
    let payload = error_json(&run.stderr);
    assert_eq!(payload["error"]["code"], "RUN_NOT_FOUND");
}

#[test]
fn e2e_compare_same_run() {
    let results = regression_scenario();
    let run = run_report(&results.root, ["compare", ".", "--base", "2", "--head", "2"]);

    assert_eq!(run.status.code(), Some(2));
    let payload = error_json(&run.stderr);
    assert_eq!(payload["error"]["code"], "SAME_RUN");
}

#[test]
fn e2e_compare_needs_two_runs() {
    let results = ResultsDir::new();
    results.add(&RunFixture::new("1", "2025-04-01T08:00:00Z").spec("Suite", "only", "passed", 1.0));

    let run = run_report(&results.root, ["compare", "."]);

    assert_eq!(run.status.code(), Some(2));
    let payload = error_json(&run.stderr);
    assert_eq!(payload["error"]["code"], "NOT_ENOUGH_RUNS");
}

#[test]
fn e2e_compare_missing_results_dir_finds_no_runs() {
    let results = ResultsDir::new();
    let run = run_report(&results.root, ["compare", "nowhere"]);

    assert!(run.status.success(), "compare failed: {}", run.stderr);
    assert!(run.stdout.contains("No runs found."));
}

#[test]
fn e2e_flaky_lists_alternating_test() {
    let results = ResultsDir::new();
    for (i, state) in ["passed", "failed", "passed"].iter().enumerate() {
        results.add(
            &RunFixture::new(&(i + 1).to_string(), &format!("2025-04-0{}T08:00:00Z", i + 1))
                .spec("Cart", "adds item", state, 1.0)
                .spec("Cart", "removes item", "passed", 1.0),
        );
    }

    let run = run_report(&results.root, ["flaky", "."]);
    assert!(run.status.success(), "flaky failed: {}", run.stderr);
    assert!(run.stdout.contains("Cart adds item"));
    assert!(run.stdout.contains("alternating"));
    assert!(!run.stdout.contains("removes item"));
    assert!(run.stdout.contains("1 flaky test(s)"));

    let run = run_report(&results.root, ["flaky", ".", "--json"]);
    assert!(run.status.success(), "flaky failed: {}", run.stderr);
    let payload: Value = serde_json::from_str(&run.stdout).expect("json output");
    let flaky = payload.as_array().expect("array");
    assert_eq!(flaky.len(), 1);
    assert_eq!(flaky[0]["test_name"], "Cart adds item");
    assert_eq!(flaky[0]["history"], serde_json::json!(["P", "F", "P"]));
}

#[test]
fn e2e_flaky_none_detected() {
    let results = ResultsDir::new();
    results.add(&RunFixture::new("1", "2025-04-01T08:00:00Z").spec("Suite", "steady", "passed", 1.0));
    results.add(&RunFixture::new("2", "2025-04-02T08:00:00Z").spec("Suite", "steady", "passed", 1.0));
    let run = run_report(&results.root, ["flaky", "."]);

    assert!(run.status.success(), "flaky failed: {}", run.stderr);
    assert!(run.stdout.contains("No flaky tests detected."));
}
