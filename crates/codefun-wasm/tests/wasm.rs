//! Smoke tests for the WASM surface. Run with `wasm-pack test --node`.

use codefun_wasm::{challenge_list, merge_progress, run_challenge, run_code, version};
use wasm_bindgen_test::wasm_bindgen_test;

#[wasm_bindgen_test]
fn run_code_reports_output() {
    let parsed: serde_json::Value =
        serde_json::from_str(&run_code(r#"log("hello")"#)).expect("valid JSON");
    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["output"], "hello\n");
}

#[wasm_bindgen_test]
fn run_code_reports_errors() {
    let parsed: serde_json::Value =
        serde_json::from_str(&run_code("log(ghost)")).expect("valid JSON");
    assert_eq!(parsed["success"], false);
    assert_eq!(parsed["error"], "'ghost' is not defined");
}

#[wasm_bindgen_test]
fn run_challenge_judges_a_passing_submission() {
    let source = "function isEven(n) { return n % 2 === 0 }";
    let parsed: serde_json::Value =
        serde_json::from_str(&run_challenge("puzzle-1", source)).expect("valid JSON");
    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["report"]["all_passed"], true);
    assert!(parsed["html"]
        .as_str()
        .expect("html string")
        .contains("test-summary test-pass"));
}

#[wasm_bindgen_test]
fn run_challenge_rejects_unknown_ids() {
    let parsed: serde_json::Value =
        serde_json::from_str(&run_challenge("puzzle-99", "let x = 1")).expect("valid JSON");
    assert_eq!(parsed["success"], false);
    assert_eq!(parsed["error"], "unknown challenge 'puzzle-99'");
}

#[wasm_bindgen_test]
fn challenge_list_is_in_display_order() {
    let parsed: serde_json::Value = serde_json::from_str(&challenge_list()).expect("valid JSON");
    let ids: Vec<_> = parsed
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, vec!["puzzle-1", "puzzle-2", "puzzle-3"]);
}

#[wasm_bindgen_test]
fn merge_progress_round_trips() {
    let stored = merge_progress("", "puzzle-1", "2026-08-29T10:00:00Z");
    let stored = merge_progress(&stored, "puzzle-2", "2026-08-29T11:00:00Z");
    let parsed: serde_json::Value = serde_json::from_str(&stored).expect("valid JSON");
    assert_eq!(parsed["challenges"]["puzzle-1"]["completed"], true);
    assert_eq!(
        parsed["challenges"]["puzzle-2"]["completedAt"],
        "2026-08-29T11:00:00Z"
    );
}

#[wasm_bindgen_test]
fn version_matches_the_package() {
    assert_eq!(version(), env!("CARGO_PKG_VERSION"));
}
