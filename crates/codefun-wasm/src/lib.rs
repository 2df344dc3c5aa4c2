//! CodeFun evaluator and challenge harness as a WASM module for browser
//! environments.
//!
//! This crate exposes the executor and the test harness via
//! `wasm-bindgen`, suitable for wiring to the challenge page's editor.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { run_code, run_challenge, merge_progress } from 'codefun-wasm';
//!
//! await init();
//!
//! const run = JSON.parse(run_code('log("hello")'));
//! // { success: true, output: "hello\n" }
//!
//! const judged = JSON.parse(run_challenge('puzzle-1', editor.value));
//! testOutput.innerHTML = judged.html;
//! if (judged.report.all_passed) {
//!   const stored = localStorage.getItem('userProgress') || '';
//!   localStorage.setItem('userProgress',
//!     merge_progress(stored, 'puzzle-1', new Date().toISOString()));
//! }
//! ```

use codefun_eval::{ExecOutcome, Executor};
use codefun_harness::{
    builtin_challenges, run_tests, Challenge, HarnessError, NoopNotifier, NoopStore,
};
use serde_json::json;
use wasm_bindgen::prelude::*;

/// Run a submission and report what it logged.
///
/// Returns a JSON string:
/// ```json
/// { "success": true, "output": "hello\n3\n" }
/// ```
/// A program that logs nothing reports the success sentinel as its
/// output. On a syntax error or runtime trap, `success` is `false` and
/// `error` carries the user-facing message.
#[wasm_bindgen]
pub fn run_code(source: &str) -> String {
    let payload = match Executor::new().execute(source) {
        ExecOutcome::Output(output) => json!({ "success": true, "output": output }),
        ExecOutcome::Error(message) => json!({ "success": false, "error": message }),
    };
    to_json(&payload)
}

/// Judge a submission against one built-in challenge.
///
/// Returns a JSON string:
/// ```json
/// { "success": true, "report": { "all_passed": true, ... }, "html": "<div ..." }
/// ```
/// `html` is the fragment the page injects into its test-output panel.
/// An unknown challenge id reports `success: false`.
///
/// Rewards and persistence are the page's job: show the congratulations
/// modal when `report.all_passed` is set and store the result with
/// [`merge_progress`].
#[wasm_bindgen]
pub fn run_challenge(challenge_id: &str, source: &str) -> String {
    let Some(challenge) = Challenge::by_id(challenge_id) else {
        let error = HarnessError::UnknownChallenge(challenge_id.to_string());
        return to_json(&json!({
            "success": false,
            "error": error.to_string(),
        }));
    };

    let report = run_tests(&challenge, source, &mut NoopNotifier, &mut NoopStore);
    let html = report.to_html();
    to_json(&json!({
        "success": true,
        "report": report,
        "html": html,
    }))
}

/// List the built-in challenges for page construction.
///
/// Returns a JSON array of `{ id, title, entry_point, points, kind,
/// case_count }` objects, in display order.
#[wasm_bindgen]
pub fn challenge_list() -> String {
    let list: Vec<_> = builtin_challenges()
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "title": c.title,
                "entry_point": c.entry_point,
                "points": c.points,
                "kind": c.kind,
                "case_count": c.cases.len(),
            })
        })
        .collect();
    to_json(&json!(list))
}

/// Merge one completion into a stored progress blob.
///
/// `existing` is the previously stored JSON (pass an empty string when
/// nothing is stored yet); the return value is the new blob to store. A
/// malformed blob is treated as absent rather than losing the new
/// completion.
#[wasm_bindgen]
pub fn merge_progress(existing: &str, challenge_id: &str, completed_at: &str) -> String {
    codefun_harness::merge_completion(existing, challenge_id, completed_at).unwrap_or_else(|_| {
        codefun_harness::merge_completion("", challenge_id, completed_at).unwrap_or_else(|_| {
            format!(
                r#"{{"challenges":{{"{challenge_id}":{{"completed":true,"completedAt":"{completed_at}"}}}}}}"#
            )
        })
    })
}

/// Return the module version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_json(value: &serde_json::Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        format!(r#"{{"success":false,"error":"Serialization error: {e}"}}"#)
    })
}
