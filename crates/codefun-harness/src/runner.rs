//! Judging: run a submission against a challenge's case table.

use crate::challenge::{Challenge, Expected};
use crate::report::{CaseDetail, CaseOutcome, CaseReport, TestReport};
use codefun_eval::{ExecError, Executor, Value};

/// Told exactly once when a run passes every case.
pub trait RewardNotifier {
    fn show_reward(&mut self, challenge: &Challenge);
}

/// Told exactly once when a run passes every case. Implementations own
/// the merge into whatever blob they keep (see [`crate::progress`]).
pub trait ProgressStore {
    fn record_completion(&mut self, challenge_id: &str);
}

pub struct NoopNotifier;

impl RewardNotifier for NoopNotifier {
    fn show_reward(&mut self, _challenge: &Challenge) {}
}

pub struct NoopStore;

impl ProgressStore for NoopStore {
    fn record_completion(&mut self, _challenge_id: &str) {}
}

/// Judge one submission against one challenge.
///
/// Each case runs in a fresh evaluator, so a trap in one case never
/// poisons the next. A submission that does not parse fails the whole
/// run with a single `run_error` instead of one error per case.
pub fn run_tests(
    challenge: &Challenge,
    source: &str,
    notifier: &mut dyn RewardNotifier,
    store: &mut dyn ProgressStore,
) -> TestReport {
    let executor = Executor::new();
    let mut cases = Vec::with_capacity(challenge.cases.len());

    for case in &challenge.cases {
        let label = call_label(challenge.entry_point, &case.input);
        let args = [case.input.clone()];

        let outcome = match &case.expected {
            Expected::Value(expected) => {
                match executor.compile_and_call(source, challenge.entry_point, &args) {
                    Ok(got) => scalar_outcome(expected, &got),
                    Err(ExecError::Parse(message)) => return failed_run(challenge, message),
                    Err(e) => CaseOutcome::Error {
                        message: e.to_string(),
                    },
                }
            }
            Expected::Sequence(expected) => {
                match executor.call_capturing_logs(source, challenge.entry_point, &args) {
                    Ok(got) => sequence_outcome(expected, &got),
                    Err(ExecError::Parse(message)) => return failed_run(challenge, message),
                    Err(e) => CaseOutcome::Error {
                        message: e.to_string(),
                    },
                }
            }
        };

        cases.push(CaseReport { label, outcome });
    }

    let total = cases.len();
    let passed = cases.iter().filter(|c| c.outcome.passed()).count();
    let all_passed = total > 0 && passed == total;

    if all_passed {
        notifier.show_reward(challenge);
        store.record_completion(challenge.id);
    }

    TestReport {
        challenge_id: challenge.id.to_string(),
        title: challenge.title.to_string(),
        points: challenge.points,
        kind: challenge.kind,
        cases,
        passed,
        total,
        all_passed,
        run_error: None,
    }
}

fn scalar_outcome(expected: &Value, got: &Value) -> CaseOutcome {
    if got == expected {
        CaseOutcome::Passed
    } else {
        CaseOutcome::Failed(CaseDetail {
            expected: expected.display_string(),
            got: got.display_string(),
        })
    }
}

/// Sequences compare element-wise on display text, so a logged `4`
/// matches an expected `"4"`.
fn sequence_outcome(expected: &[Value], got: &[Value]) -> CaseOutcome {
    let matched = got.len() == expected.len()
        && got
            .iter()
            .zip(expected)
            .all(|(g, e)| g.display_string() == e.display_string());
    if matched {
        CaseOutcome::Passed
    } else {
        CaseOutcome::Failed(CaseDetail {
            expected: bracketed(expected),
            got: bracketed(got),
        })
    }
}

fn bracketed(values: &[Value]) -> String {
    let inner = values
        .iter()
        .map(Value::display_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{inner}]")
}

/// `isEven(2)`, `isPalindrome("hello")`.
fn call_label(entry_point: &str, input: &Value) -> String {
    match input {
        Value::Str(s) => format!("{entry_point}(\"{s}\")"),
        other => format!("{entry_point}({})", other.display_string()),
    }
}

fn failed_run(challenge: &Challenge, message: String) -> TestReport {
    TestReport {
        challenge_id: challenge.id.to_string(),
        title: challenge.title.to_string(),
        points: challenge.points,
        kind: challenge.kind,
        cases: Vec::new(),
        passed: 0,
        total: 0,
        all_passed: false,
        run_error: Some(message),
    }
}
