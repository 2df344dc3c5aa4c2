//! Test run reports and their HTML rendering.
//!
//! The HTML shape is what the challenge page styles against: a
//! `test-summary` banner followed by one `test-case` div per case, each
//! tagged `test-pass` or `test-fail`.

use crate::challenge::ChallengeKind;
use serde::Serialize;

pub const ALL_PASSED_MESSAGE: &str = "All tests passed! Great job! 🎉";
pub const SOME_FAILED_MESSAGE: &str = "Some tests failed. Keep trying!";

/// Expected-versus-got strings for a failing case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseDetail {
    pub expected: String,
    pub got: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    Passed,
    Failed(CaseDetail),
    /// The submission trapped while this case ran.
    Error { message: String },
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, CaseOutcome::Passed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    /// Human-readable call, e.g. `isEven(2)` or `isPalindrome("hello")`.
    pub label: String,
    #[serde(flatten)]
    pub outcome: CaseOutcome,
}

/// The result of judging one submission against one challenge.
#[derive(Debug, Clone, Serialize)]
pub struct TestReport {
    pub challenge_id: String,
    pub title: String,
    pub points: u32,
    pub kind: ChallengeKind,
    pub cases: Vec<CaseReport>,
    pub passed: usize,
    pub total: usize,
    pub all_passed: bool,
    /// Set when the suite itself could not run, usually because the
    /// submission did not parse. `cases` is empty in that event.
    pub run_error: Option<String>,
}

impl TestReport {
    /// Render the report as the fragment the challenge page injects into
    /// its test-output panel.
    pub fn to_html(&self) -> String {
        if let Some(message) = &self.run_error {
            return format!(
                r#"<div class="test-case test-fail">Error running tests: {}</div>"#,
                escape(message)
            );
        }

        let mut html = String::new();
        if self.all_passed {
            html.push_str(&format!(
                r#"<div class="test-summary test-pass">{ALL_PASSED_MESSAGE}</div>"#
            ));
        } else {
            html.push_str(&format!(
                r#"<div class="test-summary test-fail">{SOME_FAILED_MESSAGE}</div>"#
            ));
        }

        for (index, case) in self.cases.iter().enumerate() {
            let number = index + 1;
            let label = escape(&case.label);
            match &case.outcome {
                CaseOutcome::Passed => {
                    html.push_str(&format!(
                        r#"<div class="test-case test-pass">Test {number}: {label} PASSED ✓</div>"#
                    ));
                }
                CaseOutcome::Failed(detail) => {
                    let expected = escape(&detail.expected);
                    let got = escape(&detail.got);
                    // Sequences get one line per side; scalars fit on one.
                    let detail_html = match self.kind {
                        ChallengeKind::Emission => {
                            format!("<br>Expected: {expected}<br>Got: {got}")
                        }
                        ChallengeKind::Return => {
                            format!("<br>Expected: {expected}, Got: {got}")
                        }
                    };
                    html.push_str(&format!(
                        r#"<div class="test-case test-fail">Test {number}: {label} FAILED ✗{detail_html}</div>"#
                    ));
                }
                CaseOutcome::Error { message } => {
                    let message = escape(message);
                    html.push_str(&format!(
                        r#"<div class="test-case test-fail">Test {number}: Error - {message}</div>"#
                    ));
                }
            }
        }
        html
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
