//! The challenge harness: the catalog of built-in challenges, the test
//! runner that judges a submission against one of them, HTML report
//! rendering, and completion tracking.
//!
//! The harness never parses or evaluates code itself; everything flows
//! through [`codefun_eval::Executor`]. Rewards and persistence are
//! injected through the [`RewardNotifier`] and [`ProgressStore`] traits
//! so the runner stays independent of the host page.

pub mod challenge;
pub mod error;
pub mod progress;
pub mod report;
pub mod runner;

pub use challenge::{builtin_challenges, Challenge, ChallengeKind, Expected, TestCase};
pub use error::HarnessError;
pub use progress::{merge_completion, ProgressEntry, ProgressMap};
pub use report::{
    CaseDetail, CaseOutcome, CaseReport, TestReport, ALL_PASSED_MESSAGE, SOME_FAILED_MESSAGE,
};
pub use runner::{run_tests, NoopNotifier, NoopStore, ProgressStore, RewardNotifier};
