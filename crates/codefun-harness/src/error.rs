//! Harness error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("unknown challenge '{0}'")]
    UnknownChallenge(String),

    #[error("progress data is not valid JSON: {0}")]
    Progress(#[from] serde_json::Error),
}
