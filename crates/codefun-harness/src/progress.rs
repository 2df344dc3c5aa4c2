//! Completion tracking.
//!
//! Progress lives wherever the host keeps it (the site uses browser local
//! storage), so this module only defines the serialized shape and the
//! read-merge-write step: never overwrite the stored blob wholesale,
//! always merge one completion into whatever is already there.

use crate::error::HarnessError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub completed: bool,
    #[serde(rename = "completedAt")]
    pub completed_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressMap {
    #[serde(default)]
    pub challenges: BTreeMap<String, ProgressEntry>,
}

impl ProgressMap {
    /// Parse stored progress. An empty or whitespace-only blob is an
    /// absent store, not an error.
    pub fn from_json(json: &str) -> Result<Self, HarnessError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_completed(&self, challenge_id: &str) -> bool {
        self.challenges
            .get(challenge_id)
            .is_some_and(|entry| entry.completed)
    }

    /// Mark a challenge completed at the given timestamp. Re-completing
    /// refreshes the timestamp.
    pub fn record_completion(&mut self, challenge_id: &str, completed_at: &str) {
        self.challenges.insert(
            challenge_id.to_string(),
            ProgressEntry {
                completed: true,
                completed_at: completed_at.to_string(),
            },
        );
    }
}

/// The read-merge-write step as one call: parse `existing`, record the
/// completion, and serialize the result.
pub fn merge_completion(
    existing: &str,
    challenge_id: &str,
    completed_at: &str,
) -> Result<String, HarnessError> {
    let mut map = ProgressMap::from_json(existing)?;
    map.record_completion(challenge_id, completed_at);
    map.to_json()
}
