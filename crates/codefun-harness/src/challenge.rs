//! The built-in challenge catalog.
//!
//! Each challenge names the entry point a submission must define, how the
//! submission is judged, and the fixed table of test cases. The catalog is
//! data, not configuration: the site ships exactly these challenges.

use codefun_eval::Value;
use serde::Serialize;

/// How a challenge's entry point is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    /// The entry point is called once per case and its return value is
    /// compared strictly against the expected value.
    Return,
    /// The entry point is called once per case and the sequence of values
    /// it logs is compared element-wise against the expected sequence,
    /// textually, so a logged `4` matches an expected `"4"`.
    Emission,
}

/// What a test case expects.
#[derive(Debug, Clone)]
pub enum Expected {
    Value(Value),
    Sequence(Vec<Value>),
}

#[derive(Debug, Clone)]
pub struct TestCase {
    pub input: Value,
    pub expected: Expected,
}

#[derive(Debug, Clone)]
pub struct Challenge {
    pub id: &'static str,
    pub title: &'static str,
    /// Function the submission must define.
    pub entry_point: &'static str,
    /// Points awarded on a fully passing run.
    pub points: u32,
    pub kind: ChallengeKind,
    pub cases: Vec<TestCase>,
}

impl Challenge {
    /// Look up a challenge by id.
    pub fn by_id(id: &str) -> Option<Challenge> {
        builtin_challenges().into_iter().find(|c| c.id == id)
    }
}

fn returns(input: impl Into<Value>, expected: impl Into<Value>) -> TestCase {
    TestCase {
        input: input.into(),
        expected: Expected::Value(expected.into()),
    }
}

fn emits(input: impl Into<Value>, expected: Vec<Value>) -> TestCase {
    TestCase {
        input: input.into(),
        expected: Expected::Sequence(expected),
    }
}

/// The full catalog, in display order.
pub fn builtin_challenges() -> Vec<Challenge> {
    vec![
        Challenge {
            id: "puzzle-1",
            title: "Even or Odd",
            entry_point: "isEven",
            points: 100,
            kind: ChallengeKind::Return,
            cases: vec![
                returns(2.0, true),
                returns(4.0, true),
                returns(7.0, false),
                returns(0.0, true),
                returns(-1.0, false),
                returns(-4.0, true),
            ],
        },
        Challenge {
            id: "puzzle-2",
            title: "FizzBuzz",
            entry_point: "fizzBuzz",
            points: 150,
            kind: ChallengeKind::Emission,
            cases: vec![emits(
                15.0,
                vec![
                    1.0.into(),
                    2.0.into(),
                    "Fizz".into(),
                    4.0.into(),
                    "Buzz".into(),
                    "Fizz".into(),
                    7.0.into(),
                    8.0.into(),
                    "Fizz".into(),
                    "Buzz".into(),
                    11.0.into(),
                    "Fizz".into(),
                    13.0.into(),
                    14.0.into(),
                    "FizzBuzz".into(),
                ],
            )],
        },
        Challenge {
            id: "puzzle-3",
            title: "Palindrome Checker",
            entry_point: "isPalindrome",
            points: 200,
            kind: ChallengeKind::Return,
            cases: vec![
                returns("racecar", true),
                returns("hello", false),
                returns("A man, a plan, a canal, Panama", true),
                returns("Was it a car or a cat I saw?", true),
                returns("No lemon, no melon", true),
                returns("coding is fun", false),
            ],
        },
    ]
}
