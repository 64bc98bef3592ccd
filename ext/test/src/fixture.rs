//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the keyexpr engine.
//!
//! ```yaml
//! name: precedence
//! description: first satisfied OR-segment wins
//! state: [a, b]
//! cases:
//!   - name: left wins
//!     expression: "a|b"
//!     expect: [a]
//!   - name: missing operand
//!     expression: "a&b"
//!     state: [a]
//!     error: NoKeysMatched
//! ```

use keyexpr::{ExpressionError, KeyMatcher, StateConfig};
use serde::Deserialize;
use std::fmt;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Key set shared by every case unless the case overrides it.
    #[serde(default)]
    pub state: StateConfig,
    pub cases: Vec<TestCase>,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub expression: String,
    /// Per-case key set, replacing the fixture's.
    #[serde(default)]
    pub state: Option<StateConfig>,
    #[serde(flatten)]
    pub expect: Outcome,
}

/// What a case expects, or what it produced.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum Outcome {
    /// Matched keys, in order.
    #[serde(rename = "expect")]
    Matched(Vec<String>),
    /// An error kind name, e.g. `NoKeysMatched`.
    #[serde(rename = "error")]
    Error(String),
}

impl From<Result<Vec<String>, ExpressionError>> for Outcome {
    fn from(result: Result<Vec<String>, ExpressionError>) -> Self {
        match result {
            Ok(keys) => Self::Matched(keys),
            Err(e) => Self::Error(e.kind().to_string()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched(keys) => write!(f, "[{}]", keys.join(", ")),
            Self::Error(kind) => write!(f, "error {kind}"),
        }
    }
}

impl TestCase {
    /// Evaluate this case against the given fixture-level state.
    pub fn evaluate(&self, fixture_state: &StateConfig) -> Outcome {
        let state = self.state.as_ref().unwrap_or(fixture_state);
        KeyMatcher::new(state)
            .and_then(|matcher| matcher.evaluate(&self.expression))
            .into()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: Outcome,
    pub actual: Outcome,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run all test cases and return results
    pub fn run(&self) -> Vec<CaseResult> {
        self.cases
            .iter()
            .map(|case| {
                let actual = case.evaluate(&self.state);
                CaseResult {
                    case_name: case.name.clone(),
                    passed: actual == case.expect,
                    expected: case.expect.clone(),
                    actual,
                }
            })
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        for result in self.run() {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {}, got {}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
name: basics
description: precedence and AND semantics
state: [a, b]
cases:
  - name: left wins
    expression: "a|b"
    expect: [a]
  - name: missing operand
    expression: "a&b"
    state: [a]
    error: NoKeysMatched
"#;

    #[test]
    fn parses_expect_and_error_cases() {
        let fixture = Fixture::from_yaml(FIXTURE).unwrap();
        assert_eq!(fixture.cases.len(), 2);
        assert_eq!(fixture.cases[0].expect, Outcome::Matched(vec!["a".into()]));
        assert_eq!(
            fixture.cases[1].expect,
            Outcome::Error("NoKeysMatched".into())
        );
        assert!(fixture.cases[1].state.is_some());
    }

    #[test]
    fn runs_all_cases() {
        let fixture = Fixture::from_yaml(FIXTURE).unwrap();
        let results = fixture.run();
        assert!(results.iter().all(|r| r.passed), "{results:?}");
    }

    #[test]
    fn reports_failures() {
        let yaml = r#"
name: wrong
state: [a, b]
cases:
  - name: expects right segment
    expression: "a|b"
    expect: [b]
"#;
        let fixture = Fixture::from_yaml(yaml).unwrap();
        let results = fixture.run();
        assert!(!results[0].passed);
        assert_eq!(results[0].actual, Outcome::Matched(vec!["a".into()]));
    }

    #[test]
    fn case_without_outcome_is_rejected() {
        let yaml = r#"
name: incomplete
cases:
  - name: nothing expected
    expression: "a"
"#;
        assert!(Fixture::from_yaml(yaml).is_err());
    }

    #[test]
    fn multi_document() {
        let yaml = format!("{FIXTURE}\n---\n{FIXTURE}");
        assert_eq!(Fixture::from_yaml_multi(&yaml).unwrap().len(), 2);
    }

    #[test]
    fn outcome_display() {
        assert_eq!(
            Outcome::Matched(vec!["x".into(), "b".into()]).to_string(),
            "[x, b]"
        );
        assert_eq!(
            Outcome::Error("EmptyExpression".into()).to_string(),
            "error EmptyExpression"
        );
    }
}
