use crate::operation::Pollable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestState {
    Validating,
    Pending,
    Running,
    Finished,
    Error,
    UnsupportedEnvironment,
    IncompatibleEnvironment,
    IncompatibleArchitecture,
    Cancelled,
    Invalid,
    #[default]
    #[serde(rename = "TEST_STATE_UNSPECIFIED", other)]
    Unspecified,
}

impl TestState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TestState::Finished
                | TestState::Error
                | TestState::UnsupportedEnvironment
                | TestState::IncompatibleEnvironment
                | TestState::IncompatibleArchitecture
                | TestState::Cancelled
                | TestState::Invalid
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeSummary {
    Success,
    Failure,
    Inconclusive,
    Skipped,
    #[serde(rename = "OUTCOME_SUMMARY_UNSPECIFIED", other)]
    Unspecified,
}

/// A set of test executions over a matrix of devices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestMatrix {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_matrix_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub state: TestState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_matrix_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_summary: Option<OutcomeSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub test_specification: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub environment_matrix: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub result_storage: Value,
}

impl TestMatrix {
    /// True once the matrix finished and every execution passed.
    pub fn passed(&self) -> bool {
        self.state == TestState::Finished && self.outcome_summary == Some(OutcomeSummary::Success)
    }
}

impl Pollable for TestMatrix {
    fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelTestMatrixResponse {
    #[serde(default)]
    pub test_state: TestState,
}
