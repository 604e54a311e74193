use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::SubmissionResponse;

/// Decides whether a 2xx submission response means the application went through.
pub trait SuccessPolicy: Send + Sync {
    fn is_success(&self, response: &SubmissionResponse) -> bool;

    fn describe(&self) -> String;
}

/// Any 2xx response counts as applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusOk;

impl SuccessPolicy for StatusOk {
    fn is_success(&self, response: &SubmissionResponse) -> bool {
        (200..300).contains(&response.status)
    }

    fn describe(&self) -> String {
        "any 2xx response".to_string()
    }
}

/// A string field of the JSON body must equal an expected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEquals {
    pub field: String,
    pub expected: String,
}

impl FieldEquals {
    pub fn new(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
        }
    }
}

impl Default for FieldEquals {
    /// What the apply endpoint reports in `result` when the form was submitted.
    fn default() -> Self {
        Self::new("result", "Application successful")
    }
}

impl SuccessPolicy for FieldEquals {
    fn is_success(&self, response: &SubmissionResponse) -> bool {
        response.field_str(&self.field) == Some(self.expected.as_str())
    }

    fn describe(&self) -> String {
        format!("{} == {:?}", self.field, self.expected)
    }
}

/// A boolean field of the JSON body must be `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTrue {
    pub field: String,
}

impl SuccessPolicy for FieldTrue {
    fn is_success(&self, response: &SubmissionResponse) -> bool {
        response
            .body
            .get(&self.field)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }

    fn describe(&self) -> String {
        format!("{} is true", self.field)
    }
}

/// Config-file selection of a [`SuccessPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuccessRule {
    StatusOk,
    FieldEquals { field: String, expected: String },
    FieldTrue { field: String },
}

impl Default for SuccessRule {
    fn default() -> Self {
        let FieldEquals { field, expected } = FieldEquals::default();
        SuccessRule::FieldEquals { field, expected }
    }
}

impl SuccessRule {
    pub fn into_policy(self) -> Arc<dyn SuccessPolicy> {
        match self {
            SuccessRule::StatusOk => Arc::new(StatusOk),
            SuccessRule::FieldEquals { field, expected } => {
                Arc::new(FieldEquals { field, expected })
            }
            SuccessRule::FieldTrue { field } => Arc::new(FieldTrue { field }),
        }
    }
}
