//! Age prediction payloads

use serde::{Deserialize, Serialize};

pub const AGE_SOURCE: &str = "agify.io";

/// Successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgePrediction {
    pub name: String,
    pub age: u32,
    /// Number of records the estimate is based on
    pub count: u64,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeFailure {
    pub name: String,
    pub error: String,
}

/// Structured payload of the age tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AgeResult {
    #[serde(rename = "age")]
    Age(AgePrediction),
    #[serde(rename = "age_error")]
    Error(AgeFailure),
}

impl AgeResult {
    #[must_use]
    pub fn failure(name: &str, error: impl Into<String>) -> Self {
        Self::Error(AgeFailure {
            name: name.to_string(),
            error: error.into(),
        })
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Age(prediction) => format!(
                "{} is probably around {} years old (based on {} records).",
                prediction.name, prediction.age, prediction.count
            ),
            Self::Error(failure) => failure.error.clone(),
        }
    }
}
