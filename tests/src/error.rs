//! Errors raised while running a scenario.

use protoclass_core::ClassError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("[{scenario}] class '{alias}' could not be created: {source}")]
    Setup {
        scenario: String,
        alias: String,
        #[source]
        source: ClassError,
    },

    #[error("step '{step}' failed: {message}")]
    AssertionFailed { step: String, message: String },
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;

impl ScenarioError {
    pub fn setup(scenario: &str, alias: &str, source: ClassError) -> Self {
        Self::Setup {
            scenario: scenario.to_string(),
            alias: alias.to_string(),
            source,
        }
    }

    pub fn assertion_failed(step: &str, message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            step: step.to_string(),
            message: message.into(),
        }
    }
}
