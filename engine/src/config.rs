//! Engine configuration.

use crate::builtin::DEFAULT_BIND_PATTERN;
use protoclass_core::{ClassError, ClassResult};
use serde::Deserialize;

/// Settings fixed when a factory is created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Classname of the root class.
    pub root_classname: String,
    /// Classname of classes that do not declare one.
    pub anonymous_classname: String,
    /// Naming convention of the bind mutator.
    pub bind_pattern: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_classname: "Base".to_string(),
            anonymous_classname: "Anonymous".to_string(),
            bind_pattern: DEFAULT_BIND_PATTERN.to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse configuration from JSON. Missing keys take their defaults.
    pub fn from_json(text: &str) -> ClassResult<Self> {
        serde_json::from_str(text).map_err(|e| ClassError::InvalidConfig(e.to_string()))
    }

    pub fn with_root_classname(mut self, name: impl Into<String>) -> Self {
        self.root_classname = name.into();
        self
    }

    pub fn with_anonymous_classname(mut self, name: impl Into<String>) -> Self {
        self.anonymous_classname = name.into();
        self
    }

    pub fn with_bind_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.bind_pattern = pattern.into();
        self
    }
}
