//! Error types for class creation and instance operations.

use thiserror::Error;

/// Errors raised by the class engine.
///
/// All of these are raised synchronously at the point of violation and are
/// never recovered internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassError {
    /// Attempt to instantiate a class marked abstract.
    #[error("Cannot instantiate abstract class {class}")]
    AbstractInstantiation { class: String },

    /// Attempt to extend a class marked final.
    #[error("Class {class} cannot extend final class {parent}")]
    FinalExtension { class: String, parent: String },

    /// A cross-class method dispatch named a method that neither the
    /// prototype nor any mutator provides.
    #[error("Method not found: {class}::{method}")]
    MethodNotFound { class: String, method: String },

    /// A mutator was declared under a reserved key.
    #[error("Mutator name collides with reserved key: {0}")]
    ReservedMutatorName(String),

    /// A reserved key was given a value of the wrong shape.
    #[error("Reserved key {key} expects {expected}")]
    InvalidReserved { key: String, expected: String },

    /// A member resolved for a call is not a function.
    #[error("Not callable: {name}")]
    NotCallable { name: String },

    /// A receiver-dependent operation got a receiver that is neither an
    /// instance nor a class.
    #[error("{operation} requires an object receiver")]
    NotAnObject { operation: String },

    /// A dynamic method received arguments of the wrong shape.
    #[error("Invalid argument to {method}: {reason}")]
    InvalidArgument { method: String, reason: String },

    /// The bind naming pattern does not compile.
    #[error("Invalid bind pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Configuration text could not be parsed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure raised by user code.
    #[error("{0}")]
    Thrown(String),
}

impl ClassError {
    /// Failure raised from a constructor, destructor or method body.
    pub fn thrown(message: impl Into<String>) -> Self {
        ClassError::Thrown(message.into())
    }

    pub fn invalid_argument(method: impl Into<String>, reason: impl Into<String>) -> Self {
        ClassError::InvalidArgument {
            method: method.into(),
            reason: reason.into(),
        }
    }

    pub fn method_not_found(class: impl Into<String>, method: impl Into<String>) -> Self {
        ClassError::MethodNotFound {
            class: class.into(),
            method: method.into(),
        }
    }
}

/// Result type for class engine operations.
pub type ClassResult<T> = Result<T, ClassError>;
