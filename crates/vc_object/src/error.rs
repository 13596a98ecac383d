use alloc::string::String;

use thiserror::Error;

use crate::Visibility;

// -----------------------------------------------------------------------------
// ObjectError

/// Errors raised by class declarations and instances.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ObjectError {
    #[error("class `{0}` was not found")]
    ClassNotFound(String),

    #[error("class `{class}` has no property `{name}`")]
    MemberNotFound { class: String, name: String },

    #[error("class `{class}` has no method `{name}`")]
    MethodNotFound { class: String, name: String },

    #[error("{visibility} member `{class}::{name}` is not accessible from this scope")]
    Inaccessible {
        class: String,
        name: String,
        visibility: Visibility,
    },

    #[error("class `{0}` is abstract and cannot be instantiated")]
    AbstractClass(String),

    #[error("invalid argument for `{class}::{name}`: {message}")]
    InvalidArgument {
        class: String,
        name: String,
        message: String,
    },
}
