use alloc::string::String;
use core::fmt;

use thiserror::Error;
use vc_object::ObjectError;

use crate::types::TypeParseError;

/// Result type of the mapping engine.
pub type Result<T, E = Error> = core::result::Result<T, E>;

// -----------------------------------------------------------------------------
// Error

/// Errors raised while building a [`Gson`](crate::Gson) or mapping a value.
///
/// A top-level call either succeeds or returns exactly one of these.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The JSON shape does not match the declared type.
    #[error("{message} at {path}")]
    Structural { path: String, message: String },

    #[error(transparent)]
    TypeParse(#[from] TypeParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("class `{0}` was not found")]
    ClassNotFound(String),

    /// A getter or setter could not reach its member.
    #[error("cannot access `{class}::{property}`: {message}")]
    Accessor {
        class: String,
        property: String,
        message: String,
    },

    /// A JSON or application value of the wrong kind was narrowed.
    #[error("{expected} expected but {found} found at {path}")]
    Unsupported {
        path: String,
        expected: String,
        found: String,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Raised by user codecs.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    #[inline]
    pub fn custom(message: impl fmt::Display) -> Self {
        Self::Custom(alloc::format!("{message}"))
    }

    /// A structural error in a type expression, raised when its codec is built.
    pub(crate) fn type_structure(ty: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Structural {
            path: alloc::format!("`{ty}`"),
            message: alloc::format!("{message}"),
        }
    }

    pub(crate) fn accessor(class: &str, property: &str, message: impl fmt::Display) -> Self {
        Self::Accessor {
            class: String::from(class),
            property: String::from(property),
            message: alloc::format!("{message}"),
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Structural { .. } | Self::TypeParse(_) => ErrorKind::Structural,
            Self::Config(_) => ErrorKind::Configuration,
            Self::ClassNotFound(_) => ErrorKind::ClassNotFound,
            Self::Accessor { .. } => ErrorKind::Accessor,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::Json(_) => ErrorKind::Json,
            Self::Custom(_) => ErrorKind::Custom,
        }
    }
}

impl From<ObjectError> for Error {
    fn from(value: ObjectError) -> Self {
        match value {
            ObjectError::ClassNotFound(name) => Self::ClassNotFound(name),
            ObjectError::AbstractClass(name) => Self::Config(alloc::format!(
                "class `{name}` is abstract, register an instance creator for it"
            )),
            ObjectError::MemberNotFound { class, name }
            | ObjectError::MethodNotFound { class, name } => {
                let message = alloc::format!("no such member `{name}`");
                Self::Accessor {
                    class,
                    property: name,
                    message,
                }
            }
            other => Self::Accessor {
                class: String::new(),
                property: String::new(),
                message: alloc::format!("{other}"),
            },
        }
    }
}

// -----------------------------------------------------------------------------
// ErrorKind

/// Classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed type expression or JSON shape.
    Structural,
    /// Missing adapter, handler or directive argument, invalid builder state.
    Configuration,
    ClassNotFound,
    Accessor,
    Unsupported,
    /// Malformed JSON text.
    Json,
    Custom,
}
