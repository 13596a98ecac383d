//! Per-call state threaded through the codecs.
//!
//! A context is created for each top-level call and dropped when it returns.
//! It carries the provider (so codecs can resolve nested types lazily), the
//! excluder, the immutable options, the caller's attributes and the path
//! of the value currently being mapped.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde_json::Value as JsonValue;

use crate::Error;
use crate::adapter::TypeAdapterProvider;
use crate::exclusion::Excluder;

/// Caller-supplied data available to runtime exclusion strategies and codecs.
pub type Attributes = hashbrown::HashMap<String, JsonValue>;

/// The default [`CodecOptions::date_format`], RFC 3339 with a numeric offset.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

// -----------------------------------------------------------------------------
// CodecOptions

/// Options fixed when the [`Gson`](crate::Gson) is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Write `null` for null properties instead of omitting them.
    pub serialize_null: bool,
    /// `chrono` format string of the date-time codec.
    pub date_format: String,
    /// Route scalar properties through the scalar codecs. When disabled the
    /// reflection codec converts them inline.
    pub enable_scalar_adapters: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            serialize_null: false,
            date_format: String::from(DEFAULT_DATE_FORMAT),
            enable_scalar_adapters: true,
        }
    }
}

// -----------------------------------------------------------------------------
// JsonPath

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Location of the value being mapped, displayed as `$.items[2].name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath {
    segments: Vec<Segment>,
}

impl JsonPath {
    #[inline]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[inline]
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(Segment::Key(key.into()));
    }

    #[inline]
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    #[inline]
    pub fn pop(&mut self) {
        self.segments.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Returns the JSON kind name used in error messages.
pub fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => "int",
        JsonValue::Number(_) => "float",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

// -----------------------------------------------------------------------------
// Contexts

macro_rules! impl_context {
    ($ty:ident) => {
        impl<'a> $ty<'a> {
            #[inline]
            pub fn provider(&self) -> &'a TypeAdapterProvider {
                self.provider
            }

            #[inline]
            pub fn excluder(&self) -> &'a Excluder {
                self.excluder
            }

            #[inline]
            pub fn options(&self) -> &'a CodecOptions {
                self.options
            }

            #[inline]
            pub fn attributes(&self) -> &Attributes {
                &self.attributes
            }

            #[inline]
            pub fn path(&self) -> &JsonPath {
                &self.path
            }

            /// Runs `f` with `key` appended to the path.
            pub fn with_key<T>(&mut self, key: &str, f: impl FnOnce(&mut Self) -> T) -> T {
                self.path.push_key(key);
                let result = f(self);
                self.path.pop();
                result
            }

            /// Runs `f` with `index` appended to the path.
            pub fn with_index<T>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> T) -> T {
                self.path.push_index(index);
                let result = f(self);
                self.path.pop();
                result
            }

            /// A structural error at the current path.
            pub fn structural(&self, message: impl fmt::Display) -> Error {
                Error::Structural {
                    path: alloc::format!("{}", self.path),
                    message: alloc::format!("{message}"),
                }
            }

            /// A kind mismatch at the current path.
            pub fn unsupported(&self, expected: impl fmt::Display, found: impl fmt::Display) -> Error {
                Error::Unsupported {
                    path: alloc::format!("{}", self.path),
                    expected: alloc::format!("{expected}"),
                    found: alloc::format!("{found}"),
                }
            }
        }
    };
}

/// State of one deserialization call.
pub struct ReaderContext<'a> {
    provider: &'a TypeAdapterProvider,
    excluder: &'a Excluder,
    options: &'a CodecOptions,
    attributes: Attributes,
    uses_existing_object: bool,
    path: JsonPath,
}

impl<'a> ReaderContext<'a> {
    pub fn new(
        provider: &'a TypeAdapterProvider,
        excluder: &'a Excluder,
        options: &'a CodecOptions,
        attributes: Attributes,
    ) -> Self {
        Self {
            provider,
            excluder,
            options,
            attributes,
            uses_existing_object: false,
            path: JsonPath::new(),
        }
    }

    /// Populate object-typed properties in place when they already hold an object.
    #[inline]
    pub fn with_existing_objects(mut self, enabled: bool) -> Self {
        self.uses_existing_object = enabled;
        self
    }

    #[inline]
    pub fn uses_existing_object(&self) -> bool {
        self.uses_existing_object
    }
}

impl_context!(ReaderContext);

/// State of one serialization call.
pub struct WriterContext<'a> {
    provider: &'a TypeAdapterProvider,
    excluder: &'a Excluder,
    options: &'a CodecOptions,
    attributes: Attributes,
    path: JsonPath,
}

impl<'a> WriterContext<'a> {
    pub fn new(
        provider: &'a TypeAdapterProvider,
        excluder: &'a Excluder,
        options: &'a CodecOptions,
        attributes: Attributes,
    ) -> Self {
        Self {
            provider,
            excluder,
            options,
            attributes,
            path: JsonPath::new(),
        }
    }
}

impl_context!(WriterContext);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{JsonPath, json_kind};

    #[test]
    fn path_display() {
        let mut path = JsonPath::new();
        assert_eq!(path.to_string(), "$");
        path.push_key("items");
        path.push_index(2);
        path.push_key("name");
        assert_eq!(path.to_string(), "$.items[2].name");
        path.pop();
        path.pop();
        assert_eq!(path.to_string(), "$.items");
        assert_eq!(path.depth(), 1);
    }

    #[test]
    fn kinds() {
        assert_eq!(json_kind(&json!(1)), "int");
        assert_eq!(json_kind(&json!(1.5)), "float");
        assert_eq!(json_kind(&json!([])), "array");
        assert_eq!(json_kind(&json!({})), "object");
    }
}
