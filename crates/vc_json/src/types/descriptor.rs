use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use vc_object::{ClassName, Value};

use super::TypeParseError;

// -----------------------------------------------------------------------------
// RawType

/// The raw part of a [`TypeDescriptor`], without generic parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawType {
    Null,
    Bool,
    Int,
    Float,
    String,
    DateTime,
    /// An opaque JSON tree.
    Json,
    /// Loose collection: JSON arrays and objects are both accepted.
    Array,
    List,
    Map,
    /// Resolved at runtime from the value or the JSON shape.
    Wildcard,
    Class(ClassName),
}

impl RawType {
    /// Returns the canonical name used in type expressions.
    pub fn name(&self) -> &str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::DateTime => "DateTime",
            Self::Json => "json",
            Self::Array => "array",
            Self::List => "list",
            Self::Map => "map",
            Self::Wildcard => "?",
            Self::Class(name) => name,
        }
    }

    /// Resolves a keyword, anything else is a class name.
    pub(super) fn from_ident(ident: &str) -> Self {
        match ident {
            "null" => Self::Null,
            "bool" | "boolean" => Self::Bool,
            "int" | "integer" => Self::Int,
            "float" | "double" => Self::Float,
            "string" => Self::String,
            "DateTime" | "datetime" => Self::DateTime,
            "json" => Self::Json,
            "array" => Self::Array,
            "list" => Self::List,
            "map" => Self::Map,
            "mixed" => Self::Wildcard,
            _ => Self::Class(ident.into()),
        }
    }

    /// Returns `true` for raw types that never take generic parameters.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Array | Self::List | Self::Map | Self::Class(_))
    }
}

impl fmt::Display for RawType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// TypeDescriptor

/// An immutable, resolved type: a raw type and its generic parameters.
///
/// Equality is structural. The [`Display`](fmt::Display) form is canonical
/// (keywords normalized, no whitespace) and is used as a memoization key.
///
/// # Examples
///
/// ```
/// use vc_json::types::{RawType, TypeDescriptor};
///
/// let ty = TypeDescriptor::parse("map< integer , list<User> >").unwrap();
/// assert_eq!(ty.raw(), &RawType::Map);
/// assert_eq!(ty.generics().len(), 2);
/// assert_eq!(ty.to_string(), "map<int,list<User>>");
///
/// assert_eq!(ty, TypeDescriptor::parse("map<int,list<User>>").unwrap());
/// assert!(TypeDescriptor::parse("list<int").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    raw: RawType,
    generics: Arc<[TypeDescriptor]>,
}

impl TypeDescriptor {
    /// Creates a descriptor from its parts.
    #[inline]
    pub fn new(raw: RawType, generics: Vec<TypeDescriptor>) -> Self {
        Self {
            raw,
            generics: generics.into(),
        }
    }

    /// Creates a descriptor without generic parameters.
    #[inline]
    pub fn of(raw: RawType) -> Self {
        Self::new(raw, Vec::new())
    }

    #[inline]
    pub fn wildcard() -> Self {
        Self::of(RawType::Wildcard)
    }

    #[inline]
    pub fn class(name: impl Into<ClassName>) -> Self {
        Self::of(RawType::Class(name.into()))
    }

    #[inline]
    pub fn list_of(element: TypeDescriptor) -> Self {
        Self::new(RawType::List, alloc::vec![element])
    }

    #[inline]
    pub fn map_of(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::new(RawType::Map, alloc::vec![key, value])
    }

    /// Parses a type expression.
    ///
    /// See the [module documentation](super) for the grammar.
    #[inline]
    pub fn parse(expr: &str) -> Result<Self, TypeParseError> {
        super::parser::parse(expr)
    }

    /// Derives a descriptor from a live value.
    ///
    /// Collections are described without generic parameters, so their
    /// elements are dispatched on their own runtime type.
    pub fn from_value(value: &Value) -> Self {
        let raw = match value {
            Value::Null => RawType::Null,
            Value::Bool(_) => RawType::Bool,
            Value::Int(_) => RawType::Int,
            Value::Float(_) => RawType::Float,
            Value::String(_) => RawType::String,
            Value::DateTime(_) => RawType::DateTime,
            Value::Json(_) => RawType::Json,
            Value::List(_) => RawType::List,
            Value::Map(_) => RawType::Map,
            Value::Object(object) => RawType::Class(object.class_name()),
        };
        Self::of(raw)
    }

    #[inline]
    pub fn raw(&self) -> &RawType {
        &self.raw
    }

    #[inline]
    pub fn generics(&self) -> &[TypeDescriptor] {
        &self.generics
    }

    #[inline]
    pub fn generic(&self, index: usize) -> Option<&TypeDescriptor> {
        self.generics.get(index)
    }

    /// Returns the class name of an object descriptor.
    #[inline]
    pub fn class_name(&self) -> Option<&ClassName> {
        match &self.raw {
            RawType::Class(name) => Some(name),
            _ => None,
        }
    }

    /// `null`, `bool`, `int`, `float` or `string`.
    #[inline]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self.raw,
            RawType::Null | RawType::Bool | RawType::Int | RawType::Float | RawType::String
        )
    }

    /// `array`, `list` or `map`.
    #[inline]
    pub fn is_array_like(&self) -> bool {
        matches!(self.raw, RawType::Array | RawType::List | RawType::Map)
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self.raw, RawType::Class(_))
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        matches!(self.raw, RawType::Wildcard)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw.name())?;
        if let Some((first, rest)) = self.generics.split_first() {
            write!(f, "<{first}")?;
            for generic in rest {
                write!(f, ",{generic}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl From<RawType> for TypeDescriptor {
    #[inline]
    fn from(raw: RawType) -> Self {
        Self::of(raw)
    }
}

#[cfg(test)]
mod tests {
    use vc_object::{ClassDef, Value};

    use super::{RawType, TypeDescriptor};

    #[test]
    fn from_value_uses_runtime_class() {
        let class = ClassDef::builder("Point").build();
        let object = class.new_object().unwrap();

        let ty = TypeDescriptor::from_value(&Value::Object(object));
        assert_eq!(ty, TypeDescriptor::class("Point"));
        assert!(ty.is_object());

        let ty = TypeDescriptor::from_value(&Value::from(vec![Value::Int(1)]));
        assert_eq!(ty.raw(), &RawType::List);
        assert!(ty.generics().is_empty());
    }

    #[test]
    fn classification() {
        assert!(TypeDescriptor::of(RawType::Int).is_scalar());
        assert!(!TypeDescriptor::of(RawType::DateTime).is_scalar());
        assert!(TypeDescriptor::of(RawType::Array).is_array_like());
        assert!(TypeDescriptor::wildcard().is_wildcard());
    }
}
