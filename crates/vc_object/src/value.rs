use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;

use crate::ObjectRef;

// -----------------------------------------------------------------------------
// MapKey

/// Key of a [`Value::Map`] entry.
///
/// Maps accept integer and string keys; JSON object keys are always strings,
/// the map codecs convert between the two.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapKey {
    Int(i64),
    String(String),
}

impl MapKey {
    /// Returns the key as it appears in a JSON object.
    pub fn to_json_key(&self) -> String {
        match self {
            Self::Int(v) => alloc::format!("{v}"),
            Self::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for MapKey {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for MapKey {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for MapKey {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Insertion-ordered map used by [`Value::Map`].
pub type ValueMap = IndexMap<MapKey, Value>;

// -----------------------------------------------------------------------------
// Value

/// An application-side value.
///
/// This is what the codecs produce when reading JSON and consume when writing it.
/// Objects are shared handles, cloning a [`Value::Object`] does not copy the instance.
///
/// # Examples
///
/// ```
/// use vc_object::{MapKey, Value, ValueKind};
///
/// let list = Value::from(vec![Value::from(1), Value::from("a")]);
/// assert_eq!(list.kind(), ValueKind::List);
///
/// let map = Value::map([("a", 1), ("b", 2)]);
/// assert_eq!(map.as_map().unwrap().get(&MapKey::from("b")), Some(&Value::Int(2)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(DateTime<FixedOffset>),
    /// An opaque JSON tree, kept as decoded.
    Json(serde_json::Value),
    List(Vec<Value>),
    Map(ValueMap),
    Object(ObjectRef),
}

/// The kind of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    DateTime,
    Json,
    List,
    Map,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::DateTime => "DateTime",
            Self::Json => "json",
            Self::List => "list",
            Self::Map => "map",
            Self::Object => "object",
        })
    }
}

impl Value {
    /// Builds a [`Value::Map`] from key/value pairs, keeping their order.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<MapKey>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Json(_) => ValueKind::Json,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
            Self::Object(_) => ValueKind::Object,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from {
    ($variant:ident: $($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

impl_from!(Bool: bool);
impl_from!(Int: i64, i32, u32, i16, u16);
impl_from!(Float: f64, f32);
impl_from!(String: String, &str);
impl_from!(DateTime: DateTime<FixedOffset>);
impl_from!(Json: serde_json::Value);
impl_from!(List: Vec<Value>);
impl_from!(Map: ValueMap);
impl_from!(Object: ObjectRef);

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MapKey, Value, ValueKind};

    #[test]
    fn option_converts_to_null() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::String("x".into()));
    }

    #[test]
    fn map_keeps_insertion_order() {
        let map = Value::map([("z", 1), ("a", 2)]);
        let keys: Vec<_> = map.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, [MapKey::from("z"), MapKey::from("a")]);
        assert_eq!(map.kind(), ValueKind::Map);
    }

    #[test]
    fn int_widens_to_float() {
        assert_eq!(Value::Int(3).as_float(), Some(3.0));
        assert_eq!(Value::String("3".into()).as_float(), None);
    }
}
