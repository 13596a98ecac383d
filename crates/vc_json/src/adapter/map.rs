use alloc::string::String;
use alloc::sync::Arc;

use serde_json::{Map, Value as JsonValue};
use vc_object::{MapKey, Value, ValueMap};

use super::{TypeAdapter, TypeAdapterFactory, TypeAdapterProvider};
use crate::context::{ReaderContext, WriterContext, json_kind};
use crate::types::{RawType, TypeDescriptor};
use crate::{Error, Result};

// -----------------------------------------------------------------------------
// Keys

/// The declared key type of a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum KeyKind {
    String,
    Int,
    /// Keys are kept as strings.
    Wildcard,
}

impl KeyKind {
    pub(super) fn from_descriptor(key: &TypeDescriptor, ty: &TypeDescriptor) -> Result<Self> {
        match key.raw() {
            RawType::String => Ok(Self::String),
            RawType::Int => Ok(Self::Int),
            RawType::Wildcard => Ok(Self::Wildcard),
            _ => Err(Error::type_structure(
                ty,
                alloc::format!("map keys must be string, int or ?, not {key}"),
            )),
        }
    }
}

pub(super) fn read_entries(
    key: KeyKind,
    value: &dyn TypeAdapter,
    entries: &Map<String, JsonValue>,
    ctx: &mut ReaderContext<'_>,
) -> Result<Value> {
    let mut map = ValueMap::with_capacity(entries.len());
    for (name, item) in entries {
        let map_key = match key {
            KeyKind::Int => match name.parse::<i64>() {
                Ok(v) => MapKey::Int(v),
                Err(_) => {
                    return Err(ctx.with_key(name, |ctx| {
                        ctx.structural(alloc::format!("int key expected but `{name}` found"))
                    }));
                }
            },
            KeyKind::String | KeyKind::Wildcard => MapKey::String(name.clone()),
        };
        let item = ctx.with_key(name, |ctx| value.read(item, ctx))?;
        map.insert(map_key, item);
    }
    Ok(Value::Map(map))
}

pub(super) fn write_entries(
    value: &dyn TypeAdapter,
    entries: &ValueMap,
    ctx: &mut WriterContext<'_>,
) -> Result<JsonValue> {
    let mut object = Map::with_capacity(entries.len());
    for (key, item) in entries {
        let name = key.to_json_key();
        let item = ctx.with_key(&name, |ctx| value.write(item, ctx))?;
        object.insert(name, item);
    }
    Ok(JsonValue::Object(object))
}

// -----------------------------------------------------------------------------
// MapAdapter

/// Codec of `map<V>` and `map<K,V>`: JSON objects only.
struct MapAdapter {
    key: KeyKind,
    value: Arc<dyn TypeAdapter>,
}

impl TypeAdapter for MapAdapter {
    fn read(&self, json: &JsonValue, ctx: &mut ReaderContext<'_>) -> Result<Value> {
        match json {
            JsonValue::Null => Ok(Value::Null),
            JsonValue::Object(entries) => read_entries(self.key, &*self.value, entries, ctx),
            other => Err(ctx.structural(alloc::format!(
                "map expected but {} found",
                json_kind(other)
            ))),
        }
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>) -> Result<JsonValue> {
        match value {
            Value::Null => Ok(JsonValue::Null),
            Value::Map(entries) => write_entries(&*self.value, entries, ctx),
            other => Err(ctx.unsupported("map", other.kind())),
        }
    }
}

/// Creates codecs of `map`, `map<V>` and `map<K,V>`.
///
/// A single parameter is the value type with string keys. `K` must be
/// `string`, `int` or `?`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapFactory;

impl TypeAdapterFactory for MapFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        provider: &TypeAdapterProvider,
    ) -> Result<Option<Arc<dyn TypeAdapter>>> {
        if *ty.raw() != RawType::Map {
            return Ok(None);
        }
        let (key, value) = match ty.generics() {
            [] => (KeyKind::Wildcard, TypeDescriptor::wildcard()),
            [value] => (KeyKind::String, value.clone()),
            [key, value] => (KeyKind::from_descriptor(key, ty)?, value.clone()),
            _ => {
                return Err(Error::type_structure(
                    ty,
                    "map takes at most two generic parameters",
                ));
            }
        };
        let value = provider.get_adapter(&value)?;
        Ok(Some(Arc::new(MapAdapter { key, value })))
    }
}
