use alloc::sync::Arc;

use serde_json::Value as JsonValue;
use vc_object::Value;

use super::list::{read_items, write_items};
use super::map::{KeyKind, read_entries, write_entries};
use super::{TypeAdapter, TypeAdapterFactory, TypeAdapterProvider};
use crate::context::{ReaderContext, WriterContext, json_kind};
use crate::types::{RawType, TypeDescriptor};
use crate::{Error, Result};

/// Loose codec of `array`: JSON arrays become lists, JSON objects maps.
struct ArrayAdapter {
    key: KeyKind,
    value: Arc<dyn TypeAdapter>,
}

impl TypeAdapter for ArrayAdapter {
    fn read(&self, json: &JsonValue, ctx: &mut ReaderContext<'_>) -> Result<Value> {
        match json {
            JsonValue::Null => Ok(Value::Null),
            JsonValue::Array(items) => read_items(&*self.value, items, ctx),
            JsonValue::Object(entries) => read_entries(self.key, &*self.value, entries, ctx),
            other => Err(ctx.structural(alloc::format!(
                "array expected but {} found",
                json_kind(other)
            ))),
        }
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>) -> Result<JsonValue> {
        match value {
            Value::Null => Ok(JsonValue::Null),
            Value::List(items) => write_items(&*self.value, items, ctx),
            Value::Map(entries) => write_entries(&*self.value, entries, ctx),
            other => Err(ctx.unsupported("array", other.kind())),
        }
    }
}

/// Creates codecs of `array`, `array<V>` and `array<K,V>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArrayFactory;

impl TypeAdapterFactory for ArrayFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        provider: &TypeAdapterProvider,
    ) -> Result<Option<Arc<dyn TypeAdapter>>> {
        if *ty.raw() != RawType::Array {
            return Ok(None);
        }
        let (key, value) = match ty.generics() {
            [] => (KeyKind::Wildcard, TypeDescriptor::wildcard()),
            [value] => (KeyKind::Wildcard, value.clone()),
            [key, value] => (KeyKind::from_descriptor(key, ty)?, value.clone()),
            _ => {
                return Err(Error::type_structure(
                    ty,
                    "array takes at most two generic parameters",
                ));
            }
        };
        let value = provider.get_adapter(&value)?;
        Ok(Some(Arc::new(ArrayAdapter { key, value })))
    }
}
