use alloc::sync::Arc;

use serde_json::Value as JsonValue;
use vc_object::Value;

use super::{TypeAdapter, TypeAdapterFactory, TypeAdapterProvider};
use crate::Result;
use crate::context::{ReaderContext, WriterContext};
use crate::types::{RawType, TypeDescriptor};

/// Codec of `json`: the JSON tree is kept as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonElementAdapter;

impl TypeAdapter for JsonElementAdapter {
    fn read(&self, json: &JsonValue, _ctx: &mut ReaderContext<'_>) -> Result<Value> {
        Ok(match json {
            JsonValue::Null => Value::Null,
            other => Value::Json(other.clone()),
        })
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>) -> Result<JsonValue> {
        match value {
            Value::Null => Ok(JsonValue::Null),
            Value::Json(json) => Ok(json.clone()),
            other => Err(ctx.unsupported("json", other.kind())),
        }
    }
}

/// Creates the [`JsonElementAdapter`] for `json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonElementFactory;

impl TypeAdapterFactory for JsonElementFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        _provider: &TypeAdapterProvider,
    ) -> Result<Option<Arc<dyn TypeAdapter>>> {
        Ok(match ty.raw() {
            RawType::Json => Some(Arc::new(JsonElementAdapter)),
            _ => None,
        })
    }
}
