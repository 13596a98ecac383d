use alloc::sync::Arc;

use serde_json::Value as JsonValue;
use vc_object::{MapKey, Value, ValueMap};

use super::{TypeAdapter, TypeAdapterFactory, TypeAdapterProvider};
use crate::Result;
use crate::context::{ReaderContext, WriterContext};
use crate::types::{RawType, TypeDescriptor};

/// Codec of `?`.
///
/// Writing dispatches on the runtime type of the value. Reading infers the
/// value from the JSON shape: numbers become `Int` when they fit an `i64`,
/// arrays lists and objects maps with string keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct WildcardAdapter;

fn infer(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(v) => Value::Int(v),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::List(items.iter().map(infer).collect()),
        JsonValue::Object(entries) => Value::Map(
            entries
                .iter()
                .map(|(name, item)| (MapKey::String(name.clone()), infer(item)))
                .collect::<ValueMap>(),
        ),
    }
}

impl TypeAdapter for WildcardAdapter {
    fn read(&self, json: &JsonValue, _ctx: &mut ReaderContext<'_>) -> Result<Value> {
        Ok(infer(json))
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>) -> Result<JsonValue> {
        if value.is_null() {
            return Ok(JsonValue::Null);
        }
        let adapter = ctx.provider().get_adapter(&TypeDescriptor::from_value(value))?;
        adapter.write(value, ctx)
    }
}

/// Creates the [`WildcardAdapter`] for `?`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WildcardFactory;

impl TypeAdapterFactory for WildcardFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        _provider: &TypeAdapterProvider,
    ) -> Result<Option<Arc<dyn TypeAdapter>>> {
        Ok(match ty.raw() {
            RawType::Wildcard => Some(Arc::new(WildcardAdapter)),
            _ => None,
        })
    }
}
