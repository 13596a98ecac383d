use alloc::sync::Arc;

use serde_json::{Number, Value as JsonValue};
use vc_object::Value;

use super::{TypeAdapter, TypeAdapterFactory, TypeAdapterProvider};
use crate::Result;
use crate::context::{ReaderContext, WriterContext, json_kind};
use crate::types::{RawType, TypeDescriptor};

// -----------------------------------------------------------------------------
// Conversions

/// Narrows a non-null JSON scalar to `raw`, or returns the expected kind.
///
/// Shared with the reflection codec, which converts scalar properties inline
/// when scalar adapters are disabled.
pub(crate) fn read_scalar(raw: &RawType, json: &JsonValue) -> Result<Value, &'static str> {
    match (raw, json) {
        (RawType::Null, _) => Ok(Value::Null),
        (RawType::Bool, JsonValue::Bool(b)) => Ok(Value::Bool(*b)),
        (RawType::Int, JsonValue::Number(n)) => n.as_i64().map(Value::Int).ok_or("int"),
        (RawType::Float, JsonValue::Number(n)) => n.as_f64().map(Value::Float).ok_or("float"),
        (RawType::String, JsonValue::String(s)) => Ok(Value::String(s.clone())),
        _ => Err(expected(raw)),
    }
}

/// Encodes a non-null value of type `raw`, or returns the expected kind.
pub(crate) fn write_scalar(raw: &RawType, value: &Value) -> Result<JsonValue, &'static str> {
    match (raw, value) {
        (RawType::Null, _) => Ok(JsonValue::Null),
        (RawType::Bool, Value::Bool(b)) => Ok(JsonValue::Bool(*b)),
        (RawType::Int, Value::Int(v)) => Ok(JsonValue::from(*v)),
        (RawType::Float, Value::Float(_) | Value::Int(_)) => value
            .as_float()
            .and_then(Number::from_f64)
            .map(JsonValue::Number)
            .ok_or("finite float"),
        (RawType::String, Value::String(s)) => Ok(JsonValue::String(s.clone())),
        _ => Err(expected(raw)),
    }
}

fn expected(raw: &RawType) -> &'static str {
    match raw {
        RawType::Null => "null",
        RawType::Bool => "bool",
        RawType::Int => "int",
        RawType::Float => "float",
        RawType::String => "string",
        _ => "scalar",
    }
}

// -----------------------------------------------------------------------------
// ScalarAdapter

/// Strict codec of `null`, `bool`, `int`, `float` and `string`.
///
/// Integers are not widened from floats nor parsed from strings, a JSON
/// value of another kind is an [`Unsupported`](crate::Error::Unsupported)
/// error. Floats accept any JSON number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarAdapter {
    raw: RawType,
}

impl ScalarAdapter {
    /// Returns `None` if `raw` is not a scalar.
    pub fn new(raw: RawType) -> Option<Self> {
        TypeDescriptor::of(raw.clone())
            .is_scalar()
            .then_some(Self { raw })
    }
}

impl TypeAdapter for ScalarAdapter {
    fn read(&self, json: &JsonValue, ctx: &mut ReaderContext<'_>) -> Result<Value> {
        if json.is_null() {
            return Ok(Value::Null);
        }
        read_scalar(&self.raw, json).map_err(|expected| ctx.unsupported(expected, json_kind(json)))
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>) -> Result<JsonValue> {
        if value.is_null() {
            return Ok(JsonValue::Null);
        }
        write_scalar(&self.raw, value).map_err(|expected| ctx.unsupported(expected, value.kind()))
    }
}

/// Creates [`ScalarAdapter`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScalarFactory;

impl TypeAdapterFactory for ScalarFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        _provider: &TypeAdapterProvider,
    ) -> Result<Option<Arc<dyn TypeAdapter>>> {
        Ok(ScalarAdapter::new(ty.raw().clone()).map(|a| Arc::new(a) as Arc<dyn TypeAdapter>))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use vc_object::Value;

    use super::{read_scalar, write_scalar};
    use crate::types::RawType;

    #[test]
    fn reads_are_strict() {
        assert_eq!(read_scalar(&RawType::Int, &json!(5)), Ok(Value::Int(5)));
        assert_eq!(read_scalar(&RawType::Int, &json!(5.5)), Err("int"));
        assert_eq!(read_scalar(&RawType::Int, &json!("5")), Err("int"));
        assert_eq!(read_scalar(&RawType::Float, &json!(5)), Ok(Value::Float(5.0)));
        assert_eq!(read_scalar(&RawType::Bool, &json!(1)), Err("bool"));
        assert_eq!(read_scalar(&RawType::String, &json!("a")), Ok(Value::from("a")));
        assert_eq!(read_scalar(&RawType::Null, &json!([1])), Ok(Value::Null));
    }

    #[test]
    fn writes_are_strict() {
        assert_eq!(write_scalar(&RawType::Int, &Value::Int(1)), Ok(json!(1)));
        assert_eq!(write_scalar(&RawType::Int, &Value::Float(1.0)), Err("int"));
        assert_eq!(write_scalar(&RawType::Float, &Value::Int(2)), Ok(json!(2.0)));
        assert_eq!(write_scalar(&RawType::Float, &Value::Float(f64::NAN)), Err("finite float"));
        assert_eq!(write_scalar(&RawType::String, &Value::Bool(true)), Err("string"));
    }
}
