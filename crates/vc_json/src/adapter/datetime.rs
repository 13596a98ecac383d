use alloc::string::String;
use alloc::sync::Arc;
use core::fmt::Write;

use chrono::DateTime;
use serde_json::Value as JsonValue;
use vc_object::Value;

use super::{TypeAdapter, TypeAdapterFactory, TypeAdapterProvider};
use crate::Result;
use crate::context::{ReaderContext, WriterContext, json_kind};
use crate::types::{RawType, TypeDescriptor};

/// Codec of `DateTime` values, stored as strings.
///
/// The format comes from [`CodecOptions::date_format`](crate::context::CodecOptions::date_format)
/// and must carry an offset (`%z` or `%:z`) to read back.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimeAdapter;

impl TypeAdapter for DateTimeAdapter {
    fn read(&self, json: &JsonValue, ctx: &mut ReaderContext<'_>) -> Result<Value> {
        let text = match json {
            JsonValue::Null => return Ok(Value::Null),
            JsonValue::String(text) => text,
            other => return Err(ctx.unsupported("DateTime", json_kind(other))),
        };

        let format = &ctx.options().date_format;
        DateTime::parse_from_str(text, format)
            .map(Value::DateTime)
            .map_err(|e| ctx.structural(alloc::format!("`{text}` does not match `{format}` ({e})")))
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>) -> Result<JsonValue> {
        match value {
            Value::Null => Ok(JsonValue::Null),
            Value::DateTime(dt) => {
                let format = &ctx.options().date_format;
                let mut text = String::new();
                write!(text, "{}", dt.format(format))
                    .map_err(|_| ctx.structural(alloc::format!("invalid date-time format `{format}`")))?;
                Ok(JsonValue::String(text))
            }
            other => Err(ctx.unsupported("DateTime", other.kind())),
        }
    }
}

/// Creates the [`DateTimeAdapter`] for `DateTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimeFactory;

impl TypeAdapterFactory for DateTimeFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        _provider: &TypeAdapterProvider,
    ) -> Result<Option<Arc<dyn TypeAdapter>>> {
        Ok(match ty.raw() {
            RawType::DateTime => Some(Arc::new(DateTimeAdapter)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use serde_json::json;
    use vc_object::Value;

    use super::DateTimeAdapter;
    use crate::adapter::{TypeAdapter, TypeAdapterProvider};
    use crate::context::{CodecOptions, ReaderContext, WriterContext};
    use crate::exclusion::Excluder;
    use crate::ErrorKind;

    #[test]
    fn round_trip_with_format() {
        let provider = TypeAdapterProvider::new(Vec::new());
        let excluder = Excluder::new();
        let options = CodecOptions {
            date_format: "%d/%m/%Y %H:%M %z".into(),
            ..CodecOptions::default()
        };

        let mut reader = ReaderContext::new(&provider, &excluder, &options, Default::default());
        let value = DateTimeAdapter
            .read(&json!("24/12/2025 18:30 +0100"), &mut reader)
            .unwrap();
        let Value::DateTime(dt) = &value else {
            panic!("expected a date-time, got {value:?}");
        };
        assert_eq!(dt.timestamp(), 1_766_597_400);

        let mut writer = WriterContext::new(&provider, &excluder, &options, Default::default());
        let json = DateTimeAdapter.write(&value, &mut writer).unwrap();
        assert_eq!(json, json!("24/12/2025 18:30 +0100"));

        let err = DateTimeAdapter.read(&json!("yesterday"), &mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
        let err = DateTimeAdapter.read(&json!(1), &mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }
}
