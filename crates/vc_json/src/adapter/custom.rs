use alloc::sync::Arc;
use core::fmt;

use serde_json::Value as JsonValue;
use vc_object::Value;

use super::TypeAdapter;
use crate::context::{ReaderContext, WriterContext};
use crate::types::TypeDescriptor;
use crate::{Error, Result};

// -----------------------------------------------------------------------------
// One-way codecs

/// User serialization of one type.
///
/// Never called with `null`.
pub trait JsonSerializer: Send + Sync {
    fn serialize(
        &self,
        value: &Value,
        ty: &TypeDescriptor,
        ctx: &mut WriterContext<'_>,
    ) -> Result<JsonValue>;
}

/// User deserialization of one type.
///
/// Never called with `null`.
pub trait JsonDeserializer: Send + Sync {
    fn deserialize(
        &self,
        json: &JsonValue,
        ty: &TypeDescriptor,
        ctx: &mut ReaderContext<'_>,
    ) -> Result<Value>;
}

// -----------------------------------------------------------------------------
// CustomAdapter

/// Combines a user serializer and/or deserializer into a [`TypeAdapter`].
///
/// A missing half is delegated to `fallback`, usually the adapter the
/// factories after the registering one would have created.
pub struct CustomAdapter {
    ty: TypeDescriptor,
    serializer: Option<Arc<dyn JsonSerializer>>,
    deserializer: Option<Arc<dyn JsonDeserializer>>,
    fallback: Option<Arc<dyn TypeAdapter>>,
}

impl CustomAdapter {
    pub fn new(
        ty: TypeDescriptor,
        serializer: Option<Arc<dyn JsonSerializer>>,
        deserializer: Option<Arc<dyn JsonDeserializer>>,
        fallback: Option<Arc<dyn TypeAdapter>>,
    ) -> Self {
        Self {
            ty,
            serializer,
            deserializer,
            fallback,
        }
    }

    fn fallback(&self, direction: &str) -> Result<&Arc<dyn TypeAdapter>> {
        self.fallback.as_ref().ok_or_else(|| {
            Error::config(alloc::format!(
                "custom handler of `{}` has no {direction} and no fallback adapter",
                self.ty
            ))
        })
    }
}

impl TypeAdapter for CustomAdapter {
    fn read(&self, json: &JsonValue, ctx: &mut ReaderContext<'_>) -> Result<Value> {
        if json.is_null() {
            return Ok(Value::Null);
        }
        match &self.deserializer {
            Some(deserializer) => deserializer.deserialize(json, &self.ty, ctx),
            None => self.fallback("deserializer")?.read(json, ctx),
        }
    }

    fn read_into(
        &self,
        json: &JsonValue,
        existing: &Value,
        ctx: &mut ReaderContext<'_>,
    ) -> Result<Value> {
        if json.is_null() {
            return Ok(Value::Null);
        }
        match &self.deserializer {
            Some(deserializer) => deserializer.deserialize(json, &self.ty, ctx),
            None => self.fallback("deserializer")?.read_into(json, existing, ctx),
        }
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>) -> Result<JsonValue> {
        if value.is_null() {
            return Ok(JsonValue::Null);
        }
        match &self.serializer {
            Some(serializer) => serializer.serialize(value, &self.ty, ctx),
            None => self.fallback("serializer")?.write(value, ctx),
        }
    }
}

impl fmt::Debug for CustomAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAdapter")
            .field("ty", &self.ty)
            .field("serializer", &self.serializer.is_some())
            .field("deserializer", &self.deserializer.is_some())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
