use alloc::sync::Arc;
use alloc::vec::Vec;

use serde_json::Value as JsonValue;
use vc_object::Value;

use super::{TypeAdapter, TypeAdapterFactory, TypeAdapterProvider};
use crate::context::{ReaderContext, WriterContext, json_kind};
use crate::types::{RawType, TypeDescriptor};
use crate::{Error, Result};

pub(super) fn read_items(
    element: &dyn TypeAdapter,
    items: &[JsonValue],
    ctx: &mut ReaderContext<'_>,
) -> Result<Value> {
    let mut values = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        values.push(ctx.with_index(index, |ctx| element.read(item, ctx))?);
    }
    Ok(Value::List(values))
}

pub(super) fn write_items(
    element: &dyn TypeAdapter,
    items: &[Value],
    ctx: &mut WriterContext<'_>,
) -> Result<JsonValue> {
    let mut values = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        values.push(ctx.with_index(index, |ctx| element.write(item, ctx))?);
    }
    Ok(JsonValue::Array(values))
}

/// Codec of `list<T>`: JSON arrays only.
struct ListAdapter {
    element: Arc<dyn TypeAdapter>,
}

impl TypeAdapter for ListAdapter {
    fn read(&self, json: &JsonValue, ctx: &mut ReaderContext<'_>) -> Result<Value> {
        match json {
            JsonValue::Null => Ok(Value::Null),
            JsonValue::Array(items) => read_items(&*self.element, items, ctx),
            other => Err(ctx.structural(alloc::format!(
                "list expected but {} found",
                json_kind(other)
            ))),
        }
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>) -> Result<JsonValue> {
        match value {
            Value::Null => Ok(JsonValue::Null),
            Value::List(items) => write_items(&*self.element, items, ctx),
            other => Err(ctx.unsupported("list", other.kind())),
        }
    }
}

/// Creates codecs of `list` and `list<T>`, a bare `list` holds `?` elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListFactory;

impl TypeAdapterFactory for ListFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        provider: &TypeAdapterProvider,
    ) -> Result<Option<Arc<dyn TypeAdapter>>> {
        if *ty.raw() != RawType::List {
            return Ok(None);
        }
        let element = match ty.generics() {
            [] => TypeDescriptor::wildcard(),
            [element] => element.clone(),
            _ => {
                return Err(Error::type_structure(
                    ty,
                    "list takes at most one generic parameter",
                ));
            }
        };
        let element = provider.get_adapter(&element)?;
        Ok(Some(Arc::new(ListAdapter { element })))
    }
}
