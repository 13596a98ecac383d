//! Type adapters: the codecs between [`Value`] and JSON.
//!
//! ## Menu
//!
//! - [`TypeAdapter`]: Reads and writes values of one type.
//! - [`TypeAdapterFactory`]: Creates adapters for the types it supports.
//! - [`TypeAdapterProvider`]: Ordered factories plus a memoized adapter per type.
//! - [`TypeHandler`]: User-supplied handling for one type: an adapter, a
//!   factory, or a serializer and/or deserializer.
//! - [`JsonSerializer`] / [`JsonDeserializer`]: One-way user codecs.
//! - [`InstanceCreator`]: Builds objects of one type when reading.
//!
//! ## Resolution order
//!
//! 1. class-level exclusion, wrapping whatever the next factories create;
//! 2. user factories and [`TypeHandler`]s, in registration order;
//! 3. class-level `JsonAdapter` directives;
//! 4. scalars, date-times and raw JSON elements;
//! 5. `array`, `list` and `map`;
//! 6. the wildcard `?`;
//! 7. reflection, for every declared class.
//!
//! The first factory returning an adapter wins.
//!
//! [`Value`]: vc_object::Value

use alloc::sync::Arc;

use serde_json::Value as JsonValue;
use vc_object::Value;

use crate::Result;
use crate::context::{ReaderContext, WriterContext};
use crate::types::TypeDescriptor;

// -----------------------------------------------------------------------------
// Modules

mod array;
mod constructor;
mod custom;
mod datetime;
mod excluder;
mod handler;
mod json;
mod list;
mod map;
mod provider;
mod reflection;
mod scalar;
mod wildcard;

// -----------------------------------------------------------------------------
// Exports

pub use array::ArrayFactory;
pub use constructor::{ConstructorRegistry, InstanceCreator, ObjectConstructor};
pub use custom::{CustomAdapter, JsonDeserializer, JsonSerializer};
pub use datetime::{DateTimeAdapter, DateTimeFactory};
pub use excluder::{ExcludedAdapter, ExcluderFactory};
pub use handler::{JsonAdapterDirectiveFactory, NamedHandlers, TypeHandler, TypeHandlerFactory};
pub use json::{JsonElementAdapter, JsonElementFactory};
pub use list::ListFactory;
pub use map::MapFactory;
pub use provider::TypeAdapterProvider;
pub use reflection::{ReflectionAdapter, ReflectionFactory};
pub use scalar::{ScalarAdapter, ScalarFactory};
pub use wildcard::{WildcardAdapter, WildcardFactory};

// -----------------------------------------------------------------------------
// Traits

/// Converts values of one type between [`Value`] and JSON.
///
/// Adapters are shared across threads and calls, per-call state lives in the
/// contexts.
///
/// # Examples
///
/// ```
/// use serde_json::Value as JsonValue;
/// use vc_json::Result;
/// use vc_json::adapter::TypeAdapter;
/// use vc_json::context::{ReaderContext, WriterContext, json_kind};
/// use vc_object::Value;
///
/// /// Stores booleans as `"yes"` / `"no"`.
/// struct YesNo;
///
/// impl TypeAdapter for YesNo {
///     fn read(&self, json: &JsonValue, ctx: &mut ReaderContext<'_>) -> Result<Value> {
///         match json.as_str() {
///             Some(s) => Ok(Value::Bool(s == "yes")),
///             None => Err(ctx.unsupported("string", json_kind(json))),
///         }
///     }
///
///     fn write(&self, value: &Value, ctx: &mut WriterContext<'_>) -> Result<JsonValue> {
///         match value.as_bool() {
///             Some(b) => Ok(JsonValue::from(if b { "yes" } else { "no" })),
///             None => Err(ctx.unsupported("bool", value.kind())),
///         }
///     }
/// }
/// ```
///
/// [`Value`]: vc_object::Value
pub trait TypeAdapter: Send + Sync {
    fn read(&self, json: &JsonValue, ctx: &mut ReaderContext<'_>) -> Result<Value>;

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>) -> Result<JsonValue>;

    /// Reads `json` into an existing value.
    ///
    /// Only meaningful for objects, the default ignores `existing`.
    fn read_into(
        &self,
        json: &JsonValue,
        existing: &Value,
        ctx: &mut ReaderContext<'_>,
    ) -> Result<Value> {
        let _ = existing;
        self.read(json, ctx)
    }
}

/// Creates [`TypeAdapter`]s for the types it supports.
///
/// `create` returns `Ok(None)` for unsupported types. The provider memoizes
/// the result, so a factory is asked at most once per type.
pub trait TypeAdapterFactory: Send + Sync {
    fn create(
        &self,
        ty: &TypeDescriptor,
        provider: &TypeAdapterProvider,
    ) -> Result<Option<Arc<dyn TypeAdapter>>>;
}
