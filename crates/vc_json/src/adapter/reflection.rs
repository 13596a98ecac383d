use alloc::sync::Arc;
use core::fmt;

use serde_json::{Map, Value as JsonValue};
use vc_object::{ObjectRef, Value};

use super::scalar::{read_scalar, write_scalar};
use super::{ConstructorRegistry, NamedHandlers, ObjectConstructor};
use super::{TypeAdapter, TypeAdapterFactory, TypeAdapterProvider};
use crate::Result;
use crate::context::{ReaderContext, WriterContext, json_kind};
use crate::exclusion::{Direction, ExclusionData};
use crate::metadata::{ClassMetadata, ClassMetadataFactory, PropertyMetadata};
use crate::types::TypeDescriptor;

// -----------------------------------------------------------------------------
// ReflectionAdapter

/// Codec of declared classes, driven by their [`ClassMetadata`].
///
/// # Reading
///
/// 1. `null`, or a class skipped for deserialization, reads as `null`.
/// 2. With a virtual wrapper the object is read from the wrapper key,
///    a missing key reads as `null`.
/// 3. The object is constructed, or reused when reading into an existing one.
/// 4. Runtime class strategies may still skip it.
/// 5. Each key is matched to a property by serialized name. Unknown and
///    skipped keys are ignored. The property codec is resolved on first use
///    and cached on the property. Setters are only called for non-null values.
///
/// # Writing
///
/// Instances of a subclass are written by the subclass codec. Properties
/// are written in order. Null values, and values their codec writes as
/// `null`, are omitted unless `serialize_null` is set.
pub struct ReflectionAdapter {
    ty: TypeDescriptor,
    metadata: Arc<ClassMetadata>,
    constructor: ObjectConstructor,
    handlers: Arc<NamedHandlers>,
}

impl ReflectionAdapter {
    pub fn new(
        ty: TypeDescriptor,
        metadata: Arc<ClassMetadata>,
        constructor: ObjectConstructor,
        handlers: Arc<NamedHandlers>,
    ) -> Self {
        Self {
            ty,
            metadata,
            constructor,
            handlers,
        }
    }

    #[inline]
    pub fn metadata(&self) -> &Arc<ClassMetadata> {
        &self.metadata
    }

    fn property_adapter<'p>(
        &self,
        property: &'p PropertyMetadata,
        provider: &TypeAdapterProvider,
    ) -> Result<&'p Arc<dyn TypeAdapter>> {
        property.adapter_or_try_init(|| {
            let ty = property.ty();
            match property.directives().json_adapter() {
                Some(name) => {
                    self.handlers
                        .adapter(name, ty, provider, || provider.get_adapter(ty))
                }
                None => provider.get_adapter(ty),
            }
        })
    }

    // Scalars are converted inline when scalar adapters are disabled.
    fn inline_scalar(property: &PropertyMetadata, enabled: bool) -> bool {
        !enabled && property.ty().is_scalar() && property.directives().json_adapter().is_none()
    }

    // -------------------------------------------------------------------------
    // Reading

    fn read_object(
        &self,
        json: &JsonValue,
        existing: Option<&ObjectRef>,
        ctx: &mut ReaderContext<'_>,
    ) -> Result<Value> {
        if self.metadata.skip_deserialize() || json.is_null() {
            return Ok(Value::Null);
        }
        match self.metadata.virtual_wrapper() {
            Some(key) => match json.get(key) {
                Some(inner) if !inner.is_null() => {
                    ctx.with_key(key, |ctx| self.populate(inner, existing, ctx))
                }
                _ => Ok(Value::Null),
            },
            None => self.populate(json, existing, ctx),
        }
    }

    fn populate(
        &self,
        json: &JsonValue,
        existing: Option<&ObjectRef>,
        ctx: &mut ReaderContext<'_>,
    ) -> Result<Value> {
        let JsonValue::Object(entries) = json else {
            return Err(ctx.structural(alloc::format!(
                "object expected but {} found",
                json_kind(json)
            )));
        };

        let object = self.constructor.construct(existing)?;

        if self.metadata.has_runtime_strategies(Direction::Deserialize) {
            let data = ExclusionData {
                direction: Direction::Deserialize,
                object: Some(&object),
                payload: Some(json),
                attributes: Some(ctx.attributes()),
            };
            if ctx.excluder().skip_class_runtime(&self.metadata, &data) {
                return Ok(Value::Null);
            }
        }

        for (key, item) in entries {
            let Some(property) = self.metadata.properties().get(key) else {
                continue;
            };
            if property.skip_deserialize() {
                continue;
            }
            if property.has_runtime_strategies(Direction::Deserialize) {
                let data = ExclusionData {
                    direction: Direction::Deserialize,
                    object: Some(&object),
                    payload: Some(json),
                    attributes: Some(ctx.attributes()),
                };
                if ctx.excluder().skip_property_runtime(property, &data) {
                    continue;
                }
            }

            let value = ctx.with_key(key, |ctx| self.read_property(property, &object, item, ctx))?;
            if !value.is_null() {
                property.setter().set(&object, value)?;
            }
        }

        Ok(Value::Object(object))
    }

    fn read_property(
        &self,
        property: &PropertyMetadata,
        object: &ObjectRef,
        json: &JsonValue,
        ctx: &mut ReaderContext<'_>,
    ) -> Result<Value> {
        if json.is_null() {
            return Ok(Value::Null);
        }
        if Self::inline_scalar(property, ctx.options().enable_scalar_adapters) {
            return read_scalar(property.ty().raw(), json)
                .map_err(|expected| ctx.unsupported(expected, json_kind(json)));
        }

        let adapter = self.property_adapter(property, ctx.provider())?;
        if ctx.uses_existing_object() {
            let current = property.getter().get(object)?;
            if matches!(current, Value::Object(_)) {
                return adapter.read_into(json, &current, ctx);
            }
        }
        adapter.read(json, ctx)
    }

    // -------------------------------------------------------------------------
    // Writing

    fn write_object(&self, object: &ObjectRef, ctx: &mut WriterContext<'_>) -> Result<JsonValue> {
        if self.metadata.has_runtime_strategies(Direction::Serialize) {
            let data = ExclusionData {
                direction: Direction::Serialize,
                object: Some(object),
                payload: None,
                attributes: Some(ctx.attributes()),
            };
            if ctx.excluder().skip_class_runtime(&self.metadata, &data) {
                return Ok(JsonValue::Null);
            }
        }

        let serialize_null = ctx.options().serialize_null;
        let mut entries = Map::with_capacity(self.metadata.properties().len());
        for property in self.metadata.properties() {
            if property.skip_serialize() {
                continue;
            }
            if property.has_runtime_strategies(Direction::Serialize) {
                let data = ExclusionData {
                    direction: Direction::Serialize,
                    object: Some(object),
                    payload: None,
                    attributes: Some(ctx.attributes()),
                };
                if ctx.excluder().skip_property_runtime(property, &data) {
                    continue;
                }
            }

            let name = property.serialized_name();
            let value = property.getter().get(object)?;
            let json = if value.is_null() {
                JsonValue::Null
            } else {
                ctx.with_key(name, |ctx| self.write_property(property, &value, ctx))?
            };
            // Codecs may encode a value as null too, e.g. an excluded class.
            if json.is_null() && !serialize_null {
                continue;
            }
            entries.insert(name.into(), json);
        }

        let json = JsonValue::Object(entries);
        Ok(match self.metadata.virtual_wrapper() {
            Some(key) => {
                let mut wrapper = Map::with_capacity(1);
                wrapper.insert(key.into(), json);
                JsonValue::Object(wrapper)
            }
            None => json,
        })
    }

    fn write_property(
        &self,
        property: &PropertyMetadata,
        value: &Value,
        ctx: &mut WriterContext<'_>,
    ) -> Result<JsonValue> {
        if Self::inline_scalar(property, ctx.options().enable_scalar_adapters) {
            return write_scalar(property.ty().raw(), value)
                .map_err(|expected| ctx.unsupported(expected, value.kind()));
        }
        self.property_adapter(property, ctx.provider())?
            .write(value, ctx)
    }
}

impl TypeAdapter for ReflectionAdapter {
    fn read(&self, json: &JsonValue, ctx: &mut ReaderContext<'_>) -> Result<Value> {
        self.read_object(json, None, ctx)
    }

    fn read_into(
        &self,
        json: &JsonValue,
        existing: &Value,
        ctx: &mut ReaderContext<'_>,
    ) -> Result<Value> {
        self.read_object(json, existing.as_object(), ctx)
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>) -> Result<JsonValue> {
        let object = match value {
            Value::Null => return Ok(JsonValue::Null),
            Value::Object(object) => object,
            other => return Err(ctx.unsupported(&self.ty, other.kind())),
        };
        if self.metadata.skip_serialize() {
            return Ok(JsonValue::Null);
        }

        let class = object.class();
        if class.class_name() != self.metadata.name() {
            if !class.is_subclass_of(self.metadata.name()) {
                return Err(ctx.unsupported(&self.ty, class.name()));
            }
            let adapter = ctx
                .provider()
                .get_adapter(&TypeDescriptor::class(class.class_name().clone()))?;
            return adapter.write(value, ctx);
        }
        self.write_object(object, ctx)
    }
}

impl fmt::Debug for ReflectionAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectionAdapter")
            .field("ty", &self.ty)
            .field("constructor", &self.constructor)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ReflectionFactory

/// Creates [`ReflectionAdapter`]s for every declared class.
///
/// Registered last: a class without a more specific codec is reflected.
pub struct ReflectionFactory {
    metadata: Arc<ClassMetadataFactory>,
    constructors: Arc<ConstructorRegistry>,
    handlers: Arc<NamedHandlers>,
}

impl ReflectionFactory {
    pub fn new(
        metadata: Arc<ClassMetadataFactory>,
        constructors: Arc<ConstructorRegistry>,
        handlers: Arc<NamedHandlers>,
    ) -> Self {
        Self {
            metadata,
            constructors,
            handlers,
        }
    }
}

impl TypeAdapterFactory for ReflectionFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        _provider: &TypeAdapterProvider,
    ) -> Result<Option<Arc<dyn TypeAdapter>>> {
        if !ty.is_object() {
            return Ok(None);
        }
        let metadata = self.metadata.create(ty)?;
        let constructor = self.constructors.get(ty)?;
        Ok(Some(Arc::new(ReflectionAdapter::new(
            ty.clone(),
            metadata,
            constructor,
            self.handlers.clone(),
        ))))
    }
}

impl fmt::Debug for ReflectionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectionFactory")
            .field("constructors", &self.constructors)
            .finish_non_exhaustive()
    }
}
