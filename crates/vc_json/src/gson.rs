use alloc::string::String;
use alloc::sync::Arc;

use serde_json::Value as JsonValue;
use vc_object::{ClassLoader, ObjectRef, Value};

use crate::adapter::TypeAdapterProvider;
use crate::context::{Attributes, CodecOptions, ReaderContext, WriterContext};
use crate::exclusion::Excluder;
use crate::metadata::{ClassMetadata, ClassMetadataFactory};
use crate::types::TypeDescriptor;
use crate::{Error, GsonBuilder, Result};

// -----------------------------------------------------------------------------
// Gson

/// Maps between JSON text and [`Value`]s.
///
/// Built by [`GsonBuilder`]. A `Gson` is immutable, `Send` and `Sync`; every
/// call gets its own context. Adapters and class metadata are created on
/// first use and memoized.
///
/// # Examples
///
/// ```
/// use vc_json::Gson;
/// use vc_object::{ClassDef, ClassLoader, PropertyDef, Value};
///
/// let mut loader = ClassLoader::new();
/// loader.register(
///     ClassDef::builder("Point")
///         .property(PropertyDef::new("x").typed("int"))
///         .property(PropertyDef::new("y").typed("int"))
///         .build(),
/// );
///
/// let gson = Gson::builder().set_class_loader(loader).build().unwrap();
///
/// let point = gson.from_json(r#"{"x":1,"y":2,"z":3}"#, "Point").unwrap();
/// assert_eq!(gson.to_json(&point).unwrap(), r#"{"x":1,"y":2}"#);
///
/// let points = gson.from_json("[{\"x\":5}]", "list<Point>").unwrap();
/// let first = &points.as_list().unwrap()[0];
/// assert_eq!(first.as_object().unwrap().read().get("x"), Some(&Value::Int(5)));
/// ```
///
/// [`Value`]: vc_object::Value
#[derive(Debug)]
pub struct Gson {
    pub(crate) provider: TypeAdapterProvider,
    pub(crate) excluder: Arc<Excluder>,
    pub(crate) options: CodecOptions,
    pub(crate) loader: Arc<ClassLoader>,
    pub(crate) metadata: Arc<ClassMetadataFactory>,
}

impl Gson {
    /// Creates a default configured instance.
    pub fn new() -> Result<Self> {
        GsonBuilder::new().build()
    }

    #[inline]
    pub fn builder() -> GsonBuilder {
        GsonBuilder::new()
    }

    #[inline]
    pub fn provider(&self) -> &TypeAdapterProvider {
        &self.provider
    }

    #[inline]
    pub fn excluder(&self) -> &Excluder {
        &self.excluder
    }

    #[inline]
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    #[inline]
    pub fn loader(&self) -> &Arc<ClassLoader> {
        &self.loader
    }

    /// Returns the metadata of a class.
    pub fn class_metadata(&self, ty: &TypeDescriptor) -> Result<Arc<ClassMetadata>> {
        self.metadata.create(ty)
    }

    fn writer(&self, attributes: Attributes) -> WriterContext<'_> {
        WriterContext::new(&self.provider, &self.excluder, &self.options, attributes)
    }

    fn reader(&self, attributes: Attributes) -> ReaderContext<'_> {
        ReaderContext::new(&self.provider, &self.excluder, &self.options, attributes)
    }

    // -------------------------------------------------------------------------
    // Serialization

    /// Encodes `value` to a JSON tree, dispatching on its runtime type.
    pub fn to_json_value(&self, value: &Value) -> Result<JsonValue> {
        self.to_json_value_with(value, Attributes::new())
    }

    /// Like [`to_json_value`](Self::to_json_value), with attributes for
    /// runtime exclusion strategies.
    pub fn to_json_value_with(&self, value: &Value, attributes: Attributes) -> Result<JsonValue> {
        let adapter = self.provider.get_adapter(&TypeDescriptor::from_value(value))?;
        adapter.write(value, &mut self.writer(attributes))
    }

    pub fn to_json(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json_value(value)?)?)
    }

    pub fn to_json_pretty(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json_value(value)?)?)
    }

    pub fn to_json_with(&self, value: &Value, attributes: Attributes) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json_value_with(value, attributes)?)?)
    }

    // -------------------------------------------------------------------------
    // Deserialization

    /// Decodes `json` as the type named by `type_expr`, e.g. `map<int,User>`.
    pub fn from_json(&self, json: &str, type_expr: &str) -> Result<Value> {
        self.from_json_type(json, &TypeDescriptor::parse(type_expr)?)
    }

    pub fn from_json_type(&self, json: &str, ty: &TypeDescriptor) -> Result<Value> {
        let document: JsonValue = serde_json::from_str(json)?;
        self.from_json_value(&document, ty)
    }

    /// Decodes an already parsed JSON tree.
    pub fn from_json_value(&self, json: &JsonValue, ty: &TypeDescriptor) -> Result<Value> {
        self.read(json, ty, Attributes::new())
    }

    /// Like [`from_json`](Self::from_json), with attributes for runtime
    /// exclusion strategies.
    pub fn from_json_with(&self, json: &str, type_expr: &str, attributes: Attributes) -> Result<Value> {
        let ty = TypeDescriptor::parse(type_expr)?;
        let document: JsonValue = serde_json::from_str(json)?;
        self.read(&document, &ty, attributes)
    }

    fn read(&self, json: &JsonValue, ty: &TypeDescriptor, attributes: Attributes) -> Result<Value> {
        let adapter = self.provider.get_adapter(ty)?;
        adapter.read(json, &mut self.reader(attributes))
    }

    /// Populates `object` from `json`, merging into nested objects it
    /// already holds.
    ///
    /// Properties absent from `json` keep their values. On error the object
    /// may be partially populated.
    pub fn from_json_into(&self, json: &str, object: &ObjectRef) -> Result<ObjectRef> {
        let document: JsonValue = serde_json::from_str(json)?;
        let ty = TypeDescriptor::class(object.class_name());
        let adapter = self.provider.get_adapter(&ty)?;

        let existing = Value::Object(object.clone());
        let mut ctx = self.reader(Attributes::new()).with_existing_objects(true);
        match adapter.read_into(&document, &existing, &mut ctx)? {
            Value::Object(object) => Ok(object),
            Value::Null => Ok(object.clone()),
            other => Err(Error::custom(alloc::format!(
                "adapter of `{ty}` returned {} instead of an object",
                other.kind()
            ))),
        }
    }
}
