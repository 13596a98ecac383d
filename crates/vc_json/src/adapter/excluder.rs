use alloc::sync::Arc;
use core::fmt;

use serde_json::Value as JsonValue;
use vc_object::Value;

use super::{TypeAdapter, TypeAdapterFactory, TypeAdapterProvider};
use crate::Result;
use crate::context::{ReaderContext, WriterContext};
use crate::metadata::ClassMetadataFactory;
use crate::types::TypeDescriptor;

// -----------------------------------------------------------------------------
// ExcludedAdapter

/// Wraps the codec of a class excluded in at least one direction.
///
/// Excluded directions produce `null`, the others go to `delegate`.
/// A class excluded both ways has no delegate.
pub struct ExcludedAdapter {
    ty: TypeDescriptor,
    skip_serialize: bool,
    skip_deserialize: bool,
    delegate: Option<Arc<dyn TypeAdapter>>,
}

impl TypeAdapter for ExcludedAdapter {
    fn read(&self, json: &JsonValue, ctx: &mut ReaderContext<'_>) -> Result<Value> {
        match &self.delegate {
            Some(delegate) if !self.skip_deserialize => delegate.read(json, ctx),
            _ => Ok(Value::Null),
        }
    }

    fn read_into(
        &self,
        json: &JsonValue,
        existing: &Value,
        ctx: &mut ReaderContext<'_>,
    ) -> Result<Value> {
        match &self.delegate {
            Some(delegate) if !self.skip_deserialize => delegate.read_into(json, existing, ctx),
            _ => Ok(Value::Null),
        }
    }

    fn write(&self, value: &Value, ctx: &mut WriterContext<'_>) -> Result<JsonValue> {
        match &self.delegate {
            Some(delegate) if !self.skip_serialize => delegate.write(value, ctx),
            _ => Ok(JsonValue::Null),
        }
    }
}

impl fmt::Debug for ExcludedAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExcludedAdapter")
            .field("ty", &self.ty)
            .field("skip_serialize", &self.skip_serialize)
            .field("skip_deserialize", &self.skip_deserialize)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ExcluderFactory

/// Applies class-level exclusion in front of every other factory.
///
/// Registered first, so an excluded class reads and writes as `null` no
/// matter which codec would serve it. Classes that are not excluded, and
/// names the class loader does not know, are left to the next factories.
pub struct ExcluderFactory {
    metadata: Arc<ClassMetadataFactory>,
}

impl ExcluderFactory {
    #[inline]
    pub fn new(metadata: Arc<ClassMetadataFactory>) -> Self {
        Self { metadata }
    }
}

impl TypeAdapterFactory for ExcluderFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        provider: &TypeAdapterProvider,
    ) -> Result<Option<Arc<dyn TypeAdapter>>> {
        let Some(name) = ty.class_name() else {
            return Ok(None);
        };
        if !self.metadata.loader().contains(name) {
            return Ok(None);
        }

        let metadata = self.metadata.create(ty)?;
        let skip_serialize = metadata.skip_serialize();
        let skip_deserialize = metadata.skip_deserialize();
        if !skip_serialize && !skip_deserialize {
            return Ok(None);
        }
        log::debug!(
            "class `{name}` is excluded (serialize: {skip_serialize}, deserialize: {skip_deserialize})"
        );

        let delegate = if skip_serialize && skip_deserialize {
            None
        } else {
            Some(provider.get_adapter_skipping(ty, self)?)
        };
        Ok(Some(Arc::new(ExcludedAdapter {
            ty: ty.clone(),
            skip_serialize,
            skip_deserialize,
            delegate,
        })))
    }
}

impl fmt::Debug for ExcluderFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExcluderFactory").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use serde_json::{Value as JsonValue, json};
    use vc_object::{ClassDef, ClassLoader, Directive, PropertyDef, Value};

    use super::ExcluderFactory;
    use crate::Result;
    use crate::adapter::{TypeAdapter, TypeAdapterFactory, TypeAdapterProvider};
    use crate::context::{CodecOptions, ReaderContext, WriterContext};
    use crate::exclusion::Excluder;
    use crate::metadata::ClassMetadataFactory;
    use crate::types::TypeDescriptor;

    struct Fixed;

    impl TypeAdapter for Fixed {
        fn read(&self, _: &JsonValue, _: &mut ReaderContext<'_>) -> Result<Value> {
            Ok(Value::from("read"))
        }

        fn write(&self, _: &Value, _: &mut WriterContext<'_>) -> Result<JsonValue> {
            Ok(json!("written"))
        }
    }

    struct Always;

    impl TypeAdapterFactory for Always {
        fn create(
            &self,
            _: &TypeDescriptor,
            _: &TypeAdapterProvider,
        ) -> Result<Option<Arc<dyn TypeAdapter>>> {
            Ok(Some(Arc::new(Fixed)))
        }
    }

    fn provider(classes: &[Arc<ClassDef>]) -> TypeAdapterProvider {
        let mut loader = ClassLoader::new();
        for class in classes {
            loader.register(class.clone());
        }
        let metadata = ClassMetadataFactory::new(Arc::new(loader), Arc::new(Excluder::new()));
        let factories: Vec<Arc<dyn TypeAdapterFactory>> =
            alloc::vec![Arc::new(ExcluderFactory::new(Arc::new(metadata))), Arc::new(Always)];
        TypeAdapterProvider::new(factories)
    }

    #[test]
    fn excluded_directions_are_null() {
        let token = ClassDef::builder("Token")
            .directive(Directive::Exclude {
                serialize: true,
                deserialize: false,
            })
            .property(PropertyDef::new("value").typed("string"))
            .build();
        let hidden = ClassDef::builder("Hidden").directive(Directive::exclude()).build();
        let plain = ClassDef::builder("Plain").build();
        let provider = provider(&[token, hidden, plain]);

        let excluder = Excluder::new();
        let options = CodecOptions::default();
        let mut writer = WriterContext::new(&provider, &excluder, &options, Default::default());
        let mut reader = ReaderContext::new(&provider, &excluder, &options, Default::default());

        let token = provider.get_adapter(&TypeDescriptor::class("Token")).unwrap();
        assert_eq!(token.write(&Value::Null, &mut writer).unwrap(), JsonValue::Null);
        assert_eq!(token.read(&json!({}), &mut reader).unwrap(), Value::from("read"));

        let hidden = provider.get_adapter(&TypeDescriptor::class("Hidden")).unwrap();
        assert_eq!(hidden.write(&Value::Null, &mut writer).unwrap(), JsonValue::Null);
        assert_eq!(hidden.read(&json!({}), &mut reader).unwrap(), Value::Null);

        let plain = provider.get_adapter(&TypeDescriptor::class("Plain")).unwrap();
        assert_eq!(plain.write(&Value::Null, &mut writer).unwrap(), json!("written"));

        let unknown = provider.get_adapter(&TypeDescriptor::class("Ghost")).unwrap();
        assert_eq!(unknown.write(&Value::Null, &mut writer).unwrap(), json!("written"));
    }
}
