use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use std::sync::{PoisonError, RwLock};

use hashbrown::HashMap;

use super::{TypeAdapter, TypeAdapterFactory};
use crate::types::TypeDescriptor;
use crate::{Error, Result};

// -----------------------------------------------------------------------------
// TypeAdapterProvider

/// Resolves the [`TypeAdapter`] of a type.
///
/// Factories are asked in order, the first adapter returned is memoized under
/// the canonical form of the descriptor. The cache lock is released while a
/// factory runs, so factories may resolve nested types through the provider.
/// When two threads resolve the same type concurrently, the first stored
/// adapter is returned to both.
pub struct TypeAdapterProvider {
    factories: Vec<Arc<dyn TypeAdapterFactory>>,
    cache: RwLock<HashMap<String, Arc<dyn TypeAdapter>>>,
}

impl TypeAdapterProvider {
    pub fn new(factories: Vec<Arc<dyn TypeAdapterFactory>>) -> Self {
        Self {
            factories,
            cache: RwLock::new(HashMap::new()),
        }
    }

    #[inline]
    pub fn factories(&self) -> &[Arc<dyn TypeAdapterFactory>] {
        &self.factories
    }

    /// Returns the adapter for `ty`, creating and memoizing it on first use.
    pub fn get_adapter(&self, ty: &TypeDescriptor) -> Result<Arc<dyn TypeAdapter>> {
        let key = alloc::format!("{ty}");

        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(adapter) = cached {
            log::trace!("type adapter cache hit: `{key}`");
            return Ok(adapter);
        }

        let adapter = self.create(ty, 0)?;
        log::debug!("created type adapter for `{key}`");

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(cache.entry(key).or_insert(adapter).clone())
    }

    /// Returns the adapter the factories after `skip` would create for `ty`.
    ///
    /// Used by codecs that wrap the default handling of a type. The result is
    /// not memoized. If `skip` is not registered every factory is asked.
    pub fn get_adapter_skipping(
        &self,
        ty: &TypeDescriptor,
        skip: &dyn TypeAdapterFactory,
    ) -> Result<Arc<dyn TypeAdapter>> {
        let start = self
            .factories
            .iter()
            .position(|f| core::ptr::addr_eq(Arc::as_ptr(f), skip as *const dyn TypeAdapterFactory))
            .map_or(0, |index| index + 1);
        self.create(ty, start)
    }

    fn create(&self, ty: &TypeDescriptor, start: usize) -> Result<Arc<dyn TypeAdapter>> {
        for factory in &self.factories[start..] {
            if let Some(adapter) = factory.create(ty, self)? {
                return Ok(adapter);
            }
        }
        Err(Error::config(alloc::format!("no type adapter for `{ty}`")))
    }

    /// Drops every memoized adapter.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl fmt::Debug for TypeAdapterProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self.cache.read().unwrap_or_else(PoisonError::into_inner).len();
        f.debug_struct("TypeAdapterProvider")
            .field("factories", &self.factories.len())
            .field("cached", &cached)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::Value as JsonValue;
    use vc_object::Value;

    use super::TypeAdapterProvider;
    use crate::adapter::{TypeAdapter, TypeAdapterFactory};
    use crate::context::{ReaderContext, WriterContext};
    use crate::types::{RawType, TypeDescriptor};
    use crate::{ErrorKind, Result};

    struct Fixed(i64);

    impl TypeAdapter for Fixed {
        fn read(&self, _: &JsonValue, _: &mut ReaderContext<'_>) -> Result<Value> {
            Ok(Value::Int(self.0))
        }

        fn write(&self, _: &Value, _: &mut WriterContext<'_>) -> Result<JsonValue> {
            Ok(JsonValue::from(self.0))
        }
    }

    struct Counting {
        raw: RawType,
        value: i64,
        calls: AtomicUsize,
    }

    fn provider(factories: &[&Arc<Counting>]) -> TypeAdapterProvider {
        let factories: Vec<Arc<dyn TypeAdapterFactory>> = factories
            .iter()
            .map(|f| Arc::clone(f) as Arc<dyn TypeAdapterFactory>)
            .collect();
        TypeAdapterProvider::new(factories)
    }

    impl Counting {
        fn new(raw: RawType, value: i64) -> Arc<Self> {
            Arc::new(Self {
                raw,
                value,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl TypeAdapterFactory for Counting {
        fn create(
            &self,
            ty: &TypeDescriptor,
            _: &TypeAdapterProvider,
        ) -> Result<Option<Arc<dyn TypeAdapter>>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if *ty.raw() == self.raw {
                Ok(Some(Arc::new(Fixed(self.value))))
            } else {
                Ok(None)
            }
        }
    }

    #[test]
    fn memoizes_first_match() {
        let first = Counting::new(RawType::Int, 1);
        let second = Counting::new(RawType::Int, 2);
        let provider = provider(&[&first, &second]);

        let ty = TypeDescriptor::of(RawType::Int);
        let a = provider.get_adapter(&ty).unwrap();
        let b = provider.get_adapter(&ty).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(first.calls.load(Ordering::Relaxed), 1);
        assert_eq!(second.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn skipping_starts_after_factory() {
        let first = Counting::new(RawType::Int, 1);
        let second = Counting::new(RawType::Int, 2);
        let provider = provider(&[&first, &second]);
        let ty = TypeDescriptor::of(RawType::Int);

        let skipped = provider.get_adapter_skipping(&ty, &*first).unwrap();
        let excluder = crate::exclusion::Excluder::new();
        let options = crate::context::CodecOptions::default();
        let mut ctx = WriterContext::new(&provider, &excluder, &options, Default::default());
        assert_eq!(skipped.write(&Value::Null, &mut ctx).unwrap(), JsonValue::from(2));

        let unknown = Counting::new(RawType::Int, 3);
        let all = provider.get_adapter_skipping(&ty, &*unknown).unwrap();
        assert_eq!(all.write(&Value::Null, &mut ctx).unwrap(), JsonValue::from(1));
    }

    #[test]
    fn missing_adapter_is_config_error() {
        let provider = provider(&[&Counting::new(RawType::Int, 1)]);
        let Err(err) = provider.get_adapter(&TypeDescriptor::of(RawType::Bool)) else {
            panic!("bool has no adapter");
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "configuration error: no type adapter for `bool`");
    }
}
