use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use hashbrown::HashMap;
use vc_object::ClassLoader;

use super::{CustomAdapter, JsonDeserializer, JsonSerializer};
use super::{TypeAdapter, TypeAdapterFactory, TypeAdapterProvider};
use crate::types::TypeDescriptor;
use crate::{Error, Result};

// -----------------------------------------------------------------------------
// TypeHandler

/// User-supplied handling of one type.
#[derive(Clone)]
pub enum TypeHandler {
    /// A complete codec.
    Adapter(Arc<dyn TypeAdapter>),
    /// A factory, asked with the concrete descriptor.
    Factory(Arc<dyn TypeAdapterFactory>),
    /// Custom writes, reads use the default adapter.
    Serializer(Arc<dyn JsonSerializer>),
    /// Custom reads, writes use the default adapter.
    Deserializer(Arc<dyn JsonDeserializer>),
    Both(Arc<dyn JsonSerializer>, Arc<dyn JsonDeserializer>),
}

impl TypeHandler {
    #[inline]
    pub fn adapter(adapter: impl TypeAdapter + 'static) -> Self {
        Self::Adapter(Arc::new(adapter))
    }

    #[inline]
    pub fn factory(factory: impl TypeAdapterFactory + 'static) -> Self {
        Self::Factory(Arc::new(factory))
    }

    #[inline]
    pub fn serializer(serializer: impl JsonSerializer + 'static) -> Self {
        Self::Serializer(Arc::new(serializer))
    }

    #[inline]
    pub fn deserializer(deserializer: impl JsonDeserializer + 'static) -> Self {
        Self::Deserializer(Arc::new(deserializer))
    }

    #[inline]
    pub fn both(
        serializer: impl JsonSerializer + 'static,
        deserializer: impl JsonDeserializer + 'static,
    ) -> Self {
        Self::Both(Arc::new(serializer), Arc::new(deserializer))
    }

    /// Builds the adapter of `ty`.
    ///
    /// `fallback` resolves the default adapter and is only called when a
    /// single half is supplied.
    pub(crate) fn build(
        &self,
        ty: &TypeDescriptor,
        provider: &TypeAdapterProvider,
        fallback: impl FnOnce() -> Result<Arc<dyn TypeAdapter>>,
    ) -> Result<Option<Arc<dyn TypeAdapter>>> {
        let ty = ty.clone();
        let adapter: Arc<dyn TypeAdapter> = match self {
            Self::Adapter(adapter) => adapter.clone(),
            Self::Factory(factory) => return factory.create(&ty, provider),
            Self::Serializer(s) => {
                Arc::new(CustomAdapter::new(ty, Some(s.clone()), None, Some(fallback()?)))
            }
            Self::Deserializer(d) => {
                Arc::new(CustomAdapter::new(ty, None, Some(d.clone()), Some(fallback()?)))
            }
            Self::Both(s, d) => {
                Arc::new(CustomAdapter::new(ty, Some(s.clone()), Some(d.clone()), None))
            }
        };
        Ok(Some(adapter))
    }
}

impl fmt::Debug for TypeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Adapter(_) => "TypeHandler::Adapter",
            Self::Factory(_) => "TypeHandler::Factory",
            Self::Serializer(_) => "TypeHandler::Serializer",
            Self::Deserializer(_) => "TypeHandler::Deserializer",
            Self::Both(..) => "TypeHandler::Both",
        })
    }
}

// -----------------------------------------------------------------------------
// TypeHandlerFactory

/// Serves a [`TypeHandler`] registered for one type.
///
/// Strict registrations match the exact descriptor. Others match any
/// descriptor with the same raw type, and every subclass of a registered class.
pub struct TypeHandlerFactory {
    ty: TypeDescriptor,
    strict: bool,
    handler: TypeHandler,
    loader: Arc<ClassLoader>,
}

impl TypeHandlerFactory {
    pub fn new(
        ty: TypeDescriptor,
        strict: bool,
        handler: TypeHandler,
        loader: Arc<ClassLoader>,
    ) -> Self {
        Self {
            ty,
            strict,
            handler,
            loader,
        }
    }

    /// Returns `true` if the handler applies to `ty`.
    pub fn matches(&self, ty: &TypeDescriptor) -> bool {
        if self.strict {
            return *ty == self.ty;
        }
        if ty.raw() == self.ty.raw() {
            return true;
        }
        match (ty.class_name(), self.ty.class_name()) {
            (Some(class), Some(target)) => self
                .loader
                .get(class)
                .is_ok_and(|class| class.is_subclass_of(target)),
            _ => false,
        }
    }
}

impl TypeAdapterFactory for TypeHandlerFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        provider: &TypeAdapterProvider,
    ) -> Result<Option<Arc<dyn TypeAdapter>>> {
        if !self.matches(ty) {
            return Ok(None);
        }
        log::debug!("type handler {:?} registered for `{}` handles `{ty}`", self.handler, self.ty);
        self.handler
            .build(ty, provider, || provider.get_adapter_skipping(ty, self))
    }
}

impl fmt::Debug for TypeHandlerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHandlerFactory")
            .field("ty", &self.ty)
            .field("strict", &self.strict)
            .field("handler", &self.handler)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Named handlers

/// Handlers referenced by name from `JsonAdapter` directives.
#[derive(Debug, Clone, Default)]
pub struct NamedHandlers {
    handlers: HashMap<String, TypeHandler>,
}

impl NamedHandlers {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, handler: TypeHandler) {
        self.handlers.insert(name.into(), handler);
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&TypeHandler> {
        self.handlers.get(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Builds the adapter of `ty` from the handler named `name`.
    pub(crate) fn adapter(
        &self,
        name: &str,
        ty: &TypeDescriptor,
        provider: &TypeAdapterProvider,
        fallback: impl FnOnce() -> Result<Arc<dyn TypeAdapter>>,
    ) -> Result<Arc<dyn TypeAdapter>> {
        let handler = self.get(name).ok_or_else(|| {
            Error::config(alloc::format!("`JsonAdapter` names unknown handler `{name}`"))
        })?;
        handler.build(ty, provider, fallback)?.ok_or_else(|| {
            Error::config(alloc::format!("handler `{name}` has no adapter for `{ty}`"))
        })
    }
}

// -----------------------------------------------------------------------------
// JsonAdapterDirectiveFactory

/// Applies class-level `JsonAdapter` directives.
pub struct JsonAdapterDirectiveFactory {
    loader: Arc<ClassLoader>,
    handlers: Arc<NamedHandlers>,
}

impl JsonAdapterDirectiveFactory {
    pub fn new(loader: Arc<ClassLoader>, handlers: Arc<NamedHandlers>) -> Self {
        Self { loader, handlers }
    }
}

impl TypeAdapterFactory for JsonAdapterDirectiveFactory {
    fn create(
        &self,
        ty: &TypeDescriptor,
        provider: &TypeAdapterProvider,
    ) -> Result<Option<Arc<dyn TypeAdapter>>> {
        let Some(name) = ty.class_name() else {
            return Ok(None);
        };
        // Unknown classes are reported by the reflection factory.
        let Ok(class) = self.loader.get(name) else {
            return Ok(None);
        };
        let directives = class.class_directives();
        let Some(handler) = directives.json_adapter() else {
            return Ok(None);
        };
        self.handlers
            .adapter(handler, ty, provider, || provider.get_adapter_skipping(ty, self))
            .map(Some)
    }
}

impl fmt::Debug for JsonAdapterDirectiveFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonAdapterDirectiveFactory")
            .field("handlers", &self.handlers.len())
            .finish_non_exhaustive()
    }
}
