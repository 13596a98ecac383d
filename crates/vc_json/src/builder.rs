use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use vc_object::{ClassLoader, DirectiveSet, Modifiers};

use crate::adapter::{ArrayFactory, ConstructorRegistry, DateTimeFactory, ExcluderFactory};
use crate::adapter::{InstanceCreator, JsonAdapterDirectiveFactory, JsonElementFactory};
use crate::adapter::{ListFactory, MapFactory};
use crate::adapter::{NamedHandlers, ReflectionFactory, ScalarFactory, WildcardFactory};
use crate::adapter::{TypeAdapterFactory, TypeAdapterProvider, TypeHandler, TypeHandlerFactory};
use crate::cache::{Cache, ChainCache, FileCache, MemoryCache};
use crate::context::CodecOptions;
use crate::exclusion::{Excluder, ExclusionStrategy, Version};
use crate::metadata::{ClassMetadata, ClassMetadataFactory, ClassMetadataVisitor};
use crate::metadata::{DEFAULT_NAMESPACE, DirectiveReader};
use crate::naming::{MethodNamingPolicy, MethodNamingStrategy};
use crate::naming::{PropertyNamingPolicy, PropertyNamingStrategy};
use crate::types::TypeDescriptor;
use crate::{Error, Gson, Result};

// A user factory, or a handler whose type expression is parsed by `build`.
enum Pending {
    Factory(Arc<dyn TypeAdapterFactory>),
    Handler {
        expr: String,
        handler: TypeHandler,
        strict: bool,
    },
}

// -----------------------------------------------------------------------------
// GsonBuilder

/// Configures and builds a [`Gson`].
///
/// Inputs are validated by [`build`](Self::build): type expressions, the
/// version string, the date format and the cache settings.
///
/// # Examples
///
/// ```
/// use vc_json::GsonBuilder;
/// use vc_json::naming::PropertyNamingPolicy;
/// use vc_object::ClassLoader;
///
/// let gson = GsonBuilder::new()
///     .set_class_loader(ClassLoader::new())
///     .set_property_naming_policy(PropertyNamingPolicy::Identity)
///     .serialize_null(true)
///     .set_version("1.2")
///     .build()
///     .unwrap();
/// assert!(gson.options().serialize_null);
///
/// let err = GsonBuilder::new().enable_cache(true).build().unwrap_err();
/// assert_eq!(err.kind(), vc_json::ErrorKind::Configuration);
/// ```
pub struct GsonBuilder {
    pending: Vec<Pending>,
    named: NamedHandlers,
    creators: Vec<(String, Arc<dyn InstanceCreator>)>,
    version: Option<String>,
    excluded_modifiers: Modifiers,
    require_expose: bool,
    require_exclusion_check: bool,
    strategies: Vec<(Arc<dyn ExclusionStrategy>, bool, bool)>,
    property_naming: Arc<dyn PropertyNamingStrategy>,
    method_naming: Arc<dyn MethodNamingStrategy>,
    options: CodecOptions,
    cache_enabled: bool,
    cache_dir: Option<PathBuf>,
    cache_namespace: String,
    metadata_cache: Option<Arc<dyn Cache<Arc<ClassMetadata>>>>,
    visitors: Vec<Arc<dyn ClassMetadataVisitor>>,
    loader: Option<Arc<ClassLoader>>,
}

impl Default for GsonBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl GsonBuilder {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            named: NamedHandlers::new(),
            creators: Vec::new(),
            version: None,
            excluded_modifiers: Modifiers::STATIC,
            require_expose: false,
            require_exclusion_check: false,
            strategies: Vec::new(),
            property_naming: Arc::new(PropertyNamingPolicy::default()),
            method_naming: Arc::new(MethodNamingPolicy::default()),
            options: CodecOptions::default(),
            cache_enabled: false,
            cache_dir: None,
            cache_namespace: String::from(DEFAULT_NAMESPACE),
            metadata_cache: None,
            visitors: Vec::new(),
            loader: None,
        }
    }

    // -------------------------------------------------------------------------
    // Codecs

    /// Adds a factory, asked after class-level exclusion and before every
    /// built-in factory.
    pub fn add_type_adapter_factory(mut self, factory: impl TypeAdapterFactory + 'static) -> Self {
        self.pending.push(Pending::Factory(Arc::new(factory)));
        self
    }

    /// Registers `handler` for the type `expr`.
    ///
    /// Strict registrations match the exact type only, others also match
    /// other generic parameters and subclasses.
    pub fn register_type(mut self, expr: impl Into<String>, handler: TypeHandler, strict: bool) -> Self {
        self.pending.push(Pending::Handler {
            expr: expr.into(),
            handler,
            strict,
        });
        self
    }

    /// Registers a handler that `JsonAdapter` directives refer to by `name`.
    pub fn register_named_handler(mut self, name: impl Into<String>, handler: TypeHandler) -> Self {
        self.named.insert(name, handler);
        self
    }

    /// Uses `creator` to build the objects of type `expr`.
    pub fn add_instance_creator(
        mut self,
        expr: impl Into<String>,
        creator: impl InstanceCreator + 'static,
    ) -> Self {
        self.creators.push((expr.into(), Arc::new(creator)));
        self
    }

    /// Routes scalar properties through the scalar codecs (default). When
    /// disabled they are converted inline, with identical output.
    #[inline]
    pub fn enable_scalar_adapters(mut self, enabled: bool) -> Self {
        self.options.enable_scalar_adapters = enabled;
        self
    }

    /// Sets the `chrono` format of date-times.
    #[inline]
    pub fn set_date_time_format(mut self, format: impl Into<String>) -> Self {
        self.options.date_format = format.into();
        self
    }

    /// Writes null properties as `null` instead of omitting them.
    #[inline]
    pub fn serialize_null(mut self, enabled: bool) -> Self {
        self.options.serialize_null = enabled;
        self
    }

    // -------------------------------------------------------------------------
    // Exclusion

    /// Enables `Since` / `Until` gating against `version`.
    #[inline]
    pub fn set_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Skips members sharing any bit with `modifiers`. Defaults to `STATIC`.
    #[inline]
    pub fn set_excluded_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.excluded_modifiers = modifiers;
        self
    }

    /// Skips properties without an `Expose` directive, on them or their class.
    #[inline]
    pub fn require_expose(mut self, require: bool) -> Self {
        self.require_expose = require;
        self
    }

    /// Only consults strategies for members marked with `ExclusionCheck`.
    #[inline]
    pub fn require_exclusion_check(mut self, require: bool) -> Self {
        self.require_exclusion_check = require;
        self
    }

    pub fn add_exclusion(
        mut self,
        strategy: impl ExclusionStrategy + 'static,
        serialize: bool,
        deserialize: bool,
    ) -> Self {
        self.strategies.push((Arc::new(strategy), serialize, deserialize));
        self
    }

    // -------------------------------------------------------------------------
    // Naming

    #[inline]
    pub fn set_property_naming_policy(self, policy: PropertyNamingPolicy) -> Self {
        self.set_property_naming_strategy(policy)
    }

    #[inline]
    pub fn set_property_naming_strategy(mut self, strategy: impl PropertyNamingStrategy + 'static) -> Self {
        self.property_naming = Arc::new(strategy);
        self
    }

    #[inline]
    pub fn set_method_naming_policy(self, policy: MethodNamingPolicy) -> Self {
        self.set_method_naming_strategy(policy)
    }

    #[inline]
    pub fn set_method_naming_strategy(mut self, strategy: impl MethodNamingStrategy + 'static) -> Self {
        self.method_naming = Arc::new(strategy);
        self
    }

    // -------------------------------------------------------------------------
    // Metadata

    /// Persists resolved directives under the cache directory.
    #[inline]
    pub fn enable_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    #[inline]
    pub fn set_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Prefix of metadata cache keys, and subdirectory of the file cache.
    #[inline]
    pub fn set_cache_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.cache_namespace = namespace.into();
        self
    }

    /// Replaces the in-memory class metadata cache.
    #[inline]
    pub fn set_metadata_cache(mut self, cache: Arc<dyn Cache<Arc<ClassMetadata>>>) -> Self {
        self.metadata_cache = Some(cache);
        self
    }

    pub fn add_class_metadata_visitor(mut self, visitor: impl ClassMetadataVisitor + 'static) -> Self {
        self.visitors.push(Arc::new(visitor));
        self
    }

    /// Uses `loader` to find classes.
    ///
    /// The default loader holds the classes submitted with
    /// [`submit_class!`](vc_object::submit_class) (feature `auto_register`).
    pub fn set_class_loader(mut self, loader: impl Into<Arc<ClassLoader>>) -> Self {
        self.loader = Some(loader.into());
        self
    }

    // -------------------------------------------------------------------------
    // Build

    fn directive_reader(&self) -> Result<DirectiveReader> {
        if !self.cache_enabled {
            return Ok(DirectiveReader::default());
        }
        let dir = self
            .cache_dir
            .as_ref()
            .ok_or_else(|| Error::config("the cache is enabled but no cache directory is set"))?;

        let tiers: Vec<Arc<dyn Cache<DirectiveSet>>> = alloc::vec![
            Arc::new(MemoryCache::new()),
            Arc::new(FileCache::new(dir.join(&self.cache_namespace))),
        ];
        Ok(DirectiveReader::new(Arc::new(ChainCache::new(tiers))))
    }

    fn check_date_format(format: &str) -> Result<()> {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::config(alloc::format!("invalid date-time format `{format}`")));
        }
        Ok(())
    }

    /// Validates the configuration and builds the [`Gson`].
    pub fn build(self) -> Result<Gson> {
        Self::check_date_format(&self.options.date_format)?;
        let directives = self.directive_reader()?;

        let loader = match self.loader {
            Some(loader) => loader,
            None => {
                let mut loader = ClassLoader::new();
                loader.auto_register();
                Arc::new(loader)
            }
        };

        let mut excluder = Excluder::new();
        if let Some(version) = &self.version {
            excluder.set_version(Some(Version::parse(version)?));
        }
        excluder.set_excluded_modifiers(self.excluded_modifiers);
        excluder.set_require_expose(self.require_expose);
        excluder.set_require_exclusion_check(self.require_exclusion_check);
        for (strategy, serialize, deserialize) in self.strategies {
            excluder.add_strategy(strategy, serialize, deserialize);
        }
        let excluder = Arc::new(excluder);

        let mut metadata = ClassMetadataFactory::new(loader.clone(), excluder.clone())
            .with_directive_reader(directives)
            .with_property_naming(self.property_naming)
            .with_method_naming(self.method_naming)
            .with_visitors(self.visitors)
            .with_namespace(self.cache_namespace);
        if let Some(cache) = self.metadata_cache {
            metadata = metadata.with_cache(cache);
        }
        let metadata = Arc::new(metadata);

        let mut constructors = ConstructorRegistry::new(loader.clone());
        for (expr, creator) in self.creators {
            constructors.insert(&TypeDescriptor::parse(&expr)?, creator);
        }
        let constructors = Arc::new(constructors);
        let named = Arc::new(self.named);

        let mut factories: Vec<Arc<dyn TypeAdapterFactory>> = Vec::new();
        factories.push(Arc::new(ExcluderFactory::new(metadata.clone())));
        for pending in self.pending {
            factories.push(match pending {
                Pending::Factory(factory) => factory,
                Pending::Handler {
                    expr,
                    handler,
                    strict,
                } => Arc::new(TypeHandlerFactory::new(
                    TypeDescriptor::parse(&expr)?,
                    strict,
                    handler,
                    loader.clone(),
                )),
            });
        }
        factories.push(Arc::new(JsonAdapterDirectiveFactory::new(loader.clone(), named.clone())));
        factories.push(Arc::new(ScalarFactory));
        factories.push(Arc::new(DateTimeFactory));
        factories.push(Arc::new(JsonElementFactory));
        factories.push(Arc::new(ArrayFactory));
        factories.push(Arc::new(ListFactory));
        factories.push(Arc::new(MapFactory));
        factories.push(Arc::new(WildcardFactory));
        factories.push(Arc::new(ReflectionFactory::new(metadata.clone(), constructors, named)));

        log::debug!(
            "built Gson: {} adapter factories, {} classes",
            factories.len(),
            loader.len()
        );

        Ok(Gson {
            provider: TypeAdapterProvider::new(factories),
            excluder,
            options: self.options,
            loader,
            metadata,
        })
    }
}

impl fmt::Debug for GsonBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GsonBuilder")
            .field("factories", &self.pending.len())
            .field("named_handlers", &self.named.len())
            .field("version", &self.version)
            .field("excluded_modifiers", &self.excluded_modifiers)
            .field("require_expose", &self.require_expose)
            .field("require_exclusion_check", &self.require_exclusion_check)
            .field("options", &self.options)
            .field("cache_enabled", &self.cache_enabled)
            .field("cache_dir", &self.cache_dir)
            .finish_non_exhaustive()
    }
}
