use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use std::sync::OnceLock;

use hashbrown::HashSet;
use vc_object::{ClassDef, ClassLoader, DirectiveSet, MethodDef, PropertyDef};

use super::{ClassMetadata, ClassMetadataVisitor, DirectiveReader};
use super::{PropertyCollection, PropertyMetadata};
use crate::accessor::{self, GetterStrategy, SetterStrategy};
use crate::cache::{Cache, MemoryCache};
use crate::exclusion::{Direction, Excluder};
use crate::naming::{MethodNamingPolicy, MethodNamingStrategy};
use crate::naming::{PropertyNamingPolicy, PropertyNamingStrategy};
use crate::types::TypeDescriptor;
use crate::{Error, Result};

/// Default namespace of metadata cache keys.
pub const DEFAULT_NAMESPACE: &str = "vc_json";

// -----------------------------------------------------------------------------
// ClassMetadataFactory

/// Builds and caches [`ClassMetadata`].
///
/// # Build steps
///
/// 1. Return the cached entry for `"{namespace}.{class}"` if present.
/// 2. Walk the declaration chain most-derived first. A property name is
///    collected once, so a redeclaration replaces the parent's property while
///    parent members that are not redeclared are kept, bound to their
///    declaring class.
/// 3. Per property: serialized name (`SerializedName`, else the naming
///    strategy), accessors, type (`Type`, else the declared hint, else the
///    default value, else wildcard), then the static skip flags. Properties
///    skipped in both directions are left out.
/// 4. Methods marked `VirtualProperty` become serialize-only properties,
///    appended after the real ones.
/// 5. Class skip flags and runtime-strategy flags.
/// 6. Visitors, once. Properties they skip in both directions are dropped.
/// 7. Cache and return.
pub struct ClassMetadataFactory {
    loader: Arc<ClassLoader>,
    excluder: Arc<Excluder>,
    directives: DirectiveReader,
    property_naming: Arc<dyn PropertyNamingStrategy>,
    method_naming: Arc<dyn MethodNamingStrategy>,
    visitors: Vec<Arc<dyn ClassMetadataVisitor>>,
    cache: Arc<dyn Cache<Arc<ClassMetadata>>>,
    namespace: String,
}

impl ClassMetadataFactory {
    /// Creates a factory with default naming, in-memory caches and no visitors.
    pub fn new(loader: Arc<ClassLoader>, excluder: Arc<Excluder>) -> Self {
        Self {
            loader,
            excluder,
            directives: DirectiveReader::default(),
            property_naming: Arc::new(PropertyNamingPolicy::default()),
            method_naming: Arc::new(MethodNamingPolicy::default()),
            visitors: Vec::new(),
            cache: Arc::new(MemoryCache::new()),
            namespace: String::from(DEFAULT_NAMESPACE),
        }
    }

    #[inline]
    pub fn with_directive_reader(mut self, directives: DirectiveReader) -> Self {
        self.directives = directives;
        self
    }

    #[inline]
    pub fn with_property_naming(mut self, naming: Arc<dyn PropertyNamingStrategy>) -> Self {
        self.property_naming = naming;
        self
    }

    #[inline]
    pub fn with_method_naming(mut self, naming: Arc<dyn MethodNamingStrategy>) -> Self {
        self.method_naming = naming;
        self
    }

    #[inline]
    pub fn with_visitors(mut self, visitors: Vec<Arc<dyn ClassMetadataVisitor>>) -> Self {
        self.visitors = visitors;
        self
    }

    #[inline]
    pub fn with_cache(mut self, cache: Arc<dyn Cache<Arc<ClassMetadata>>>) -> Self {
        self.cache = cache;
        self
    }

    #[inline]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    #[inline]
    pub fn loader(&self) -> &Arc<ClassLoader> {
        &self.loader
    }

    /// Returns the metadata of the class named by `ty`.
    pub fn create(&self, ty: &TypeDescriptor) -> Result<Arc<ClassMetadata>> {
        let name = ty
            .class_name()
            .ok_or_else(|| Error::config(alloc::format!("`{ty}` does not name a class")))?;

        let key = alloc::format!("{}.{name}", self.namespace);
        if let Some(metadata) = self.cache.get(&key) {
            log::trace!("class metadata cache hit: {key}");
            return Ok(metadata);
        }

        let class = self.loader.get(name)?;
        let metadata = Arc::new(self.build(&class)?);
        log::debug!(
            "built class metadata for `{name}`: {} properties",
            metadata.properties.len()
        );

        self.cache.set(&key, metadata.clone());
        Ok(metadata)
    }

    fn build(&self, class: &ClassDef) -> Result<ClassMetadata> {
        let directives = self.directives.class_directives(class);
        let virtual_wrapper = match directives.virtual_property() {
            None => None,
            Some(Some(key)) => Some(String::from(key)),
            Some(None) => {
                return Err(Error::config(alloc::format!(
                    "class `{}` declares a virtual wrapper without a key",
                    class.name()
                )));
            }
        };

        let mut metadata = ClassMetadata {
            name: class.class_name().clone(),
            directives,
            properties: PropertyCollection::default(),
            virtual_wrapper,
            skip_serialize: false,
            skip_deserialize: false,
            runtime_serialize: false,
            runtime_deserialize: false,
        };

        let mut seen = HashSet::new();
        for declaring in class.ancestry() {
            for def in declaring.properties() {
                if seen.insert(def.name()) {
                    let property = self.real_property(class, declaring, def)?;
                    self.add_property(&mut metadata, property)?;
                }
            }
        }

        let mut seen = HashSet::new();
        for declaring in class.ancestry() {
            for method in declaring.methods() {
                if !seen.insert(method.name()) {
                    continue;
                }
                let directives = self.directives.method_directives(class, method.name());
                let Some(name) = directives.virtual_property().map(|n| n.map(String::from)) else {
                    continue;
                };
                let property = self.virtual_property(class, method, name.as_deref(), directives)?;
                self.add_property(&mut metadata, property)?;
            }
        }

        let excluder = &self.excluder;
        metadata.skip_serialize = excluder.exclude_class_serialize(&metadata)?;
        metadata.skip_deserialize = excluder.exclude_class_deserialize(&metadata)?;
        metadata.runtime_serialize =
            excluder.has_runtime_class_strategies(Direction::Serialize, &metadata.directives);
        metadata.runtime_deserialize =
            excluder.has_runtime_class_strategies(Direction::Deserialize, &metadata.directives);

        if !self.visitors.is_empty() {
            for visitor in &self.visitors {
                visitor.on_loaded(&mut metadata);
            }
            metadata
                .properties
                .retain(|p| !(p.skip_serialize && p.skip_deserialize));
        }
        Ok(metadata)
    }

    fn serialized_name(&self, name: &str, directives: &DirectiveSet) -> String {
        match directives.serialized_name() {
            Some(serialized) => String::from(serialized),
            None => self.property_naming.translate_name(name),
        }
    }

    fn real_property(
        &self,
        class: &ClassDef,
        declaring: &ClassDef,
        def: &PropertyDef,
    ) -> Result<PropertyMetadata> {
        let directives = self.directives.property_directives(class, def.name());

        let ty = if let Some(expr) = directives.type_expr() {
            TypeDescriptor::parse(expr)?
        } else if let Some(hint) = def.type_hint() {
            TypeDescriptor::parse(hint)?
        } else {
            match def.default() {
                Some(value) if !value.is_null() => TypeDescriptor::from_value(value),
                _ => TypeDescriptor::wildcard(),
            }
        };

        let (getter, setter) =
            accessor::resolve(class, declaring, def, &directives, &*self.method_naming)?;

        Ok(PropertyMetadata {
            name: String::from(def.name()),
            serialized_name: self.serialized_name(def.name(), &directives),
            ty,
            getter,
            setter,
            modifiers: def.modifiers(),
            directives,
            class_name: class.class_name().clone(),
            declaring_class: declaring.class_name().clone(),
            is_virtual: false,
            skip_serialize: false,
            skip_deserialize: false,
            runtime_serialize: false,
            runtime_deserialize: false,
            adapter: OnceLock::new(),
        })
    }

    fn virtual_property(
        &self,
        class: &ClassDef,
        method: &MethodDef,
        name: Option<&str>,
        directives: DirectiveSet,
    ) -> Result<PropertyMetadata> {
        if !method.accepts(0) {
            return Err(Error::config(alloc::format!(
                "virtual property method `{}::{}` must take no arguments",
                class.name(),
                method.name()
            )));
        }

        let name = name.unwrap_or(method.name());
        let ty = match directives.type_expr().or(method.return_hint()) {
            Some(expr) => TypeDescriptor::parse(expr)?,
            None => TypeDescriptor::wildcard(),
        };

        Ok(PropertyMetadata {
            name: String::from(name),
            serialized_name: self.serialized_name(name, &directives),
            ty,
            getter: GetterStrategy::Method(String::from(method.name())),
            setter: SetterStrategy::Noop,
            modifiers: method.modifiers(),
            directives,
            class_name: class.class_name().clone(),
            declaring_class: class.class_name().clone(),
            is_virtual: true,
            skip_serialize: false,
            skip_deserialize: true,
            runtime_serialize: false,
            runtime_deserialize: false,
            adapter: OnceLock::new(),
        })
    }

    fn add_property(&self, metadata: &mut ClassMetadata, mut property: PropertyMetadata) -> Result<()> {
        let excluder = &self.excluder;
        let class_directives = &metadata.directives;

        property.skip_serialize = excluder.exclude_property_serialize(&property, class_directives)?;
        property.skip_deserialize = property.is_virtual
            || excluder.exclude_property_deserialize(&property, class_directives)?;

        if property.skip_serialize && property.skip_deserialize {
            log::trace!("`{}::{}` is excluded", metadata.name, property.name);
            return Ok(());
        }

        property.runtime_serialize = excluder.has_runtime_property_strategies(
            Direction::Serialize,
            &property.directives,
            class_directives,
        );
        property.runtime_deserialize = excluder.has_runtime_property_strategies(
            Direction::Deserialize,
            &property.directives,
            class_directives,
        );

        metadata.properties.insert(property).map_err(|p| {
            Error::config(alloc::format!(
                "class `{}` maps two properties to the serialized name `{}`",
                metadata.name,
                p.serialized_name
            ))
        })
    }
}

impl fmt::Debug for ClassMetadataFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassMetadataFactory")
            .field("namespace", &self.namespace)
            .field("excluder", &self.excluder)
            .field("visitors", &self.visitors.len())
            .finish_non_exhaustive()
    }
}
