use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;
use vc_object::{ClassName, DirectiveSet, Modifiers};

use crate::accessor::{GetterStrategy, SetterStrategy};
use crate::adapter::TypeAdapter;
use crate::exclusion::Direction;
use crate::types::TypeDescriptor;

// -----------------------------------------------------------------------------
// PropertyMetadata

/// Describes one property of a class.
///
/// Everything but the skip flags is fixed once built. The codec is attached
/// lazily on first use.
pub struct PropertyMetadata {
    pub(super) name: String,
    pub(super) serialized_name: String,
    pub(super) ty: TypeDescriptor,
    pub(super) getter: GetterStrategy,
    pub(super) setter: SetterStrategy,
    pub(super) modifiers: Modifiers,
    pub(super) directives: DirectiveSet,
    pub(super) class_name: ClassName,
    pub(super) declaring_class: ClassName,
    pub(super) is_virtual: bool,
    pub(super) skip_serialize: bool,
    pub(super) skip_deserialize: bool,
    pub(super) runtime_serialize: bool,
    pub(super) runtime_deserialize: bool,
    pub(super) adapter: OnceLock<Arc<dyn TypeAdapter>>,
}

impl PropertyMetadata {
    /// The real (declared) name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The JSON key.
    #[inline]
    pub fn serialized_name(&self) -> &str {
        &self.serialized_name
    }

    #[inline]
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    #[inline]
    pub fn getter(&self) -> &GetterStrategy {
        &self.getter
    }

    #[inline]
    pub fn setter(&self) -> &SetterStrategy {
        &self.setter
    }

    #[inline]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[inline]
    pub fn directives(&self) -> &DirectiveSet {
        &self.directives
    }

    /// The class this property was collected for.
    #[inline]
    pub fn class_name(&self) -> &ClassName {
        &self.class_name
    }

    /// The class in the ancestry that declares this property.
    #[inline]
    pub fn declaring_class(&self) -> &ClassName {
        &self.declaring_class
    }

    /// Returns `true` for properties backed by a method.
    #[inline]
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    #[inline]
    pub fn skip_serialize(&self) -> bool {
        self.skip_serialize
    }

    #[inline]
    pub fn skip_deserialize(&self) -> bool {
        self.skip_deserialize
    }

    #[inline]
    pub fn skip(&self, direction: Direction) -> bool {
        match direction {
            Direction::Serialize => self.skip_serialize,
            Direction::Deserialize => self.skip_deserialize,
        }
    }

    /// Returns `true` if runtime exclusion strategies apply in `direction`.
    #[inline]
    pub fn has_runtime_strategies(&self, direction: Direction) -> bool {
        match direction {
            Direction::Serialize => self.runtime_serialize,
            Direction::Deserialize => self.runtime_deserialize,
        }
    }

    #[inline]
    pub fn set_skip_serialize(&mut self, skip: bool) {
        self.skip_serialize = skip;
    }

    #[inline]
    pub fn set_skip_deserialize(&mut self, skip: bool) {
        self.skip_deserialize = skip;
    }

    /// Returns the attached codec, if it was resolved already.
    #[inline]
    pub fn adapter(&self) -> Option<&Arc<dyn TypeAdapter>> {
        self.adapter.get()
    }

    /// Returns the attached codec, resolving it with `init` on first use.
    ///
    /// Concurrent first uses may both resolve, the first stored codec wins.
    pub fn adapter_or_try_init<E>(
        &self,
        init: impl FnOnce() -> Result<Arc<dyn TypeAdapter>, E>,
    ) -> Result<&Arc<dyn TypeAdapter>, E> {
        if let Some(adapter) = self.adapter.get() {
            return Ok(adapter);
        }
        let adapter = init()?;
        Ok(self.adapter.get_or_init(|| adapter))
    }
}

impl fmt::Debug for PropertyMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMetadata")
            .field("name", &self.name)
            .field("serialized_name", &self.serialized_name)
            .field("ty", &self.ty)
            .field("getter", &self.getter)
            .field("setter", &self.setter)
            .field("modifiers", &self.modifiers)
            .field("declaring_class", &self.declaring_class)
            .field("is_virtual", &self.is_virtual)
            .field("skip_serialize", &self.skip_serialize)
            .field("skip_deserialize", &self.skip_deserialize)
            .field("has_adapter", &self.adapter.get().is_some())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// PropertyCollection

/// The ordered properties of a class, keyed by serialized name.
///
/// Real properties come first in most-derived-first order, then virtual ones.
#[derive(Debug, Default)]
pub struct PropertyCollection {
    items: IndexMap<String, PropertyMetadata>,
}

impl PropertyCollection {
    /// Adds a property, handing it back if its serialized name is taken.
    pub(super) fn insert(&mut self, property: PropertyMetadata) -> Result<(), PropertyMetadata> {
        if self.items.contains_key(&property.serialized_name) {
            return Err(property);
        }
        self.items
            .insert(property.serialized_name.clone(), property);
        Ok(())
    }

    pub(super) fn retain(&mut self, mut keep: impl FnMut(&PropertyMetadata) -> bool) {
        self.items.retain(|_, property| keep(property));
    }

    /// Looks up a property by JSON key.
    #[inline]
    pub fn get(&self, serialized_name: &str) -> Option<&PropertyMetadata> {
        self.items.get(serialized_name)
    }

    /// Looks up a property by real name.
    pub fn by_name(&self, name: &str) -> Option<&PropertyMetadata> {
        self.items.values().find(|p| p.name == name)
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &PropertyMetadata> {
        self.items.values()
    }

    /// Mutable iteration, only the skip flags can be changed through it.
    #[inline]
    pub fn iter_mut(&mut self) -> impl ExactSizeIterator<Item = &mut PropertyMetadata> {
        self.items.values_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a PropertyCollection {
    type Item = &'a PropertyMetadata;
    type IntoIter = indexmap::map::Values<'a, String, PropertyMetadata>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}
