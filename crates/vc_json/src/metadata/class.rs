use alloc::string::String;

use vc_object::{ClassName, DirectiveSet};

use super::PropertyCollection;
use crate::exclusion::Direction;

/// Describes how one class is mapped.
///
/// Built and cached by [`ClassMetadataFactory`](super::ClassMetadataFactory).
/// Visitors may flip skip flags before caching, nothing else changes afterwards.
#[derive(Debug)]
pub struct ClassMetadata {
    pub(super) name: ClassName,
    pub(super) directives: DirectiveSet,
    pub(super) properties: PropertyCollection,
    pub(super) virtual_wrapper: Option<String>,
    pub(super) skip_serialize: bool,
    pub(super) skip_deserialize: bool,
    pub(super) runtime_serialize: bool,
    pub(super) runtime_deserialize: bool,
}

impl ClassMetadata {
    #[inline]
    pub fn name(&self) -> &ClassName {
        &self.name
    }

    /// Class directives, resolved through the declaration chain.
    #[inline]
    pub fn directives(&self) -> &DirectiveSet {
        &self.directives
    }

    #[inline]
    pub fn properties(&self) -> &PropertyCollection {
        &self.properties
    }

    /// Mutable access for visitors, see [`PropertyCollection::iter_mut`].
    #[inline]
    pub fn properties_mut(&mut self) -> &mut PropertyCollection {
        &mut self.properties
    }

    /// The key the whole object is nested under, if any.
    #[inline]
    pub fn virtual_wrapper(&self) -> Option<&str> {
        self.virtual_wrapper.as_deref()
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
}
