use serde_json::Value as JsonValue;
use vc_object::ObjectRef;

use crate::context::Attributes;
use crate::metadata::{ClassMetadata, PropertyMetadata};

/// The direction of a mapping call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Serialize,
    Deserialize,
}

/// Data available to an exclusion strategy.
///
/// Static checks run while metadata is built and see no data at all.
/// Runtime checks see the live object (when serializing, or the instance
/// being populated), the JSON object being read, and the call attributes.
#[derive(Debug, Clone, Copy)]
pub struct ExclusionData<'a> {
    pub direction: Direction,
    pub object: Option<&'a ObjectRef>,
    pub payload: Option<&'a JsonValue>,
    pub attributes: Option<&'a Attributes>,
}

impl<'a> ExclusionData<'a> {
    /// Data for a check made while building metadata.
    #[inline]
    pub const fn build_time(direction: Direction) -> Self {
        Self {
            direction,
            object: None,
            payload: None,
            attributes: None,
        }
    }
}

/// A user-supplied exclusion predicate.
///
/// Cacheable strategies are evaluated once per class or property when the
/// metadata is built. Others run for every value, and only for the
/// directions they were registered for.
///
/// # Examples
///
/// ```
/// use vc_json::exclusion::{ExclusionData, ExclusionStrategy};
/// use vc_json::metadata::{ClassMetadata, PropertyMetadata};
///
/// struct SkipPasswords;
///
/// impl ExclusionStrategy for SkipPasswords {
///     fn skip_class(&self, _: &ClassMetadata, _: &ExclusionData<'_>) -> bool {
///         false
///     }
///
///     fn skip_property(&self, property: &PropertyMetadata, _: &ExclusionData<'_>) -> bool {
///         property.name() == "password"
///     }
/// }
/// ```
pub trait ExclusionStrategy: Send + Sync {
    fn skip_class(&self, class: &ClassMetadata, data: &ExclusionData<'_>) -> bool;

    fn skip_property(&self, property: &PropertyMetadata, data: &ExclusionData<'_>) -> bool;

    /// Returns `false` if the result depends on the data being mapped.
    #[inline]
    fn cacheable(&self) -> bool {
        true
    }
}
