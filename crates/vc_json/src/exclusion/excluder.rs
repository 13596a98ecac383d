use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use vc_object::{DirectiveSet, Modifiers};

use super::{Direction, ExclusionData, ExclusionStrategy, Version};
use crate::Result;
use crate::metadata::{ClassMetadata, PropertyMetadata};

// -----------------------------------------------------------------------------
// Excluder

/// Decides which classes and properties are skipped.
///
/// Static checks, evaluated once per class or property while metadata is built:
///
/// 1. an `Exclude` directive naming the direction;
/// 2. the version range of `Since` (inclusive) and `Until` (exclusive),
///    when a version is configured;
/// 3. the excluded-modifier mask (properties only);
/// 4. with require-expose, an `Expose` directive naming the direction on
///    the property or its class (properties only);
/// 5. cacheable strategies, in registration order.
///
/// The first rule that excludes wins. Non-cacheable strategies are runtime
/// strategies: metadata only records whether they apply, the reflection codec
/// then asks [`skip_class_runtime`](Self::skip_class_runtime) and
/// [`skip_property_runtime`](Self::skip_property_runtime) per value.
///
/// With require-exclusion-check, strategies only apply to classes and
/// properties marked with `ExclusionCheck` (on the property or its class).
pub struct Excluder {
    version: Option<Version>,
    excluded_modifiers: Modifiers,
    require_expose: bool,
    require_exclusion_check: bool,
    serialize: Vec<Arc<dyn ExclusionStrategy>>,
    deserialize: Vec<Arc<dyn ExclusionStrategy>>,
    runtime_serialize: Vec<Arc<dyn ExclusionStrategy>>,
    runtime_deserialize: Vec<Arc<dyn ExclusionStrategy>>,
}

impl Default for Excluder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Excluder {
    /// Creates an excluder skipping static members only.
    pub fn new() -> Self {
        Self {
            version: None,
            excluded_modifiers: Modifiers::STATIC,
            require_expose: false,
            require_exclusion_check: false,
            serialize: Vec::new(),
            deserialize: Vec::new(),
            runtime_serialize: Vec::new(),
            runtime_deserialize: Vec::new(),
        }
    }

    #[inline]
    pub fn set_version(&mut self, version: Option<Version>) {
        self.version = version;
    }

    #[inline]
    pub fn set_excluded_modifiers(&mut self, modifiers: Modifiers) {
        self.excluded_modifiers = modifiers;
    }

    #[inline]
    pub fn set_require_expose(&mut self, require: bool) {
        self.require_expose = require;
    }

    #[inline]
    pub fn set_require_exclusion_check(&mut self, require: bool) {
        self.require_exclusion_check = require;
    }

    /// Registers a strategy for the given directions.
    pub fn add_strategy(
        &mut self,
        strategy: Arc<dyn ExclusionStrategy>,
        serialize: bool,
        deserialize: bool,
    ) {
        let cacheable = strategy.cacheable();
        if serialize {
            let list = match cacheable {
                true => &mut self.serialize,
                false => &mut self.runtime_serialize,
            };
            list.push(strategy.clone());
        }
        if deserialize {
            let list = match cacheable {
                true => &mut self.deserialize,
                false => &mut self.runtime_deserialize,
            };
            list.push(strategy);
        }
    }

    #[inline]
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    #[inline]
    pub fn excluded_modifiers(&self) -> Modifiers {
        self.excluded_modifiers
    }

    fn strategies(&self, direction: Direction) -> &[Arc<dyn ExclusionStrategy>] {
        match direction {
            Direction::Serialize => &self.serialize,
            Direction::Deserialize => &self.deserialize,
        }
    }

    fn runtime_strategies(&self, direction: Direction) -> &[Arc<dyn ExclusionStrategy>] {
        match direction {
            Direction::Serialize => &self.runtime_serialize,
            Direction::Deserialize => &self.runtime_deserialize,
        }
    }

    fn strategies_apply(&self, property: Option<&DirectiveSet>, class: &DirectiveSet) -> bool {
        !self.require_exclusion_check
            || class.has_exclusion_check()
            || property.is_some_and(DirectiveSet::has_exclusion_check)
    }

    // Steps shared by classes and properties: explicit exclusion, then versions.
    fn excluded_by_directives(&self, direction: Direction, directives: &DirectiveSet) -> Result<bool> {
        if let Some((serialize, deserialize)) = directives.exclude() {
            let excluded = match direction {
                Direction::Serialize => serialize,
                Direction::Deserialize => deserialize,
            };
            if excluded {
                return Ok(true);
            }
        }

        let Some(version) = &self.version else {
            return Ok(false);
        };
        if let Some(since) = directives.since() {
            if *version < Version::parse(since)? {
                return Ok(true);
            }
        }
        if let Some(until) = directives.until() {
            if *version >= Version::parse(until)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn exposed(direction: Direction, directives: &DirectiveSet) -> bool {
        match directives.expose() {
            Some((serialize, deserialize)) => match direction {
                Direction::Serialize => serialize,
                Direction::Deserialize => deserialize,
            },
            None => false,
        }
    }

    /// Evaluates the static rules for a class.
    pub fn exclude_class(&self, direction: Direction, class: &ClassMetadata) -> Result<bool> {
        if self.excluded_by_directives(direction, class.directives())? {
            return Ok(true);
        }
        if !self.strategies_apply(None, class.directives()) {
            return Ok(false);
        }
        let data = ExclusionData::build_time(direction);
        Ok(self
            .strategies(direction)
            .iter()
            .any(|s| s.skip_class(class, &data)))
    }

    /// Evaluates the static rules for a property of a class with `class_directives`.
    pub fn exclude_property(
        &self,
        direction: Direction,
        property: &PropertyMetadata,
        class_directives: &DirectiveSet,
    ) -> Result<bool> {
        if self.excluded_by_directives(direction, property.directives())? {
            return Ok(true);
        }
        if property.modifiers().intersects(self.excluded_modifiers) {
            return Ok(true);
        }
        if self.require_expose
            && !Self::exposed(direction, property.directives())
            && !Self::exposed(direction, class_directives)
        {
            return Ok(true);
        }
        if !self.strategies_apply(Some(property.directives()), class_directives) {
            return Ok(false);
        }
        let data = ExclusionData::build_time(direction);
        Ok(self
            .strategies(direction)
            .iter()
            .any(|s| s.skip_property(property, &data)))
    }

    #[inline]
    pub fn exclude_class_serialize(&self, class: &ClassMetadata) -> Result<bool> {
        self.exclude_class(Direction::Serialize, class)
    }

    #[inline]
    pub fn exclude_class_deserialize(&self, class: &ClassMetadata) -> Result<bool> {
        self.exclude_class(Direction::Deserialize, class)
    }

    #[inline]
    pub fn exclude_property_serialize(
        &self,
        property: &PropertyMetadata,
        class_directives: &DirectiveSet,
    ) -> Result<bool> {
        self.exclude_property(Direction::Serialize, property, class_directives)
    }

    #[inline]
    pub fn exclude_property_deserialize(
        &self,
        property: &PropertyMetadata,
        class_directives: &DirectiveSet,
    ) -> Result<bool> {
        self.exclude_property(Direction::Deserialize, property, class_directives)
    }

    /// Returns `true` if runtime strategies must be consulted for the class.
    pub fn has_runtime_class_strategies(
        &self,
        direction: Direction,
        class_directives: &DirectiveSet,
    ) -> bool {
        !self.runtime_strategies(direction).is_empty() && self.strategies_apply(None, class_directives)
    }

    /// Returns `true` if runtime strategies must be consulted for the property.
    pub fn has_runtime_property_strategies(
        &self,
        direction: Direction,
        property_directives: &DirectiveSet,
        class_directives: &DirectiveSet,
    ) -> bool {
        !self.runtime_strategies(direction).is_empty()
            && self.strategies_apply(Some(property_directives), class_directives)
    }

    /// Asks the runtime strategies whether to skip a class for this value.
    pub fn skip_class_runtime(&self, class: &ClassMetadata, data: &ExclusionData<'_>) -> bool {
        self.runtime_strategies(data.direction)
            .iter()
            .any(|s| s.skip_class(class, data))
    }

    /// Asks the runtime strategies whether to skip a property for this value.
    pub fn skip_property_runtime(
        &self,
        property: &PropertyMetadata,
        data: &ExclusionData<'_>,
    ) -> bool {
        self.runtime_strategies(data.direction)
            .iter()
            .any(|s| s.skip_property(property, data))
    }
}

impl fmt::Debug for Excluder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Excluder")
            .field("version", &self.version)
            .field("excluded_modifiers", &self.excluded_modifiers)
            .field("require_expose", &self.require_expose)
            .field("require_exclusion_check", &self.require_exclusion_check)
            .field("serialize", &self.serialize.len())
            .field("deserialize", &self.deserialize.len())
            .field("runtime_serialize", &self.runtime_serialize.len())
            .field("runtime_deserialize", &self.runtime_deserialize.len())
            .finish()
    }
}
