use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Directive

/// A declared, static piece of metadata attached to a class, property or method.
///
/// Directives are the annotations of the mapping engine. They are stored in a
/// [`DirectiveSet`], where at most one directive of each [`DirectiveKind`] is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directive {
    /// Skip the member (or class) in the given directions.
    Exclude { serialize: bool, deserialize: bool },
    /// Mark the member (or every member of a class) as exposed in the given directions.
    ///
    /// Only meaningful when the engine requires explicit exposure.
    Expose { serialize: bool, deserialize: bool },
    /// Override the JSON key of a property.
    SerializedName(String),
    /// The member exists since this version (inclusive).
    Since(String),
    /// The member exists until this version (exclusive).
    Until(String),
    /// Override the declared type with a type expression, e.g. `list<int>`.
    Type(String),
    /// Read and write the property through the named methods.
    Accessor {
        get: Option<String>,
        set: Option<String>,
    },
    /// Use the handler registered under this name as the codec.
    JsonAdapter(String),
    /// On a method: expose its return value as a serialize-only property.
    ///
    /// On a class: nest the serialized object under this key.
    VirtualProperty(Option<String>),
    /// Opt into runtime exclusion strategies when they are restricted to marked members.
    ExclusionCheck,
}

impl Directive {
    /// Shortcut for an `Exclude` directive covering both directions.
    #[inline]
    pub const fn exclude() -> Self {
        Self::Exclude {
            serialize: true,
            deserialize: true,
        }
    }

    /// Shortcut for an `Expose` directive covering both directions.
    #[inline]
    pub const fn expose() -> Self {
        Self::Expose {
            serialize: true,
            deserialize: true,
        }
    }

    /// Returns the kind of this directive.
    pub const fn kind(&self) -> DirectiveKind {
        match self {
            Self::Exclude { .. } => DirectiveKind::Exclude,
            Self::Expose { .. } => DirectiveKind::Expose,
            Self::SerializedName(_) => DirectiveKind::SerializedName,
            Self::Since(_) => DirectiveKind::Since,
            Self::Until(_) => DirectiveKind::Until,
            Self::Type(_) => DirectiveKind::Type,
            Self::Accessor { .. } => DirectiveKind::Accessor,
            Self::JsonAdapter(_) => DirectiveKind::JsonAdapter,
            Self::VirtualProperty(_) => DirectiveKind::VirtualProperty,
            Self::ExclusionCheck => DirectiveKind::ExclusionCheck,
        }
    }
}

/// The key of a [`Directive`] inside a [`DirectiveSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectiveKind {
    Exclude,
    Expose,
    SerializedName,
    Since,
    Until,
    Type,
    Accessor,
    JsonAdapter,
    VirtualProperty,
    ExclusionCheck,
}

impl DirectiveKind {
    /// Returns `true` if a directive of this kind may be attached to `target`.
    pub const fn applies_to(self, target: DirectiveTarget) -> bool {
        match self {
            Self::Exclude | Self::Expose | Self::Since | Self::Until => true,
            Self::ExclusionCheck | Self::JsonAdapter => true,
            Self::SerializedName | Self::Type => {
                matches!(target, DirectiveTarget::Property | DirectiveTarget::Method)
            }
            Self::Accessor => matches!(target, DirectiveTarget::Property),
            Self::VirtualProperty => {
                matches!(target, DirectiveTarget::Class | DirectiveTarget::Method)
            }
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a [`DirectiveSet`] is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectiveTarget {
    Class,
    Property,
    Method,
}

// -----------------------------------------------------------------------------
// DirectiveSet

/// A per-target collection of directives.
///
/// The first directive of each kind wins; later duplicates of the same kind
/// are ignored. Directives that do not apply to the target are rejected.
///
/// # Examples
///
/// ```
/// use vc_object::{Directive, DirectiveKind, DirectiveSet, DirectiveTarget};
///
/// let mut set = DirectiveSet::new(DirectiveTarget::Property);
/// assert!(set.add(Directive::SerializedName("id".into())));
/// assert!(!set.add(Directive::SerializedName("ignored".into())));
/// assert!(!set.add(Directive::VirtualProperty(None)));
///
/// assert_eq!(set.serialized_name(), Some("id"));
/// assert!(!set.contains(DirectiveKind::VirtualProperty));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveSet {
    target: DirectiveTarget,
    items: Vec<Directive>,
}

impl DirectiveSet {
    /// Creates an empty set for `target`.
    #[inline]
    pub const fn new(target: DirectiveTarget) -> Self {
        Self {
            target,
            items: Vec::new(),
        }
    }

    #[inline]
    pub const fn target(&self) -> DirectiveTarget {
        self.target
    }

    /// Adds a directive, returning `false` if a directive of the same kind is
    /// already present or if the directive does not apply to this target.
    pub fn add(&mut self, directive: Directive) -> bool {
        let kind = directive.kind();
        if !kind.applies_to(self.target) || self.contains(kind) {
            return false;
        }
        self.items.push(directive);
        true
    }

    /// Builder form of [`add`](Self::add).
    #[inline]
    pub fn with(mut self, directive: Directive) -> Self {
        self.add(directive);
        self
    }

    /// Adds every directive of `other` whose kind is not present yet.
    ///
    /// Merging a parent's set into a child's set gives child-over-parent precedence.
    pub fn merge_from(&mut self, other: &DirectiveSet) {
        for directive in &other.items {
            self.add(directive.clone());
        }
    }

    /// Returns the directive of the given kind, if present.
    pub fn get(&self, kind: DirectiveKind) -> Option<&Directive> {
        self.items.iter().find(|d| d.kind() == kind)
    }

    #[inline]
    pub fn contains(&self, kind: DirectiveKind) -> bool {
        self.get(kind).is_some()
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Directive> {
        self.items.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the `(serialize, deserialize)` flags of the `Exclude` directive.
    pub fn exclude(&self) -> Option<(bool, bool)> {
        match self.get(DirectiveKind::Exclude) {
            Some(Directive::Exclude {
                serialize,
                deserialize,
            }) => Some((*serialize, *deserialize)),
            _ => None,
        }
    }

    /// Returns the `(serialize, deserialize)` flags of the `Expose` directive.
    pub fn expose(&self) -> Option<(bool, bool)> {
        match self.get(DirectiveKind::Expose) {
            Some(Directive::Expose {
                serialize,
                deserialize,
            }) => Some((*serialize, *deserialize)),
            _ => None,
        }
    }

    pub fn serialized_name(&self) -> Option<&str> {
        match self.get(DirectiveKind::SerializedName) {
            Some(Directive::SerializedName(name)) => Some(name),
            _ => None,
        }
    }

    pub fn since(&self) -> Option<&str> {
        match self.get(DirectiveKind::Since) {
            Some(Directive::Since(v)) => Some(v),
            _ => None,
        }
    }

    pub fn until(&self) -> Option<&str> {
        match self.get(DirectiveKind::Until) {
            Some(Directive::Until(v)) => Some(v),
            _ => None,
        }
    }

    pub fn type_expr(&self) -> Option<&str> {
        match self.get(DirectiveKind::Type) {
            Some(Directive::Type(v)) => Some(v),
            _ => None,
        }
    }

    /// Returns the `(getter, setter)` method names of the `Accessor` directive.
    pub fn accessor(&self) -> Option<(Option<&str>, Option<&str>)> {
        match self.get(DirectiveKind::Accessor) {
            Some(Directive::Accessor { get, set }) => Some((get.as_deref(), set.as_deref())),
            _ => None,
        }
    }

    pub fn json_adapter(&self) -> Option<&str> {
        match self.get(DirectiveKind::JsonAdapter) {
            Some(Directive::JsonAdapter(v)) => Some(v),
            _ => None,
        }
    }

    /// Returns the optional name carried by the `VirtualProperty` directive.
    ///
    /// The outer `Option` is `None` when the directive is absent.
    pub fn virtual_property(&self) -> Option<Option<&str>> {
        match self.get(DirectiveKind::VirtualProperty) {
            Some(Directive::VirtualProperty(v)) => Some(v.as_deref()),
            _ => None,
        }
    }

    #[inline]
    pub fn has_exclusion_check(&self) -> bool {
        self.contains(DirectiveKind::ExclusionCheck)
    }
}

impl<'a> IntoIterator for &'a DirectiveSet {
    type Item = &'a Directive;
    type IntoIter = core::slice::Iter<'a, Directive>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Directive, DirectiveSet, DirectiveTarget};

    #[test]
    fn merge_keeps_child_directives() {
        let mut child = DirectiveSet::new(DirectiveTarget::Property)
            .with(Directive::SerializedName("child".into()));
        let parent = DirectiveSet::new(DirectiveTarget::Property)
            .with(Directive::SerializedName("parent".into()))
            .with(Directive::Since("2".into()));

        child.merge_from(&parent);
        assert_eq!(child.serialized_name(), Some("child"));
        assert_eq!(child.since(), Some("2"));
        assert_eq!(child.len(), 2);
    }

    #[test]
    fn accessor_only_on_properties() {
        let accessor = Directive::Accessor {
            get: Some("name".into()),
            set: None,
        };
        let mut class = DirectiveSet::new(DirectiveTarget::Class);
        assert!(!class.add(accessor.clone()));

        let mut prop = DirectiveSet::new(DirectiveTarget::Property);
        assert!(prop.add(accessor));
        assert_eq!(prop.accessor(), Some((Some("name"), None)));
    }
}
