//! Per-class mapping metadata.
//!
//! ## Menu
//!
//! - [`ClassMetadataFactory`]: Builds and caches [`ClassMetadata`].
//! - [`ClassMetadata`]: Class directives, skip flags and ordered properties.
//! - [`PropertyMetadata`]: One property: names, type, accessors, flags, codec.
//! - [`PropertyCollection`]: Properties keyed by serialized name.
//! - [`DirectiveReader`]: Cached directive lookups.
//! - [`ClassMetadataVisitor`]: Hook run once per class before caching.

mod class;
mod directives;
mod factory;
mod property;
mod visitor;

pub use class::ClassMetadata;
pub use directives::DirectiveReader;
pub use factory::{ClassMetadataFactory, DEFAULT_NAMESPACE};
pub use property::{PropertyCollection, PropertyMetadata};
pub use visitor::ClassMetadataVisitor;
