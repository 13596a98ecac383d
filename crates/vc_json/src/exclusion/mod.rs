//! Static and runtime exclusion of classes and properties.
//!
//! ## Menu
//!
//! - [`Excluder`]: Evaluates directives, versions, modifiers and strategies.
//! - [`ExclusionStrategy`]: User-supplied predicate, static or runtime.
//! - [`ExclusionData`]: What a runtime strategy gets to see.
//! - [`Version`]: Dotted numeric version used by `Since` / `Until`.

mod excluder;
mod strategy;
mod version;

pub use excluder::Excluder;
pub use strategy::{Direction, ExclusionData, ExclusionStrategy};
pub use version::Version;
