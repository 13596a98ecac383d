//! Class declarations and dynamic instances for the JSON mapping engine.
//!
//! Rust has no runtime reflection, so the mapping engine consumes this crate
//! instead: a small declaration service describing classes the way a
//! reflection API would.
//!
//! ## Menu
//!
//! - [`ClassDef`]: A declared class, with properties, methods, directives and an optional parent.
//! - [`ClassBuilder`]: Builder used to declare a [`ClassDef`].
//! - [`PropertyDef`] / [`MethodDef`]: Declared members.
//! - [`Modifiers`]: Visibility and modifier bitmap of a member.
//! - [`Directive`] / [`DirectiveSet`]: Static metadata attached to classes, properties and methods.
//! - [`Instance`] / [`ObjectRef`]: A live object and its shared handle.
//! - [`Value`]: The application-side value model.
//! - [`ClassLoader`]: Name based lookup of declared classes.
//!
//! ## Inheritance
//!
//! Directive lookups ([`ClassDef::class_directives`], [`ClassDef::property_directives`]
//! and [`ClassDef::method_directives`]) walk the declaration chain from the most-derived
//! class to the root. The first directive of each kind wins, so a child overrides its parent.
//!
//! ## auto_register
//!
//! With the `auto_register` feature (enabled by default), declarations submitted
//! with [`submit_class!`] are collected by [`ClassLoader::auto_register`].
//! We use the [`inventory`] crate for static registration, not all platforms support it.
//!
//! # Examples
//!
//! ```
//! use vc_object::{ClassDef, ClassLoader, PropertyDef, Value};
//!
//! let user = ClassDef::builder("User")
//!     .property(PropertyDef::new("name").typed("string"))
//!     .property(PropertyDef::new("age").typed("int").default_value(18))
//!     .build();
//!
//! let mut loader = ClassLoader::new();
//! loader.register(user);
//!
//! let object = loader.get("User").unwrap().new_object().unwrap();
//! assert_eq!(object.read().get("age"), Some(&Value::Int(18)));
//! assert_eq!(object.read().get("name"), Some(&Value::Null));
//! ```
//!
//! [`inventory`]: https://docs.rs/inventory

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod class;
mod directive;
mod error;
mod instance;
mod loader;
mod modifiers;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use class::{Ancestry, ClassBuilder, ClassDef, ClassName, ScopeGrant};
pub use class::{ConstructorHook, MethodBody, MethodDef, PropertyDef};
pub use directive::{Directive, DirectiveKind, DirectiveSet, DirectiveTarget};
pub use error::ObjectError;
pub use instance::{FieldAccess, FieldKey, Instance, ObjectRef};
pub use loader::{ClassLoader, ClassRegistration};
pub use modifiers::{Modifiers, Visibility};
pub use value::{MapKey, Value, ValueKind, ValueMap};

#[doc(hidden)]
pub mod __macro_exports {
    #[cfg(feature = "auto_register")]
    pub use inventory;
}
