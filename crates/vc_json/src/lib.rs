//! A JSON mapping engine for [`vc_object`] classes.
//!
//! Values are converted by [type adapters](adapter::TypeAdapter), resolved per
//! [type descriptor](types::TypeDescriptor) through an ordered chain of
//! factories. Declared classes fall back to a reflection codec driven by
//! per-class [metadata](metadata::ClassMetadata): serialized names, accessor
//! strategies, [exclusion](exclusion) and versioning, all resolved once and
//! cached.
//!
//! ## Menu
//!
//! - [`Gson`] / [`GsonBuilder`]: The facade and its configuration.
//! - [`types`]: Type expressions such as `map<int,list<User>>`.
//! - [`adapter`]: Codecs, factories, handlers and the provider.
//! - [`metadata`]: Per-class mapping metadata.
//! - [`exclusion`]: Which classes and properties are skipped.
//! - [`naming`]: Property and accessor-method naming.
//! - [`accessor`]: How property values are read and written.
//! - [`cache`]: Memory and file caches.
//! - [`context`]: Per-call reader and writer state.
//!
//! # Examples
//!
//! ```
//! use vc_json::Gson;
//! use vc_object::{ClassDef, ClassLoader, Directive, PropertyDef};
//!
//! let user = ClassDef::builder("User")
//!     .property(PropertyDef::new("userName").typed("string"))
//!     .property(PropertyDef::new("password").directive(Directive::exclude()))
//!     .property(PropertyDef::new("tags").typed("list<string>"))
//!     .build();
//!
//! let mut loader = ClassLoader::new();
//! loader.register(user);
//! let gson = Gson::builder().set_class_loader(loader).build().unwrap();
//!
//! let json = r#"{"user_name":"ann","password":"x","tags":["a","b"]}"#;
//! let value = gson.from_json(json, "User").unwrap();
//! assert_eq!(gson.to_json(&value).unwrap(), r#"{"user_name":"ann","tags":["a","b"]}"#);
//! ```

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod error;
mod gson;

pub mod accessor;
pub mod adapter;
pub mod cache;
pub mod context;
pub mod exclusion;
pub mod metadata;
pub mod naming;
pub mod types;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use builder::GsonBuilder;
pub use error::{Error, ErrorKind, Result};
pub use gson::Gson;

/// The JSON tree of the token layer.
pub use serde_json::Value as JsonValue;
