#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_json as json;
pub use vc_object as object;

pub use vc_json::{Error, ErrorKind, Gson, GsonBuilder, JsonValue, Result};
pub use vc_object::{ClassDef, ClassLoader, Directive, ObjectRef, PropertyDef, Value};
