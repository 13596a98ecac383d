//! Type descriptors: the unit of codec dispatch.
//!
//! ## Grammar
//!
//! ```text
//! type := '?' | ident [ '<' type ( ',' type )* '>' ]
//! ```
//!
//! Whitespace between tokens is ignored. Identifiers may contain `\`, `::`,
//! `.` and `_`, so namespaced class names parse as a single name.
//!
//! ## Keywords
//!
//! | Expression            | Raw type   |
//! |-----------------------|------------|
//! | `int`, `integer`      | `Int`      |
//! | `float`, `double`     | `Float`    |
//! | `bool`, `boolean`     | `Bool`     |
//! | `string`              | `String`   |
//! | `null`                | `Null`     |
//! | `DateTime`,`datetime` | `DateTime` |
//! | `json`                | `Json`     |
//! | `array`               | `Array`    |
//! | `list`                | `List`     |
//! | `map`                 | `Map`      |
//! | `?`, `mixed`          | `Wildcard` |
//!
//! Any other identifier names a class. Scalars, `DateTime`, `json` and the
//! wildcard reject generic parameters.

mod descriptor;
mod parser;

pub use descriptor::{RawType, TypeDescriptor};
pub use parser::TypeParseError;
