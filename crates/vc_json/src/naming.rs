//! Property and accessor-method naming.

use alloc::string::String;
use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// Property naming

/// Translates a real property name into its serialized name.
///
/// Only consulted when the property has no `SerializedName` directive.
pub trait PropertyNamingStrategy: Send + Sync {
    fn translate_name(&self, name: &str) -> String;
}

/// Built-in property naming policies.
///
/// Word boundaries are uppercase letters (`userId` → `user` `Id`) and the
/// separators `_`, `-` and spaces.
///
/// # Examples
///
/// ```
/// use vc_json::naming::{PropertyNamingPolicy, PropertyNamingStrategy};
///
/// let policy = PropertyNamingPolicy::LowerCaseWithUnderscores;
/// assert_eq!(policy.translate_name("userId"), "user_id");
/// assert_eq!(policy.translate_name("integer"), "integer");
///
/// let policy = PropertyNamingPolicy::UpperCamelCaseWithSpaces;
/// assert_eq!(policy.translate_name("user_id"), "User Id");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PropertyNamingPolicy {
    Identity,
    /// `userId` → `user_id`
    #[default]
    LowerCaseWithUnderscores,
    /// `userId` → `user-id`
    LowerCaseWithDashes,
    /// `userId` → `USER_ID`
    UpperCaseWithUnderscores,
    /// `userId` → `USER-ID`
    UpperCaseWithDashes,
    /// `userId` → `UserId`
    UpperCamelCase,
    /// `userId` → `User Id`
    UpperCamelCaseWithSpaces,
}

impl PropertyNamingStrategy for PropertyNamingPolicy {
    fn translate_name(&self, name: &str) -> String {
        match self {
            Self::Identity => String::from(name),
            Self::LowerCaseWithUnderscores => join(name, "_", str::to_lowercase),
            Self::LowerCaseWithDashes => join(name, "-", str::to_lowercase),
            Self::UpperCaseWithUnderscores => join(name, "_", str::to_uppercase),
            Self::UpperCaseWithDashes => join(name, "-", str::to_uppercase),
            Self::UpperCamelCase => upper_first(name),
            Self::UpperCamelCaseWithSpaces => join(name, " ", upper_first),
        }
    }
}

/// Splits `name` into words.
fn words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut prev_lower = false;

    for (index, c) in name.char_indices() {
        if matches!(c, '_' | '-' | ' ') {
            if start < index {
                words.push(&name[start..index]);
            }
            start = index + c.len_utf8();
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && start < index {
            words.push(&name[start..index]);
            start = index;
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
    }
    if start < name.len() {
        words.push(&name[start..]);
    }
    words
}

fn join(name: &str, separator: &str, map: impl Fn(&str) -> String) -> String {
    let words = words(name);
    let mut out = String::with_capacity(name.len() + words.len());
    for (index, word) in words.into_iter().enumerate() {
        if index > 0 {
            out.push_str(separator);
        }
        out.push_str(&map(word));
    }
    out
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `user_id` → `UserId`, `userId` → `UserId`.
fn camel_words(name: &str) -> String {
    words(name).into_iter().map(upper_first).collect()
}

// -----------------------------------------------------------------------------
// Method naming

/// Derives accessor method names for a property.
///
/// Candidates are tried in order, the first public method of the class with
/// a matching arity is used.
pub trait MethodNamingStrategy: Send + Sync {
    fn getter_candidates(&self, property: &str) -> Vec<String>;

    fn setter_candidates(&self, property: &str) -> Vec<String>;
}

/// Built-in method naming policies.
///
/// # Examples
///
/// ```
/// use vc_json::naming::{MethodNamingPolicy, MethodNamingStrategy};
///
/// let policy = MethodNamingPolicy::Prefixed;
/// assert_eq!(policy.getter_candidates("user_id"), ["getUserId", "isUserId", "hasUserId"]);
/// assert_eq!(policy.setter_candidates("name"), ["setName"]);
///
/// let policy = MethodNamingPolicy::Snake;
/// assert_eq!(policy.getter_candidates("active"), ["active", "is_active"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MethodNamingPolicy {
    /// `getName`, `isName`, `hasName` and `setName`.
    #[default]
    Prefixed,
    /// `name`, `is_name` and `set_name`.
    Snake,
}

impl MethodNamingStrategy for MethodNamingPolicy {
    fn getter_candidates(&self, property: &str) -> Vec<String> {
        match self {
            Self::Prefixed => {
                let camel = camel_words(property);
                ["get", "is", "has"]
                    .iter()
                    .map(|prefix| alloc::format!("{prefix}{camel}"))
                    .collect()
            }
            Self::Snake => {
                let snake = join(property, "_", str::to_lowercase);
                alloc::vec![snake.clone(), alloc::format!("is_{snake}")]
            }
        }
    }

    fn setter_candidates(&self, property: &str) -> Vec<String> {
        match self {
            Self::Prefixed => alloc::vec![alloc::format!("set{}", camel_words(property))],
            Self::Snake => {
                alloc::vec![alloc::format!("set_{}", join(property, "_", str::to_lowercase))]
            }
        }
    }
}
