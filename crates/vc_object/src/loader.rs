use alloc::string::String;
use alloc::sync::Arc;

use hashbrown::HashMap;

use crate::{ClassDef, ClassName, ObjectError};

// -----------------------------------------------------------------------------
// ClassRegistration

/// A class declaration submitted for automatic registration.
///
/// Created by [`submit_class!`](crate::submit_class), collected by
/// [`ClassLoader::auto_register`].
#[derive(Debug, Clone, Copy)]
pub struct ClassRegistration {
    declare: fn() -> Arc<ClassDef>,
}

impl ClassRegistration {
    #[inline]
    pub const fn new(declare: fn() -> Arc<ClassDef>) -> Self {
        Self { declare }
    }

    #[inline]
    pub fn declare(&self) -> Arc<ClassDef> {
        (self.declare)()
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(ClassRegistration);

/// Submits a class declaration function for [`ClassLoader::auto_register`].
///
/// Without the `auto_register` feature the submission is dropped.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_object::{ClassDef, ClassLoader, PropertyDef};
///
/// fn declare_tag() -> Arc<ClassDef> {
///     ClassDef::builder("Tag")
///         .property(PropertyDef::new("label").typed("string"))
///         .build()
/// }
///
/// vc_object::submit_class!(declare_tag);
///
/// let mut loader = ClassLoader::new();
/// if loader.auto_register() {
///     assert!(loader.contains("Tag"));
/// }
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! submit_class {
    ($declare:path) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::ClassRegistration::new($declare)
        }
    };
}

#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! submit_class {
    ($declare:path) => {
        const _: $crate::ClassRegistration = $crate::ClassRegistration::new($declare);
    };
}

// -----------------------------------------------------------------------------
// ClassLoader

/// Name based lookup of class declarations.
///
/// Registering a class also registers its ancestors.
#[derive(Debug, Clone, Default)]
pub struct ClassLoader {
    classes: HashMap<ClassName, Arc<ClassDef>>,
}

impl ClassLoader {
    /// Creates an empty loader.
    #[inline]
    pub fn new() -> Self {
        Self {
            classes: HashMap::new(),
        }
    }

    /// Registers `class` and every ancestor not registered yet.
    ///
    /// A class registered again under the same name replaces the previous declaration.
    pub fn register(&mut self, class: Arc<ClassDef>) {
        let mut parent = class.parent().cloned();
        self.classes.insert(class.class_name().clone(), class);

        while let Some(current) = parent {
            parent = current.parent().cloned();
            self.classes
                .entry(current.class_name().clone())
                .or_insert(current);
        }
    }

    /// Registers every class submitted with [`submit_class!`](crate::submit_class).
    ///
    /// Returns `false` if the `auto_register` feature is disabled or nothing was collected.
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            let mut any = false;
            for registration in inventory::iter::<ClassRegistration> {
                self.register(registration.declare());
                any = true;
            }
            any
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    /// Returns the class named `name`.
    pub fn get(&self, name: &str) -> Result<Arc<ClassDef>, ObjectError> {
        self.classes
            .get(name)
            .cloned()
            .ok_or_else(|| ObjectError::ClassNotFound(String::from(name)))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterates over registered class names, in no particular order.
    #[inline]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(|name| &**name)
    }
}

#[cfg(test)]
mod tests {
    use super::ClassLoader;
    use crate::{ClassDef, ObjectError};

    #[test]
    fn register_includes_ancestors() {
        let base = ClassDef::builder("Base").build();
        let child = ClassDef::builder("Child").extends(base).build();

        let mut loader = ClassLoader::new();
        loader.register(child);

        assert_eq!(loader.len(), 2);
        assert!(loader.contains("Base"));
        assert_eq!(loader.get("Child").unwrap().name(), "Child");
        assert_eq!(
            loader.get("Missing").unwrap_err(),
            ObjectError::ClassNotFound("Missing".into())
        );
    }
}
