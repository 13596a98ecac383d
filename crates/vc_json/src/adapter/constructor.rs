use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use hashbrown::HashMap;
use vc_object::{ClassDef, ClassLoader, ObjectRef};

use crate::types::TypeDescriptor;
use crate::{Error, Result};

// -----------------------------------------------------------------------------
// InstanceCreator

/// Builds the objects of one type when reading.
///
/// Needed for abstract classes, and for classes whose constructor hook
/// cannot run without arguments.
///
/// # Examples
///
/// ```
/// use vc_json::adapter::InstanceCreator;
/// use vc_json::types::TypeDescriptor;
/// use vc_object::{ClassDef, ObjectRef, PropertyDef};
///
/// let circle = ClassDef::builder("Circle")
///     .property(PropertyDef::new("radius").typed("float"))
///     .build();
///
/// let creator = move |_: &TypeDescriptor| -> vc_json::Result<ObjectRef> { Ok(circle.new_object()?) };
/// let object: ObjectRef = creator.create_instance(&TypeDescriptor::class("Shape")).unwrap();
/// assert_eq!(object.read().class_name(), "Circle");
/// ```
pub trait InstanceCreator: Send + Sync {
    fn create_instance(&self, ty: &TypeDescriptor) -> Result<ObjectRef>;
}

impl<F> InstanceCreator for F
where
    F: Fn(&TypeDescriptor) -> Result<ObjectRef> + Send + Sync,
{
    #[inline]
    fn create_instance(&self, ty: &TypeDescriptor) -> Result<ObjectRef> {
        self(ty)
    }
}

// -----------------------------------------------------------------------------
// ObjectConstructor

/// How the reflection codec obtains the object it populates.
#[derive(Clone)]
pub enum ObjectConstructor {
    /// A registered [`InstanceCreator`].
    Creator(Arc<dyn InstanceCreator>, TypeDescriptor),
    /// A fresh instance of the class: defaults, then constructor hooks.
    Class(Arc<ClassDef>),
}

impl ObjectConstructor {
    /// Returns `existing` when given, a new object otherwise.
    pub fn construct(&self, existing: Option<&ObjectRef>) -> Result<ObjectRef> {
        if let Some(object) = existing {
            return Ok(object.clone());
        }
        match self {
            Self::Creator(creator, ty) => creator.create_instance(ty),
            Self::Class(class) => Ok(class.new_object()?),
        }
    }
}

impl fmt::Debug for ObjectConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Creator(_, ty) => f.debug_tuple("Creator").field(ty).finish(),
            Self::Class(class) => f.debug_tuple("Class").field(&class.name()).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// ConstructorRegistry

/// Instance creators keyed by canonical type, with class construction as
/// the default.
pub struct ConstructorRegistry {
    creators: HashMap<String, Arc<dyn InstanceCreator>>,
    loader: Arc<ClassLoader>,
}

impl ConstructorRegistry {
    pub fn new(loader: Arc<ClassLoader>) -> Self {
        Self {
            creators: HashMap::new(),
            loader,
        }
    }

    /// Registers `creator` for exactly `ty`.
    pub fn insert(&mut self, ty: &TypeDescriptor, creator: Arc<dyn InstanceCreator>) {
        self.creators.insert(alloc::format!("{ty}"), creator);
    }

    /// Returns the constructor of `ty`.
    ///
    /// Abstract classes without a creator are only rejected when an object
    /// is actually constructed, so they can still be written.
    pub fn get(&self, ty: &TypeDescriptor) -> Result<ObjectConstructor> {
        let key = alloc::format!("{ty}");
        if let Some(creator) = self.creators.get(&key) {
            return Ok(ObjectConstructor::Creator(creator.clone(), ty.clone()));
        }
        let name = ty
            .class_name()
            .ok_or_else(|| Error::config(alloc::format!("cannot construct `{ty}`")))?;
        Ok(ObjectConstructor::Class(self.loader.get(name)?))
    }
}

impl fmt::Debug for ConstructorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorRegistry")
            .field("creators", &self.creators.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use vc_object::{ClassDef, ClassLoader, ObjectRef, PropertyDef, Value};

    use super::ConstructorRegistry;
    use crate::ErrorKind;
    use crate::types::TypeDescriptor;

    #[test]
    fn creators_and_classes() {
        let shape = ClassDef::builder("Shape").mark_abstract().build();
        let circle = ClassDef::builder("Circle")
            .extends(shape.clone())
            .property(PropertyDef::new("radius").default_value(1.0))
            .build();

        let mut loader = ClassLoader::new();
        loader.register(shape);
        loader.register(circle.clone());
        let loader = Arc::new(loader);

        let mut registry = ConstructorRegistry::new(loader.clone());
        let err = registry
            .get(&TypeDescriptor::class("Shape"))
            .unwrap()
            .construct(None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let from_circle = circle.clone();
        registry.insert(
            &TypeDescriptor::class("Shape"),
            Arc::new(move |_: &TypeDescriptor| -> crate::Result<ObjectRef> {
                Ok(from_circle.new_object()?)
            }),
        );
        let object = registry
            .get(&TypeDescriptor::class("Shape"))
            .unwrap()
            .construct(None)
            .unwrap();
        assert_eq!(object.read().get("radius"), Some(&Value::Float(1.0)));

        let existing: ObjectRef = circle.new_object().unwrap();
        let same = registry
            .get(&TypeDescriptor::class("Circle"))
            .unwrap()
            .construct(Some(&existing))
            .unwrap();
        assert!(same.ptr_eq(&existing));

        let err = registry.get(&TypeDescriptor::class("Ghost")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ClassNotFound);
    }
}
