use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use crate::{ClassDef, ClassName, ObjectError, ScopeGrant, Value};

// -----------------------------------------------------------------------------
// FieldKey

/// Identifies one slot of an instance.
///
/// A child class may redeclare a property of its parent. Both slots exist,
/// keyed by their declaring class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldKey {
    pub declaring: ClassName,
    pub name: String,
}

impl FieldKey {
    #[inline]
    pub fn new(declaring: ClassName, name: impl Into<String>) -> Self {
        Self {
            declaring,
            name: name.into(),
        }
    }
}

// -----------------------------------------------------------------------------
// FieldAccess

/// A resolved way of reaching a property slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAccess {
    /// Direct access, only allowed for public members.
    Public { declaring: ClassName, name: String },
    /// Access through a scope grant of the declaring class.
    Scoped { grant: ScopeGrant, name: String },
}

impl FieldAccess {
    #[inline]
    pub fn declaring(&self) -> &ClassName {
        match self {
            Self::Public { declaring, .. } => declaring,
            Self::Scoped { grant, .. } => grant.class_name(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Self::Public { name, .. } | Self::Scoped { name, .. } => name,
        }
    }
}

// -----------------------------------------------------------------------------
// Instance

/// A live object: the class it was created from and its slots.
pub struct Instance {
    class: Arc<ClassDef>,
    slots: IndexMap<FieldKey, Value>,
}

impl Instance {
    pub(crate) fn empty(class: Arc<ClassDef>) -> Self {
        Self {
            class,
            slots: IndexMap::new(),
        }
    }

    pub(crate) fn init_slot(&mut self, declaring: ClassName, name: &str, value: Value) {
        self.slots.insert(FieldKey::new(declaring, name), value);
    }

    #[inline]
    pub fn class(&self) -> &Arc<ClassDef> {
        &self.class
    }

    #[inline]
    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    /// Returns `true` if the class of this instance is `name` or extends it.
    #[inline]
    pub fn is_instance_of(&self, name: &str) -> bool {
        self.class.is_subclass_of(name)
    }

    fn resolve(&self, name: &str) -> Option<FieldKey> {
        self.class
            .find_property(name)
            .map(|(class, _)| FieldKey::new(class.class_name().clone(), name))
    }

    /// Returns the slot `name` as seen from the most-derived class.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.resolve(name).and_then(|key| self.slots.get(&key))
    }

    /// Stores into the slot `name` as seen from the most-derived class.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), ObjectError> {
        let key = self.resolve(name).ok_or_else(|| ObjectError::MemberNotFound {
            class: String::from(self.class_name()),
            name: String::from(name),
        })?;
        self.slots.insert(key, value);
        Ok(())
    }

    /// Returns the slot of `name` declared by the class `declaring`.
    pub fn get_declared(&self, declaring: &ClassName, name: &str) -> Option<&Value> {
        self.slots.get(&FieldKey::new(declaring.clone(), name))
    }

    fn slot_mut(&mut self, declaring: &ClassName, name: &str) -> Result<&mut Value, ObjectError> {
        let class = String::from(self.class_name());
        self.slots
            .get_mut(&FieldKey::new(declaring.clone(), name))
            .ok_or_else(|| ObjectError::MemberNotFound {
                class,
                name: String::from(name),
            })
    }

    fn check_public(&self, declaring: &ClassName, name: &str) -> Result<(), ObjectError> {
        let property = self
            .class
            .find_class(declaring)
            .and_then(|class| class.property(name))
            .ok_or_else(|| ObjectError::MemberNotFound {
                class: String::from(&**declaring),
                name: String::from(name),
            })?;

        let visibility = property.modifiers().visibility();
        if property.modifiers().is_public() {
            Ok(())
        } else {
            Err(ObjectError::Inaccessible {
                class: String::from(&**declaring),
                name: String::from(name),
                visibility,
            })
        }
    }

    /// Reads a slot through a resolved access path.
    pub fn read_field(&self, access: &FieldAccess) -> Result<Value, ObjectError> {
        if let FieldAccess::Public { declaring, name } = access {
            self.check_public(declaring, name)?;
        }
        self.get_declared(access.declaring(), access.name())
            .cloned()
            .ok_or_else(|| ObjectError::MemberNotFound {
                class: String::from(self.class_name()),
                name: String::from(access.name()),
            })
    }

    /// Writes a slot through a resolved access path.
    pub fn write_field(&mut self, access: &FieldAccess, value: Value) -> Result<(), ObjectError> {
        if let FieldAccess::Public { declaring, name } = access {
            self.check_public(declaring, name)?;
        }
        *self.slot_mut(access.declaring(), access.name())? = value;
        Ok(())
    }

    /// Calls the method `name`, looked up from the most-derived class.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, ObjectError> {
        let class = self.class.clone();
        let method = class
            .find_method(name)
            .ok_or_else(|| ObjectError::MethodNotFound {
                class: String::from(class.name()),
                name: String::from(name),
            })?;
        method.invoke(self, args)
    }

    /// Iterates over every slot, root class slots first.
    #[inline]
    pub fn slots(&self) -> impl Iterator<Item = (&FieldKey, &Value)> {
        self.slots.iter()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.class.class_name() == other.class.class_name() && self.slots == other.slots
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.slots {
            map.entry(&format_args!("{}::{}", key.declaring, key.name), value);
        }
        map.finish()?;
        write!(f, " as {}", self.class.name())
    }
}

// -----------------------------------------------------------------------------
// ObjectRef

/// Shared handle to an [`Instance`].
///
/// Cloning the handle does not copy the instance. Equality compares the
/// class and slots, identical handles are always equal.
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<Instance>>);

impl ObjectRef {
    #[inline]
    pub fn new(instance: Instance) -> Self {
        Self(Arc::new(RwLock::new(instance)))
    }

    /// Takes a read lock on the instance.
    pub fn read(&self) -> RwLockReadGuard<'_, Instance> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the instance.
    pub fn write(&self) -> RwLockWriteGuard<'_, Instance> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if both handles point to the same instance.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub fn class(&self) -> Arc<ClassDef> {
        self.read().class.clone()
    }

    #[inline]
    pub fn class_name(&self) -> ClassName {
        self.read().class.class_name().clone()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.read() == *other.read()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.read(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldAccess, FieldKey};
    use crate::{ClassDef, ObjectError, PropertyDef, Value};

    #[test]
    fn redeclared_property_keeps_both_slots() {
        let base = ClassDef::builder("Base")
            .property(PropertyDef::new("id").private().default_value(1))
            .build();
        let child = ClassDef::builder("Child")
            .extends(base)
            .property(PropertyDef::new("id").default_value(2))
            .build();

        let instance = child.new_instance().unwrap();
        assert_eq!(instance.get("id"), Some(&Value::Int(2)));
        assert_eq!(instance.get_declared(&"Base".into(), "id"), Some(&Value::Int(1)));
        assert_eq!(instance.slots().count(), 2);
    }

    #[test]
    fn public_access_rejects_private_members() {
        let class = ClassDef::builder("Secret")
            .property(PropertyDef::new("code").private().default_value("x"))
            .build();
        let mut instance = class.new_instance().unwrap();

        let public = FieldAccess::Public {
            declaring: "Secret".into(),
            name: "code".into(),
        };
        assert!(matches!(
            instance.read_field(&public),
            Err(ObjectError::Inaccessible { .. })
        ));

        let scoped = FieldAccess::Scoped {
            grant: class.grant_scope().unwrap(),
            name: "code".into(),
        };
        instance.write_field(&scoped, Value::from("y")).unwrap();
        assert_eq!(instance.read_field(&scoped).unwrap(), Value::from("y"));
    }

    #[test]
    fn handles_compare_by_content() {
        let class = ClassDef::builder("Point")
            .property(PropertyDef::new("x").default_value(0))
            .build();
        let a = class.new_object().unwrap();
        let b = class.new_object().unwrap();
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));

        b.write().set("x", Value::Int(1)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn field_key_is_by_declaring_class() {
        assert_ne!(FieldKey::new("A".into(), "x"), FieldKey::new("B".into(), "x"));
    }
}
