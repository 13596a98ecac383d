//! Getter and setter strategies, resolved once per property.
//!
//! Precedence, per direction:
//!
//! 1. the method named by an `Accessor` directive;
//! 2. a public method named by the [`MethodNamingStrategy`];
//! 3. direct access to a public field;
//! 4. scoped access through a [`ScopeGrant`](vc_object::ScopeGrant) of the
//!    declaring class.
//!
//! A sealed class grants no scope, so a non-public property without
//! accessor methods has no legal access path and fails the metadata build.

use alloc::string::String;

use vc_object::{ClassDef, DirectiveSet, FieldAccess, ObjectRef, PropertyDef, Value};

use crate::naming::MethodNamingStrategy;
use crate::{Error, Result};

// -----------------------------------------------------------------------------
// Strategies

/// How a property value is read from an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetterStrategy {
    /// Call a method without arguments.
    Method(String),
    /// Read the slot directly, publicly or through a scope grant.
    Field(FieldAccess),
}

impl GetterStrategy {
    pub fn get(&self, object: &ObjectRef) -> Result<Value> {
        match self {
            Self::Method(name) => Ok(object.write().call(name, &[])?),
            Self::Field(access) => Ok(object.read().read_field(access)?),
        }
    }
}

/// How a property value is written to an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetterStrategy {
    /// Call a method with the value as single argument.
    Method(String),
    /// Write the slot directly, publicly or through a scope grant.
    Field(FieldAccess),
    /// Ignore the value, used by virtual properties.
    Noop,
}

impl SetterStrategy {
    pub fn set(&self, object: &ObjectRef, value: Value) -> Result<()> {
        match self {
            Self::Method(name) => {
                object.write().call(name, core::slice::from_ref(&value))?;
                Ok(())
            }
            Self::Field(access) => Ok(object.write().write_field(access, value)?),
            Self::Noop => Ok(()),
        }
    }
}

// -----------------------------------------------------------------------------
// Resolution

fn public_method(class: &ClassDef, candidates: &[String], arity: usize) -> Option<String> {
    candidates.iter().find_map(|name| {
        class
            .find_method(name)
            .filter(|m| m.modifiers().is_public() && m.accepts(arity))
            .map(|m| String::from(m.name()))
    })
}

fn field_access(class: &ClassDef, declaring: &ClassDef, property: &PropertyDef) -> Result<FieldAccess> {
    if property.modifiers().is_public() {
        return Ok(FieldAccess::Public {
            declaring: declaring.class_name().clone(),
            name: String::from(property.name()),
        });
    }
    match declaring.grant_scope() {
        Some(grant) => Ok(FieldAccess::Scoped {
            grant,
            name: String::from(property.name()),
        }),
        None => Err(Error::accessor(
            class.name(),
            property.name(),
            alloc::format!(
                "no legal access path, `{}` is sealed and declares no accessor methods",
                declaring.name()
            ),
        )),
    }
}

/// Resolves both strategies of a real property.
///
/// `class` is the class being described, `declaring` the class in its
/// ancestry that declares `property`.
pub fn resolve(
    class: &ClassDef,
    declaring: &ClassDef,
    property: &PropertyDef,
    directives: &DirectiveSet,
    naming: &dyn MethodNamingStrategy,
) -> Result<(GetterStrategy, SetterStrategy)> {
    let (get, set) = directives.accessor().unwrap_or((None, None));

    let getter = match get {
        Some(name) => GetterStrategy::Method(String::from(name)),
        None => match public_method(class, &naming.getter_candidates(property.name()), 0) {
            Some(name) => GetterStrategy::Method(name),
            None => GetterStrategy::Field(field_access(class, declaring, property)?),
        },
    };

    let setter = match set {
        Some(name) => SetterStrategy::Method(String::from(name)),
        None => match public_method(class, &naming.setter_candidates(property.name()), 1) {
            Some(name) => SetterStrategy::Method(name),
            None => SetterStrategy::Field(field_access(class, declaring, property)?),
        },
    };

    Ok((getter, setter))
}
