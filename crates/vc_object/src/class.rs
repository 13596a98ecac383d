use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::{Directive, DirectiveSet, DirectiveTarget};
use crate::{Instance, Modifiers, ObjectError, ObjectRef, Value, Visibility};

/// Shared class name.
pub type ClassName = Arc<str>;

/// Body of a declared method.
///
/// Receives the instance the method is called on and the call arguments.
pub type MethodBody = Arc<dyn Fn(&mut Instance, &[Value]) -> Result<Value, ObjectError> + Send + Sync>;

/// Hook run after the default slots of a new instance have been filled.
pub type ConstructorHook = Arc<dyn Fn(&mut Instance) -> Result<(), ObjectError> + Send + Sync>;

// -----------------------------------------------------------------------------
// PropertyDef

/// A declared property.
///
/// Properties are public unless another visibility is set.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    name: String,
    modifiers: Modifiers,
    type_hint: Option<String>,
    default: Option<Value>,
    directives: DirectiveSet,
}

impl PropertyDef {
    /// Declares a public property.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Modifiers::PUBLIC,
            type_hint: None,
            default: None,
            directives: DirectiveSet::new(DirectiveTarget::Property),
        }
    }

    #[inline]
    pub fn private(self) -> Self {
        self.visibility(Visibility::Private)
    }

    #[inline]
    pub fn protected(self) -> Self {
        self.visibility(Visibility::Protected)
    }

    #[inline]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.modifiers = self.modifiers.with_visibility(visibility);
        self
    }

    /// Adds modifier bits, e.g. [`Modifiers::STATIC`].
    #[inline]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    /// Sets the declared type as a type expression, e.g. `"list<int>"`.
    #[inline]
    pub fn typed(mut self, expr: impl Into<String>) -> Self {
        self.type_hint = Some(expr.into());
        self
    }

    #[inline]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Attaches a directive. The first directive of each kind wins.
    #[inline]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.add(directive);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[inline]
    pub fn type_hint(&self) -> Option<&str> {
        self.type_hint.as_deref()
    }

    #[inline]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[inline]
    pub fn directives(&self) -> &DirectiveSet {
        &self.directives
    }
}

// -----------------------------------------------------------------------------
// MethodDef

/// A declared method.
#[derive(Clone)]
pub struct MethodDef {
    name: String,
    modifiers: Modifiers,
    arity: Option<usize>,
    return_hint: Option<String>,
    directives: DirectiveSet,
    body: MethodBody,
}

impl MethodDef {
    /// Declares a public method with the given body.
    ///
    /// The method accepts any number of arguments unless [`arity`](Self::arity) is set.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Instance, &[Value]) -> Result<Value, ObjectError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            modifiers: Modifiers::PUBLIC,
            arity: None,
            return_hint: None,
            directives: DirectiveSet::new(DirectiveTarget::Method),
            body: Arc::new(body),
        }
    }

    /// Declares a public method returning the value of `field`.
    pub fn getter(name: impl Into<String>, field: impl Into<String>) -> Self {
        let field: String = field.into();
        Self::new(name, move |instance, _| {
            Ok(instance.get(&field).cloned().unwrap_or_default())
        })
        .arity(0)
    }

    /// Declares a public method storing its single argument in `field`.
    pub fn setter(name: impl Into<String>, field: impl Into<String>) -> Self {
        let field: String = field.into();
        Self::new(name, move |instance, args| {
            instance.set(&field, args[0].clone())?;
            Ok(Value::Null)
        })
        .arity(1)
    }

    /// Requires exactly `arity` arguments.
    #[inline]
    pub fn arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }

    #[inline]
    pub fn private(mut self) -> Self {
        self.modifiers = self.modifiers.with_visibility(Visibility::Private);
        self
    }

    #[inline]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    /// Sets the declared return type as a type expression.
    #[inline]
    pub fn returns(mut self, expr: impl Into<String>) -> Self {
        self.return_hint = Some(expr.into());
        self
    }

    #[inline]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.add(directive);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[inline]
    pub fn return_hint(&self) -> Option<&str> {
        self.return_hint.as_deref()
    }

    #[inline]
    pub fn directives(&self) -> &DirectiveSet {
        &self.directives
    }

    /// Returns `true` if the method can be called with `count` arguments.
    #[inline]
    pub fn accepts(&self, count: usize) -> bool {
        self.arity.is_none_or(|arity| arity == count)
    }

    /// Calls the method on `instance`.
    pub fn invoke(&self, instance: &mut Instance, args: &[Value]) -> Result<Value, ObjectError> {
        if !self.accepts(args.len()) {
            return Err(ObjectError::InvalidArgument {
                class: String::from(instance.class_name()),
                name: self.name.clone(),
                message: alloc::format!(
                    "expected {} argument(s), got {}",
                    self.arity.unwrap_or_default(),
                    args.len()
                ),
            });
        }
        (self.body)(instance, args)
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("modifiers", &self.modifiers)
            .field("arity", &self.arity)
            .field("return_hint", &self.return_hint)
            .field("directives", &self.directives)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ScopeGrant

/// Capability to read and write every member declared by one class,
/// regardless of visibility.
///
/// Only [`ClassDef::grant_scope`] creates grants, and sealed classes refuse to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeGrant {
    class: ClassName,
}

impl ScopeGrant {
    /// The class whose members this grant opens.
    #[inline]
    pub fn class_name(&self) -> &ClassName {
        &self.class
    }
}

// -----------------------------------------------------------------------------
// ClassDef

/// A declared class.
///
/// Build one with [`ClassDef::builder`]. Declarations are immutable and shared
/// through [`Arc`]; a child class holds its parent.
pub struct ClassDef {
    name: ClassName,
    parent: Option<Arc<ClassDef>>,
    properties: Vec<PropertyDef>,
    methods: Vec<MethodDef>,
    directives: DirectiveSet,
    constructor: Option<ConstructorHook>,
    is_abstract: bool,
    sealed: bool,
}

impl ClassDef {
    /// Starts a new class declaration.
    #[inline]
    pub fn builder(name: impl Into<ClassName>) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn class_name(&self) -> &ClassName {
        &self.name
    }

    #[inline]
    pub fn parent(&self) -> Option<&Arc<ClassDef>> {
        self.parent.as_ref()
    }

    /// Properties declared by this class only, in declaration order.
    #[inline]
    pub fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }

    /// Methods declared by this class only, in declaration order.
    #[inline]
    pub fn methods(&self) -> &[MethodDef] {
        &self.methods
    }

    /// Directives declared on this class only.
    #[inline]
    pub fn directives(&self) -> &DirectiveSet {
        &self.directives
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Returns a property declared by this class.
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Returns a method declared by this class.
    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Iterates over this class and its ancestors, most-derived first.
    #[inline]
    pub fn ancestry(&self) -> Ancestry<'_> {
        Ancestry { next: Some(self) }
    }

    /// Finds a method in this class or an ancestor, most-derived first.
    pub fn find_method(&self, name: &str) -> Option<&MethodDef> {
        self.ancestry().find_map(|class| class.method(name))
    }

    /// Finds a property and its declaring class, most-derived first.
    pub fn find_property(&self, name: &str) -> Option<(&ClassDef, &PropertyDef)> {
        self.ancestry()
            .find_map(|class| class.property(name).map(|p| (class, p)))
    }

    /// Finds a class named `name` in the declaration chain.
    pub fn find_class(&self, name: &str) -> Option<&ClassDef> {
        self.ancestry().find(|class| &*class.name == name)
    }

    /// Returns `true` if this class is `name` or extends it.
    #[inline]
    pub fn is_subclass_of(&self, name: &str) -> bool {
        self.find_class(name).is_some()
    }

    /// Grants access to the members declared by this class.
    ///
    /// Returns `None` for sealed classes.
    pub fn grant_scope(&self) -> Option<ScopeGrant> {
        if self.sealed {
            None
        } else {
            Some(ScopeGrant {
                class: self.name.clone(),
            })
        }
    }

    /// Class directives, resolved through the declaration chain.
    ///
    /// A directive declared by a child hides the same kind on its parents.
    pub fn class_directives(&self) -> DirectiveSet {
        let mut set = DirectiveSet::new(DirectiveTarget::Class);
        for class in self.ancestry() {
            set.merge_from(&class.directives);
        }
        set
    }

    /// Directives of the property `name`, resolved through the declaration chain.
    pub fn property_directives(&self, name: &str) -> DirectiveSet {
        let mut set = DirectiveSet::new(DirectiveTarget::Property);
        for property in self.ancestry().filter_map(|c| c.property(name)) {
            set.merge_from(&property.directives);
        }
        set
    }

    /// Directives of the method `name`, resolved through the declaration chain.
    pub fn method_directives(&self, name: &str) -> DirectiveSet {
        let mut set = DirectiveSet::new(DirectiveTarget::Method);
        for method in self.ancestry().filter_map(|c| c.method(name)) {
            set.merge_from(&method.directives);
        }
        set
    }

    /// Creates an instance: every declared slot gets its default value
    /// (or null), then constructor hooks run from the root class down.
    pub fn new_instance(self: &Arc<Self>) -> Result<Instance, ObjectError> {
        if self.is_abstract {
            return Err(ObjectError::AbstractClass(String::from(self.name())));
        }

        let mut instance = Instance::empty(self.clone());
        let chain: Vec<&ClassDef> = self.ancestry().collect();

        for class in chain.iter().rev() {
            for property in &class.properties {
                let value = property.default.clone().unwrap_or_default();
                instance.init_slot(class.name.clone(), &property.name, value);
            }
        }
        for class in chain.iter().rev() {
            if let Some(hook) = &class.constructor {
                hook(&mut instance)?;
            }
        }

        Ok(instance)
    }

    /// Same as [`new_instance`](Self::new_instance), wrapped in a shared handle.
    #[inline]
    pub fn new_object(self: &Arc<Self>) -> Result<ObjectRef, ObjectError> {
        self.new_instance().map(ObjectRef::new)
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.class_name()))
            .field("properties", &self.properties)
            .field("methods", &self.methods)
            .field("directives", &self.directives)
            .field("is_abstract", &self.is_abstract)
            .field("sealed", &self.sealed)
            .finish_non_exhaustive()
    }
}

/// Iterator over a class and its ancestors, see [`ClassDef::ancestry`].
#[derive(Debug, Clone)]
pub struct Ancestry<'a> {
    next: Option<&'a ClassDef>,
}

impl<'a> Iterator for Ancestry<'a> {
    type Item = &'a ClassDef;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}

// -----------------------------------------------------------------------------
// ClassBuilder

/// Builder of a [`ClassDef`].
///
/// # Examples
///
/// ```
/// use vc_object::{ClassDef, Directive, MethodDef, PropertyDef};
///
/// let base = ClassDef::builder("Base")
///     .property(PropertyDef::new("id").typed("int").private())
///     .method(MethodDef::getter("getId", "id"))
///     .build();
///
/// let child = ClassDef::builder("Child")
///     .extends(base)
///     .directive(Directive::VirtualProperty(Some("data".into())))
///     .property(PropertyDef::new("name").typed("string"))
///     .build();
///
/// assert!(child.is_subclass_of("Base"));
/// assert!(child.find_method("getId").is_some());
/// assert_eq!(child.ancestry().count(), 2);
/// ```
pub struct ClassBuilder {
    name: ClassName,
    parent: Option<Arc<ClassDef>>,
    properties: Vec<PropertyDef>,
    methods: Vec<MethodDef>,
    directives: DirectiveSet,
    constructor: Option<ConstructorHook>,
    is_abstract: bool,
    sealed: bool,
}

impl ClassBuilder {
    pub fn new(name: impl Into<ClassName>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            properties: Vec::new(),
            methods: Vec::new(),
            directives: DirectiveSet::new(DirectiveTarget::Class),
            constructor: None,
            is_abstract: false,
            sealed: false,
        }
    }

    #[inline]
    pub fn extends(mut self, parent: Arc<ClassDef>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Declares a property. Redeclaring a name replaces the earlier declaration.
    pub fn property(mut self, property: PropertyDef) -> Self {
        self.properties.retain(|p| p.name != property.name);
        self.properties.push(property);
        self
    }

    /// Declares a method. Redeclaring a name replaces the earlier declaration.
    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.retain(|m| m.name != method.name);
        self.methods.push(method);
        self
    }

    #[inline]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.add(directive);
        self
    }

    pub fn constructor<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Instance) -> Result<(), ObjectError> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(hook));
        self
    }

    #[inline]
    pub fn mark_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Refuses scope grants, so non-public members are only reachable through methods.
    #[inline]
    pub fn seal(mut self) -> Self {
        self.sealed = true;
        self
    }

    pub fn build(self) -> Arc<ClassDef> {
        Arc::new(ClassDef {
            name: self.name,
            parent: self.parent,
            properties: self.properties,
            methods: self.methods,
            directives: self.directives,
            constructor: self.constructor,
            is_abstract: self.is_abstract,
            sealed: self.sealed,
        })
    }
}
