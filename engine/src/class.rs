//! Classes produced by the factory.
//!
//! A class is a tagged record: a flattened prototype table resolved once at
//! creation time, a static table, the resolved mutator registry, and links
//! to its primary and auxiliary parents.

use crate::{ClassDef, Fields, Function, Instance, MutatorRegistry, ObjectSource, ParentRef, Value};
use protoclass_core::{ClassError, ClassId, ClassResult, ReservedKey};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Shared handle to a finished class.
#[derive(Clone)]
pub struct ClassRef(Rc<ClassData>);

pub(crate) struct ClassData {
    pub(crate) id: ClassId,
    pub(crate) name: String,
    pub(crate) is_abstract: bool,
    pub(crate) is_final: bool,
    pub(crate) parent: Option<ClassRef>,
    pub(crate) auxiliary: Vec<ParentRef>,
    /// Own members folded over the primary chain and auxiliary sources.
    pub(crate) prototype: Fields,
    /// Static members. Writable after creation.
    pub(crate) statics: RefCell<Fields>,
    pub(crate) mutators: MutatorRegistry,
    /// The definition as handed to the factory, before mutators ran.
    pub(crate) definition: ClassDef,
    /// Every class this one transitively derives from, through any parent.
    pub(crate) supertypes: HashSet<ClassId>,
    /// Every plain source this one transitively derives from.
    pub(crate) sources: Vec<ObjectSource>,
}

impl ClassRef {
    pub(crate) fn new(data: ClassData) -> Self {
        Self(Rc::new(data))
    }

    pub fn id(&self) -> ClassId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn is_abstract(&self) -> bool {
        self.0.is_abstract
    }

    pub fn is_final(&self) -> bool {
        self.0.is_final
    }

    /// The primary parent. `None` only for the root.
    pub fn parent(&self) -> Option<&ClassRef> {
        self.0.parent.as_ref()
    }

    pub fn auxiliary(&self) -> &[ParentRef] {
        &self.0.auxiliary
    }

    pub fn prototype(&self) -> &Fields {
        &self.0.prototype
    }

    pub fn mutators(&self) -> &MutatorRegistry {
        &self.0.mutators
    }

    pub fn definition(&self) -> &ClassDef {
        &self.0.definition
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &ClassRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ==================== Members ====================

    /// A prototype member exactly as this class defines or inherits it.
    pub fn method(&self, name: &str) -> Option<&Value> {
        self.0.prototype.get(name)
    }

    /// The constructor body instances of this class run.
    pub fn constructor(&self) -> Option<&Function> {
        self.method(ReservedKey::Construct.as_str())
            .and_then(Value::as_function)
    }

    /// The destructor body instances of this class run.
    pub fn destructor(&self) -> Option<&Function> {
        self.method(ReservedKey::Destruct.as_str())
            .and_then(Value::as_function)
    }

    pub fn get_static(&self, name: &str) -> Value {
        self.0
            .statics
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// Attach or replace a static member.
    pub fn set_static(&self, name: &str, value: impl Into<Value>) {
        self.0
            .statics
            .borrow_mut()
            .insert(name.to_string(), value.into());
    }

    /// Snapshot of the static table.
    pub fn statics(&self) -> Fields {
        self.0.statics.borrow().clone()
    }

    /// Invoke a static function with the class as receiver.
    pub fn call_static(&self, name: &str, args: &[Value]) -> ClassResult<Value> {
        match self.get_static(name) {
            Value::Function(f) => f.call(&Value::Class(self.clone()), args),
            Value::Undefined => Err(ClassError::method_not_found(self.name(), name)),
            _ => Err(ClassError::NotCallable {
                name: format!("{}.{}", self.name(), name),
            }),
        }
    }

    // ==================== Subtyping ====================

    /// True if this class is, or transitively derives from, `parent`
    /// through primary or auxiliary links.
    pub fn is_subclass_of(&self, parent: &ParentRef) -> bool {
        match parent {
            ParentRef::Class(class) => self.is_subclass_of_class(class),
            ParentRef::Object(source) => self.0.sources.iter().any(|s| s.ptr_eq(source)),
        }
    }

    pub fn is_subclass_of_class(&self, class: &ClassRef) -> bool {
        self.ptr_eq(class) || self.0.supertypes.contains(&class.id())
    }

    /// True if `class` is on this class's primary chain.
    pub fn extends_natively(&self, class: &ClassRef) -> bool {
        let mut current = Some(self);
        while let Some(c) = current {
            if c.ptr_eq(class) {
                return true;
            }
            current = c.parent();
        }
        false
    }

    pub(crate) fn supertypes(&self) -> &HashSet<ClassId> {
        &self.0.supertypes
    }

    pub(crate) fn sources(&self) -> &[ObjectSource] {
        &self.0.sources
    }

    // ==================== Construction ====================

    /// Create a new instance, as `new Class(args)` would.
    pub fn instantiate(&self, args: &[Value]) -> ClassResult<Instance> {
        if self.is_abstract() {
            return Err(ClassError::AbstractInstantiation {
                class: self.name().to_string(),
            });
        }
        let instance = Instance::allocate(self.clone());
        trace!(class = %self.name(), instance = %instance.id(), "instantiate");
        self.initialize(&instance, args)?;
        Ok(instance)
    }

    /// Call the class as a plain function.
    ///
    /// A live instance that natively belongs to this class is initialized in
    /// place with this class's mutators and constructor body. Any other
    /// receiver, including a destroyed instance, yields a fresh instance.
    pub fn call(&self, this: &Value, args: &[Value]) -> ClassResult<Value> {
        match this {
            Value::Object(instance) if instance.is(self) && !instance.is_destroyed() => {
                self.initialize(instance, args)?;
                Ok(this.clone())
            }
            _ => self.instantiate(args).map(Value::Object),
        }
    }

    fn initialize(&self, instance: &Instance, args: &[Value]) -> ClassResult<()> {
        self.0.mutators.process_instance(instance)?;
        instance.mark_live();
        if let Some(constructor) = self.constructor() {
            constructor.call(&Value::Object(instance.clone()), args)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRef")
            .field("id", &self.0.id)
            .field("name", &self.0.name)
            .field("abstract", &self.0.is_abstract)
            .field("final", &self.0.is_final)
            .field("parent", &self.parent().map(|p| p.name().to_string()))
            .finish()
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
