//! Instances and the root-contract operations every instance supports.

use crate::{ClassRef, Fields, ParentRef, Value};
use protoclass_core::{messages, ClassError, ClassResult, InstanceId, ReservedKey};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Shared handle to an instance.
#[derive(Clone)]
pub struct Instance(Rc<InstanceData>);

/// Non-owning handle to an instance.
#[derive(Clone)]
pub struct WeakInstance(Weak<InstanceData>);

struct InstanceData {
    id: InstanceId,
    /// The exact class this instance was created from.
    class: ClassRef,
    fields: RefCell<Fields>,
    destroyed: Cell<bool>,
}

impl Instance {
    pub(crate) fn allocate(class: ClassRef) -> Self {
        Self(Rc::new(InstanceData {
            id: InstanceId::fresh(),
            class,
            fields: RefCell::new(Fields::new()),
            destroyed: Cell::new(false),
        }))
    }

    pub(crate) fn mark_live(&self) {
        self.0.destroyed.set(false);
    }

    pub fn id(&self) -> InstanceId {
        self.0.id
    }

    /// The exact class of this instance.
    pub fn class(&self) -> &ClassRef {
        &self.0.class
    }

    pub fn is_destroyed(&self) -> bool {
        self.0.destroyed.get()
    }

    /// This instance as a receiver value.
    pub fn this(&self) -> Value {
        Value::Object(self.clone())
    }

    pub fn downgrade(&self) -> WeakInstance {
        WeakInstance(Rc::downgrade(&self.0))
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ==================== Members ====================

    /// Read a member: own fields first, then the class prototype.
    pub fn get(&self, name: &str) -> Value {
        if let Some(value) = self.0.fields.borrow().get(name) {
            return value.clone();
        }
        self.class().method(name).cloned().unwrap_or_default()
    }

    /// Assign an own field.
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        self.0
            .fields
            .borrow_mut()
            .insert(name.to_string(), value.into());
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.0.fields.borrow().contains_key(name)
    }

    pub fn own_keys(&self) -> Vec<String> {
        self.0.fields.borrow().keys().cloned().collect()
    }

    /// Snapshot of the own fields.
    pub fn own_fields(&self) -> Fields {
        self.0.fields.borrow().clone()
    }

    /// Invoke a member function with this instance as receiver.
    pub fn call(&self, name: &str, args: &[Value]) -> ClassResult<Value> {
        match self.get(name) {
            Value::Function(f) => f.call(&self.this(), args),
            Value::Undefined => Err(ClassError::method_not_found(self.class().name(), name)),
            _ => Err(ClassError::NotCallable {
                name: name.to_string(),
            }),
        }
    }

    // ==================== Root contract ====================

    /// Run `parent`'s constructor body against this instance.
    pub fn parent_construct(&self, parent: &ClassRef, args: &[Value]) -> ClassResult<Value> {
        match parent.constructor() {
            Some(constructor) => constructor.call(&self.this(), args),
            None => Ok(Value::Undefined),
        }
    }

    /// Run `parent`'s destructor body against this instance.
    pub fn parent_destruct(&self, parent: &ClassRef) -> ClassResult<Value> {
        match parent.destructor() {
            Some(destructor) => destructor.call(&self.this(), &[]),
            None => Ok(Value::Undefined),
        }
    }

    /// Invoke `name` exactly as `parent` defines it, bypassing overrides.
    ///
    /// Members a mutator took out of the prototype are found through the
    /// parent's mutator registry.
    pub fn parent_method(
        &self,
        parent: &ClassRef,
        name: &str,
        args: &[Value],
    ) -> ClassResult<Value> {
        let member = parent
            .method(name)
            .cloned()
            .or_else(|| parent.mutators().get_method(name, self));

        match member {
            Some(Value::Function(f)) => f.call(&self.this(), args),
            Some(Value::Undefined) | None => Err(ClassError::method_not_found(parent.name(), name)),
            Some(_) => Err(ClassError::NotCallable {
                name: format!("{}::{}", parent.name(), name),
            }),
        }
    }

    /// Run the destructor, then clear every own field.
    ///
    /// Calling this on a destroyed instance does nothing.
    pub fn destroy(&self) -> ClassResult<()> {
        if self.is_destroyed() {
            return Ok(());
        }

        if let Value::Function(destructor) = self.get(ReservedKey::Destruct.as_str()) {
            destructor.call(&self.this(), &[])?;
        }

        for value in self.0.fields.borrow_mut().values_mut() {
            *value = Value::Undefined;
        }
        self.0.destroyed.set(true);
        debug!(class = %self.class().name(), instance = %self.id(), "instance destroyed");
        Ok(())
    }

    /// Instance check covering auxiliary parents and plain sources.
    pub fn instance_of(&self, candidate: &ParentRef) -> bool {
        match candidate {
            ParentRef::Class(class) => self.instance_of_class(class),
            ParentRef::Object(_) => self.class().is_subclass_of(candidate),
        }
    }

    pub fn instance_of_class(&self, class: &ClassRef) -> bool {
        self.is(class) || self.class().is_subclass_of_class(class)
    }

    /// Native instance check: the primary chain only.
    pub fn is(&self, class: &ClassRef) -> bool {
        self.class().extends_natively(class)
    }
}

impl WeakInstance {
    pub fn upgrade(&self) -> Option<Instance> {
        self.0.upgrade().map(Instance)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&messages::instance_of(self.class().name()))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.0.id)
            .field("class", &self.class().name())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

impl fmt::Debug for WeakInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakInstance")
    }
}
