//! Callable members.
//!
//! A function receives its receiver (`this`) explicitly. Bound functions
//! ignore the receiver they are called with and always run against the
//! instance they were bound to.

use crate::{Instance, Value};
use protoclass_core::ClassResult;
use std::fmt;
use std::rc::Rc;

/// Native function body: `(this, args) -> result`.
pub type NativeFn = dyn Fn(&Value, &[Value]) -> ClassResult<Value>;

/// A shared, cloneable function value.
#[derive(Clone)]
pub struct Function(Rc<FunctionInner>);

struct FunctionInner {
    name: Option<String>,
    body: Body,
}

enum Body {
    Native(Rc<NativeFn>),
    Bound {
        target: Function,
        receiver: Instance,
    },
}

impl Function {
    /// Wrap a closure as an anonymous function.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> ClassResult<Value> + 'static,
    {
        Self(Rc::new(FunctionInner {
            name: None,
            body: Body::Native(Rc::new(body)),
        }))
    }

    /// Wrap a closure as a named function.
    pub fn named<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> ClassResult<Value> + 'static,
    {
        Self(Rc::new(FunctionInner {
            name: Some(name.into()),
            body: Body::Native(Rc::new(body)),
        }))
    }

    /// A function that does nothing and returns undefined.
    pub fn noop(name: impl Into<String>) -> Self {
        Self::named(name, |_, _| Ok(Value::Undefined))
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Invoke with `this` as receiver.
    pub fn call(&self, this: &Value, args: &[Value]) -> ClassResult<Value> {
        match &self.0.body {
            Body::Native(body) => body(this, args),
            Body::Bound { target, receiver } => target.call(&receiver.this(), args),
        }
    }

    /// Create a copy permanently bound to `instance`.
    ///
    /// Binding an already-bound function rebinds its original.
    pub fn bind(&self, instance: &Instance) -> Function {
        let target = self.original().unwrap_or(self).clone();
        Self(Rc::new(FunctionInner {
            name: self.0.name.clone(),
            body: Body::Bound {
                target,
                receiver: instance.clone(),
            },
        }))
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.0.body, Body::Bound { .. })
    }

    /// The unbound function a bound function wraps.
    pub fn original(&self) -> Option<&Function> {
        match &self.0.body {
            Body::Bound { target, .. } => Some(target),
            Body::Native(_) => None,
        }
    }

    /// The instance a bound function runs against.
    pub fn receiver(&self) -> Option<&Instance> {
        match &self.0.body {
            Body::Bound { receiver, .. } => Some(receiver),
            Body::Native(_) => None,
        }
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.0.name)
            .field("bound", &self.is_bound())
            .finish()
    }
}
