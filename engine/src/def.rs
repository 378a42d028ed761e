//! Class definitions: the typed property bag handed to the factory.

use crate::{Fields, Function, MutatorDecl, Value};
use indexmap::IndexMap;
use protoclass_core::{ClassError, ClassResult, ReservedKey, SysVar};

/// A class definition.
///
/// Reserved keys have typed slots; everything else is an ordinary member
/// that ends up on the prototype unless a mutator consumes it first.
#[derive(Debug, Clone, Default)]
pub struct ClassDef {
    construct: Option<Function>,
    destruct: Option<Function>,
    sysvars: IndexMap<SysVar, Value>,
    statics: Option<Fields>,
    /// Mutator declarations. `None` disables an inherited mutator.
    mutators: IndexMap<String, Option<MutatorDecl>>,
    fields: Fields,
    terminated: bool,
}

impl ClassDef {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Builder ====================

    /// Set the class name.
    pub fn classname(mut self, name: impl Into<String>) -> Self {
        self.sysvars
            .insert(SysVar::Classname, Value::String(name.into()));
        self
    }

    /// Mark as abstract.
    pub fn abstract_class(mut self) -> Self {
        self.sysvars.insert(SysVar::Abstract, Value::Bool(true));
        self
    }

    /// Mark as final.
    pub fn final_class(mut self) -> Self {
        self.sysvars.insert(SysVar::Final, Value::Bool(true));
        self
    }

    /// Set the constructor body.
    pub fn construct<F>(mut self, body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> ClassResult<Value> + 'static,
    {
        self.construct = Some(Function::named(ReservedKey::Construct.as_str(), body));
        self
    }

    /// Set the destructor body.
    pub fn destruct<F>(mut self, body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> ClassResult<Value> + 'static,
    {
        self.destruct = Some(Function::named(ReservedKey::Destruct.as_str(), body));
        self
    }

    /// Add a method.
    pub fn method<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> ClassResult<Value> + 'static,
    {
        let name = name.into();
        let function = Function::named(name.clone(), body);
        self.fields.insert(name, Value::Function(function));
        self
    }

    /// Add a prototype field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Add a static field.
    pub fn static_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.statics
            .get_or_insert_with(Fields::new)
            .insert(name.into(), value.into());
        self
    }

    /// Add a static method. Its receiver is the class.
    pub fn static_method<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> ClassResult<Value> + 'static,
    {
        let name = name.into();
        let function = Function::named(name.clone(), body);
        self.static_field(name, function)
    }

    /// Declare or redeclare a mutator.
    pub fn mutator(mut self, name: impl Into<String>, decl: MutatorDecl) -> Self {
        self.mutators.insert(name.into(), Some(decl));
        self
    }

    /// Disable an inherited mutator for this class and its descendants.
    pub fn disable_mutator(mut self, name: impl Into<String>) -> Self {
        self.mutators.insert(name.into(), None);
        self
    }

    /// Append the end sentinel.
    pub fn end(mut self) -> Self {
        self.terminated = true;
        self
    }

    /// Set a member by key, routing reserved keys to their slots.
    pub fn insert(&mut self, key: &str, value: Value) -> ClassResult<()> {
        let Some(reserved) = ReservedKey::parse(key) else {
            self.fields.insert(key.to_string(), value);
            return Ok(());
        };

        match reserved {
            ReservedKey::Construct | ReservedKey::Destruct => {
                let body = match value {
                    Value::Function(f) => Some(f),
                    Value::Undefined | Value::Null => None,
                    _ => return Err(invalid(reserved, "a function")),
                };
                if reserved == ReservedKey::Construct {
                    self.construct = body;
                } else {
                    self.destruct = body;
                }
            }
            ReservedKey::Abstract | ReservedKey::Final | ReservedKey::Classname => {
                if let Some(var) = reserved.sysvar() {
                    self.sysvars.insert(var, value);
                }
            }
            ReservedKey::Static => match value {
                Value::Map(map) => {
                    self.statics.get_or_insert_with(Fields::new).extend(map);
                }
                _ => return Err(invalid(reserved, "a map")),
            },
            ReservedKey::Mutators => {
                // Declarations carry hooks and cannot be expressed as values;
                // only disables are accepted here.
                let Value::Map(map) = value else {
                    return Err(invalid(reserved, "a map of disabled mutator names"));
                };
                if map.values().any(Value::is_truthy) {
                    return Err(invalid(reserved, "falsy entries only"));
                }
                for name in map.into_keys() {
                    self.mutators.insert(name, None);
                }
            }
            ReservedKey::End => self.terminated = true,
        }
        Ok(())
    }

    /// Build a definition from key/value pairs.
    pub fn from_fields(fields: Fields) -> ClassResult<Self> {
        let mut def = Self::new();
        for (key, value) in fields {
            def.insert(&key, value)?;
        }
        Ok(def)
    }

    // ==================== Access for mutators ====================

    pub fn constructor(&self) -> Option<&Function> {
        self.construct.as_ref()
    }

    pub fn destructor(&self) -> Option<&Function> {
        self.destruct.as_ref()
    }

    pub fn sysvar(&self, var: SysVar) -> Option<&Value> {
        self.sysvars.get(&var)
    }

    /// Remove a system variable from the bag.
    pub fn take_sysvar(&mut self, var: SysVar) -> Option<Value> {
        self.sysvars.shift_remove(&var)
    }

    pub fn statics(&self) -> Option<&Fields> {
        self.statics.as_ref()
    }

    /// Remove the static sub-map from the bag.
    pub fn take_statics(&mut self) -> Option<Fields> {
        self.statics.take()
    }

    pub fn mutator_decls(&self) -> &IndexMap<String, Option<MutatorDecl>> {
        &self.mutators
    }

    /// Remove the mutator declarations from the bag.
    pub fn take_mutator_decls(&mut self) -> IndexMap<String, Option<MutatorDecl>> {
        std::mem::take(&mut self.mutators)
    }

    /// Ordinary members.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    /// Remove an ordinary member from the bag.
    pub fn take_field(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Strip the end sentinel.
    pub fn clear_terminator(&mut self) {
        self.terminated = false;
    }

    /// Reserved entries no mutator consumed, as ordinary members.
    pub(crate) fn leftover_reserved(&mut self) -> Fields {
        let mut leftover = Fields::new();
        for (var, value) in self.sysvars.drain(..) {
            leftover.insert(var.key().as_str().to_string(), value);
        }
        if let Some(statics) = self.statics.take() {
            leftover.insert(ReservedKey::Static.as_str().to_string(), Value::Map(statics));
        }
        if self.terminated {
            leftover.insert(ReservedKey::End.as_str().to_string(), Value::Bool(true));
            self.terminated = false;
        }
        leftover
    }
}

fn invalid(key: ReservedKey, expected: &str) -> ClassError {
    ClassError::InvalidReserved {
        key: key.as_str().to_string(),
        expected: expected.to_string(),
    }
}
