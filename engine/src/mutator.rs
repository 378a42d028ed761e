//! Mutators: named, inheritable units of class-time and instance-time logic.
//!
//! A declaration ([`MutatorDecl`]) supplies hooks. A [`Mutator`] is one
//! class's live copy of a declaration: it owns the fields accumulated down
//! the hierarchy and links to the same-named mutator of its parent class,
//! through which hooks it does not override are resolved.

use crate::merge::merge_into;
use crate::{ClassDef, ClassRef, Fields, Instance, ParentRef, Value};
use protoclass_core::{ClassId, ClassResult};
use std::fmt;
use std::rc::Rc;

/// Class-time hook: reads, strips or relocates entries of the definition.
pub type ClassHook = Rc<dyn Fn(&mut ClassScope<'_>, &mut ClassDef) -> ClassResult<()>>;

/// Instance-time hook: runs on a fresh instance before its constructor.
pub type InstanceHook = Rc<dyn Fn(&Mutator, &Instance) -> ClassResult<()>>;

/// Supplies a method body the mutator keeps outside the prototype.
pub type MethodHook = Rc<dyn Fn(&Mutator, &str, &Instance) -> Option<Value>>;

/// Class-level state mutators write while a class is being built.
#[derive(Debug, Default)]
pub struct ClassDraft {
    pub classname: Option<String>,
    pub is_abstract: bool,
    pub is_final: bool,
    pub statics: Fields,
}

/// What a class-time hook can see and change.
pub struct ClassScope<'a> {
    /// Name the mutator is registered under.
    pub name: &'a str,
    /// The mutator's accumulated fields.
    pub fields: &'a mut Fields,
    /// Custom options from the declaration chain.
    pub options: &'a Fields,
    pub draft: &'a mut ClassDraft,
}

/// A mutator declaration.
#[derive(Clone, Default)]
pub struct MutatorDecl {
    process_class: Option<ClassHook>,
    process_instance: Option<InstanceHook>,
    get_method: Option<MethodHook>,
    options: Fields,
}

impl MutatorDecl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_class<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ClassScope<'_>, &mut ClassDef) -> ClassResult<()> + 'static,
    {
        self.process_class = Some(Rc::new(hook));
        self
    }

    pub fn on_instance<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Mutator, &Instance) -> ClassResult<()> + 'static,
    {
        self.process_instance = Some(Rc::new(hook));
        self
    }

    pub fn on_get_method<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Mutator, &str, &Instance) -> Option<Value> + 'static,
    {
        self.get_method = Some(Rc::new(hook));
        self
    }

    #[cfg(test)]
    pub(crate) fn class_hook(&self) -> Option<&ClassHook> {
        self.process_class.as_ref()
    }

    /// Add a custom option.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }
}

impl fmt::Debug for MutatorDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutatorDecl")
            .field("process_class", &self.process_class.is_some())
            .field("process_instance", &self.process_instance.is_some())
            .field("get_method", &self.get_method.is_some())
            .field("options", &self.options)
            .finish()
    }
}

/// One class's mutator.
#[derive(Clone)]
pub struct Mutator {
    name: String,
    owner: ClassId,
    fields: Fields,
    /// Declaration made by the owning class, if it declared one.
    decl: Option<MutatorDecl>,
    /// The same-named mutator of the parent class.
    parent: Option<Rc<Mutator>>,
}

impl Mutator {
    /// Create a mutator for a class being built.
    ///
    /// Fields are gathered from the same-named mutators of the class's
    /// parents: auxiliary parents from last to first, then the primary
    /// parent, each overwriting what came before. The primary parent wins
    /// and, among auxiliary parents, the leftmost wins.
    pub(crate) fn create(
        name: &str,
        owner: ClassId,
        decl: Option<MutatorDecl>,
        parent: Option<Rc<Mutator>>,
        primary: Option<&ClassRef>,
        auxiliary: &[ParentRef],
    ) -> Self {
        let fields = gather_fields(name, primary, auxiliary);

        Self {
            name: name.to_string(),
            owner,
            fields,
            decl,
            parent,
        }
    }

    /// Carry an inherited mutator forward to a new class without a new
    /// declaration.
    ///
    /// Hooks still resolve through `parent`. Fields are gathered across all
    /// of the new class's parents, as in [`Mutator::create`].
    pub(crate) fn carry(
        parent: &Rc<Mutator>,
        owner: ClassId,
        primary: Option<&ClassRef>,
        auxiliary: &[ParentRef],
    ) -> Self {
        Self {
            name: parent.name.clone(),
            owner,
            fields: gather_fields(&parent.name, primary, auxiliary),
            decl: None,
            parent: Some(Rc::clone(parent)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The class this mutator belongs to.
    pub fn owner(&self) -> ClassId {
        self.owner
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn parent(&self) -> Option<&Mutator> {
        self.parent.as_deref()
    }

    /// True if the owning class declared this mutator itself.
    pub fn is_declared_here(&self) -> bool {
        self.decl.is_some()
    }

    /// Options merged down the declaration chain, base first.
    pub fn options(&self) -> Fields {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(m) = current {
            if let Some(decl) = &m.decl {
                chain.push(&decl.options);
            }
            current = m.parent();
        }

        let mut options = Fields::new();
        for layer in chain.into_iter().rev() {
            merge_into(&mut options, layer);
        }
        options
    }

    fn resolve<T: ?Sized>(&self, pick: impl Fn(&MutatorDecl) -> Option<&Rc<T>>) -> Option<Rc<T>> {
        let mut current = Some(self);
        while let Some(m) = current {
            if let Some(hook) = m.decl.as_ref().and_then(&pick) {
                return Some(Rc::clone(hook));
            }
            current = m.parent();
        }
        None
    }

    pub(crate) fn process_class(
        &mut self,
        def: &mut ClassDef,
        draft: &mut ClassDraft,
    ) -> ClassResult<()> {
        let Some(hook) = self.resolve(|d| d.process_class.as_ref()) else {
            return Ok(());
        };
        let options = self.options();
        let mut scope = ClassScope {
            name: &self.name,
            fields: &mut self.fields,
            options: &options,
            draft,
        };
        hook(&mut scope, def)
    }

    pub(crate) fn process_instance(&self, instance: &Instance) -> ClassResult<()> {
        match self.resolve(|d| d.process_instance.as_ref()) {
            Some(hook) => hook(self, instance),
            None => Ok(()),
        }
    }

    pub(crate) fn get_method(&self, name: &str, instance: &Instance) -> Option<Value> {
        self.resolve(|d| d.get_method.as_ref())
            .and_then(|hook| hook(self, name, instance))
    }
}

/// Same-named mutator fields of every class parent, auxiliary parents from
/// last to first and then the primary parent, later writers winning.
fn gather_fields(name: &str, primary: Option<&ClassRef>, auxiliary: &[ParentRef]) -> Fields {
    let mut fields = Fields::new();
    let lineage = auxiliary
        .iter()
        .rev()
        .filter_map(ParentRef::as_class)
        .chain(primary);
    for class in lineage {
        if let Some(inherited) = class.mutators().get(name) {
            for (key, value) in inherited.fields() {
                fields.insert(key.clone(), value.clone());
            }
        }
    }
    fields
}

impl fmt::Debug for Mutator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutator")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("declared_here", &self.decl.is_some())
            .finish()
    }
}
