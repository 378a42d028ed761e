//! The per-class mutator registry.
//!
//! Resolved once when a class is created and consulted at every
//! instantiation. Entry order is the order hooks run in.

use crate::{ClassDef, ClassDraft, ClassRef, Instance, Mutator, MutatorDecl, ParentRef, Value};
use indexmap::IndexMap;
use protoclass_core::{ClassId, ClassResult};
use std::rc::Rc;
use tracing::trace;

/// Mapping from mutator name to mutator. `None` marks a disabled mutator.
#[derive(Debug, Clone)]
pub struct MutatorRegistry {
    owner: ClassId,
    entries: IndexMap<String, Option<Rc<Mutator>>>,
}

/// A registry whose mutators are still running their class-time hooks.
#[derive(Debug)]
pub(crate) struct PendingRegistry {
    owner: ClassId,
    entries: IndexMap<String, Option<Mutator>>,
}

impl MutatorRegistry {
    /// Resolve the mutators of a class being created.
    ///
    /// The primary parent's entries come first, each carried forward,
    /// extended by a redeclaration, or disabled. Names the class declares
    /// fresh follow. Entries found only on auxiliary class parents come
    /// last, leftmost parent first.
    pub(crate) fn resolve(
        owner: ClassId,
        primary: Option<&ClassRef>,
        auxiliary: &[ParentRef],
        mut declared: IndexMap<String, Option<MutatorDecl>>,
    ) -> PendingRegistry {
        let mut entries: IndexMap<String, Option<Mutator>> = IndexMap::new();

        if let Some(parent) = primary {
            for (name, inherited) in parent.mutators().entries() {
                let entry = match declared.shift_remove(name) {
                    Some(Some(decl)) => {
                        trace!(mutator = %name, class = %owner, "extend inherited mutator");
                        Some(Mutator::create(
                            name,
                            owner,
                            Some(decl),
                            inherited.clone(),
                            primary,
                            auxiliary,
                        ))
                    }
                    Some(None) => {
                        trace!(mutator = %name, class = %owner, "disable inherited mutator");
                        None
                    }
                    None => inherited
                        .as_ref()
                        .map(|m| Mutator::carry(m, owner, primary, auxiliary)),
                };
                entries.insert(name.clone(), entry);
            }
        }

        for (name, decl) in declared {
            trace!(mutator = %name, class = %owner, enabled = decl.is_some(), "declare mutator");
            let entry =
                decl.map(|d| Mutator::create(&name, owner, Some(d), None, primary, auxiliary));
            entries.insert(name, entry);
        }

        for class in auxiliary.iter().filter_map(ParentRef::as_class) {
            for (name, entry) in class.mutators().entries() {
                if entries.contains_key(name) {
                    continue;
                }
                trace!(
                    mutator = %name,
                    class = %owner,
                    from = %class.name(),
                    "copy auxiliary mutator"
                );
                entries.insert(
                    name.clone(),
                    entry
                        .as_ref()
                        .map(|m| Mutator::carry(m, owner, primary, auxiliary)),
                );
            }
        }

        PendingRegistry { owner, entries }
    }

    pub fn owner(&self) -> ClassId {
        self.owner
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&String, &Option<Rc<Mutator>>)> {
        self.entries.iter()
    }

    /// An enabled mutator by name.
    pub fn get(&self, name: &str) -> Option<&Rc<Mutator>> {
        self.entries.get(name).and_then(Option::as_ref)
    }

    /// True if `name` is present, enabled or disabled.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// True if `name` is present as a disabled entry.
    pub fn is_disabled(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(None))
    }

    /// Every entry name in hook order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Enabled mutators in hook order.
    pub fn enabled(&self) -> impl Iterator<Item = &Rc<Mutator>> {
        self.entries.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every enabled mutator's instance-time hook.
    pub fn process_instance(&self, instance: &Instance) -> ClassResult<()> {
        for mutator in self.enabled() {
            mutator.process_instance(instance)?;
        }
        Ok(())
    }

    /// The first enabled mutator's body for `name`.
    pub fn get_method(&self, name: &str, instance: &Instance) -> Option<Value> {
        self.enabled()
            .find_map(|mutator| mutator.get_method(name, instance))
    }
}

impl PendingRegistry {
    /// Run every enabled mutator's class-time hook against the definition.
    pub(crate) fn process_class(
        &mut self,
        def: &mut ClassDef,
        draft: &mut ClassDraft,
    ) -> ClassResult<()> {
        for mutator in self.entries.values_mut().flatten() {
            mutator.process_class(def, draft)?;
        }
        Ok(())
    }

    pub(crate) fn freeze(self) -> MutatorRegistry {
        MutatorRegistry {
            owner: self.owner,
            entries: self
                .entries
                .into_iter()
                .map(|(name, entry)| (name, entry.map(Rc::new)))
                .collect(),
        }
    }
}
