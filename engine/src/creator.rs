//! The class-construction algorithm.
//!
//! Given parents and a definition, the creator:
//! 1. rejects mutator names that collide with reserved keys
//! 2. splits the parents, defaulting the primary parent to the root
//! 3. rejects final parents
//! 4. starts the prototype from the primary parent's prototype
//! 5. resolves the mutator registry
//! 6. fills missing members from auxiliary parents, in list order
//! 7. runs the class-time mutator hooks, then copies what is left of the
//!    definition onto the prototype and the collected statics onto the class
//!
//! Nothing is published until every step has succeeded.

use crate::class::ClassData;
use crate::merge::fill_missing;
use crate::{
    ClassDef, ClassDraft, ClassRef, EngineConfig, Fields, MutatorRegistry, ObjectSource,
    ParentRef, Parents, Value,
};
use protoclass_core::{ClassError, ClassId, ClassResult, ReservedKey, SysVar};
use std::cell::RefCell;
use std::collections::HashSet;
use tracing::debug;

/// Builds classes against a fixed root and configuration.
#[derive(Debug, Clone, Copy)]
pub struct ClassCreator<'a> {
    config: &'a EngineConfig,
    /// Default primary parent. `None` while the root itself is built.
    root: Option<&'a ClassRef>,
}

impl<'a> ClassCreator<'a> {
    pub fn new(config: &'a EngineConfig, root: Option<&'a ClassRef>) -> Self {
        Self { config, root }
    }

    /// Build a class with the given id.
    pub fn create(&self, id: ClassId, parents: Parents, def: ClassDef) -> ClassResult<ClassRef> {
        let label = self.label(&def);
        self.build(id, parents, def).map_err(|err| {
            debug!(class = %label, id = %id, error = %err, "class creation failed");
            err
        })
    }

    fn build(&self, id: ClassId, parents: Parents, mut def: ClassDef) -> ClassResult<ClassRef> {
        if let Some(name) = def
            .mutator_decls()
            .keys()
            .find(|name| ReservedKey::parse(name).is_some())
        {
            return Err(ClassError::ReservedMutatorName(name.clone()));
        }

        let Parents { primary, auxiliary } = parents;
        let primary = primary.or_else(|| self.root.cloned());

        let finals = primary
            .iter()
            .chain(auxiliary.iter().filter_map(ParentRef::as_class));
        for parent in finals {
            if parent.is_final() {
                return Err(ClassError::FinalExtension {
                    class: self.label(&def),
                    parent: parent.name().to_string(),
                });
            }
        }

        let mut prototype: Fields = primary
            .as_ref()
            .map(|p| p.prototype().clone())
            .unwrap_or_default();

        let definition = def.clone();
        let mut pending =
            MutatorRegistry::resolve(id, primary.as_ref(), &auxiliary, def.take_mutator_decls());

        for parent in &auxiliary {
            fill_missing(&mut prototype, parent.fields());
        }

        let mut draft = ClassDraft::default();
        pending.process_class(&mut def, &mut draft)?;

        if let Some(construct) = def.constructor() {
            prototype.insert(
                ReservedKey::Construct.as_str().to_string(),
                Value::Function(construct.clone()),
            );
        }
        if let Some(destruct) = def.destructor() {
            prototype.insert(
                ReservedKey::Destruct.as_str().to_string(),
                Value::Function(destruct.clone()),
            );
        }
        let leftover = def.leftover_reserved();
        for (name, value) in def.fields().iter().chain(&leftover) {
            prototype.insert(name.clone(), value.clone());
        }

        let (supertypes, sources) = lineage(primary.as_ref(), &auxiliary);
        let mutators = pending.freeze();
        let name = draft
            .classname
            .unwrap_or_else(|| self.config.anonymous_classname.clone());

        debug!(
            class = %name,
            id = %id,
            parent = primary.as_ref().map(ClassRef::name).unwrap_or("-"),
            auxiliary = auxiliary.len(),
            mutators = ?mutators.names().collect::<Vec<_>>(),
            "class created"
        );

        Ok(ClassRef::new(ClassData {
            id,
            name,
            is_abstract: draft.is_abstract,
            is_final: draft.is_final,
            parent: primary,
            auxiliary,
            prototype,
            statics: RefCell::new(draft.statics),
            mutators,
            definition,
            supertypes,
            sources,
        }))
    }

    /// Name used in diagnostics before the class exists.
    fn label(&self, def: &ClassDef) -> String {
        def.sysvar(SysVar::Classname)
            .and_then(Value::as_str)
            .unwrap_or(self.config.anonymous_classname.as_str())
            .to_string()
    }
}

/// Every class and plain source reachable through any parent link.
fn lineage(
    primary: Option<&ClassRef>,
    auxiliary: &[ParentRef],
) -> (HashSet<ClassId>, Vec<ObjectSource>) {
    fn add_source(source: &ObjectSource, sources: &mut Vec<ObjectSource>) {
        if !sources.iter().any(|s| s.ptr_eq(source)) {
            sources.push(source.clone());
        }
    }

    let mut supertypes = HashSet::new();
    let mut sources = Vec::new();

    let classes = primary
        .into_iter()
        .chain(auxiliary.iter().filter_map(ParentRef::as_class));
    for class in classes {
        supertypes.insert(class.id());
        supertypes.extend(class.supertypes().iter().copied());
        for source in class.sources() {
            add_source(source, &mut sources);
        }
    }
    for parent in auxiliary {
        if let ParentRef::Object(source) = parent {
            add_source(source, &mut sources);
        }
    }

    (supertypes, sources)
}
