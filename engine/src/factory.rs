//! The class factory: the entry point external code creates classes through.

use crate::{builtin, root, ClassCreator, ClassDef, ClassRef, EngineConfig, Parents};
use protoclass_core::{ClassId, ClassResult};
use tracing::debug;

/// Owns the root class and every class created so far.
#[derive(Debug)]
pub struct ClassFactory {
    config: EngineConfig,
    root: ClassRef,
    /// Registered classes in creation order, root first.
    classes: Vec<ClassRef>,
    next_id: ClassId,
}

impl ClassFactory {
    /// Create a factory with the default configuration.
    pub fn new() -> ClassResult<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Create a factory, building its root class from `config`.
    pub fn with_config(config: EngineConfig) -> ClassResult<Self> {
        let bind = builtin::bind(&config.bind_pattern)?;
        let definition = root::definition(&config, bind);
        let root_id = ClassId::new(0);
        let root = ClassCreator::new(&config, None).create(root_id, Parents::none(), definition)?;
        debug!(root = %root.name(), "class factory ready");

        Ok(Self {
            config,
            classes: vec![root.clone()],
            root,
            next_id: root_id.next(),
        })
    }

    /// Create a class.
    ///
    /// `parents` is a single class, `Parents::none()` for the root, or a
    /// [`Parents`] list with auxiliary parents. On failure nothing is
    /// registered and no id is consumed.
    pub fn create_class(
        &mut self,
        parents: impl Into<Parents>,
        def: ClassDef,
    ) -> ClassResult<ClassRef> {
        let class = ClassCreator::new(&self.config, Some(&self.root)).create(
            self.next_id,
            parents.into(),
            def,
        )?;
        self.next_id = self.next_id.next();
        self.classes.push(class.clone());
        Ok(class)
    }

    /// The root class.
    pub fn root(&self) -> &ClassRef {
        &self.root
    }

    pub fn classes(&self) -> &[ClassRef] {
        &self.classes
    }

    /// The most recently created class with the given name.
    pub fn find(&self, name: &str) -> Option<&ClassRef> {
        self.classes.iter().rev().find(|c| c.name() == name)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
