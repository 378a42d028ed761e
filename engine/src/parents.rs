//! Parent references passed to the class factory.

use crate::{ClassRef, Fields};
use std::fmt;
use std::rc::Rc;

/// A plain field map used purely as an auxiliary field source.
///
/// Sources are shared and compared by identity, so the same source can be
/// recognised later by `instance_of`.
#[derive(Clone)]
pub struct ObjectSource(Rc<Fields>);

impl ObjectSource {
    pub fn new(fields: Fields) -> Self {
        Self(Rc::new(fields))
    }

    pub fn fields(&self) -> &Fields {
        &self.0
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &ObjectSource) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ObjectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectSource")
            .field(&self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// One parent of a class: another class or a plain field source.
#[derive(Debug, Clone)]
pub enum ParentRef {
    Class(ClassRef),
    Object(ObjectSource),
}

impl ParentRef {
    pub fn as_class(&self) -> Option<&ClassRef> {
        match self {
            ParentRef::Class(class) => Some(class),
            ParentRef::Object(_) => None,
        }
    }

    /// The fields this parent contributes: a class's prototype table or the
    /// source's own entries.
    pub fn fields(&self) -> &Fields {
        match self {
            ParentRef::Class(class) => class.prototype(),
            ParentRef::Object(source) => source.fields(),
        }
    }
}

impl From<ClassRef> for ParentRef {
    fn from(class: ClassRef) -> Self {
        ParentRef::Class(class)
    }
}

impl From<&ClassRef> for ParentRef {
    fn from(class: &ClassRef) -> Self {
        ParentRef::Class(class.clone())
    }
}

impl From<ObjectSource> for ParentRef {
    fn from(source: ObjectSource) -> Self {
        ParentRef::Object(source)
    }
}

impl From<&ObjectSource> for ParentRef {
    fn from(source: &ObjectSource) -> Self {
        ParentRef::Object(source.clone())
    }
}

/// Parents of a class being created: at most one primary parent (the
/// prototype chain) and any number of auxiliary parents (field sources).
///
/// A missing primary parent defaults to the root class.
#[derive(Debug, Clone, Default)]
pub struct Parents {
    pub(crate) primary: Option<ClassRef>,
    pub(crate) auxiliary: Vec<ParentRef>,
}

impl Parents {
    /// No parents: the class extends the root.
    pub fn none() -> Self {
        Self::default()
    }

    /// A single primary parent.
    pub fn single(class: &ClassRef) -> Self {
        Self {
            primary: Some(class.clone()),
            auxiliary: Vec::new(),
        }
    }

    /// An ordered parent list. `primary` may be `None` to default to the
    /// root while still supplying auxiliary parents.
    pub fn list<I, P>(primary: Option<&ClassRef>, auxiliary: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParentRef>,
    {
        Self {
            primary: primary.cloned(),
            auxiliary: auxiliary.into_iter().map(Into::into).collect(),
        }
    }

    /// Append an auxiliary parent.
    pub fn with(mut self, parent: impl Into<ParentRef>) -> Self {
        self.auxiliary.push(parent.into());
        self
    }

    pub fn primary(&self) -> Option<&ClassRef> {
        self.primary.as_ref()
    }

    pub fn auxiliary(&self) -> &[ParentRef] {
        &self.auxiliary
    }
}

impl From<&ClassRef> for Parents {
    fn from(class: &ClassRef) -> Self {
        Parents::single(class)
    }
}

impl From<ClassRef> for Parents {
    fn from(class: ClassRef) -> Self {
        Parents {
            primary: Some(class),
            auxiliary: Vec::new(),
        }
    }
}

impl From<Option<&ClassRef>> for Parents {
    fn from(class: Option<&ClassRef>) -> Self {
        Parents {
            primary: class.cloned(),
            auxiliary: Vec::new(),
        }
    }
}
