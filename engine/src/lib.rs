//! protoclass Engine
//!
//! Declarative classes for a prototype-based object model: constructors and
//! destructors, abstract and final modifiers, a primary parent plus
//! auxiliary parents, static members, and mutators that hook into class
//! creation and instance initialization.
//!
//! Classes are created through a [`ClassFactory`]:
//!
//! ```ignore
//! let mut factory = ClassFactory::new()?;
//! let point = factory.create_class(
//!     Parents::none(),
//!     ClassDef::new()
//!         .classname("Point")
//!         .construct(|this, args| {
//!             this.set("x", args.first().cloned().unwrap_or_default())?;
//!             Ok(Value::Undefined)
//!         }),
//! )?;
//! let p = point.instantiate(&[Value::Int(3)])?;
//! assert_eq!(p.to_string(), "instance of [Point]");
//! ```

pub mod builtin;
mod class;
mod config;
mod creator;
mod def;
mod factory;
mod function;
mod instance;
pub mod merge;
mod mutator;
mod parents;
mod registry;
pub mod root;
mod value;

pub use class::ClassRef;
pub use config::EngineConfig;
pub use creator::ClassCreator;
pub use def::ClassDef;
pub use factory::ClassFactory;
pub use function::{Function, NativeFn};
pub use instance::{Instance, WeakInstance};
pub use mutator::{
    ClassDraft, ClassHook, ClassScope, InstanceHook, MethodHook, Mutator, MutatorDecl,
};
pub use parents::{ObjectSource, ParentRef, Parents};
pub use registry::MutatorRegistry;
pub use value::{Fields, Value};

pub use protoclass_core::{
    messages, ClassError, ClassId, ClassResult, InstanceId, ReservedKey, SysVar,
};
