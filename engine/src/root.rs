//! The root class every other class derives from.
//!
//! Its prototype carries the dynamic forms of the instance operations, so
//! member functions can reach them through their receiver (for example
//! `this.call("parentConstruct", ...)`) and subclasses can override them.

use crate::builtin::{self, BIND, STATIC, SYSVARS};
use crate::{ClassDef, ClassRef, EngineConfig, Instance, MutatorDecl, ParentRef, Value};
use protoclass_core::{messages, ClassError, ClassResult};

pub const PARENT_CONSTRUCT: &str = "parentConstruct";
pub const PARENT_DESTRUCT: &str = "parentDestruct";
pub const PARENT_METHOD: &str = "parentMethod";
pub const DESTROY: &str = "destroy";
pub const INSTANCE_OF: &str = "instanceOf";
pub const TO_STRING: &str = "toString";

/// Definition of the root class.
pub(crate) fn definition(config: &EngineConfig, bind: MutatorDecl) -> ClassDef {
    ClassDef::new()
        .classname(config.root_classname.clone())
        .abstract_class()
        .construct(|_, _| Ok(Value::Undefined))
        .destruct(|_, _| Ok(Value::Undefined))
        .method(PARENT_CONSTRUCT, |this, args| {
            let instance = receiver(PARENT_CONSTRUCT, this)?;
            let (parent, rest) = class_arg(PARENT_CONSTRUCT, args)?;
            instance.parent_construct(parent, rest)
        })
        .method(PARENT_DESTRUCT, |this, args| {
            let instance = receiver(PARENT_DESTRUCT, this)?;
            let (parent, _) = class_arg(PARENT_DESTRUCT, args)?;
            instance.parent_destruct(parent)
        })
        .method(PARENT_METHOD, |this, args| {
            let instance = receiver(PARENT_METHOD, this)?;
            let (parent, rest) = class_arg(PARENT_METHOD, args)?;
            let (name, rest) = match rest.split_first() {
                Some((Value::String(name), rest)) => (name, rest),
                _ => {
                    return Err(ClassError::invalid_argument(
                        PARENT_METHOD,
                        messages::ERR_EXPECTED_METHOD_NAME,
                    ))
                }
            };
            instance.parent_method(parent, name, rest)
        })
        .method(DESTROY, |this, _| {
            receiver(DESTROY, this)?.destroy()?;
            Ok(Value::Undefined)
        })
        .method(INSTANCE_OF, |this, args| {
            let instance = receiver(INSTANCE_OF, this)?;
            match args.first() {
                Some(Value::Class(candidate)) => {
                    Ok(Value::Bool(instance.instance_of(&ParentRef::from(candidate))))
                }
                _ => Err(ClassError::invalid_argument(
                    INSTANCE_OF,
                    messages::ERR_EXPECTED_CANDIDATE,
                )),
            }
        })
        .method(TO_STRING, |this, _| {
            Ok(Value::String(receiver(TO_STRING, this)?.to_string()))
        })
        .mutator(SYSVARS, builtin::sysvars(config.anonymous_classname.clone()))
        .mutator(STATIC, builtin::statics())
        .mutator(BIND, bind)
        .end()
}

fn receiver<'a>(method: &str, this: &'a Value) -> ClassResult<&'a Instance> {
    this.as_instance()
        .ok_or_else(|| ClassError::invalid_argument(method, messages::ERR_EXPECTED_INSTANCE))
}

fn class_arg<'a>(method: &str, args: &'a [Value]) -> ClassResult<(&'a ClassRef, &'a [Value])> {
    match args.split_first() {
        Some((Value::Class(class), rest)) => Ok((class, rest)),
        _ => Err(ClassError::invalid_argument(method, messages::ERR_EXPECTED_CLASS)),
    }
}
