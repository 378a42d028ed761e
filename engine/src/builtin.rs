//! Built-in mutators.
//!
//! The root class declares `sysvars`, `static` and `bind`, so every class
//! inherits them unless it disables them. `options` is available for
//! classes that opt in.

use crate::merge::{copy_fields, deep_copy, merge_into};
use crate::{MutatorDecl, Value};
use protoclass_core::{ClassError, ClassResult, SysVar};
use regex_lite::Regex;

/// Registry name of the system-variable mutator.
pub const SYSVARS: &str = "sysvars";
/// Registry name of the static-member mutator.
pub const STATIC: &str = "static";
/// Registry name of the method-binding mutator.
pub const BIND: &str = "bind";
/// Registry name of the option-inheritance mutator.
pub const OPTIONS: &str = "options";

/// Member listing the exact names the bind mutator should bind.
pub const BIND_LIST_KEY: &str = "__bind";
/// Member the options mutator consumes and assigns.
pub const OPTIONS_KEY: &str = "options";

/// Default naming convention for bound methods: `on` followed by an
/// uppercase letter or underscore.
pub const DEFAULT_BIND_PATTERN: &str = "^on[A-Z_]";

/// Moves `__abstract`, `__final` and `__classname` from the definition onto
/// the class, applying defaults for absent keys, and strips the end
/// sentinel.
pub fn sysvars(anonymous_classname: impl Into<String>) -> MutatorDecl {
    let anonymous = anonymous_classname.into();
    MutatorDecl::new().on_class(move |scope, def| {
        scope.draft.is_abstract = def
            .take_sysvar(SysVar::Abstract)
            .map(|v| v.is_truthy())
            .unwrap_or(false);
        scope.draft.is_final = def
            .take_sysvar(SysVar::Final)
            .map(|v| v.is_truthy())
            .unwrap_or(false);
        scope.draft.classname = Some(match def.take_sysvar(SysVar::Classname) {
            Some(Value::String(name)) if !name.is_empty() => name,
            Some(other) if other.is_truthy() => other.to_string(),
            _ => anonymous.clone(),
        });
        def.clear_terminator();
        Ok(())
    })
}

/// Accumulates `__static` members down the hierarchy and copies them onto
/// each class.
pub fn statics() -> MutatorDecl {
    MutatorDecl::new().on_class(|scope, def| {
        if let Some(statics) = def.take_statics() {
            merge_into(scope.fields, &statics);
        }
        for (name, value) in scope.fields.iter() {
            scope.draft.statics.insert(name.clone(), deep_copy(value));
        }
        Ok(())
    })
}

/// Takes callback methods out of the prototype and gives every instance
/// its own copies bound to it.
///
/// Methods are selected by `pattern`, unless the definition lists names
/// under [`BIND_LIST_KEY`], in which case exactly those are bound.
pub fn bind(pattern: &str) -> ClassResult<MutatorDecl> {
    let convention = Regex::new(pattern).map_err(|e| ClassError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    Ok(MutatorDecl::new()
        .option("pattern", pattern)
        .on_class(move |scope, def| {
            let names: Vec<String> = match def.take_field(BIND_LIST_KEY) {
                Some(Value::List(items)) => items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
                Some(Value::String(name)) => vec![name],
                _ => def
                    .fields()
                    .iter()
                    .filter(|(name, value)| value.is_function() && convention.is_match(name))
                    .map(|(name, _)| name.clone())
                    .collect(),
            };

            for name in names {
                if !def.fields().get(&name).is_some_and(Value::is_function) {
                    continue;
                }
                if let Some(method) = def.take_field(&name) {
                    scope.fields.insert(name, method);
                }
            }
            Ok(())
        })
        .on_instance(|mutator, instance| {
            for (name, value) in mutator.fields() {
                if let Value::Function(method) = value {
                    instance.set(name, Value::Function(method.bind(instance)));
                }
            }
            Ok(())
        })
        .on_get_method(|mutator, name, _| {
            mutator.field(name).filter(|v| v.is_function()).cloned()
        }))
}

/// Deep-merges an `options` map down the hierarchy and gives each instance
/// its own copy.
pub fn options() -> MutatorDecl {
    MutatorDecl::new()
        .on_class(|scope, def| {
            match def.take_field(OPTIONS_KEY) {
                Some(Value::Map(map)) => merge_into(scope.fields, &map),
                Some(other) => {
                    def.fields_mut().insert(OPTIONS_KEY.to_string(), other);
                }
                None => {}
            }
            Ok(())
        })
        .on_instance(|mutator, instance| {
            instance.set(OPTIONS_KEY, Value::Map(copy_fields(mutator.fields())));
            Ok(())
        })
}
