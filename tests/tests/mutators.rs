//! Mutator inheritance: bind, static, options, custom mutators and disabling.

use protoclass_engine::builtin::{self, DEFAULT_BIND_PATTERN};
use protoclass_tests::prelude::*;

/// Returns the receiver's `id` field, so tests can tell which instance ran.
fn report_id(this: &Value, _: &[Value]) -> ClassResult<Value> {
    Ok(this.get("id"))
}

fn with_id() -> ClassDef {
    ClassDef::new().construct(|this, args| {
        this.set("id", args.first().cloned().unwrap_or_default())?;
        Ok(Value::Undefined)
    })
}

mod bind {
    use super::*;

    #[test]
    fn test_bound_copies_cover_the_whole_chain() {
        // GIVEN a base with a convention-named callback and a subclass adding another
        init_tracing();
        let mut factory = ClassFactory::new().unwrap();
        let widget = factory
            .create_class(
                Parents::none(),
                with_id().classname("Widget").method("onClick", report_id),
            )
            .unwrap();
        let button = factory
            .create_class(
                &widget,
                ClassDef::new().classname("Button").method("onHover", report_id),
            )
            .unwrap();

        // WHEN two instances exist and their callbacks are detached
        let first = button.instantiate(&[Value::Int(1)]).unwrap();
        let second = button.instantiate(&[Value::Int(2)]).unwrap();
        let click = first.get("onClick");
        let hover = first.get("onHover");

        // THEN each callback still runs against the instance it came from
        let click = click.as_function().unwrap();
        let hover = hover.as_function().unwrap();
        assert_eq!(click.call(&Value::Null, &[]).unwrap(), Value::Int(1));
        assert_eq!(hover.call(&second.this(), &[]).unwrap(), Value::Int(1));
        assert_eq!(second.call("onClick", &[]).unwrap(), Value::Int(2));
        assert!(click.is_bound());
        assert!(click.receiver().is_some_and(|r| r.ptr_eq(&first)));
        assert!(!click.ptr_eq(second.get("onClick").as_function().unwrap()));

        let mutator = button.mutators().get("bind").unwrap();
        let bound: Vec<&str> = mutator.fields().keys().map(String::as_str).collect();
        assert_eq!(bound, vec!["onClick", "onHover"]);
        assert!(button.method("onClick").is_none());
    }

    #[test]
    fn test_bound_copies_are_in_place_before_constructor() {
        let mut factory = ClassFactory::new().unwrap();
        let panel = factory
            .create_class(
                Parents::none(),
                ClassDef::new()
                    .method("onShow", report_id)
                    .construct(|this, _| {
                        let ready = this.get("onShow").as_function().is_some_and(|f| f.is_bound());
                        this.set("bound_before_construct", ready)?;
                        Ok(Value::Undefined)
                    }),
            )
            .unwrap();

        let instance = panel.instantiate(&[]).unwrap();

        assert_eq!(instance.get("bound_before_construct"), Value::Bool(true));
    }

    #[test]
    fn test_detached_callback_outlives_caller_handle() {
        // GIVEN a callback handed off before the caller lets go of the instance
        let mut factory = ClassFactory::new().unwrap();
        let widget = factory
            .create_class(Parents::none(), with_id().method("onClick", report_id))
            .unwrap();
        let instance = widget.instantiate(&[Value::Int(1)]).unwrap();
        let click = instance.get("onClick");

        // WHEN the only other handle is dropped
        drop(instance);

        // THEN the callback still runs against its instance
        let click = click.as_function().unwrap();
        assert_eq!(click.call(&Value::Null, &[]).unwrap(), Value::Int(1));
        assert!(click
            .receiver()
            .is_some_and(|r| r.class().ptr_eq(&widget) && !r.is_destroyed()));
    }

    #[test]
    fn test_configured_pattern_changes_the_convention() {
        let config = protoclass_engine::EngineConfig::default().with_bind_pattern("^handle");
        let mut factory = ClassFactory::with_config(config).unwrap();
        let form = factory
            .create_class(
                Parents::none(),
                with_id().method("handleSubmit", report_id).method("onClick", report_id),
            )
            .unwrap();

        assert!(form.method("handleSubmit").is_none());
        assert!(form.method("onClick").is_some());
    }
}

mod disable {
    use super::*;

    #[test]
    fn test_disabled_bind_stays_off_for_descendants() {
        // GIVEN a base binding onClick, and a child that disables bind
        let mut factory = ClassFactory::new().unwrap();
        let base = factory
            .create_class(Parents::none(), with_id().method("onClick", report_id))
            .unwrap();
        let child = factory
            .create_class(
                &base,
                ClassDef::new().disable_mutator("bind").method("onKey", report_id),
            )
            .unwrap();
        let grandchild = factory
            .create_class(&child, ClassDef::new().method("onDrag", report_id))
            .unwrap();

        // WHEN
        let instance = grandchild.instantiate(&[Value::Int(5)]).unwrap();

        // THEN nothing is bound and convention methods stay on the prototype
        assert!(grandchild.mutators().is_disabled("bind"));
        assert!(!instance.has_own("onKey"));
        assert!(!instance.has_own("onDrag"));
        assert!(instance.get("onClick").is_undefined());
        let on_key = instance.get("onKey");
        assert_eq!(
            on_key.as_function().unwrap().call(&Value::Null, &[]).unwrap(),
            Value::Undefined
        );
    }

    #[test]
    fn test_redeclared_bind_starts_empty() {
        // GIVEN bind disabled in the middle of a chain
        let mut factory = ClassFactory::new().unwrap();
        let base = factory
            .create_class(Parents::none(), with_id().method("onClick", report_id))
            .unwrap();
        let quiet = factory
            .create_class(&base, ClassDef::new().disable_mutator("bind"))
            .unwrap();

        // WHEN a descendant declares bind again
        let loud = factory
            .create_class(
                &quiet,
                ClassDef::new()
                    .mutator("bind", builtin::bind(DEFAULT_BIND_PATTERN).unwrap())
                    .method("onPress", report_id),
            )
            .unwrap();

        // THEN only its own callbacks are bound
        let mutator = loud.mutators().get("bind").unwrap();
        let bound: Vec<&str> = mutator.fields().keys().map(String::as_str).collect();
        assert_eq!(bound, vec!["onPress"]);
        assert!(mutator.parent().is_none());
        let instance = loud.instantiate(&[Value::Int(3)]).unwrap();
        assert!(instance.has_own("onPress"));
        assert!(!instance.has_own("onClick"));
    }

    #[test]
    fn test_disable_through_dynamic_key() {
        let mut factory = ClassFactory::new().unwrap();
        let def = ClassDef::from_fields(fields! {
            "__mutators" => fields! { "static" => false },
            "__static" => fields! { "kept" => true },
        })
        .unwrap();

        let class = factory.create_class(Parents::none(), def).unwrap();

        assert!(class.get_static("kept").is_undefined());
        assert_eq!(
            class.method("__static"),
            Some(&Value::Map(fields! { "kept" => true }))
        );
    }
}

mod statics {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("statics")
            .class("model", |_| {
                Ok((
                    Parents::none(),
                    ClassDef::new()
                        .classname("Model")
                        .static_field("table", "models")
                        .static_method("create", |this, args| {
                            let class = this.as_class().ok_or_else(|| {
                                ClassError::thrown("create needs a class receiver")
                            })?;
                            class.instantiate(args).map(Value::from)
                        }),
                ))
            })
            .class("user", |w| {
                Ok((
                    Parents::from(w.class("model")?),
                    ClassDef::new()
                        .classname("User")
                        .static_field("table", "users"),
                ))
            })
            .step("user_table", |w| Ok(w.class("user")?.get_static("table")), |a| {
                a.value("users")
            })
            .step("model_table", |w| Ok(w.class("model")?.get_static("table")), |a| {
                a.value("models")
            })
            .step(
                "inherited_static_factory",
                |w| w.class("user")?.call_static("create", &[]),
                |a| a.native("user").displays("instance of [User]"),
            )
            .step(
                "statics_are_not_on_instances",
                |w| w.make("u", "user", &[]),
                |a| a.lacks("table").lacks("create"),
            )
    }

    #[test]
    fn test_statics_inherit_and_override() {
        scenario().run().unwrap();
    }
}

mod options {
    use super::*;

    #[test]
    fn test_options_merge_down_and_copy_per_instance() {
        // GIVEN a base opting into the options mutator
        let mut factory = ClassFactory::new().unwrap();
        let base = factory
            .create_class(
                Parents::none(),
                ClassDef::new()
                    .mutator(builtin::OPTIONS, builtin::options())
                    .field(
                        builtin::OPTIONS_KEY,
                        fields! { "color" => "red", "size" => fields! { "w" => 1 } },
                    ),
            )
            .unwrap();
        let derived = factory
            .create_class(
                &base,
                ClassDef::new().field(
                    builtin::OPTIONS_KEY,
                    fields! { "size" => fields! { "h" => 2 } },
                ),
            )
            .unwrap();

        // WHEN
        let a = derived.instantiate(&[]).unwrap();
        let b = derived.instantiate(&[]).unwrap();
        a.set("options", Value::Null);

        // THEN
        assert_eq!(
            b.get("options"),
            Value::Map(fields! {
                "color" => "red",
                "size" => fields! { "w" => 1, "h" => 2 },
            })
        );
        assert_eq!(
            base.instantiate(&[]).unwrap().get("options"),
            Value::Map(fields! { "color" => "red", "size" => fields! { "w" => 1 } })
        );
        assert!(derived.method("options").is_none());
    }
}

mod custom {
    use super::*;

    #[test]
    fn test_custom_mutator_hooks_and_overrides() {
        // GIVEN a mutator that counts declared `track_*` members and stamps instances
        let mut factory = ClassFactory::new().unwrap();
        let tracker = MutatorDecl::new()
            .option("prefix", "track_")
            .on_class(|scope, def| {
                let prefix = scope
                    .options
                    .get("prefix")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string();
                let names: Vec<String> = def
                    .fields()
                    .keys()
                    .filter(|k| k.starts_with(&prefix))
                    .cloned()
                    .collect();
                for name in names {
                    if let Some(value) = def.take_field(&name) {
                        scope.fields.insert(name, value);
                    }
                }
                Ok(())
            })
            .on_instance(|mutator, instance| {
                instance.set("tracked", Value::Int(mutator.fields().len() as i64));
                Ok(())
            })
            .on_get_method(|mutator, name, _| mutator.field(name).cloned());
        let base = factory
            .create_class(
                Parents::none(),
                ClassDef::new()
                    .mutator("tracker", tracker)
                    .method("track_open", says("opened")),
            )
            .unwrap();

        // AND a subclass that only overrides the option
        let derived = factory
            .create_class(
                &base,
                ClassDef::new()
                    .mutator("tracker", MutatorDecl::new().option("prefix", "log_"))
                    .method("log_close", says("closed"))
                    .method("track_other", says("kept")),
            )
            .unwrap();

        // WHEN
        let instance = derived.instantiate(&[]).unwrap();

        // THEN hooks fall through to the base declaration with the new option
        assert_eq!(instance.get("tracked"), Value::Int(2));
        assert!(derived.method("log_close").is_none());
        assert!(derived.method("track_other").is_some());
        assert_eq!(
            instance.parent_method(&derived, "log_close", &[]).unwrap(),
            Value::from("closed")
        );
        assert_eq!(
            instance.parent_method(&base, "track_open", &[]).unwrap(),
            Value::from("opened")
        );
        let tracker = derived.mutators().get("tracker").unwrap();
        assert!(tracker.is_declared_here());
        assert_eq!(tracker.parent().map(|m| m.owner()), Some(base.id()));
    }
}
