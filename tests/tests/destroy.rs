//! Instance destruction.

use protoclass_tests::prelude::*;

fn resource(factory: &mut ClassFactory, journal: &Journal) -> ClassRef {
    let log = journal.clone();
    factory
        .create_class(
            Parents::none(),
            ClassDef::new()
                .classname("Resource")
                .construct(|this, args| {
                    this.set("handle", args.first().cloned().unwrap_or(Value::Null))?;
                    this.set("open", true)?;
                    Ok(Value::Undefined)
                })
                .destruct(move |this, _| {
                    log.record(format!("close {}", this.get("handle")));
                    Ok(Value::Undefined)
                }),
        )
        .unwrap()
}

#[test]
fn test_destroy_twice_runs_destructor_once() {
    // GIVEN
    let journal = Journal::new();
    let mut factory = ClassFactory::new().unwrap();
    let class = resource(&mut factory, &journal);
    let instance = class.instantiate(&[Value::Int(7)]).unwrap();

    // WHEN
    instance.destroy().unwrap();
    instance.destroy().unwrap();

    // THEN
    assert_eq!(journal.entries(), vec!["close 7"]);
    assert!(instance.is_destroyed());
    assert!(instance.get("handle").is_undefined());
    assert!(instance.get("open").is_undefined());
}

#[test]
fn test_destructor_chain_through_parent_destruct() {
    // GIVEN a subclass whose destructor delegates to its parent's
    let journal = Journal::new();
    let mut factory = ClassFactory::new().unwrap();
    let base = resource(&mut factory, &journal);
    let log = journal.clone();
    let parent = base.clone();
    let pooled = factory
        .create_class(
            &base,
            ClassDef::new().classname("Pooled").destruct(move |this, _| {
                log.record("release to pool");
                this.call("parentDestruct", &[Value::from(&parent)])
            }),
        )
        .unwrap();

    // WHEN
    let instance = pooled.instantiate(&[Value::from("db")]).unwrap();
    instance.call("destroy", &[]).unwrap();

    // THEN the subclass destructor runs before its parent's, once
    assert_eq!(journal.entries(), vec!["release to pool", "close \"db\""]);
    instance.call("destroy", &[]).unwrap();
    assert_eq!(journal.entries().len(), 2);
}

#[test]
fn test_destroyed_instance_reads_inherited_members() {
    let journal = Journal::new();
    let mut factory = ClassFactory::new().unwrap();
    let class = resource(&mut factory, &journal);
    let instance = class.instantiate(&[]).unwrap();

    instance.destroy().unwrap();

    assert_eq!(
        instance.call("toString", &[]).unwrap(),
        Value::from("instance of [Resource]")
    );
    assert_eq!(instance.own_keys(), vec!["handle", "open"]);
}

mod lifecycle {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("lifecycle")
            .class("box", |_| {
                Ok((
                    Parents::none(),
                    ClassDef::new().classname("Box").construct(|this, _| {
                        this.set("size", 3)?;
                        Ok(Value::Undefined)
                    }),
                ))
            })
            .step("make", |w| w.make("b", "box", &[]), |a| a.field("size", 3).alive())
            .step(
                "destroy",
                |w| {
                    let b = w.instance("b")?;
                    b.call("destroy", &[])?;
                    Ok(b.this())
                },
                |a| a.destroyed().lacks("size"),
            )
            .step(
                "call_form_replaces_destroyed",
                |w| {
                    let b = w.instance("b")?;
                    w.class("box")?.call(&b.this(), &[])
                },
                |a| a.alive().field("size", 3).displays("instance of [Box]"),
            )
    }

    #[test]
    fn test_destroy_then_recreate_through_call_form() {
        scenario().run().unwrap();
    }
}
