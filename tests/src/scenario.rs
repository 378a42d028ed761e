//! Scenario definition and runner.

use protoclass_engine::{ClassDef, ClassResult, ObjectSource, Parents, Value};

use crate::assertion::{Assertion, AssertionBuilder};
use crate::error::{ScenarioError, ScenarioResult};
use crate::world::World;

type Definition = Box<dyn Fn(&World) -> ClassResult<(Parents, ClassDef)>>;
type Action = Box<dyn Fn(&mut World) -> ClassResult<Value>>;

/// A named sequence of class definitions followed by checked steps.
///
/// # Example
/// ```ignore
/// Scenario::new("override_chain")
///     .class("one", |_| Ok((Parents::none(), ClassDef::new().method("f_a", says("one a")))))
///     .step("make", |w| w.make("o", "one", &[]), |a| a.calls("f_a", "one a"))
///     .run()
///     .unwrap();
/// ```
pub struct Scenario {
    name: String,
    sources: Vec<(String, ObjectSource)>,
    classes: Vec<(String, Definition)>,
    steps: Vec<Step>,
}

struct Step {
    name: String,
    action: Action,
    assertion: Assertion,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
            classes: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Name a plain field source that class definitions can use as an
    /// auxiliary parent.
    pub fn source(mut self, alias: &str, source: ObjectSource) -> Self {
        self.sources.push((alias.to_string(), source));
        self
    }

    /// Declare a class. Definitions run in order, so later ones can name
    /// earlier ones as parents.
    pub fn class<F>(mut self, alias: &str, define: F) -> Self
    where
        F: Fn(&World) -> ClassResult<(Parents, ClassDef)> + 'static,
    {
        self.classes.push((alias.to_string(), Box::new(define)));
        self
    }

    /// Add a step with its assertion.
    pub fn step<A, F>(mut self, name: &str, action: A, assert: F) -> Self
    where
        A: Fn(&mut World) -> ClassResult<Value> + 'static,
        F: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        self.steps.push(Step {
            name: name.to_string(),
            action: Box::new(action),
            assertion: assert(AssertionBuilder::new()).build(),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the scenario against a fresh factory.
    pub fn run(&self) -> ScenarioResult<()> {
        let mut world =
            World::new().map_err(|e| ScenarioError::setup(&self.name, "<root>", e))?;

        // 1. Register sources, then define classes
        for (alias, source) in &self.sources {
            world.source(alias, source.clone());
        }
        for (alias, define) in &self.classes {
            let (parents, def) =
                define(&world).map_err(|e| ScenarioError::setup(&self.name, alias, e))?;
            world
                .define(alias, parents, def)
                .map_err(|e| ScenarioError::setup(&self.name, alias, e))?;
        }

        // 2. Run and verify each step
        for step in &self.steps {
            let result = (step.action)(&mut world);
            step.assertion.verify(&step.name, &world, &result)?;
        }

        Ok(())
    }
}
