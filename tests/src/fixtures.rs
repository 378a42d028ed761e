//! Shared building blocks for scenario tests.

use protoclass_engine::{ClassResult, Value};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

/// A method body that ignores its receiver and returns `text`.
pub fn says(text: &'static str) -> impl Fn(&Value, &[Value]) -> ClassResult<Value> {
    move |_, _| Ok(Value::from(text))
}

/// Ordered log of calls made by method bodies.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// A method body that records `entry` and returns undefined.
    pub fn recorder(&self, entry: &'static str) -> impl Fn(&Value, &[Value]) -> ClassResult<Value> {
        let journal = self.clone();
        move |_, _| {
            journal.record(entry);
            Ok(Value::Undefined)
        }
    }
}

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
            .try_init();
    });
}
