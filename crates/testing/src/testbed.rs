use crate::stubs::{CacheStub, StoreStub};
use std::{
    collections::HashMap,
    fmt::{self, Debug, Formatter},
    sync::{Mutex, MutexGuard, PoisonError},
};
use trillium::StateSet;

// One testbed owns the sandbox at a time, across all test threads.
static SANDBOX: Mutex<()> = Mutex::new(());

/// A named stub initializer: inserts a stub instance into the testbed's
/// service set.
pub type Initializer = fn(&mut StateSet);

/**
A sandbox of named service stubs for tests.

A `Testbed` starts inactive. [`Testbed::activate`] acquires the
process-global sandbox (blocking while another testbed holds it), after
which named stubs can be initialized with [`Testbed::init_stub`] and
retrieved by type with [`Testbed::service`]. [`Testbed::deactivate`]
discards every stub and releases the sandbox; dropping an active testbed
does the same, so teardown is guaranteed even when a test panics.

```
use trellis_testing::{CacheStub, Testbed};

let mut testbed = Testbed::new();
testbed.activate().unwrap();
testbed.init_stub("init_cache_stub").unwrap();

let cache = testbed.service::<CacheStub>().unwrap();
cache.set("greeting", "hello");
assert_eq!(cache.get("greeting").unwrap(), "hello");

testbed.deactivate();
```

The built-in initializers are `"init_store_stub"` ([`StoreStub`]) and
`"init_cache_stub"` ([`CacheStub`]); [`Testbed::register`] adds custom
ones.
*/
pub struct Testbed {
    initializers: HashMap<&'static str, Initializer>,
    services: StateSet,
    guard: Option<MutexGuard<'static, ()>>,
}

/// Failures of the testbed lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TestbedError {
    /// This testbed was activated twice.
    #[error("testbed is already active")]
    AlreadyActive,

    /// A stub was initialized before activation.
    #[error("testbed must be activated before initializing stubs")]
    NotActive,

    /// No initializer is registered under the requested name.
    #[error("no service stub registered under the name `{0}`")]
    UnknownStub(String),
}

impl Testbed {
    /// Constructs an inactive testbed with the built-in stub
    /// initializers registered.
    pub fn new() -> Self {
        let mut initializers: HashMap<&'static str, Initializer> = HashMap::new();
        initializers.insert("init_store_stub", |services| {
            services.insert(StoreStub::default());
        });
        initializers.insert("init_cache_stub", |services| {
            services.insert(CacheStub::default());
        });

        Self {
            initializers,
            services: StateSet::new(),
            guard: None,
        }
    }

    /// Registers a custom stub initializer under `name`, replacing any
    /// previous initializer with that name.
    pub fn register(&mut self, name: &'static str, initializer: Initializer) {
        self.initializers.insert(name, initializer);
    }

    /// Acquires the process-global sandbox. Blocks while another testbed
    /// is active; errors if this testbed already is.
    pub fn activate(&mut self) -> Result<(), TestbedError> {
        if self.guard.is_some() {
            return Err(TestbedError::AlreadyActive);
        }

        self.guard = Some(SANDBOX.lock().unwrap_or_else(PoisonError::into_inner));
        log::debug!("testbed activated");
        Ok(())
    }

    /// True between [`Testbed::activate`] and [`Testbed::deactivate`].
    pub fn is_active(&self) -> bool {
        self.guard.is_some()
    }

    /// Runs the initializer registered under `name`.
    pub fn init_stub(&mut self, name: &str) -> Result<(), TestbedError> {
        if self.guard.is_none() {
            return Err(TestbedError::NotActive);
        }

        let initializer = self
            .initializers
            .get(name)
            .ok_or_else(|| TestbedError::UnknownStub(name.to_string()))?;

        initializer(&mut self.services);
        log::debug!("initialized service stub {name}");
        Ok(())
    }

    /// Runs each named initializer in order.
    pub fn init_stubs<'a>(
        &mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), TestbedError> {
        for name in names {
            self.init_stub(name)?;
        }
        Ok(())
    }

    /// Borrows an initialized stub by type.
    pub fn service<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.services.get()
    }

    /// Mutably borrows an initialized stub by type.
    pub fn service_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.services.get_mut()
    }

    /// Discards every initialized stub and releases the sandbox.
    /// Idempotent.
    pub fn deactivate(&mut self) {
        if self.guard.take().is_some() {
            self.services = StateSet::new();
            log::debug!("testbed deactivated");
        }
    }
}

impl Default for Testbed {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Testbed {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl Debug for Testbed {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.initializers.keys().collect();
        names.sort();
        f.debug_struct("Testbed")
            .field("initializers", &names)
            .field("active", &self.is_active())
            .finish()
    }
}

/**
Activates a fresh [`Testbed`], initializes the named stubs, runs `test`,
and deactivates — the scoped form for tests that need stubs beyond
whatever their test case sets up itself.

```
use trellis_testing::{with_stubs, StoreStub};

with_stubs(&["init_store_stub"], |testbed| {
    let store = testbed.service::<StoreStub>().unwrap();
    store.put("k", 1);
    assert_eq!(store.len(), 1);
});
```
*/
pub fn with_stubs<T>(names: &[&str], test: impl FnOnce(&mut Testbed) -> T) -> T {
    let mut testbed = Testbed::new();
    testbed
        .activate()
        .expect("a fresh testbed can always activate");
    testbed
        .init_stubs(names.iter().copied())
        .expect("with_stubs requires registered stub names");

    let output = test(&mut testbed);
    testbed.deactivate();
    output
}
