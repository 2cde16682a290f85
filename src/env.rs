use std::collections::HashMap;
use std::env;

/// Session-owned environment variable store.
///
/// This is the single source of truth for variables during a session: the
/// builtins read and mutate it, and every launched program receives a copy
/// of it as its whole environment. It is seeded from the parent process at
/// startup and never consulted through `std::env` again, so the engine can
/// be tested without touching process-global state.
#[derive(Debug, Clone, Default)]
pub struct EnvStore {
    vars: HashMap<String, String>,
}

impl EnvStore {
    /// Empty store, mainly for tests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded from the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(|v| v.as_str())
    }

    /// Bind `name` to `value`, overwriting any existing binding.
    ///
    /// Names must be non-empty and free of `=`; the builtins enforce the
    /// shape before calling in, so this only debug-asserts it.
    pub fn set(&mut self, name: &str, value: &str) {
        debug_assert!(!name.is_empty() && !name.contains('='));
        self.vars.insert(name.to_string(), value.to_string());
    }

    /// Remove the binding if present. An absent name is a no-op.
    pub fn unset(&mut self, name: &str) {
        self.vars.remove(name);
    }

    /// All current bindings, in map order.
    pub fn snapshot(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }
}
