//! Explicit registration of test units
//!
//! Units are registered under a unique name together with a zero-argument
//! factory. The registry keeps registration order, which is also the order
//! a full run executes them in.

use crate::error::{Error, Result};
use crate::unit::TestUnit;
use std::fmt;
use std::panic::Location;
use std::rc::Rc;

/// Builds a fresh unit instance
pub type Factory = Rc<dyn Fn() -> Box<dyn TestUnit>>;

/// A registered unit: its name, the source file that declared it, and how
/// to construct it
#[derive(Clone)]
pub struct UnitEntry {
    /// Unique unit name
    pub name: String,
    /// Source file the unit was registered from, as reported by `file!()`
    pub source: &'static str,
    factory: Factory,
}

impl UnitEntry {
    /// Create an entry from its parts
    pub fn new<F>(name: impl Into<String>, source: &'static str, factory: F) -> Self
    where
        F: Fn() -> Box<dyn TestUnit> + 'static,
    {
        UnitEntry {
            name: name.into(),
            source,
            factory: Rc::new(factory),
        }
    }

    /// Construct a fresh instance
    pub fn instantiate(&self) -> Box<dyn TestUnit> {
        (self.factory)()
    }
}

impl fmt::Debug for UnitEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitEntry")
            .field("name", &self.name)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Ordered set of known test units
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: Vec<UnitEntry>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under its type name, constructed with `T::default()`.
    ///
    /// The calling file is recorded as the unit's source, which is what
    /// directory loading matches against.
    #[track_caller]
    pub fn register<T>(&mut self) -> Result<&mut Self>
    where
        T: TestUnit + Default + 'static,
    {
        let source = Location::caller().file();
        let factory = || Box::new(T::default()) as Box<dyn TestUnit>;
        self.register_entry(UnitEntry::new(short_type_name::<T>(), source, factory))
    }

    /// Register a named factory
    #[track_caller]
    pub fn register_fn<F>(&mut self, name: impl Into<String>, factory: F) -> Result<&mut Self>
    where
        F: Fn() -> Box<dyn TestUnit> + 'static,
    {
        let source = Location::caller().file();
        self.register_entry(UnitEntry::new(name, source, factory))
    }

    /// Register a fully specified entry
    pub fn register_entry(&mut self, entry: UnitEntry) -> Result<&mut Self> {
        if self.contains(&entry.name) {
            return Err(Error::duplicate_unit(entry.name));
        }
        self.entries.push(entry);
        Ok(self)
    }

    /// Whether a unit with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up an entry by name
    pub fn get(&self, name: &str) -> Option<&UnitEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Build a fresh instance of the named unit, or `None` if it is unknown
    pub fn instantiate(&self, name: &str) -> Option<Box<dyn TestUnit>> {
        self.get(name).map(UnitEntry::instantiate)
    }

    /// Unit names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Entries in registration order
    pub fn entries(&self) -> &[UnitEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `my_crate::units::ExampleTest` -> `ExampleTest`
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::Logger;
    use crate::unit::TestResult;

    #[derive(Default)]
    struct Noop;

    impl TestUnit for Noop {
        fn init(&mut self, _log: &mut Logger) -> anyhow::Result<()> {
            Ok(())
        }

        fn run(&mut self, _log: &mut Logger) -> anyhow::Result<TestResult> {
            Ok(TestResult::Pass)
        }

        fn destroy(&mut self, _log: &mut Logger) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_register_by_type() {
        let mut registry = Registry::new();
        registry.register::<Noop>().unwrap();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Noop"]);
        let entry = registry.get("Noop").unwrap();
        assert!(entry.source.ends_with("registry.rs"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut registry = Registry::new();
        registry.register::<Noop>().unwrap();
        let err = registry.register::<Noop>().unwrap_err();
        assert!(matches!(err, Error::DuplicateUnit { ref name } if name == "Noop"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_insertion_order_kept() {
        let mut registry = Registry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry
                .register_fn(name, || Box::new(Noop) as Box<dyn TestUnit>)
                .unwrap();
        }
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["zeta", "alpha", "mid"]
        );
    }

    #[test]
    fn test_unknown_name() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.instantiate("Missing").is_none());
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Noop>(), "Noop");
        assert_eq!(short_type_name::<Vec<String>>(), "Vec");
    }
}
