//! Check factory bindings.

use std::fmt;

use tracing::debug;

use crate::{Check, CheckOptions, PluginError};

/// Creates a check instance for one translation unit.
pub type CheckFactory =
    Box<dyn Fn(&CheckOptions<'_>) -> Result<Box<dyn Check>, PluginError> + Send + Sync>;

/// An append-only list of `(name, factory)` bindings.
///
/// Built once at startup by [`CheckModule`]s; registration order is kept and
/// is the order checks are instantiated and invoked in.
#[derive(Default)]
pub struct CheckFactories {
    bindings: Vec<(String, CheckFactory)>,
}

impl CheckFactories {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `factory` to `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::DuplicateCheck`] if `name` is already bound.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), PluginError>
    where
        F: Fn(&CheckOptions<'_>) -> Result<Box<dyn Check>, PluginError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.contains(&name) {
            return Err(PluginError::duplicate(name));
        }
        debug!("Registered check factory '{}'", name);
        self.bindings.push((name, Box::new(factory)));
        Ok(())
    }

    /// Binds a check type that needs no options.
    pub fn register_default<C>(&mut self, name: impl Into<String>) -> Result<(), PluginError>
    where
        C: Check + Default + 'static,
    {
        self.register(name, |_| Ok(Box::new(C::default()) as Box<dyn Check>))
    }

    /// Returns true if `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.iter().any(|(bound, _)| bound == name)
    }

    /// Returns the bound names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the bindings in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CheckFactory)> {
        self.bindings
            .iter()
            .map(|(name, factory)| (name.as_str(), factory))
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Debug for CheckFactories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// A group of checks shipped together.
pub trait CheckModule: Send + Sync {
    /// Returns the module name, e.g. `llvm`.
    fn name(&self) -> &str;

    /// Adds this module's factories.
    fn add_check_factories(&self, factories: &mut CheckFactories) -> Result<(), PluginError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CheckContext, MatchFinder, MatchResult};

    #[derive(Default)]
    struct Noop;

    impl Check for Noop {
        fn register_queries(&self, _finder: &mut MatchFinder) {}

        fn check(
            &self,
            _result: &MatchResult<'_, '_>,
            _ctx: &CheckContext<'_>,
        ) -> Result<(), PluginError> {
            Ok(())
        }
    }

    struct Demo;

    impl CheckModule for Demo {
        fn name(&self) -> &str {
            "demo"
        }

        fn add_check_factories(&self, factories: &mut CheckFactories) -> Result<(), PluginError> {
            factories.register_default::<Noop>("demo-b")?;
            factories.register_default::<Noop>("demo-a")
        }
    }

    #[test]
    fn test_registration_order_is_kept() {
        let mut factories = CheckFactories::new();
        Demo.add_check_factories(&mut factories).unwrap();

        assert_eq!(factories.names().collect::<Vec<_>>(), vec!["demo-b", "demo-a"]);
        assert_eq!(factories.len(), 2);
        assert!(factories.contains("demo-a"));
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut factories = CheckFactories::new();
        Demo.add_check_factories(&mut factories).unwrap();

        let err = Demo.add_check_factories(&mut factories).unwrap_err();
        assert!(matches!(err, PluginError::DuplicateCheck(name) if name == "demo-b"));
        assert_eq!(factories.len(), 2);
    }

    #[test]
    fn test_factory_builds_instances() {
        let mut factories = CheckFactories::new();
        factories.register_default::<Noop>("noop").unwrap();

        let (name, factory) = factories.iter().next().unwrap();
        let check = factory(&CheckOptions::new(name, None)).unwrap();
        let mut finder = MatchFinder::new();
        check.register_queries(&mut finder);
        assert!(finder.is_empty());
    }
}
