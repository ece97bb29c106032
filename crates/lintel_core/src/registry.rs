//! Catalog of available checks and analyzers.

use lintel_plugin::CheckFactories;

use crate::ChecksFilter;
use crate::analyzer::{self, DiagnosticProducer};

/// Every check factory and analyzer known to a run.
///
/// Built once at startup and injected wherever checks are listed or
/// instantiated.
#[derive(Default)]
pub struct CheckRegistry {
    factories: CheckFactories,
    producers: Vec<Box<dyn DiagnosticProducer>>,
}

impl CheckRegistry {
    /// Creates a registry over `factories`.
    pub fn new(factories: CheckFactories) -> Self {
        Self {
            factories,
            producers: Vec::new(),
        }
    }

    /// Adds an analyzer.
    pub fn with_producer(mut self, producer: Box<dyn DiagnosticProducer>) -> Self {
        self.producers.push(producer);
        self
    }

    /// Returns the check factories in registration order.
    pub fn factories(&self) -> &CheckFactories {
        &self.factories
    }

    /// Returns the analyzers.
    pub fn producers(&self) -> &[Box<dyn DiagnosticProducer>] {
        &self.producers
    }

    /// Returns every check and analyzer checker name, sorted.
    pub fn list_available_checks(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.names().map(str::to_string).collect();
        for producer in &self.producers {
            names.extend(producer.checkers().iter().map(|c| analyzer::prefixed(c)));
        }
        names.sort();
        names.dedup();
        names
    }

    /// Returns the names that would run under `filter`, sorted.
    ///
    /// Analyzer names include the core checkers pulled in by enabled ones.
    pub fn check_names(&self, filter: &ChecksFilter) -> Vec<String> {
        let mut names: Vec<String> = self
            .factories
            .names()
            .filter(|name| filter.is_enabled(name))
            .map(str::to_string)
            .collect();
        for producer in &self.producers {
            let enabled = analyzer::control_list(filter, &producer.checkers());
            names.extend(enabled.iter().map(|c| analyzer::prefixed(c)));
        }
        names.sort();
        names.dedup();
        names
    }
}
