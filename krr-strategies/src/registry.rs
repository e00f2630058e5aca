//! Ordered registry of strategies

use crate::simple::{SimpleLimitStrategy, SimpleStrategy};
use crate::strategy::Strategy;
use indexmap::IndexMap;
use std::sync::Arc;

/// Registry for strategy descriptors
///
/// Strategies are kept in registration order; that order is the order in
/// which subcommands are generated. Names are the primary key, so
/// registering a second strategy with an existing name replaces the first
/// in place.
///
/// ```rust
/// use krr_strategies::{SimpleStrategy, StrategyRegistry};
///
/// let mut registry = StrategyRegistry::new();
/// registry.register(SimpleStrategy);
/// assert!(registry.get("simple").is_some());
/// ```
#[derive(Default, Clone)]
pub struct StrategyRegistry {
    strategies: IndexMap<String, Arc<dyn Strategy>>,
}

impl StrategyRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            strategies: IndexMap::new(),
        }
    }

    /// Registry preloaded with the strategies that ship with KRR
    pub fn with_builtin_strategies() -> Self {
        let mut registry = Self::new();
        registry.register(SimpleStrategy);
        registry.register(SimpleLimitStrategy);
        registry
    }

    /// Register a strategy
    pub fn register<T: Strategy + 'static>(&mut self, strategy: T) {
        self.register_arc(Arc::new(strategy));
    }

    /// Register an already shared strategy
    pub fn register_arc(&mut self, strategy: Arc<dyn Strategy>) {
        let name = strategy.name().to_string();
        if self.strategies.insert(name.clone(), strategy).is_some() {
            tracing::warn!("Strategy '{}' registered twice, keeping the latest", name);
        }
    }

    /// Get a strategy by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Strategy>> {
        self.strategies.get(name).cloned()
    }

    /// Iterate strategies in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Strategy>)> {
        self.strategies
            .iter()
            .map(|(name, strategy)| (name.as_str(), strategy))
    }

    /// Strategy names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
