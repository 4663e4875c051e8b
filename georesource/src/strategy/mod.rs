//! Resolution strategies for ids the registry does not know yet.
//!
//! [`GeoResourceRegistry::resolve_by_id`](crate::registry::GeoResourceRegistry::resolve_by_id)
//! asks each strategy in order; the first one returning a resource with the
//! requested id wins. Strategies must be side-effect free and may be asked
//! for the same id any number of times.
//!
//! ```
//! use georesource::strategy::{ExternalUrlStrategy, ResolutionStrategy, StrategyChain};
//! use georesource::model::GeoResourceType;
//! use std::sync::Arc;
//!
//! let strategies: Vec<Arc<dyn ResolutionStrategy>> = vec![Arc::new(ExternalUrlStrategy::new())];
//! let chain = StrategyChain::new(strategies);
//! let id = "https://wms.example/service||layer_a||Layer A";
//!
//! let resource = chain.resolve(id, &georesource::log::NoOpLogger).unwrap();
//! assert_eq!(resource.kind(), GeoResourceType::Wms);
//! assert_eq!(resource.label(), "Layer A");
//! ```

mod backend;
mod external;

pub use backend::BackendIdStrategy;
pub use external::{ExternalUrlStrategy, EXTERNAL_ID_SEPARATOR};

use crate::log::Logger;
use crate::log_debug;
use crate::model::GeoResource;
use std::sync::Arc;

/// Produces a GeoResource for an id, or `None` if the strategy does not
/// handle it.
///
/// Closures `Fn(&str) -> Option<GeoResource>` implement this trait.
pub trait ResolutionStrategy: Send + Sync {
    fn resolve(&self, id: &str) -> Option<GeoResource>;
}

impl<F> ResolutionStrategy for F
where
    F: Fn(&str) -> Option<GeoResource> + Send + Sync,
{
    fn resolve(&self, id: &str) -> Option<GeoResource> {
        self(id)
    }
}

/// Ordered list of strategies.
#[derive(Clone, Default)]
pub struct StrategyChain {
    strategies: Vec<Arc<dyn ResolutionStrategy>>,
}

impl StrategyChain {
    pub fn new(strategies: Vec<Arc<dyn ResolutionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Append a strategy at the end of the chain.
    pub fn push(&mut self, strategy: Arc<dyn ResolutionStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Ask each strategy in order and return the first result whose id
    /// matches `id`. Results carrying a different id are skipped.
    pub fn resolve(&self, id: &str, logger: &dyn Logger) -> Option<GeoResource> {
        for (index, strategy) in self.strategies.iter().enumerate() {
            match strategy.resolve(id) {
                Some(resource) if resource.id() == id => return Some(resource),
                Some(resource) => {
                    log_debug!(
                        logger,
                        "Strategy #{} returned GeoResource '{}' for id '{}', skipping",
                        index,
                        resource.id(),
                        id
                    );
                }
                None => {}
            }
        }
        None
    }
}

impl std::fmt::Debug for StrategyChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyChain")
            .field("strategies", &self.strategies.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{LogLevel, NoOpLogger, RecordingLogger};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn wmts(id: &str) -> GeoResource {
        GeoResource::wmts(id, id, "https://t").unwrap()
    }

    fn strategy<F>(f: F) -> Arc<dyn ResolutionStrategy>
    where
        F: Fn(&str) -> Option<GeoResource> + Send + Sync + 'static,
    {
        Arc::new(f)
    }

    #[test]
    fn test_first_match_wins() {
        let chain = StrategyChain::new(vec![
            strategy(|_id: &str| None),
            strategy(|id: &str| Some(wmts(id).with_label("second"))),
            strategy(|id: &str| Some(wmts(id).with_label("third"))),
        ]);

        let resource = chain.resolve("x", &NoOpLogger).unwrap();
        assert_eq!(resource.label(), "second");
    }

    #[test]
    fn test_mismatched_id_is_skipped() {
        let logger = RecordingLogger::new();
        let chain = StrategyChain::new(vec![
            strategy(|_id: &str| Some(wmts("other"))),
            strategy(|id: &str| Some(wmts(id))),
        ]);

        let resource = chain.resolve("x", &logger).unwrap();

        assert_eq!(resource.id(), "x");
        assert!(logger.contains(LogLevel::Debug, "other"));
    }

    #[test]
    fn test_no_match() {
        let chain = StrategyChain::new(vec![strategy(|_id: &str| None)]);
        assert!(chain.resolve("x", &NoOpLogger).is_none());
        assert!(StrategyChain::default().resolve("x", &NoOpLogger).is_none());
    }

    #[test]
    fn test_later_strategies_not_consulted_after_match() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut chain = StrategyChain::new(vec![strategy(|id: &str| Some(wmts(id)))]);
        chain.push(strategy(move |_id: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        }));

        assert_eq!(chain.len(), 2);
        chain.resolve("x", &NoOpLogger);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
