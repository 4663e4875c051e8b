//! Host environment facts.

/// Runtime information the registry needs from its host.
///
/// Closures `Fn() -> bool` implement this trait and report standalone mode.
pub trait Environment: Send + Sync {
    /// True when running without a backend (demo/offline builds). The
    /// registry then falls back to its fallback set if the bulk load fails.
    fn is_standalone(&self) -> bool;
}

impl<F> Environment for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_standalone(&self) -> bool {
        self()
    }
}

/// Environment with fixed answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StaticEnvironment {
    standalone: bool,
}

impl StaticEnvironment {
    pub fn new(standalone: bool) -> Self {
        Self { standalone }
    }

    pub fn standalone() -> Self {
        Self::new(true)
    }

    pub fn backend() -> Self {
        Self::new(false)
    }
}

impl Environment for StaticEnvironment {
    fn is_standalone(&self) -> bool {
        self.standalone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_static_environment() {
        assert!(StaticEnvironment::standalone().is_standalone());
        assert!(!StaticEnvironment::backend().is_standalone());
        assert!(!StaticEnvironment::default().is_standalone());
    }

    #[test]
    fn test_closure_environment_is_queried_each_time() {
        let flag = Arc::new(AtomicBool::new(false));
        let probe = flag.clone();
        let env = move || probe.load(Ordering::SeqCst);

        assert!(!env.is_standalone());
        flag.store(true, Ordering::SeqCst);
        assert!(env.is_standalone());
    }

    #[test]
    fn test_as_trait_object() {
        let env: Arc<dyn Environment> = Arc::new(StaticEnvironment::standalone());
        assert!(env.is_standalone());
    }
}
