//! Deferred GeoResources.
//!
//! A FUTURE stands in for a resource whose concrete kind is only known after
//! a network round trip. [`GeoResource::get`](super::GeoResource::get) runs the
//! loader every time it is called; keeping the resolved value (usually by
//! registering it with the registry) is up to the caller.

use super::GeoResource;
use crate::error::LoaderError;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Loader producing the concrete resource for an id.
pub type FutureLoader =
    Arc<dyn Fn(String) -> BoxFuture<'static, Result<GeoResource, LoaderError>> + Send + Sync>;

/// Called with `(resolved, future)` after a successful load.
pub type ResolveCallback = Arc<dyn Fn(&GeoResource, &GeoResource) + Send + Sync>;

/// Called with the future after a failed load.
pub type RejectCallback = Arc<dyn Fn(&GeoResource) + Send + Sync>;

/// Payload of a FUTURE GeoResource.
#[derive(Clone)]
pub struct GeoResourceFuture {
    loader: FutureLoader,
    on_resolve: Option<ResolveCallback>,
    on_reject: Option<RejectCallback>,
}

impl GeoResourceFuture {
    pub fn new<F, Fut>(loader: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<GeoResource, LoaderError>> + Send + 'static,
    {
        Self {
            loader: Arc::new(move |id| loader(id).boxed()),
            on_resolve: None,
            on_reject: None,
        }
    }

    pub fn loader(&self) -> &FutureLoader {
        &self.loader
    }

    /// Set the resolve callback, replacing any previous one.
    pub fn on_resolve<F>(&mut self, callback: F)
    where
        F: Fn(&GeoResource, &GeoResource) + Send + Sync + 'static,
    {
        self.on_resolve = Some(Arc::new(callback));
    }

    /// Set the reject callback, replacing any previous one.
    pub fn on_reject<F>(&mut self, callback: F)
    where
        F: Fn(&GeoResource) + Send + Sync + 'static,
    {
        self.on_reject = Some(Arc::new(callback));
    }

    pub fn has_resolve_callback(&self) -> bool {
        self.on_resolve.is_some()
    }

    pub fn has_reject_callback(&self) -> bool {
        self.on_reject.is_some()
    }

    /// Run the loader for `owner` (the FUTURE resource holding this payload).
    pub(crate) async fn resolve(&self, owner: &GeoResource) -> Result<GeoResource, LoaderError> {
        match (self.loader)(owner.id().to_string()).await {
            Ok(resolved) => {
                if let Some(callback) = &self.on_resolve {
                    callback(&resolved, owner);
                }
                Ok(resolved)
            }
            Err(e) => {
                if let Some(callback) = &self.on_reject {
                    callback(owner);
                }
                Err(e)
            }
        }
    }
}

impl fmt::Debug for GeoResourceFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoResourceFuture")
            .field("on_resolve", &self.on_resolve.is_some())
            .field("on_reject", &self.on_reject.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GeoResourceType;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn resolved(id: &str) -> GeoResource {
        GeoResource::wms(id, "Resolved", "https://wms/", "layer", "image/png").unwrap()
    }

    #[tokio::test]
    async fn test_get_resolves_and_calls_resolve_callback() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();

        let mut future = GeoResource::future("x", |id| async move { Ok(resolved(&id)) }).unwrap();
        future.as_future_mut().unwrap().on_resolve(move |result, fut| {
            *sink.lock() = Some((result.id().to_string(), fut.id().to_string(), fut.kind()));
        });

        let result = future.get().await.unwrap();

        assert_eq!(result.id(), "x");
        assert_eq!(result.kind(), GeoResourceType::Wms);
        assert_eq!(
            *seen.lock(),
            Some(("x".to_string(), "x".to_string(), GeoResourceType::Future))
        );
    }

    #[tokio::test]
    async fn test_get_rejects_with_original_error() {
        let error = LoaderError::msg("boom");
        let loader_error = error.clone();
        let rejected = Arc::new(AtomicUsize::new(0));
        let counter = rejected.clone();

        let mut future = GeoResource::future("x", move |_id| {
            let e = loader_error.clone();
            async move { Err(e) }
        })
        .unwrap();
        future.as_future_mut().unwrap().on_reject(move |fut| {
            assert_eq!(fut.id(), "x");
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let err = future.get().await.unwrap_err();

        assert!(err.same_as(&error));
        assert_eq!(err.to_string(), "boom");
        assert_eq!(rejected.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_is_not_memoized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let future = GeoResource::future("x", move |id| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(resolved(&id)) }
        })
        .unwrap();

        future.get().await.unwrap();
        future.get().await.unwrap();
        future.get().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_last_callback_registration_wins() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let (a, b) = (first.clone(), second.clone());

        let mut future = GeoResource::future("x", |id| async move { Ok(resolved(&id)) }).unwrap();
        let payload = future.as_future_mut().unwrap();
        payload.on_resolve(move |_, _| {
            a.fetch_add(1, Ordering::SeqCst);
        });
        payload.on_resolve(move |_, _| {
            b.fetch_add(1, Ordering::SeqCst);
        });

        future.get().await.unwrap();

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_without_callbacks() {
        let future = GeoResource::future("x", |_id| async { Err(LoaderError::msg("nope")) }).unwrap();
        let payload = future.as_future().unwrap();
        assert!(!payload.has_resolve_callback());
        assert!(!payload.has_reject_callback());
        assert!(future.get().await.is_err());
    }
}
