//! Bulk provider trait.

use crate::error::LoaderError;
use crate::model::GeoResource;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;

/// Loads the initial set of GeoResources.
///
/// The trait returns a boxed future so providers can be stored as trait
/// objects. Closures `Fn() -> impl Future<Output = Result<Vec<GeoResource>, LoaderError>>`
/// implement it directly:
///
/// ```
/// use georesource::provider::BulkProvider;
/// use georesource::model::GeoResource;
/// use georesource::error::LoaderError;
///
/// let provider = || async {
///     Ok::<_, LoaderError>(vec![GeoResource::wmts("tpo", "TopPlus", "https://t").unwrap()])
/// };
/// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// let resources = rt.block_on(provider.load()).unwrap();
/// assert_eq!(resources[0].id(), "tpo");
/// ```
pub trait BulkProvider: Send + Sync {
    /// Load all resources the provider knows about.
    fn load(&self) -> BoxFuture<'static, Result<Vec<GeoResource>, LoaderError>>;
}

impl<F, Fut> BulkProvider for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<GeoResource>, LoaderError>> + Send + 'static,
{
    fn load(&self) -> BoxFuture<'static, Result<Vec<GeoResource>, LoaderError>> {
        self().boxed()
    }
}
