//! Strategy deferring unknown ids to the backend.

use super::external::is_http_url;
use super::{ResolutionStrategy, EXTERNAL_ID_SEPARATOR};
use crate::error::LoaderError;
use crate::model::GeoResource;
use crate::provider::{parse_definition, BackendClient};
use std::sync::Arc;

/// Returns a FUTURE for every id that is not a url.
///
/// The FUTURE's loader fetches the definition through the backend client
/// each time it is resolved. Put this strategy last in the chain: it
/// claims every non-url id.
#[derive(Clone)]
pub struct BackendIdStrategy {
    client: Arc<dyn BackendClient>,
}

impl BackendIdStrategy {
    pub fn new(client: Arc<dyn BackendClient>) -> Self {
        Self { client }
    }
}

impl ResolutionStrategy for BackendIdStrategy {
    fn resolve(&self, id: &str) -> Option<GeoResource> {
        if id.is_empty() || is_http_url(id) || id.contains(EXTERNAL_ID_SEPARATOR) {
            return None;
        }
        let client = Arc::clone(&self.client);
        GeoResource::future(id, move |id| {
            let request = client.fetch_by_id(&id);
            async move {
                let body = request.await?;
                let resolved = parse_definition(&body).map_err(LoaderError::from)?;
                if resolved.id() != id {
                    return Err(LoaderError::msg(format!(
                        "backend answered '{}' for requested id '{}'",
                        resolved.id(),
                        id
                    )));
                }
                Ok(resolved)
            }
        })
        .ok()
    }
}

impl std::fmt::Debug for BackendIdStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendIdStrategy").finish_non_exhaustive()
    }
}
