//! Backend access.
//!
//! The crate ships no HTTP client. Hosts implement [`BackendClient`] on top
//! of their transport; [`StaticBackendClient`] serves a fixed JSON payload
//! and is used by standalone builds and tests.

use super::bulk::BulkProvider;
use super::definition::parse_definitions;
use crate::error::LoaderError;
use crate::log::{Logger, NoOpLogger};
use crate::log_debug;
use crate::model::GeoResource;
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use serde_json::Value;
use std::sync::Arc;

/// Transport-agnostic access to the GeoResource backend.
///
/// Both methods return the raw response body in the definition format
/// (an array for [`fetch_all`](Self::fetch_all), an object for
/// [`fetch_by_id`](Self::fetch_by_id)).
pub trait BackendClient: Send + Sync {
    /// Fetch the definitions of all GeoResources.
    fn fetch_all(&self) -> BoxFuture<'static, Result<Vec<u8>, LoaderError>>;

    /// Fetch the definition of one GeoResource.
    fn fetch_by_id(&self, id: &str) -> BoxFuture<'static, Result<Vec<u8>, LoaderError>>;
}

/// Backend client answering from an in-memory JSON array.
#[derive(Debug, Clone)]
pub struct StaticBackendClient {
    definitions: Arc<Vec<Value>>,
}

impl StaticBackendClient {
    /// Create a client from a list of definition objects.
    pub fn new(definitions: Vec<Value>) -> Self {
        Self {
            definitions: Arc::new(definitions),
        }
    }

    /// Create a client from a JSON array payload.
    pub fn from_json(payload: &[u8]) -> Result<Self, LoaderError> {
        let definitions: Vec<Value> =
            serde_json::from_slice(payload).map_err(LoaderError::new)?;
        Ok(Self::new(definitions))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl BackendClient for StaticBackendClient {
    fn fetch_all(&self) -> BoxFuture<'static, Result<Vec<u8>, LoaderError>> {
        let body = serde_json::to_vec(self.definitions.as_slice()).map_err(LoaderError::new);
        future::ready(body).boxed()
    }

    fn fetch_by_id(&self, id: &str) -> BoxFuture<'static, Result<Vec<u8>, LoaderError>> {
        let found = self
            .definitions
            .iter()
            .find(|d| d.get("id").and_then(Value::as_str) == Some(id));
        let body = match found {
            Some(definition) => serde_json::to_vec(definition).map_err(LoaderError::new),
            None => Err(LoaderError::msg(format!(
                "No GeoResource definition found for '{}'",
                id
            ))),
        };
        future::ready(body).boxed()
    }
}

/// Bulk provider reading the catalog from a [`BackendClient`].
///
/// Invalid definitions are skipped with a warning; a malformed payload or a
/// transport error fails the load.
#[derive(Clone)]
pub struct BackendBulkProvider {
    client: Arc<dyn BackendClient>,
    logger: Arc<dyn Logger>,
}

impl BackendBulkProvider {
    pub fn new(client: Arc<dyn BackendClient>) -> Self {
        Self {
            client,
            logger: Arc::new(NoOpLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }
}

impl BulkProvider for BackendBulkProvider {
    fn load(&self) -> BoxFuture<'static, Result<Vec<GeoResource>, LoaderError>> {
        let request = self.client.fetch_all();
        let logger = Arc::clone(&self.logger);
        async move {
            let body = request.await?;
            let resources = parse_definitions(&body, logger.as_ref())?;
            log_debug!(logger, "Loaded {} GeoResource definitions", resources.len());
            Ok(resources)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{LogLevel, RecordingLogger};
    use serde_json::json;

    fn client() -> StaticBackendClient {
        StaticBackendClient::new(vec![
            json!({"id": "tpo", "label": "TopPlus", "type": "wmts", "url": "https://t/{z}/{x}/{y}"}),
            json!({"id": "broken", "type": "wms"}),
            json!({"id": "bmde", "label": "Basemap", "type": "vt", "styleUrl": "https://style.json"}),
        ])
    }

    struct FailingClient;

    impl BackendClient for FailingClient {
        fn fetch_all(&self) -> BoxFuture<'static, Result<Vec<u8>, LoaderError>> {
            future::ready(Err(LoaderError::msg("connection refused"))).boxed()
        }

        fn fetch_by_id(&self, _id: &str) -> BoxFuture<'static, Result<Vec<u8>, LoaderError>> {
            future::ready(Err(LoaderError::msg("connection refused"))).boxed()
        }
    }

    #[tokio::test]
    async fn test_fetch_by_id() {
        let client = client();
        let body = client.fetch_by_id("bmde").await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["styleUrl"], "https://style.json");

        assert!(client.fetch_by_id("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_bulk_provider_skips_invalid() {
        let logger = Arc::new(RecordingLogger::new());
        let provider = BackendBulkProvider::new(Arc::new(client())).with_logger(logger.clone());

        let resources = provider.load().await.unwrap();

        let ids: Vec<_> = resources.iter().map(|r| r.id().to_string()).collect();
        assert_eq!(ids, vec!["tpo", "bmde"]);
        assert!(logger.contains(LogLevel::Warn, "broken"));
    }

    #[tokio::test]
    async fn test_bulk_provider_transport_error() {
        let provider = BackendBulkProvider::new(Arc::new(FailingClient));
        let err = provider.load().await.unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn test_empty_backend_and_malformed_json() {
        let client = StaticBackendClient::new(Vec::new());
        assert!(client.is_empty());
        let provider = BackendBulkProvider::new(Arc::new(client));
        assert!(provider.load().await.unwrap().is_empty());

        assert!(StaticBackendClient::from_json(b"{}").is_err());
    }
}
