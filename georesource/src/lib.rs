//! GeoResource - registry and resolution engine for map data sources
//!
//! This library holds the catalog of every map data source (raster tiles,
//! WMS layers, vector files, composite layers) a GIS client can render,
//! resolves sources whose concrete type is only known after a backend round
//! trip, and reports changes to registered sources without breaking the
//! identity of the handles consumers already hold.
//!
//! # High-Level API
//!
//! The [`registry`] module provides the entry point:
//!
//! ```ignore
//! use georesource::registry::{GeoResourceRegistry, BroadcastListener};
//! use georesource::provider::BackendClient;
//!
//! let client: Arc<dyn BackendClient> = Arc::new(MyHttpBackend::new(url));
//! let events = Arc::new(BroadcastListener::default());
//!
//! let registry = GeoResourceRegistry::for_backend(client)
//!     .with_listener(events.clone())
//!     .build();
//!
//! registry.init().await;
//! let layer = registry.resolve_by_id("https://wms.example/||layer_a||Layer A");
//! ```

pub mod config;
pub mod error;
pub mod log;
pub mod logging;
pub mod model;
pub mod observable;
pub mod provider;
pub mod registry;
pub mod strategy;

/// Version of the georesource library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
