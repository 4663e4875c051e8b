//! Sources of GeoResources.
//!
//! The registry loads its initial catalog through a [`BulkProvider`]. Any
//! closure returning a future of `Result<Vec<GeoResource>, LoaderError>`
//! is a provider; [`BackendBulkProvider`] reads the catalog from a backend
//! through an injected [`BackendClient`].
//!
//! # Backend definitions
//!
//! Backends describe resources as JSON objects (see [`GeoResourceDefinition`]):
//!
//! ```
//! use georesource::provider::parse_definition;
//! use georesource::model::GeoResourceType;
//!
//! let json = br#"{
//!     "id": "atkis",
//!     "label": "Webkarte",
//!     "type": "wms",
//!     "url": "https://geoservices.example/wms",
//!     "layers": "by_webkarte",
//!     "format": "image/png",
//!     "attribution": "Bayerische Vermessungsverwaltung"
//! }"#;
//!
//! let resource = parse_definition(json).unwrap();
//! assert_eq!(resource.kind(), GeoResourceType::Wms);
//! assert_eq!(resource.label(), "Webkarte");
//! ```

mod backend;
mod bulk;
mod definition;

pub use backend::{BackendBulkProvider, BackendClient, StaticBackendClient};
pub use bulk::BulkProvider;
pub use definition::{
    parse_definition, parse_definitions, DefinitionAttribution, DefinitionType,
    GeoResourceDefinition,
};
