//! Strategy for ids that point at external services.
//!
//! Two id shapes are recognized:
//!
//! - `url||layers` or `url||layers||label`: a WMS layer on an arbitrary server
//! - a plain `http(s)` url ending in `.kml`, `.gpx`, `.geojson` or `.json`:
//!   a vector file fetched from that url

use super::ResolutionStrategy;
use crate::model::{GeoResource, VectorResource, VectorSourceType, WmsResource};

/// Separator between url, layers and label in external WMS ids.
pub const EXTERNAL_ID_SEPARATOR: &str = "||";

const DEFAULT_WMS_FORMAT: &str = "image/png";

/// Builds WMS and VECTOR resources from external ids.
#[derive(Debug, Clone)]
pub struct ExternalUrlStrategy {
    wms_format: String,
}

impl ExternalUrlStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Image format requested from external WMS servers.
    pub fn with_wms_format(mut self, format: impl Into<String>) -> Self {
        self.wms_format = format.into();
        self
    }

    fn resolve_wms(&self, id: &str) -> Option<GeoResource> {
        let mut parts = id.split(EXTERNAL_ID_SEPARATOR);
        let url = parts.next().filter(|u| is_http_url(u))?;
        let layers = parts.next().filter(|l| !l.is_empty())?;
        let label = parts.next().filter(|l| !l.is_empty()).unwrap_or(layers);
        if parts.next().is_some() {
            return None;
        }
        GeoResource::new(id, label, WmsResource::new(url, layers, self.wms_format.as_str())).ok()
    }

    fn resolve_vector(&self, id: &str) -> Option<GeoResource> {
        if !is_http_url(id) {
            return None;
        }
        let source_type = VectorSourceType::from_url(id)?;
        let label = file_name(id).unwrap_or(id);
        GeoResource::new(id, label, VectorResource::new(source_type).with_url(id)).ok()
    }
}

impl Default for ExternalUrlStrategy {
    fn default() -> Self {
        Self {
            wms_format: DEFAULT_WMS_FORMAT.to_string(),
        }
    }
}

impl ResolutionStrategy for ExternalUrlStrategy {
    fn resolve(&self, id: &str) -> Option<GeoResource> {
        if id.contains(EXTERNAL_ID_SEPARATOR) {
            self.resolve_wms(id)
        } else {
            self.resolve_vector(id)
        }
    }
}

/// True for ids that look like `http://` or `https://` urls.
pub(crate) fn is_http_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn file_name(url: &str) -> Option<&str> {
    url.split(['?', '#'])
        .next()?
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
}
