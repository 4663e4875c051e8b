//! Payloads of the concrete (non-deferred, non-vector) GeoResource kinds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Authentication scheme a WMS endpoint requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthenticationType {
    /// HTTP basic access authentication, credentials supplied by the user.
    #[serde(rename = "BAA")]
    BasicAuth,
    /// Credentials managed by the application itself.
    #[serde(rename = "APPSPECIFIC")]
    AppSpecific,
}

/// WMS layer(s) served by a map server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmsResource {
    url: String,
    layers: String,
    format: String,
    authentication_type: Option<AuthenticationType>,
    extra_params: BTreeMap<String, String>,
}

impl WmsResource {
    pub fn new(url: impl Into<String>, layers: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            layers: layers.into(),
            format: format.into(),
            authentication_type: None,
            extra_params: BTreeMap::new(),
        }
    }

    pub fn with_authentication_type(mut self, auth: AuthenticationType) -> Self {
        self.authentication_type = Some(auth);
        self
    }

    pub fn with_extra_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.insert(key.into(), value.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn layers(&self) -> &str {
        &self.layers
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn authentication_type(&self) -> Option<AuthenticationType> {
        self.authentication_type
    }

    pub fn set_authentication_type(&mut self, auth: Option<AuthenticationType>) {
        self.authentication_type = auth;
    }

    /// Additional request parameters, sorted by key.
    pub fn extra_params(&self) -> &BTreeMap<String, String> {
        &self.extra_params
    }

    pub fn set_extra_params(&mut self, params: BTreeMap<String, String>) {
        self.extra_params = params;
    }
}

/// Raster tiles addressed by an `{z}/{x}/{y}` url template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmtsResource {
    url: String,
}

impl WmtsResource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Vector tiles rendered through a style definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorTilesResource {
    style_url: String,
}

impl VectorTilesResource {
    pub fn new(style_url: impl Into<String>) -> Self {
        Self {
            style_url: style_url.into(),
        }
    }

    pub fn style_url(&self) -> &str {
        &self.style_url
    }
}

/// Composite of other GeoResources, referenced by id in render order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregateResource {
    geo_resource_ids: Vec<String>,
}

impl AggregateResource {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            geo_resource_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Child ids, returned as an owned copy.
    pub fn geo_resource_ids(&self) -> Vec<String> {
        self.geo_resource_ids.clone()
    }

    pub fn len(&self) -> usize {
        self.geo_resource_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geo_resource_ids.is_empty()
    }
}
