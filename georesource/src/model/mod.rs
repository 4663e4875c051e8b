//! GeoResource entity model.
//!
//! A [`GeoResource`] is a named, typed description of a renderable map data
//! source. All kinds share [`CommonAttributes`]; the kind-specific payload is
//! a variant of the closed [`GeoResourceKind`] union:
//!
//! | kind            | payload                   |
//! |-----------------|---------------------------|
//! | `Wms`           | [`WmsResource`]           |
//! | `Wmts`          | [`WmtsResource`]          |
//! | `VectorTiles`   | [`VectorTilesResource`]   |
//! | `Vector`        | [`VectorResource`]        |
//! | `Aggregate`     | [`AggregateResource`]     |
//! | `Future`        | [`GeoResourceFuture`]     |
//!
//! Every constructor requires a payload and a non-empty id; there is no way
//! to build a resource without a kind.
//!
//! ```
//! use georesource::model::{GeoResource, GeoResourceType, WmsResource};
//!
//! let wms = GeoResource::new(
//!     "wms0",
//!     "Flurkarte",
//!     WmsResource::new("https://geoservices.example/wms", "by_dop", "image/png"),
//! )
//! .unwrap()
//! .with_opacity(0.7)
//! .with_max_zoom(Some(19));
//!
//! assert_eq!(wms.kind(), GeoResourceType::Wms);
//! assert!(GeoResource::wmts("", "no id", "https://tiles/{z}/{x}/{y}").is_err());
//! ```

mod attribution;
mod future;
mod payload;
mod vector;

pub use attribution::{
    default_attribution, default_attribution_resolver, Attribution, AttributionResolver,
    AttributionSource, Copyright,
};
pub use future::{FutureLoader, GeoResourceFuture, RejectCallback, ResolveCallback};
pub use payload::{
    AggregateResource, AuthenticationType, VectorTilesResource, WmsResource, WmtsResource,
};
pub use vector::{
    VectorData, VectorLoader, VectorResource, VectorSourceState, VectorSourceType,
};

use crate::error::{GeoResourceError, LoaderError};
use std::fmt;
use std::future::Future;

/// Discriminant of a GeoResource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoResourceType {
    Wms,
    Wmts,
    VectorTiles,
    Vector,
    Aggregate,
    Future,
}

impl GeoResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wms => "wms",
            Self::Wmts => "wmts",
            Self::VectorTiles => "vector_tiles",
            Self::Vector => "vector",
            Self::Aggregate => "aggregate",
            Self::Future => "future",
        }
    }
}

impl fmt::Display for GeoResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload.
#[derive(Debug, Clone)]
pub enum GeoResourceKind {
    Wms(WmsResource),
    Wmts(WmtsResource),
    VectorTiles(VectorTilesResource),
    Vector(VectorResource),
    Aggregate(AggregateResource),
    Future(GeoResourceFuture),
}

impl GeoResourceKind {
    pub fn kind(&self) -> GeoResourceType {
        match self {
            Self::Wms(_) => GeoResourceType::Wms,
            Self::Wmts(_) => GeoResourceType::Wmts,
            Self::VectorTiles(_) => GeoResourceType::VectorTiles,
            Self::Vector(_) => GeoResourceType::Vector,
            Self::Aggregate(_) => GeoResourceType::Aggregate,
            Self::Future(_) => GeoResourceType::Future,
        }
    }
}

impl From<WmsResource> for GeoResourceKind {
    fn from(p: WmsResource) -> Self {
        Self::Wms(p)
    }
}

impl From<WmtsResource> for GeoResourceKind {
    fn from(p: WmtsResource) -> Self {
        Self::Wmts(p)
    }
}

impl From<VectorTilesResource> for GeoResourceKind {
    fn from(p: VectorTilesResource) -> Self {
        Self::VectorTiles(p)
    }
}

impl From<VectorResource> for GeoResourceKind {
    fn from(p: VectorResource) -> Self {
        Self::Vector(p)
    }
}

impl From<AggregateResource> for GeoResourceKind {
    fn from(p: AggregateResource) -> Self {
        Self::Aggregate(p)
    }
}

impl From<GeoResourceFuture> for GeoResourceKind {
    fn from(p: GeoResourceFuture) -> Self {
        Self::Future(p)
    }
}

/// Attributes shared by every GeoResource kind.
#[derive(Clone)]
pub struct CommonAttributes {
    id: String,
    label: String,
    background: bool,
    opacity: f64,
    min_zoom: Option<u8>,
    max_zoom: Option<u8>,
    hidden: bool,
    attribution: Option<AttributionSource>,
    attribution_resolver: Option<AttributionResolver>,
    queryable: bool,
    exportable: bool,
    auth_roles: Vec<String>,
}

impl CommonAttributes {
    fn new(id: String, label: String) -> Self {
        Self {
            id,
            label,
            background: false,
            opacity: 1.0,
            min_zoom: None,
            max_zoom: None,
            hidden: false,
            attribution: None,
            attribution_resolver: Some(default_attribution_resolver()),
            queryable: true,
            exportable: true,
            auth_roles: Vec::new(),
        }
    }
}

impl fmt::Debug for CommonAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommonAttributes")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("background", &self.background)
            .field("opacity", &self.opacity)
            .field("min_zoom", &self.min_zoom)
            .field("max_zoom", &self.max_zoom)
            .field("hidden", &self.hidden)
            .field("attribution", &self.attribution)
            .field("attribution_resolver", &self.attribution_resolver.is_some())
            .field("queryable", &self.queryable)
            .field("exportable", &self.exportable)
            .field("auth_roles", &self.auth_roles)
            .finish()
    }
}

/// A renderable map data source.
#[derive(Debug, Clone)]
pub struct GeoResource {
    common: CommonAttributes,
    kind: GeoResourceKind,
}

impl GeoResource {
    /// Create a resource from a payload.
    ///
    /// # Errors
    ///
    /// [`GeoResourceError::MissingId`] if `id` is empty.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: impl Into<GeoResourceKind>,
    ) -> Result<Self, GeoResourceError> {
        let id = id.into();
        if id.is_empty() {
            return Err(GeoResourceError::MissingId);
        }
        Ok(Self {
            common: CommonAttributes::new(id, label.into()),
            kind: kind.into(),
        })
    }

    pub fn wms(
        id: impl Into<String>,
        label: impl Into<String>,
        url: impl Into<String>,
        layers: impl Into<String>,
        format: impl Into<String>,
    ) -> Result<Self, GeoResourceError> {
        Self::new(id, label, WmsResource::new(url, layers, format))
    }

    pub fn wmts(
        id: impl Into<String>,
        label: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<Self, GeoResourceError> {
        Self::new(id, label, WmtsResource::new(url))
    }

    pub fn vector_tiles(
        id: impl Into<String>,
        label: impl Into<String>,
        style_url: impl Into<String>,
    ) -> Result<Self, GeoResourceError> {
        Self::new(id, label, VectorTilesResource::new(style_url))
    }

    /// Create a vector resource without a data source yet.
    pub fn vector(
        id: impl Into<String>,
        label: impl Into<String>,
        source_type: VectorSourceType,
    ) -> Result<Self, GeoResourceError> {
        Self::new(id, label, VectorResource::new(source_type))
    }

    pub fn aggregate<I, S>(
        id: impl Into<String>,
        label: impl Into<String>,
        geo_resource_ids: I,
    ) -> Result<Self, GeoResourceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(id, label, AggregateResource::new(geo_resource_ids))
    }

    /// Create a deferred resource with an empty label.
    pub fn future<F, Fut>(id: impl Into<String>, loader: F) -> Result<Self, GeoResourceError>
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<GeoResource, LoaderError>> + Send + 'static,
    {
        Self::new(id, "", GeoResourceFuture::new(loader))
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.set_label(label);
        self
    }

    pub fn with_background(mut self, background: bool) -> Self {
        self.set_background(background);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.set_opacity(opacity);
        self
    }

    pub fn with_min_zoom(mut self, zoom: Option<u8>) -> Self {
        self.set_min_zoom(zoom);
        self
    }

    pub fn with_max_zoom(mut self, zoom: Option<u8>) -> Self {
        self.set_max_zoom(zoom);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.set_hidden(hidden);
        self
    }

    pub fn with_attribution(mut self, attribution: Option<AttributionSource>) -> Self {
        self.set_attribution(attribution);
        self
    }

    pub fn with_attribution_resolver(mut self, resolver: Option<AttributionResolver>) -> Self {
        self.set_attribution_resolver(resolver);
        self
    }

    pub fn with_queryable(mut self, queryable: bool) -> Self {
        self.set_queryable(queryable);
        self
    }

    pub fn with_exportable(mut self, exportable: bool) -> Self {
        self.set_exportable(exportable);
        self
    }

    pub fn with_auth_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_auth_roles(roles.into_iter().map(Into::into).collect());
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.common.id
    }

    pub fn kind(&self) -> GeoResourceType {
        self.kind.kind()
    }

    pub fn label(&self) -> &str {
        &self.common.label
    }

    pub fn has_label(&self) -> bool {
        !self.common.label.is_empty()
    }

    pub fn is_background(&self) -> bool {
        self.common.background
    }

    pub fn opacity(&self) -> f64 {
        self.common.opacity
    }

    pub fn min_zoom(&self) -> Option<u8> {
        self.common.min_zoom
    }

    pub fn max_zoom(&self) -> Option<u8> {
        self.common.max_zoom
    }

    pub fn is_hidden(&self) -> bool {
        self.common.hidden
    }

    pub fn attribution_source(&self) -> Option<&AttributionSource> {
        self.common.attribution.as_ref()
    }

    pub fn attribution_resolver(&self) -> Option<&AttributionResolver> {
        self.common.attribution_resolver.as_ref()
    }

    pub fn is_queryable(&self) -> bool {
        self.common.queryable
    }

    pub fn is_exportable(&self) -> bool {
        self.common.exportable
    }

    pub fn auth_roles(&self) -> &[String] {
        &self.common.auth_roles
    }

    pub fn payload(&self) -> &GeoResourceKind {
        &self.kind
    }

    pub fn payload_mut(&mut self) -> &mut GeoResourceKind {
        &mut self.kind
    }

    pub fn is_future(&self) -> bool {
        matches!(self.kind, GeoResourceKind::Future(_))
    }

    pub fn as_wms(&self) -> Option<&WmsResource> {
        match &self.kind {
            GeoResourceKind::Wms(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_wmts(&self) -> Option<&WmtsResource> {
        match &self.kind {
            GeoResourceKind::Wmts(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_vector_tiles(&self) -> Option<&VectorTilesResource> {
        match &self.kind {
            GeoResourceKind::VectorTiles(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&VectorResource> {
        match &self.kind {
            GeoResourceKind::Vector(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_vector_mut(&mut self) -> Option<&mut VectorResource> {
        match &mut self.kind {
            GeoResourceKind::Vector(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_aggregate(&self) -> Option<&AggregateResource> {
        match &self.kind {
            GeoResourceKind::Aggregate(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_future(&self) -> Option<&GeoResourceFuture> {
        match &self.kind {
            GeoResourceKind::Future(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_future_mut(&mut self) -> Option<&mut GeoResourceFuture> {
        match &mut self.kind {
            GeoResourceKind::Future(p) => Some(p),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Mutators
    // -------------------------------------------------------------------------

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.common.label = label.into();
    }

    pub fn set_background(&mut self, background: bool) {
        self.common.background = background;
    }

    /// Set the opacity, clamped to `0.0..=1.0`. NaN is treated as opaque.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.common.opacity = if opacity.is_nan() {
            1.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
    }

    pub fn set_min_zoom(&mut self, zoom: Option<u8>) {
        self.common.min_zoom = zoom;
    }

    pub fn set_max_zoom(&mut self, zoom: Option<u8>) {
        self.common.max_zoom = zoom;
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.common.hidden = hidden;
    }

    pub fn set_attribution(&mut self, attribution: Option<AttributionSource>) {
        self.common.attribution = attribution;
    }

    pub fn set_attribution_resolver(&mut self, resolver: Option<AttributionResolver>) {
        self.common.attribution_resolver = resolver;
    }

    pub fn set_queryable(&mut self, queryable: bool) {
        self.common.queryable = queryable;
    }

    pub fn set_exportable(&mut self, exportable: bool) {
        self.common.exportable = exportable;
    }

    pub fn set_auth_roles(&mut self, roles: Vec<String>) {
        self.common.auth_roles = roles;
    }

    // -------------------------------------------------------------------------
    // Behavior
    // -------------------------------------------------------------------------

    /// Attributions for the given zoom level; see [`attribution_of`].
    pub fn attribution(&self, level: u8) -> Result<Option<Vec<Attribution>>, GeoResourceError> {
        attribution_of(self, level)
    }

    /// Resolve a FUTURE through its loader.
    ///
    /// The loader runs on every call. On success the resolve callback receives
    /// `(resolved, self)`; on failure the reject callback receives `self` and
    /// the loader's error is returned unchanged. Any other kind resolves to a
    /// clone of itself without running callbacks.
    pub async fn get(&self) -> Result<GeoResource, LoaderError> {
        match &self.kind {
            GeoResourceKind::Future(future) => future.resolve(self).await,
            _ => Ok(self.clone()),
        }
    }

    /// Vector data of a VECTOR resource; `None` for other kinds.
    pub async fn load_vector(&self) -> Result<Option<VectorData>, LoaderError> {
        match &self.kind {
            GeoResourceKind::Vector(vector) => vector.load(self.id()).await,
            _ => Ok(None),
        }
    }

    /// [`load_vector`](Self::load_vector), also reporting whether the loader ran.
    pub(crate) async fn load_vector_reporting(
        &self,
    ) -> Result<(Option<VectorData>, bool), LoaderError> {
        match &self.kind {
            GeoResourceKind::Vector(vector) => vector.load_reporting(self.id()).await,
            _ => Ok((None, false)),
        }
    }
}

/// Attributions of `resource` at `level`, via its configured resolver.
///
/// An empty resolver result is normalized to `None`.
///
/// # Errors
///
/// [`GeoResourceError::NoAttributionResolver`] if the resolver slot is empty.
pub fn attribution_of(
    resource: &GeoResource,
    level: u8,
) -> Result<Option<Vec<Attribution>>, GeoResourceError> {
    let resolver = resource.attribution_resolver().ok_or_else(|| {
        GeoResourceError::NoAttributionResolver {
            id: resource.id().to_string(),
        }
    })?;
    Ok(resolver(resource, level).filter(|list| !list.is_empty()))
}
