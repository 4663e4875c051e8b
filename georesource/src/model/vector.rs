//! Vector data GeoResources (KML, GPX, GeoJSON, EWKT).
//!
//! A vector resource gets its features from exactly one of three sources:
//! a url, inline data with its spatial reference, or an async loader. The
//! sources are variants of one enum, so setting one replaces the others.
//!
//! Loading through a loader is memoized per registration: repeated
//! [`VectorResource::load`] calls share a single loader invocation.

use crate::error::LoaderError;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Format of vector data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorSourceType {
    Kml,
    Gpx,
    #[serde(alias = "geoJson")]
    GeoJson,
    Ewkt,
}

impl VectorSourceType {
    /// Guess the format from a url's file extension.
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
        if path.ends_with(".kml") {
            Some(Self::Kml)
        } else if path.ends_with(".gpx") {
            Some(Self::Gpx)
        } else if path.ends_with(".geojson") || path.ends_with(".json") {
            Some(Self::GeoJson)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kml => "kml",
            Self::Gpx => "gpx",
            Self::GeoJson => "geojson",
            Self::Ewkt => "ewkt",
        }
    }
}

impl fmt::Display for VectorSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vector data produced by a loader or stored inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorData {
    pub data: String,
    pub srid: u32,
    /// Display name found in the data (e.g. a KML document name).
    pub label: Option<String>,
}

impl VectorData {
    pub fn new(data: impl Into<String>, srid: u32) -> Self {
        Self {
            data: data.into(),
            srid,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Async loader for vector data, called with the resource id.
pub type VectorLoader =
    Arc<dyn Fn(String) -> BoxFuture<'static, Result<VectorData, LoaderError>> + Send + Sync>;

/// Which data source a vector resource currently uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorSourceState {
    Empty,
    Url,
    Inline,
    Loader,
}

#[derive(Clone)]
enum VectorSource {
    Empty,
    Url(String),
    Inline { data: String, srid: u32 },
    Loader {
        loader: VectorLoader,
        loaded: Arc<OnceCell<VectorData>>,
    },
}

/// Payload of a VECTOR GeoResource.
#[derive(Clone)]
pub struct VectorResource {
    source_type: VectorSourceType,
    source: VectorSource,
}

impl VectorResource {
    pub fn new(source_type: VectorSourceType) -> Self {
        Self {
            source_type,
            source: VectorSource::Empty,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.set_url(url);
        self
    }

    pub fn with_source(mut self, data: impl Into<String>, srid: u32) -> Self {
        self.set_source(data, srid);
        self
    }

    pub fn with_loader<F, Fut>(mut self, loader: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<VectorData, LoaderError>> + Send + 'static,
    {
        self.set_loader(loader);
        self
    }

    pub fn source_type(&self) -> VectorSourceType {
        self.source_type
    }

    pub fn source_state(&self) -> VectorSourceState {
        match self.source {
            VectorSource::Empty => VectorSourceState::Empty,
            VectorSource::Url(_) => VectorSourceState::Url,
            VectorSource::Inline { .. } => VectorSourceState::Inline,
            VectorSource::Loader { .. } => VectorSourceState::Loader,
        }
    }

    /// Use a url as data source, dropping inline data or loader.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.source = VectorSource::Url(url.into());
    }

    /// Use inline data as data source, dropping url or loader.
    pub fn set_source(&mut self, data: impl Into<String>, srid: u32) {
        self.source = VectorSource::Inline {
            data: data.into(),
            srid,
        };
    }

    /// Use a loader as data source, dropping url or inline data.
    ///
    /// Each registration starts with an empty memo.
    pub fn set_loader<F, Fut>(&mut self, loader: F)
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<VectorData, LoaderError>> + Send + 'static,
    {
        let loader: VectorLoader = Arc::new(move |id| loader(id).boxed());
        self.source = VectorSource::Loader {
            loader,
            loaded: Arc::new(OnceCell::new()),
        };
    }

    pub fn url(&self) -> Option<&str> {
        match &self.source {
            VectorSource::Url(url) => Some(url),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&str> {
        match &self.source {
            VectorSource::Inline { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn srid(&self) -> Option<u32> {
        match &self.source {
            VectorSource::Inline { srid, .. } => Some(*srid),
            _ => None,
        }
    }

    pub fn loader(&self) -> Option<&VectorLoader> {
        match &self.source {
            VectorSource::Loader { loader, .. } => Some(loader),
            _ => None,
        }
    }

    /// Returns the vector data of this resource.
    ///
    /// - inline source: the stored data
    /// - loader source: the loader result, invoked at most once per registration
    /// - url or empty source: `None`; url content is fetched by the layer builder
    ///
    /// A failed load is not memoized; the next call invokes the loader again.
    pub async fn load(&self, id: &str) -> Result<Option<VectorData>, LoaderError> {
        Ok(self.load_reporting(id).await?.0)
    }

    /// Like [`load`](Self::load), also reporting whether this call ran the
    /// loader (`false` for memoized, inline, url and empty sources).
    pub(crate) async fn load_reporting(
        &self,
        id: &str,
    ) -> Result<(Option<VectorData>, bool), LoaderError> {
        match &self.source {
            VectorSource::Empty | VectorSource::Url(_) => Ok((None, false)),
            VectorSource::Inline { data, srid } => {
                Ok((Some(VectorData::new(data.clone(), *srid)), false))
            }
            VectorSource::Loader { loader, loaded } => {
                let id = id.to_string();
                let mut ran = false;
                let data = loaded
                    .get_or_try_init(|| {
                        ran = true;
                        loader(id)
                    })
                    .await?;
                Ok((Some(data.clone()), ran))
            }
        }
    }
}

impl fmt::Debug for VectorResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("VectorResource");
        s.field("source_type", &self.source_type);
        match &self.source {
            VectorSource::Empty => s.field("source", &"empty"),
            VectorSource::Url(url) => s.field("url", url),
            VectorSource::Inline { data, srid } => {
                s.field("data_len", &data.len()).field("srid", srid)
            }
            VectorSource::Loader { loaded, .. } => s.field("loaded", &loaded.initialized()),
        };
        s.finish()
    }
}
