//! Resources used when the backend is unreachable in standalone mode.

use crate::model::{Attribution, AttributionSource, Copyright, GeoResource};

pub const TOPPLUS_ID: &str = "tpo";
pub const TOPPLUS_MONO_ID: &str = "tpo_mono";
pub const BASEMAP_VECTOR_ID: &str = "bmde_vector";
pub const BASEMAP_VECTOR_RELIEF_ID: &str = "bmde_vector_relief";

const TOPPLUS_URL: &str = "https://sgx.geodatenzentrum.de/wmts_topplus_open/tile/1.0.0/web/default/WEBMERCATOR/{z}/{y}/{x}.png";
const TOPPLUS_MONO_URL: &str = "https://sgx.geodatenzentrum.de/wmts_topplus_open/tile/1.0.0/web_grau/default/WEBMERCATOR/{z}/{y}/{x}.png";
const BASEMAP_STYLE_URL: &str =
    "https://sgx.geodatenzentrum.de/gdz_basemapde_vektor/styles/bm_web_col.json";
const BASEMAP_RELIEF_STYLE_URL: &str =
    "https://sgx.geodatenzentrum.de/gdz_basemapde_vektor/styles/bm_web_top.json";

/// Resources the registry serves when the bulk load fails in standalone mode.
#[derive(Debug, Clone)]
pub struct FallbackSet {
    resources: Vec<GeoResource>,
}

impl FallbackSet {
    pub fn new(resources: Vec<GeoResource>) -> Self {
        Self { resources }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn resources(&self) -> &[GeoResource] {
        &self.resources
    }

    pub fn ids(&self) -> Vec<&str> {
        self.resources.iter().map(GeoResource::id).collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// TopPlus raster maps and basemap.de vector maps, all provided by the BKG.
impl Default for FallbackSet {
    fn default() -> Self {
        let attribution = |description: &str| {
            Some(AttributionSource::Single(
                Attribution::new(description).with_copyright(
                    Copyright::new("Bundesamt für Kartographie und Geodäsie (BKG)")
                        .with_url("https://www.bkg.bund.de/"),
                ),
            ))
        };

        let resources = [
            GeoResource::wmts(TOPPLUS_ID, "TopPlus Farbe", TOPPLUS_URL)
                .map(|r| r.with_attribution(attribution("TopPlus Open"))),
            GeoResource::wmts(TOPPLUS_MONO_ID, "TopPlus Grau", TOPPLUS_MONO_URL)
                .map(|r| r.with_attribution(attribution("TopPlus Open"))),
            GeoResource::vector_tiles(BASEMAP_VECTOR_ID, "Basemap.de (Vektor)", BASEMAP_STYLE_URL)
                .map(|r| r.with_attribution(attribution("basemap.de"))),
            GeoResource::vector_tiles(
                BASEMAP_VECTOR_RELIEF_ID,
                "Basemap.de (Vektor + Relief)",
                BASEMAP_RELIEF_STYLE_URL,
            )
            .map(|r| r.with_attribution(attribution("basemap.de"))),
        ];

        // Ids are non-empty constants, construction cannot fail
        Self::new(
            resources
                .into_iter()
                .filter_map(Result::ok)
                .map(|r| r.with_background(true))
                .collect(),
        )
    }
}
