//! Backend JSON definition format.
//!
//! Keys are camelCase. `type` selects the payload and decides which of the
//! optional fields are required:
//!
//! | type        | required fields             |
//! |-------------|-----------------------------|
//! | `wms`       | `url`, `layers`, `format`   |
//! | `wmts`      | `url`                       |
//! | `vt`        | `styleUrl`                  |
//! | `vector`    | `url`, `sourceType`         |
//! | `aggregate` | `geoResourceIds`            |

use crate::error::GeoResourceError;
use crate::log::Logger;
use crate::log_warn;
use crate::model::{
    AggregateResource, Attribution, AttributionSource, AuthenticationType, GeoResource,
    GeoResourceKind, VectorResource, VectorSourceType, VectorTilesResource, WmsResource,
    WmtsResource,
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Resource type as named by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionType {
    Wms,
    Wmts,
    #[serde(rename = "vt")]
    VectorTiles,
    Vector,
    Aggregate,
}

/// Attribution as sent by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DefinitionAttribution {
    Text(String),
    Single(Attribution),
    /// One entry per zoom level.
    PerLevel(Vec<Attribution>),
}

impl From<DefinitionAttribution> for AttributionSource {
    fn from(raw: DefinitionAttribution) -> Self {
        match raw {
            DefinitionAttribution::Text(text) => AttributionSource::Text(text),
            DefinitionAttribution::Single(attribution) => AttributionSource::Single(attribution),
            DefinitionAttribution::PerLevel(list) => AttributionSource::PerLevel(list),
        }
    }
}

/// One GeoResource as described by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoResourceDefinition {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub kind: DefinitionType,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub layers: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default, deserialize_with = "stringified_params")]
    pub extra_params: BTreeMap<String, String>,
    #[serde(default)]
    pub authentication_type: Option<AuthenticationType>,
    #[serde(default)]
    pub style_url: Option<String>,
    #[serde(default)]
    pub source_type: Option<VectorSourceType>,
    #[serde(default)]
    pub geo_resource_ids: Option<Vec<String>>,
    #[serde(default)]
    pub background: bool,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub min_zoom: Option<u8>,
    #[serde(default)]
    pub max_zoom: Option<u8>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub attribution: Option<DefinitionAttribution>,
    #[serde(default)]
    pub queryable: Option<bool>,
    #[serde(default)]
    pub exportable: Option<bool>,
    #[serde(default)]
    pub auth_roles: Vec<String>,
}

/// Extra params may carry numbers or booleans; they are sent as strings.
fn stringified_params<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => (key, s),
            other => (key, other.to_string()),
        })
        .collect())
}

impl GeoResourceDefinition {
    /// Build the GeoResource this definition describes.
    ///
    /// # Errors
    ///
    /// - [`GeoResourceError::MissingId`] for an empty id
    /// - [`GeoResourceError::InvalidDefinition`] if a field required by the
    ///   type is missing
    pub fn to_geo_resource(self) -> Result<GeoResource, GeoResourceError> {
        let payload = self.payload()?;

        let mut resource = GeoResource::new(self.id, self.label, payload)?
            .with_background(self.background)
            .with_min_zoom(self.min_zoom)
            .with_max_zoom(self.max_zoom)
            .with_hidden(self.hidden)
            .with_attribution(self.attribution.map(Into::into))
            .with_auth_roles(self.auth_roles);
        if let Some(opacity) = self.opacity {
            resource.set_opacity(opacity);
        }
        if let Some(queryable) = self.queryable {
            resource.set_queryable(queryable);
        }
        if let Some(exportable) = self.exportable {
            resource.set_exportable(exportable);
        }
        Ok(resource)
    }

    fn payload(&self) -> Result<GeoResourceKind, GeoResourceError> {
        let kind = match self.kind {
            DefinitionType::Wms => {
                let mut wms = WmsResource::new(
                    self.required(&self.url, "url")?,
                    self.required(&self.layers, "layers")?,
                    self.required(&self.format, "format")?,
                );
                wms.set_authentication_type(self.authentication_type);
                wms.set_extra_params(self.extra_params.clone());
                GeoResourceKind::Wms(wms)
            }
            DefinitionType::Wmts => {
                GeoResourceKind::Wmts(WmtsResource::new(self.required(&self.url, "url")?))
            }
            DefinitionType::VectorTiles => GeoResourceKind::VectorTiles(
                VectorTilesResource::new(self.required(&self.style_url, "styleUrl")?),
            ),
            DefinitionType::Vector => {
                let url = self.required(&self.url, "url")?;
                let source_type = self.source_type.ok_or_else(|| self.missing("sourceType"))?;
                GeoResourceKind::Vector(VectorResource::new(source_type).with_url(url))
            }
            DefinitionType::Aggregate => {
                let ids = self
                    .geo_resource_ids
                    .as_ref()
                    .ok_or_else(|| self.missing("geoResourceIds"))?;
                GeoResourceKind::Aggregate(AggregateResource::new(ids.iter().cloned()))
            }
        };
        Ok(kind)
    }

    fn required(&self, value: &Option<String>, name: &str) -> Result<String, GeoResourceError> {
        match value {
            Some(v) if !v.is_empty() => Ok(v.clone()),
            _ => Err(self.missing(name)),
        }
    }

    fn missing(&self, name: &str) -> GeoResourceError {
        GeoResourceError::InvalidDefinition {
            id: self.id.clone(),
            reason: format!("missing required field '{}'", name),
        }
    }
}

/// Parse a single definition.
pub fn parse_definition(bytes: &[u8]) -> Result<GeoResource, GeoResourceError> {
    let definition: GeoResourceDefinition = serde_json::from_slice(bytes)?;
    definition.to_geo_resource()
}

/// Parse a bulk payload (a JSON array of definitions).
///
/// Entries that do not describe a valid resource are skipped and reported
/// at warn level; the remaining entries keep their order.
///
/// # Errors
///
/// [`GeoResourceError::Json`] if the payload is not a JSON array.
pub fn parse_definitions(
    bytes: &[u8],
    logger: &dyn Logger,
) -> Result<Vec<GeoResource>, GeoResourceError> {
    let entries: Vec<Value> = serde_json::from_slice(bytes)?;
    let mut resources = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let id = entry
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<none>")
            .to_string();
        let parsed = serde_json::from_value::<GeoResourceDefinition>(entry)
            .map_err(GeoResourceError::from)
            .and_then(GeoResourceDefinition::to_geo_resource);
        match parsed {
            Ok(resource) => resources.push(resource),
            Err(e) => {
                log_warn!(
                    logger,
                    "Skipping GeoResource definition #{} ({}): {}",
                    index,
                    id,
                    e
                );
            }
        }
    }

    Ok(resources)
}
