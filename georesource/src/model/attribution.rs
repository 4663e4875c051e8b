//! Attribution values and the default resolver.

use super::GeoResource;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// Copyright holder of an attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Copyright {
    pub label: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl Copyright {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A single attribution entry as displayed by the map.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attribution {
    pub description: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub copyright: Vec<Copyright>,
    #[serde(default)]
    pub href: Option<String>,
}

impl Attribution {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_copyright(mut self, copyright: Copyright) -> Self {
        self.copyright.push(copyright);
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<Copyright>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Copyright),
        Many(Vec<Copyright>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(c)) => vec![c],
        Some(OneOrMany::Many(list)) => list,
    })
}

/// Raw attribution value stored on a GeoResource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributionSource {
    /// Plain text, becomes the description of a single attribution.
    Text(String),
    /// One attribution for all zoom levels.
    Single(Attribution),
    /// Several attributions shown together at every zoom level.
    Multiple(Vec<Attribution>),
    /// One attribution per zoom level; levels beyond the list use the last entry.
    PerLevel(Vec<Attribution>),
}

impl From<&str> for AttributionSource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for AttributionSource {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Attribution> for AttributionSource {
    fn from(attribution: Attribution) -> Self {
        Self::Single(attribution)
    }
}

/// Resolver turning a resource and a zoom level into attributions.
pub type AttributionResolver =
    Arc<dyn Fn(&GeoResource, u8) -> Option<Vec<Attribution>> + Send + Sync>;

/// Resolver installed on every GeoResource at construction.
pub fn default_attribution_resolver() -> AttributionResolver {
    Arc::new(default_attribution)
}

/// Normalizes the raw attribution of `resource` for `level`.
pub fn default_attribution(resource: &GeoResource, level: u8) -> Option<Vec<Attribution>> {
    match resource.attribution_source()? {
        AttributionSource::Text(text) if text.is_empty() => None,
        AttributionSource::Text(text) => Some(vec![Attribution::new(text.clone())]),
        AttributionSource::Single(attribution) => Some(vec![attribution.clone()]),
        AttributionSource::Multiple(list) => Some(list.clone()),
        AttributionSource::PerLevel(list) => list
            .get(level as usize)
            .or_else(|| list.last())
            .map(|a| vec![a.clone()]),
    }
}
