//! Registry configuration.

use crate::observable::Field;

/// Fields forwarded as change events unless configured otherwise.
///
/// Consumers (layer panels, search results) display the label, so label
/// changes are the ones that must reach them.
pub const DEFAULT_TRACKED_FIELDS: &[Field] = &[Field::Label];

/// Configuration for [`GeoResourceRegistry`](crate::registry::GeoResourceRegistry).
///
/// # Example
///
/// ```
/// use georesource::config::RegistryConfig;
/// use georesource::observable::Field;
///
/// let config = RegistryConfig::new().with_tracked_fields([Field::Label, Field::Opacity]);
/// assert!(config.is_tracked(Field::Opacity));
/// assert!(!config.is_tracked(Field::Hidden));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    tracked_fields: Vec<Field>,
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set of tracked fields.
    pub fn with_tracked_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.tracked_fields.clear();
        for field in fields {
            self = self.track_field(field);
        }
        self
    }

    /// Add one tracked field.
    pub fn track_field(mut self, field: Field) -> Self {
        if !self.tracked_fields.contains(&field) {
            self.tracked_fields.push(field);
        }
        self
    }

    pub fn tracked_fields(&self) -> &[Field] {
        &self.tracked_fields
    }

    /// Returns true if changes to `field` are forwarded to the change listener.
    pub fn is_tracked(&self, field: Field) -> bool {
        self.tracked_fields.contains(&field)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            tracked_fields: DEFAULT_TRACKED_FIELDS.to_vec(),
        }
    }
}
