//! Configuration for the GeoResource registry.
//!
//! - [`RegistryConfig`]: which entity fields are forwarded as change events
//! - [`Environment`]: runtime facts about the host, injected into the registry
//!
//! ```
//! use georesource::config::{Environment, RegistryConfig, StaticEnvironment};
//! use georesource::observable::Field;
//!
//! let config = RegistryConfig::new().track_field(Field::Hidden);
//! assert!(config.is_tracked(Field::Label));
//! assert!(config.is_tracked(Field::Hidden));
//!
//! let env = StaticEnvironment::standalone();
//! assert!(env.is_standalone());
//! ```

mod environment;
mod registry;

pub use environment::{Environment, StaticEnvironment};
pub use registry::{RegistryConfig, DEFAULT_TRACKED_FIELDS};
