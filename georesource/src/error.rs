//! Error types for GeoResource construction and resolution.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by the entity model and the backend definition parser.
#[derive(Debug, Error)]
pub enum GeoResourceError {
    /// A GeoResource was constructed without an id.
    #[error("GeoResource id must not be empty")]
    MissingId,

    /// `attribution()` was called on a resource whose resolver slot is empty.
    #[error("No attribution resolver configured for GeoResource '{id}'")]
    NoAttributionResolver { id: String },

    /// A backend definition is missing a field its type requires.
    #[error("Invalid GeoResource definition '{id}': {reason}")]
    InvalidDefinition { id: String, reason: String },

    /// The backend payload is not valid JSON for the definition format.
    #[error("Malformed GeoResource payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of an asynchronous loader (bulk provider, FUTURE loader, vector loader).
///
/// Wraps the original error in an `Arc` so it can be handed back unchanged to
/// every caller, including callers sharing a memoized vector load.
#[derive(Clone)]
pub struct LoaderError {
    inner: Arc<dyn StdError + Send + Sync + 'static>,
}

impl LoaderError {
    /// Wrap an arbitrary error.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(error),
        }
    }

    /// Create a loader error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Message(message.into())),
        }
    }

    /// Returns the wrapped error.
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.inner.as_ref()
    }

    /// Returns true if both values carry the same underlying error instance.
    pub fn same_as(&self, other: &LoaderError) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LoaderError").field(&self.inner).finish()
    }
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for LoaderError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}

impl From<GeoResourceError> for LoaderError {
    fn from(e: GeoResourceError) -> Self {
        Self::new(e)
    }
}

#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for Message {}
