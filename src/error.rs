//! Error types for map generation.
//!
//! Only construction and configuration mistakes are errors. A placement that
//! cannot satisfy its constraint is reported through `Option`/`BatchOutcome`
//! instead.

use thiserror::Error;

/// Errors raised while building a map context, painter, placer or script.
#[derive(Debug, Error)]
pub enum MapGenError {
    /// Map side length outside the supported range.
    #[error("map size must be between {min} and {max} tiles, got {size}")]
    InvalidMapSize {
        /// Requested size.
        size: u32,
        /// Smallest accepted size.
        min: u32,
        /// Largest accepted size.
        max: u32,
    },

    /// Elevation mode name that is neither `set` nor `modify`.
    #[error("invalid elevation mode `{0}`, expected `set` or `modify`")]
    InvalidElevationMode(String),

    /// A numeric parameter outside its valid range.
    #[error("invalid {what}: {reason}")]
    InvalidParameter {
        /// Parameter name, prefixed with its owner.
        what: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A tile class name that the script never declared.
    #[error("unknown tile class `{0}`")]
    UnknownTileClass(String),

    /// A tile class declared twice.
    #[error("tile class `{0}` is already defined")]
    DuplicateTileClass(String),

    /// A script step refers to an area label that no earlier step produced.
    #[error("unknown area label `{0}`")]
    UnknownArea(String),

    /// Reading or writing a script or export failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A script or export could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MapGenError {
    /// Shorthand for [`MapGenError::InvalidParameter`].
    pub(crate) fn invalid(what: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            what,
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate.
pub type MapGenResult<T> = Result<T, MapGenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MapGenError::InvalidElevationMode("raise".to_string());
        assert_eq!(
            err.to_string(),
            "invalid elevation mode `raise`, expected `set` or `modify`"
        );

        let err = MapGenError::invalid("path width", "must be positive");
        assert_eq!(err.to_string(), "invalid path width: must be positive");
    }
}
