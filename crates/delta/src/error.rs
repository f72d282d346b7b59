//! Error types for the delta engine.

use typerig_core::Mismatch;

/// Result type for delta operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or evaluating deltas.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Master layers differ in structure; `mismatch` locates the difference.
    #[error("Layer '{layer}' is incompatible with '{reference}': {mismatch}")]
    IncompatibleMasters {
        reference: String,
        layer: String,
        mismatch: Mismatch,
    },

    /// Not enough distinct masters to span an axis.
    #[error("Insufficient masters on {axis} axis: {reason}")]
    InsufficientAxis { axis: &'static str, reason: String },

    /// Stems missing or unusable on an axis member.
    #[error("Invalid stems on layer '{layer}': {reason}")]
    InvalidStems { layer: String, reason: String },

    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    /// Point array does not fit the template or its peers.
    #[error("Point array length mismatch: expected {expected}, got {actual}")]
    ArrayLength { expected: usize, actual: usize },

    #[error("Layer '{0}' not found")]
    LayerNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] typerig_core::Error),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, value: impl ToString) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }

    pub(crate) fn invalid_stems(layer: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidStems {
            layer: layer.into(),
            reason: reason.into(),
        }
    }
}
