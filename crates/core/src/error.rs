//! Error types for the core data model.

use crate::adapter::AdapterError;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the data model, the adapter boundary and XML I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Child index past the end of a container.
    #[error("{container} index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        container: &'static str,
        index: usize,
        len: usize,
    },

    /// Off-curve run that does not form a line or cubic segment.
    #[error("Malformed contour: {0}")]
    MalformedContour(String),

    /// Operation that needs a closed contour was given an open one.
    #[error("Operation '{0}' requires a closed contour")]
    OpenContour(&'static str),

    /// Two anchors with the same name on one layer.
    #[error("Duplicate anchor '{anchor}' on layer '{layer}'")]
    DuplicateAnchor { layer: String, anchor: String },

    /// Shape inclusions form a cycle.
    #[error("Cyclic shape inclusion through '{0}'")]
    CyclicInclusion(String),

    #[error("Layer '{0}' not found")]
    LayerNotFound(String),

    #[error("Glyph '{0}' not found")]
    GlyphNotFound(String),

    /// A glyph's master layers disagree with the font's master list.
    #[error("Glyph '{glyph}' master layers do not match font masters: missing {missing:?}")]
    MasterMismatch { glyph: String, missing: Vec<String> },

    /// Mount cannot proceed because the host subtree is unusable.
    #[error("Host structure mismatch: {0}")]
    HostMismatch(String),

    /// Failure reported by the host adapter.
    #[error("Host adapter error while {context}: {source}")]
    Adapter {
        context: String,
        source: AdapterError,
    },

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// XML is well-formed but does not describe a valid model.
    #[error("Invalid <{element}>: {message}")]
    Parse { element: String, message: String },
}

impl Error {
    pub(crate) fn adapter(context: impl Into<String>, source: AdapterError) -> Self {
        Error::Adapter {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn parse(element: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Parse {
            element: element.into(),
            message: message.into(),
        }
    }
}
