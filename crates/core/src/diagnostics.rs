//! Non-fatal findings that travel alongside results.

use std::fmt;

use log::warn;

/// A recoverable condition noticed while blending or mounting.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Target stem lies outside the master envelope and was clamped.
    OutOfRange {
        axis: &'static str,
        target: f64,
        min: f64,
        max: f64,
    },

    /// Anchor present on some masters only; copied unblended from the source.
    MissingAnchor { anchor: String, missing_in: Vec<String> },

    /// Host structure diverged from the core graph; the subtree was rebuilt.
    HostMismatch {
        scope: String,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::OutOfRange {
                axis,
                target,
                min,
                max,
            } => write!(
                f,
                "{axis} stem {target} outside master range [{min}, {max}], clamped"
            ),
            Diagnostic::MissingAnchor { anchor, missing_in } => write!(
                f,
                "anchor '{anchor}' missing in {}, copied from source",
                missing_in.join(", ")
            ),
            Diagnostic::HostMismatch {
                scope,
                expected,
                actual,
            } => write!(
                f,
                "host {scope} has {actual} children, expected {expected}; rebuilt"
            ),
        }
    }
}

/// Ordered collection of diagnostics.
///
/// Every pushed diagnostic is also logged at `warn` level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.0.push(diagnostic);
    }

    /// Append already-logged diagnostics without logging them again.
    pub fn merge(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.0
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
