//! TypeRig Core - host-independent glyph model for the delta engine.
//!
//! Geometry primitives, the font/glyph/layer/shape/contour/node tree,
//! compatibility checks between master layers, the host adapter contract
//! and XML serialization.

pub mod adapter;
pub mod compat;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod model;
pub mod xml;

pub use adapter::{AdapterError, Attributes, Host, HostAdapter, HostHandle, MemoryHost, MountReport};
pub use compat::{Mismatch, NodeAddress, check_compatible, is_compatible, is_compatible_glyph, is_mixed_reference};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{Error, Result};
pub use geometry::{CubicBezier, Line, Point, Rect, Segment, Transform, TransformOrigin};
pub use model::{
    Anchor, Axis, Contour, Eject, Font, FontMetrics, Glyph, Guideline, Layer, LayerRole,
    MetricExpressions, Node, NodeType, Outline, Shape, Stems, Winding,
};
