//! Point-structure compatibility between layers.
//!
//! Two layers are compatible when they share a skeleton: the same shapes,
//! the same contours per shape, and for every contour the same closed flag
//! and node types position by position. Blending requires compatibility
//! because arrays are combined index by index.

use std::fmt;

use crate::model::{Contour, Glyph, Layer, NodeType, Shape};

/// Where and how two layer skeletons first differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    ShapeCount {
        expected: usize,
        actual: usize,
    },
    ContourCount {
        shape: usize,
        expected: usize,
        actual: usize,
    },
    Closed {
        shape: usize,
        contour: usize,
        expected: bool,
    },
    NodeCount {
        shape: usize,
        contour: usize,
        expected: usize,
        actual: usize,
    },
    NodeType {
        shape: usize,
        contour: usize,
        node: usize,
        expected: NodeType,
    },
    Inclusions {
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::ShapeCount { expected, actual } => {
                write!(f, "shape count {actual}, expected {expected}")
            }
            Mismatch::ContourCount {
                shape,
                expected,
                actual,
            } => write!(f, "shape {shape}: contour count {actual}, expected {expected}"),
            Mismatch::Closed {
                shape,
                contour,
                expected,
            } => write!(
                f,
                "shape {shape} contour {contour}: expected {} contour",
                if *expected { "closed" } else { "open" }
            ),
            Mismatch::NodeCount {
                shape,
                contour,
                expected,
                actual,
            } => write!(
                f,
                "shape {shape} contour {contour}: node count {actual}, expected {expected}"
            ),
            Mismatch::NodeType {
                shape,
                contour,
                node,
                expected,
            } => write!(
                f,
                "shape {shape} contour {contour} node {node}: expected {expected}-curve"
            ),
            Mismatch::Inclusions { expected, actual } => {
                write!(f, "{actual} shape inclusions, expected {expected}")
            }
        }
    }
}

/// Position of a node inside a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeAddress {
    pub shape: usize,
    pub contour: usize,
    pub node: usize,
}

/// Node addresses of `layer` in traversal order.
///
/// Index `i` of this list is index `i` of the layer's point array, so
/// compatible layers share the same correspondence.
pub fn node_addresses(layer: &Layer) -> Vec<NodeAddress> {
    let mut addresses = Vec::with_capacity(layer.node_count());
    for (shape_index, shape) in layer.iter().enumerate() {
        for (contour_index, contour) in shape.iter().enumerate() {
            addresses.extend((0..contour.len()).map(|node| NodeAddress {
                shape: shape_index,
                contour: contour_index,
                node,
            }));
        }
    }
    addresses
}

fn check_contour(shape: usize, index: usize, a: &Contour, b: &Contour) -> Result<(), Mismatch> {
    if a.closed != b.closed {
        return Err(Mismatch::Closed {
            shape,
            contour: index,
            expected: a.closed,
        });
    }
    if a.len() != b.len() {
        return Err(Mismatch::NodeCount {
            shape,
            contour: index,
            expected: a.len(),
            actual: b.len(),
        });
    }
    match a.iter().zip(b.iter()).position(|(na, nb)| na.kind() != nb.kind()) {
        Some(node) => Err(Mismatch::NodeType {
            shape,
            contour: index,
            node,
            expected: a.nodes()[node].kind(),
        }),
        None => Ok(()),
    }
}

fn check_shape(index: usize, a: &Shape, b: &Shape) -> Result<(), Mismatch> {
    if a.len() != b.len() {
        return Err(Mismatch::ContourCount {
            shape: index,
            expected: a.len(),
            actual: b.len(),
        });
    }
    a.iter()
        .zip(b.iter())
        .enumerate()
        .try_for_each(|(i, (ca, cb))| check_contour(index, i, ca, cb))
}

/// Compare `layer` against `reference`, reporting the first difference.
pub fn check_compatible(reference: &Layer, layer: &Layer) -> Result<(), Mismatch> {
    if reference.len() != layer.len() {
        return Err(Mismatch::ShapeCount {
            expected: reference.len(),
            actual: layer.len(),
        });
    }
    reference
        .iter()
        .zip(layer.iter())
        .enumerate()
        .try_for_each(|(i, (sa, sb))| check_shape(i, sa, sb))
}

pub fn is_compatible(a: &Layer, b: &Layer) -> bool {
    check_compatible(a, b).is_ok()
}

/// First incompatible pair among `layers`, compared against the first.
pub fn find_incompatible<'a>(layers: &[&'a Layer]) -> Option<(&'a Layer, &'a Layer, Mismatch)> {
    let (&reference, rest) = layers.split_first()?;
    rest.iter().find_map(|&layer| {
        check_compatible(reference, layer)
            .err()
            .map(|mismatch| (reference, layer, mismatch))
    })
}

/// Whether all master layers of `glyph` are mutually compatible.
pub fn is_compatible_glyph(glyph: &Glyph) -> bool {
    let masters: Vec<&Layer> = glyph.masters().collect();
    find_incompatible(&masters).is_none()
}

/// Whether the number of shape inclusions differs across master layers.
pub fn is_mixed_reference(glyph: &Glyph) -> bool {
    let mut counts = glyph.masters().map(Layer::inclusion_count);
    match counts.next() {
        Some(first) => counts.any(|c| c != first),
        None => false,
    }
}

/// Inclusion-count mismatch among `layers`, compared against the first.
pub fn find_mixed_reference<'a>(layers: &[&'a Layer]) -> Option<(&'a Layer, &'a Layer, Mismatch)> {
    let (&reference, rest) = layers.split_first()?;
    let expected = reference.inclusion_count();
    rest.iter().find_map(|&layer| {
        let actual = layer.inclusion_count();
        (actual != expected).then_some((reference, layer, Mismatch::Inclusions { expected, actual }))
    })
}
