//! Compensated scaling of whole layers.

use log::debug;
use typerig_core::{Diagnostics, Layer, Stems, geometry::union_bounds};

use crate::{
    array::PointArray,
    blend::Blend,
    delta::{DeltaArray, layer_stems},
    error::{Error, Result},
    scale::ScaleOptions,
    sidecar::MetricDelta,
};

/// One [`DeltaArray`] per contour, in layer traversal order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContourDeltas(Vec<DeltaArray>);

impl ContourDeltas {
    pub fn new(deltas: Vec<DeltaArray>) -> Self {
        Self(deltas)
    }

    /// Per-contour deltas of structurally identical `layers` with `stems`.
    pub fn build(layers: &[&Layer], stems: &[Stems]) -> Result<Self> {
        let Some(first) = layers.first() else {
            return Ok(Self::default());
        };
        let per_layer: Vec<Vec<PointArray>> = layers.iter().map(|l| PointArray::per_contour(l)).collect();
        (0..first.contours().count())
            .map(|i| {
                let arrays = per_layer
                    .iter()
                    .map(|contours| contours.get(i).cloned().unwrap_or_default())
                    .collect();
                DeltaArray::new(arrays, stems.to_vec())
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeltaArray> {
        self.0.iter()
    }

    pub fn get(&self, index: usize) -> Option<&DeltaArray> {
        self.0.get(index)
    }
}

impl<'a> IntoIterator for &'a ContourDeltas {
    type Item = &'a DeltaArray;
    type IntoIter = std::slice::Iter<'a, DeltaArray>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Compensated scaling of a source layer against a set of master deltas.
pub trait DeltaScale {
    /// Blend and scale the layer's outline, and optionally its advance and
    /// anchors, keeping stems at `options.target_stems(current)`.
    ///
    /// The current stems are the layer's own. The result copies the layer's
    /// structure and carries the target stems.
    fn delta_scale_compensated(
        &self,
        contours: &ContourDeltas,
        metrics: Option<&MetricDelta>,
        options: &ScaleOptions,
    ) -> Result<Blend<Layer>>;
}

impl DeltaScale for Layer {
    fn delta_scale_compensated(
        &self,
        contours: &ContourDeltas,
        metrics: Option<&MetricDelta>,
        options: &ScaleOptions,
    ) -> Result<Blend<Layer>> {
        options.validate()?;
        let current = layer_stems(self)?;
        let contour_count = self.contours().count();
        if contours.len() != contour_count {
            return Err(Error::ArrayLength {
                expected: contour_count,
                actual: contours.len(),
            });
        }

        let mut diagnostics = Diagnostics::new();
        let mut coordinate = options.blend_coordinate(current);
        // Clamp once here so every contour and sidecar reports nothing further.
        let envelope = contours.iter().next().or(metrics.map(MetricDelta::advance));
        if let (Some(delta), false) = (envelope, options.extrapolate) {
            coordinate = delta.clamp(coordinate, &mut diagnostics);
        }
        debug!(
            "blending layer '{}' at ({}, {}) for stems ({}, {})",
            self.name, coordinate.x, coordinate.y, current.x, current.y
        );

        let blended = contours
            .iter()
            .map(|delta| delta.lerp_at(coordinate, options.extrapolate).map(|b| b.drain_into(&mut diagnostics)))
            .collect::<Result<Vec<PointArray>>>()?;

        let mut layer = self.clone();
        for (contour, points) in layer
            .shapes_mut()
            .iter_mut()
            .flat_map(|s| s.contours_mut().iter_mut())
            .zip(&blended)
        {
            let origin = options.resolve_origin(points);
            *contour = options.place(points, origin).to_contour(contour)?;
        }

        if let Some(metrics) = metrics {
            let (width, height) = metrics.blend_advance(coordinate, options)?;
            layer.advance_width = width;
            layer.advance_height = height;

            let bounds = union_bounds(blended.iter().map(|points| options.upright_bounds(points)));
            let origin = options.resolve_origin_in(bounds);
            metrics.apply_anchors(&mut layer, coordinate, options, origin, &mut diagnostics)?;
        }

        layer.stems = Some(options.target_stems(current));
        Ok(Blend::with_diagnostics(layer, diagnostics))
    }
}
