use log::info;
use typerig_core::{Glyph, Layer, Stems};

use crate::{
    blend::Blend,
    delta::{check_masters, layer_stems},
    error::{Error, Result},
    layer::{ContourDeltas, DeltaScale},
    scale::ScaleOptions,
    sidecar::MetricDelta,
};

/// Everything needed to blend one glyph across a set of axis layers.
///
/// Built once per axis setup; blending different targets reuses it.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphDeltas {
    axis: Vec<String>,
    stems: Vec<Stems>,
    pub contours: ContourDeltas,
    pub metrics: MetricDelta,
}

impl GlyphDeltas {
    /// Collect the named layers of `glyph` and build their deltas.
    ///
    /// Every axis layer must carry valid stems, and all of them must share
    /// structure and inclusion counts.
    pub fn build(glyph: &Glyph, axis_names: &[&str]) -> Result<Self> {
        let layers = axis_names
            .iter()
            .map(|&name| {
                glyph
                    .layer(name)
                    .ok_or_else(|| Error::LayerNotFound(format!("{}/{name}", glyph.name)))
            })
            .collect::<Result<Vec<&Layer>>>()?;
        let stems = layers.iter().map(|l| layer_stems(l)).collect::<Result<Vec<_>>>()?;
        check_masters(&layers)?;

        let contours = ContourDeltas::build(&layers, &stems)?;
        let metrics = MetricDelta::build(&layers, &stems)?;
        info!(
            "Built deltas for '{}': {} masters, {} contours",
            glyph.name,
            layers.len(),
            contours.len()
        );
        Ok(Self {
            axis: axis_names.iter().map(|n| n.to_string()).collect(),
            stems,
            contours,
            metrics,
        })
    }

    /// Axis layer names, the first being the source layer.
    pub fn axis(&self) -> &[String] {
        &self.axis
    }

    pub fn source_name(&self) -> Option<&str> {
        self.axis.first().map(String::as_str)
    }

    pub fn stems(&self) -> &[Stems] {
        &self.stems
    }

    /// Blend the source layer of `glyph` as if it had `current` stems.
    ///
    /// With `blend_metrics` off the advance and anchors stay as they are on
    /// the source.
    pub fn blend(&self, glyph: &Glyph, current: Stems, options: &ScaleOptions, blend_metrics: bool) -> Result<Blend<Layer>> {
        let name = self.source_name().unwrap_or_default();
        let mut source = glyph
            .layer(name)
            .ok_or_else(|| Error::LayerNotFound(format!("{}/{name}", glyph.name)))?
            .clone();
        source.stems = Some(current);
        let metrics = blend_metrics.then_some(&self.metrics);
        source.delta_scale_compensated(&self.contours, metrics, options)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use typerig_core::{Contour, Mismatch, Point, Shape};

    use super::*;

    fn glyph() -> Glyph {
        let layer = |name: &str, stem: f64, w: f64| {
            Layer::new(name)
                .with_stems(stem, 30.0)
                .with_advance(w, 1000.0)
                .with_shape(Shape::new(vec![Contour::polygon(&[(0.0, 0.0), (w, 0.0), (w, 100.0)])]))
        };
        Glyph::new("l")
            .with_layer(layer("Light", 40.0, 100.0))
            .with_layer(layer("Bold", 160.0, 400.0))
            .with_layer(Layer::new("Sketch"))
    }

    #[test]
    fn builds_and_blends() {
        let glyph = glyph();
        let deltas = GlyphDeltas::build(&glyph, &["Light", "Bold"]).unwrap();
        assert_eq!(deltas.source_name(), Some("Light"));
        assert_eq!(deltas.contours.len(), 1);

        let out = deltas
            .blend(&glyph, Stems::new(100.0, 30.0), &ScaleOptions::default(), true)
            .unwrap()
            .value;
        assert_eq!(out.name, "Light");
        assert_eq!(out.contours().next().unwrap().nodes()[1].point, Point::new(250.0, 0.0));
        assert_eq!(out.advance_width, 250.0);
    }

    #[test]
    fn unknown_or_unstemmed_layers_fail() {
        let glyph = glyph();
        assert!(matches!(
            GlyphDeltas::build(&glyph, &["Light", "Heavy"]),
            Err(Error::LayerNotFound(_))
        ));
        assert!(matches!(
            GlyphDeltas::build(&glyph, &["Light", "Sketch"]),
            Err(Error::InvalidStems { .. })
        ));
    }

    #[test]
    fn incompatible_layers_fail() {
        let mut glyph = glyph();
        glyph.layer_mut("Bold").unwrap().shapes_mut()[0].push(Contour::polygon(&[(0.0, 0.0), (1.0, 1.0)]));
        match GlyphDeltas::build(&glyph, &["Light", "Bold"]) {
            Err(Error::IncompatibleMasters { mismatch, .. }) => {
                assert_eq!(mismatch, Mismatch::ContourCount { shape: 0, expected: 1, actual: 2 });
            }
            other => panic!("expected incompatibility, got {other:?}"),
        }
    }
}
