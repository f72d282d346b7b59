//! Deltas for the values that travel alongside the outline: advance and anchors.

use indexmap::IndexSet;
use typerig_core::{Diagnostic, Diagnostics, Layer, Point, Stems};

use crate::{
    array::PointArray,
    delta::DeltaArray,
    error::Result,
    scale::ScaleOptions,
};

/// Anchors shared by every master, plus the ones only some masters carry.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorDelta {
    names: Vec<String>,
    delta: Option<DeltaArray>,
    partial: Vec<(String, Vec<String>)>,
}

impl AnchorDelta {
    pub fn build(layers: &[&Layer], stems: &[Stems]) -> Result<Self> {
        let mut all: IndexSet<&str> = IndexSet::new();
        for layer in layers {
            all.extend(layer.anchors().iter().map(|a| a.name.as_str()));
        }

        let mut names = Vec::new();
        let mut partial = Vec::new();
        for name in all {
            let missing_in: Vec<String> = layers
                .iter()
                .filter(|l| l.anchor(name).is_none())
                .map(|l| l.name.clone())
                .collect();
            if missing_in.is_empty() {
                names.push(name.to_string());
            } else {
                partial.push((name.to_string(), missing_in));
            }
        }

        let delta = if names.is_empty() {
            None
        } else {
            let arrays = layers
                .iter()
                .map(|l| names.iter().filter_map(|n| l.anchor(n)).map(|a| a.point).collect())
                .collect();
            Some(DeltaArray::new(arrays, stems.to_vec())?)
        };
        Ok(Self { names, delta, partial })
    }

    /// Anchors present in every master, in first-seen order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Anchors missing from at least one master, with the masters lacking them.
    pub fn partial(&self) -> &[(String, Vec<String>)] {
        &self.partial
    }

    fn blend(&self, coordinate: Stems, extrapolate: bool) -> Result<Option<PointArray>> {
        self.delta
            .as_ref()
            .map(|delta| delta.lerp_at(coordinate, extrapolate).map(|b| b.value))
            .transpose()
    }
}

/// Advance and anchor deltas of one set of masters.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDelta {
    advance: DeltaArray,
    anchors: AnchorDelta,
}

impl MetricDelta {
    pub fn build(layers: &[&Layer], stems: &[Stems]) -> Result<Self> {
        let arrays = layers
            .iter()
            .map(|l| PointArray::new(vec![Point::new(l.advance_width, l.advance_height)]))
            .collect();
        Ok(Self {
            advance: DeltaArray::new(arrays, stems.to_vec())?,
            anchors: AnchorDelta::build(layers, stems)?,
        })
    }

    pub fn advance(&self) -> &DeltaArray {
        &self.advance
    }

    pub fn anchors(&self) -> &AnchorDelta {
        &self.anchors
    }

    /// Blended `(width, height)` advance, scaled by `options.scale`.
    pub fn blend_advance(&self, coordinate: Stems, options: &ScaleOptions) -> Result<(f64, f64)> {
        let blended = self.advance.lerp_at(coordinate, options.extrapolate)?.value;
        let advance = blended[0];
        Ok((advance.x * options.scale.0, advance.y * options.scale.1))
    }

    /// Move the shared anchors of `layer` to their blended positions.
    ///
    /// `origin` is the resolved transform origin of the whole layer. Anchors
    /// missing from some master are not blended: their position on `layer`
    /// is only placed like the outline, and each is reported.
    pub(crate) fn apply_anchors(
        &self,
        layer: &mut Layer,
        coordinate: Stems,
        options: &ScaleOptions,
        origin: Point,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        if let Some(blended) = self.anchors.blend(coordinate, options.extrapolate)? {
            let placed = options.place(&blended, origin);
            for (name, point) in self.anchors.names.iter().zip(placed.iter()) {
                if let Some(anchor) = layer.anchors_mut().iter_mut().find(|a| &a.name == name) {
                    anchor.point = *point;
                }
            }
        }
        for (anchor, missing_in) in &self.anchors.partial {
            if let Some(found) = layer.anchors_mut().iter_mut().find(|a| &a.name == anchor) {
                let placed = options.place(&PointArray::new(vec![found.point]), origin);
                found.point = placed[0];
            }
            diagnostics.push(Diagnostic::MissingAnchor {
                anchor: anchor.clone(),
                missing_in: missing_in.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use typerig_core::Anchor;

    use super::*;

    fn master(name: &str, width: f64, anchors: &[(&str, f64, f64)]) -> Layer {
        let mut layer = Layer::new(name).with_advance(width, 1000.0);
        for (anchor, x, y) in anchors {
            layer.add_anchor(Anchor::new(*anchor, *x, *y)).unwrap();
        }
        layer
    }

    #[test]
    fn splits_shared_and_partial_anchors() {
        let a = master("A", 400.0, &[("top", 200.0, 700.0), ("ogonek", 300.0, 0.0)]);
        let b = master("B", 600.0, &[("top", 300.0, 700.0)]);
        let stems = [Stems::new(50.0, 40.0), Stems::new(150.0, 40.0)];

        let metrics = MetricDelta::build(&[&a, &b], &stems).unwrap();
        assert_eq!(metrics.anchors().names(), ["top".to_string()]);
        assert_eq!(
            metrics.anchors().partial(),
            [("ogonek".to_string(), vec!["B".to_string()])]
        );

        let options = ScaleOptions::default().with_scale(2.0, 1.0);
        let advance = metrics.blend_advance(Stems::new(100.0, 40.0), &options).unwrap();
        assert_eq!(advance, (1000.0, 1000.0));
    }

    #[test]
    fn anchors_follow_the_blend() {
        let a = master("A", 400.0, &[("top", 200.0, 700.0), ("ogonek", 300.0, 0.0)]);
        let b = master("B", 600.0, &[("top", 300.0, 700.0)]);
        let stems = [Stems::new(50.0, 40.0), Stems::new(150.0, 40.0)];
        let metrics = MetricDelta::build(&[&a, &b], &stems).unwrap();

        let mut layer = a.clone();
        let mut diagnostics = Diagnostics::new();
        metrics
            .apply_anchors(&mut layer, Stems::new(100.0, 40.0), &ScaleOptions::default(), Point::ZERO, &mut diagnostics)
            .unwrap();

        assert_eq!(layer.anchor("top").unwrap().point, Point::new(250.0, 700.0));
        assert_eq!(layer.anchor("ogonek").unwrap().point, Point::new(300.0, 0.0));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn partial_anchors_are_placed_without_blending() {
        let a = master("A", 400.0, &[("top", 200.0, 700.0), ("ogonek", 100.0, 10.0)]);
        let b = master("B", 600.0, &[("top", 300.0, 700.0)]);
        let stems = [Stems::new(50.0, 40.0), Stems::new(150.0, 40.0)];
        let metrics = MetricDelta::build(&[&a, &b], &stems).unwrap();

        let mut layer = a.clone();
        let mut diagnostics = Diagnostics::new();
        let options = ScaleOptions::default().with_scale(2.0, 2.0).with_shift(30.0, 0.0);
        metrics
            .apply_anchors(&mut layer, Stems::new(50.0, 40.0), &options, Point::ZERO, &mut diagnostics)
            .unwrap();

        assert_eq!(layer.anchor("top").unwrap().point, Point::new(430.0, 1400.0));
        assert_eq!(layer.anchor("ogonek").unwrap().point, Point::new(230.0, 20.0));
        assert_eq!(diagnostics.len(), 1);
    }
}
