//! Multi-master interpolation over stem coordinates.

use log::debug;
use typerig_core::{
    Diagnostic, Diagnostics, Layer, Point, Stems,
    compat::{find_incompatible, find_mixed_reference},
    geometry::lerp,
};

use crate::{
    array::PointArray,
    blend::Blend,
    error::{Error, Result},
};

/// How the masters spread along one stem axis.
#[derive(Debug, Clone, PartialEq)]
enum Span {
    /// Every master has the same stem; the axis follows the other one.
    Flat(f64),
    /// `(stem, master index)` sorted by stem, all stems distinct.
    Sorted(Vec<(f64, usize)>),
}

impl Span {
    fn build(axis: &'static str, values: impl Iterator<Item = f64>) -> Result<Self> {
        let mut order: Vec<(f64, usize)> = values.enumerate().map(|(i, v)| (v, i)).collect();
        order.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (first, last) = match (order.first(), order.last()) {
            (Some(first), Some(last)) => (first.0, last.0),
            _ => {
                return Err(Error::InsufficientAxis {
                    axis,
                    reason: "no masters".into(),
                });
            }
        };
        if first == last {
            return Ok(Span::Flat(first));
        }
        if let Some(pair) = order.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(Error::InsufficientAxis {
                axis,
                reason: format!(
                    "masters {} and {} share stem {}",
                    pair[0].1, pair[1].1, pair[0].0
                ),
            });
        }
        Ok(Span::Sorted(order))
    }

    fn range(&self) -> (f64, f64) {
        match self {
            Span::Flat(v) => (*v, *v),
            Span::Sorted(order) => (order[0].0, order[order.len() - 1].0),
        }
    }

    /// Clamp `target` into the envelope, reporting when it moved.
    fn clamp(&self, axis: &'static str, target: f64, diagnostics: &mut Diagnostics) -> f64 {
        let (min, max) = self.range();
        if matches!(self, Span::Flat(_)) || (min..=max).contains(&target) {
            return target;
        }
        diagnostics.push(Diagnostic::OutOfRange {
            axis,
            target,
            min,
            max,
        });
        target.clamp(min, max)
    }

    /// Bracketing masters and parameter for `target`, `None` on a flat axis.
    ///
    /// Outside the envelope the first or last interval is continued when
    /// extrapolating, otherwise the target is clamped and reported.
    fn bracket(
        &self,
        axis: &'static str,
        target: f64,
        extrapolate: bool,
        diagnostics: &mut Diagnostics,
    ) -> Option<Bracket> {
        let Span::Sorted(order) = self else {
            return None;
        };
        let target = if extrapolate {
            target
        } else {
            self.clamp(axis, target, diagnostics)
        };

        let k = order
            .windows(2)
            .position(|w| target <= w[1].0)
            .unwrap_or(order.len() - 2);
        let (s0, lo) = order[k];
        let (s1, hi) = order[k + 1];
        Some(Bracket {
            lo,
            hi,
            t: (target - s0) / (s1 - s0),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bracket {
    lo: usize,
    hi: usize,
    t: f64,
}

/// Point arrays of several compatible masters, addressed by their stems.
///
/// X coordinates interpolate along the vertical-stem axis and Y coordinates
/// along the horizontal-stem axis, each between its own pair of
/// bracketing masters.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaArray {
    arrays: Vec<PointArray>,
    stems: Vec<Stems>,
    x: Span,
    y: Span,
}

impl DeltaArray {
    pub fn new(arrays: Vec<PointArray>, stems: Vec<Stems>) -> Result<Self> {
        if arrays.len() != stems.len() {
            return Err(Error::ArrayLength {
                expected: arrays.len(),
                actual: stems.len(),
            });
        }
        if arrays.len() < 2 {
            return Err(Error::InsufficientAxis {
                axis: "x",
                reason: format!("need at least two masters, got {}", arrays.len()),
            });
        }
        let points = arrays[0].len();
        for array in &arrays[1..] {
            array.check_len(points)?;
        }
        for (i, stem) in stems.iter().enumerate() {
            check_stems(&format!("master {i}"), *stem)?;
        }

        let x = Span::build("x", stems.iter().map(|s| s.x))?;
        let y = Span::build("y", stems.iter().map(|s| s.y))?;
        if matches!((&x, &y), (Span::Flat(_), Span::Flat(_))) {
            return Err(Error::InsufficientAxis {
                axis: "x",
                reason: "all masters share the same stems".into(),
            });
        }
        Ok(Self { arrays, stems, x, y })
    }

    /// Build from whole master layers after checking stems and structure.
    pub fn from_layers(layers: &[&Layer]) -> Result<Self> {
        check_masters(layers)?;
        let stems = layers.iter().map(|l| layer_stems(l)).collect::<Result<Vec<_>>>()?;
        let arrays = layers.iter().map(|l| PointArray::from_layer(l)).collect();
        Self::new(arrays, stems)
    }

    /// Number of masters.
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Points per master.
    pub fn point_count(&self) -> usize {
        self.arrays.first().map_or(0, PointArray::len)
    }

    pub fn master(&self, index: usize) -> Option<&PointArray> {
        self.arrays.get(index)
    }

    pub fn masters(&self) -> &[PointArray] {
        &self.arrays
    }

    pub fn stems(&self) -> &[Stems] {
        &self.stems
    }

    /// Smallest and largest vertical stem among the masters.
    pub fn x_range(&self) -> (f64, f64) {
        self.x.range()
    }

    pub fn y_range(&self) -> (f64, f64) {
        self.y.range()
    }

    /// Clamp `target` into the master envelope, reporting each axis moved.
    pub fn clamp(&self, target: Stems, diagnostics: &mut Diagnostics) -> Stems {
        Stems::new(
            self.x.clamp("x", target.x, diagnostics),
            self.y.clamp("y", target.y, diagnostics),
        )
    }

    /// Interpolate at `target` stems.
    ///
    /// Without `extrapolate` a target outside the master envelope is clamped
    /// and an `OutOfRange` diagnostic is attached. A target on a master's
    /// stems returns that master's coordinates exactly.
    pub fn lerp_at(&self, target: Stems, extrapolate: bool) -> Result<Blend<PointArray>> {
        if !target.x.is_finite() || !target.y.is_finite() {
            return Err(Error::invalid("target stems", format!("({}, {})", target.x, target.y)));
        }

        let mut diagnostics = Diagnostics::new();
        let bx = self.x.bracket("x", target.x, extrapolate, &mut diagnostics);
        let by = self.y.bracket("y", target.y, extrapolate, &mut diagnostics);
        let (bx, by) = match (bx, by) {
            (Some(bx), Some(by)) => (bx, by),
            (Some(b), None) | (None, Some(b)) => (b, b),
            (None, None) => {
                return Err(Error::InsufficientAxis {
                    axis: "x",
                    reason: "all masters share the same stems".into(),
                });
            }
        };
        debug!(
            "lerp at ({}, {}): x {}->{} t={}, y {}->{} t={}",
            target.x, target.y, bx.lo, bx.hi, bx.t, by.lo, by.hi, by.t
        );

        let (x0, x1) = (&self.arrays[bx.lo], &self.arrays[bx.hi]);
        let (y0, y1) = (&self.arrays[by.lo], &self.arrays[by.hi]);
        let points = (0..self.point_count())
            .map(|i| {
                Point::new(
                    lerp(x0[i].x, x1[i].x, bx.t),
                    lerp(y0[i].y, y1[i].y, by.t),
                )
            })
            .collect();
        Ok(Blend::with_diagnostics(points, diagnostics))
    }
}

/// Stems of an axis member, validated.
pub(crate) fn layer_stems(layer: &Layer) -> Result<Stems> {
    let stems = layer
        .stems
        .ok_or_else(|| Error::invalid_stems(&layer.name, "missing stems"))?;
    check_stems(&layer.name, stems)?;
    Ok(stems)
}

fn check_stems(layer: &str, stems: Stems) -> Result<()> {
    for (axis, value) in [("x", stems.x), ("y", stems.y)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::invalid_stems(layer, format!("{axis} stem {value} must be positive")));
        }
    }
    Ok(())
}

/// Reject master sets that differ in structure or inclusions.
pub(crate) fn check_masters(layers: &[&Layer]) -> Result<()> {
    let found = find_incompatible(layers).or_else(|| find_mixed_reference(layers));
    match found {
        Some((reference, layer, mismatch)) => Err(Error::IncompatibleMasters {
            reference: reference.name.clone(),
            layer: layer.name.clone(),
            mismatch,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn arrays() -> DeltaArray {
        DeltaArray::new(
            vec![
                PointArray::new(vec![Point::new(0.0, 0.0), Point::new(100.0, 50.0)]),
                PointArray::new(vec![Point::new(0.0, 0.0), Point::new(300.0, 150.0)]),
            ],
            vec![Stems::new(50.0, 40.0), Stems::new(200.0, 40.0)],
        )
        .unwrap()
    }

    #[test]
    fn flat_axis_follows_the_other() {
        let delta = arrays();
        let mid = delta.lerp_at(Stems::new(125.0, 999.0), false).unwrap();
        assert!(mid.is_clean());
        assert_eq!(mid.value[1], Point::new(200.0, 100.0));
        assert_eq!(delta.y_range(), (40.0, 40.0));
    }

    #[test]
    fn masters_are_returned_exactly() {
        let delta = arrays();
        for (i, stems) in delta.stems().to_vec().into_iter().enumerate() {
            let blend = delta.lerp_at(stems, false).unwrap();
            let raw = |points: &[Point]| points.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>();
            assert_eq!(raw(blend.value.points()), raw(delta.master(i).unwrap().points()));
        }
    }

    #[test]
    fn clamps_and_reports_out_of_range() {
        let delta = arrays();
        let clamped = delta.lerp_at(Stems::new(400.0, 40.0), false).unwrap();
        assert_eq!(&clamped.value, delta.master(1).unwrap());
        assert_eq!(clamped.diagnostics.len(), 1);

        let extrapolated = delta.lerp_at(Stems::new(350.0, 40.0), true).unwrap();
        assert!(extrapolated.is_clean());
        assert_eq!(extrapolated.value[1], Point::new(500.0, 250.0));
    }

    #[test]
    fn anisotropic_axes_bracket_independently() {
        let delta = DeltaArray::new(
            vec![
                PointArray::new(vec![Point::new(10.0, 10.0)]),
                PointArray::new(vec![Point::new(20.0, 30.0)]),
                PointArray::new(vec![Point::new(40.0, 20.0)]),
            ],
            vec![Stems::new(10.0, 10.0), Stems::new(20.0, 30.0), Stems::new(40.0, 20.0)],
        )
        .unwrap();
        let blend = delta.lerp_at(Stems::new(30.0, 25.0), false).unwrap();
        // x between masters 1 and 2, y between masters 2 and 1
        assert_eq!(blend.value[0], Point::new(30.0, 25.0));
    }

    #[test]
    fn rejects_degenerate_axes() {
        let one = vec![PointArray::new(vec![Point::ZERO])];
        assert!(matches!(
            DeltaArray::new(one.clone(), vec![Stems::new(1.0, 1.0)]),
            Err(Error::InsufficientAxis { .. })
        ));

        let two = vec![one[0].clone(), one[0].clone()];
        assert!(matches!(
            DeltaArray::new(two.clone(), vec![Stems::new(5.0, 5.0), Stems::new(5.0, 5.0)]),
            Err(Error::InsufficientAxis { .. })
        ));
        assert!(matches!(
            DeltaArray::new(two.clone(), vec![Stems::new(5.0, 5.0), Stems::new(0.0, 8.0)]),
            Err(Error::InvalidStems { .. })
        ));

        let three = vec![one[0].clone(), one[0].clone(), one[0].clone()];
        let stems = vec![Stems::new(5.0, 5.0), Stems::new(5.0, 9.0), Stems::new(8.0, 7.0)];
        assert!(matches!(
            DeltaArray::new(three, stems),
            Err(Error::InsufficientAxis { axis: "x", .. })
        ));
    }

    #[test]
    fn rejects_ragged_arrays() {
        let arrays = vec![
            PointArray::new(vec![Point::ZERO]),
            PointArray::new(vec![Point::ZERO, Point::ZERO]),
        ];
        let stems = vec![Stems::new(5.0, 5.0), Stems::new(9.0, 5.0)];
        assert!(matches!(
            DeltaArray::new(arrays, stems),
            Err(Error::ArrayLength { expected: 1, actual: 2 })
        ));
    }
}
