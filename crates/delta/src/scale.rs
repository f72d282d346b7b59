//! Stem-compensated scaling on top of [`DeltaArray`] interpolation.
//!
//! A glyph scaled by plain geometry gets thinner or bolder stems with it.
//! Compensated scaling instead picks a blend coordinate whose stems, once
//! scaled, land on the requested target stems, then applies the geometric
//! scale. Italic designs are backslanted first so the scale acts on
//! upright geometry, and re-slanted afterwards.

use log::{debug, warn};
use typerig_core::{Point, Rect, Stems, Transform, TransformOrigin};

use crate::{
    array::PointArray,
    blend::Blend,
    delta::DeltaArray,
    error::{Error, Result},
};

/// Iteration cap for [`DeltaArray::scale_to_size`].
pub const SCALE_SEARCH_LIMIT: usize = 1000;

/// Parameters of a compensated scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleOptions {
    /// Geometric scale factors `(sx, sy)`.
    pub scale: (f64, f64),
    /// 0 lets stems scale with the glyph, 1 keeps them at the current value.
    pub intensity: f64,
    /// Additive stem correction in font units.
    pub compensation: (f64, f64),
    /// Translation applied after scaling.
    pub shift: (f64, f64),
    /// Design italic angle in degrees, positive slants forward.
    pub italic_angle: f64,
    pub origin: TransformOrigin,
    pub extrapolate: bool,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            scale: (1.0, 1.0),
            intensity: 0.0,
            compensation: (0.0, 0.0),
            shift: (0.0, 0.0),
            italic_angle: 0.0,
            origin: TransformOrigin::Baseline,
            extrapolate: false,
        }
    }
}

impl ScaleOptions {
    pub fn with_scale(mut self, sx: f64, sy: f64) -> Self {
        self.scale = (sx, sy);
        self
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_compensation(mut self, cx: f64, cy: f64) -> Self {
        self.compensation = (cx, cy);
        self
    }

    pub fn with_shift(mut self, dx: f64, dy: f64) -> Self {
        self.shift = (dx, dy);
        self
    }

    pub fn with_italic_angle(mut self, degrees: f64) -> Self {
        self.italic_angle = degrees;
        self
    }

    pub fn with_origin(mut self, origin: TransformOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_extrapolate(mut self, extrapolate: bool) -> Self {
        self.extrapolate = extrapolate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let (sx, sy) = self.scale;
        for (name, value) in [("scale x", sx), ("scale y", sy)] {
            if !value.is_finite() || value == 0.0 {
                return Err(Error::invalid(name, value));
            }
        }
        if !(0.0..=1.0).contains(&self.intensity) {
            return Err(Error::invalid("intensity", self.intensity));
        }
        let finite = [
            ("compensation x", self.compensation.0),
            ("compensation y", self.compensation.1),
            ("shift x", self.shift.0),
            ("shift y", self.shift.1),
            ("italic angle", self.italic_angle),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Error::invalid(name, value));
            }
        }
        if self.italic_angle.abs() >= 90.0 {
            return Err(Error::invalid("italic angle", self.italic_angle));
        }
        Ok(())
    }

    /// Stems the scaled result should end up with.
    pub fn target_stems(&self, current: Stems) -> Stems {
        let solve = |cur: f64, s: f64, c: f64| cur * s * (1.0 - self.intensity) + cur * self.intensity + c;
        Stems::new(
            solve(current.x, self.scale.0, self.compensation.0),
            solve(current.y, self.scale.1, self.compensation.1),
        )
    }

    /// Stems to interpolate at so that scaling yields [`Self::target_stems`].
    pub fn blend_coordinate(&self, current: Stems) -> Stems {
        let target = self.target_stems(current);
        Stems::new(target.x / self.scale.0, target.y / self.scale.1)
    }

    fn backslant(&self) -> Transform {
        Transform::identity().shear(-self.italic_angle, 0.0)
    }

    /// Origin for `blended`, resolved against its upright bounds.
    pub fn resolve_origin(&self, blended: &PointArray) -> Point {
        self.resolve_origin_in(self.upright_bounds(blended))
    }

    pub(crate) fn upright_bounds(&self, blended: &PointArray) -> Option<Rect> {
        match self.origin {
            TransformOrigin::Baseline => None,
            _ => blended.transform(self.backslant()).bounds(),
        }
    }

    pub(crate) fn resolve_origin_in(&self, upright_bounds: Option<Rect>) -> Point {
        self.origin.resolve(upright_bounds)
    }

    /// Backslant, scale about `origin`, shift, re-slant.
    pub fn placement(&self, origin: Point) -> Transform {
        let mut transform = Transform::identity();
        if self.italic_angle != 0.0 {
            transform = transform.shear(-self.italic_angle, 0.0);
        }
        if self.scale != (1.0, 1.0) {
            transform = transform.then(Transform::identity().scale(self.scale.0, self.scale.1).about(origin));
        }
        if self.shift != (0.0, 0.0) {
            transform = transform.shift(self.shift.0, self.shift.1);
        }
        if self.italic_angle != 0.0 {
            transform = transform.shear(self.italic_angle, 0.0);
        }
        transform
    }

    pub(crate) fn place(&self, blended: &PointArray, origin: Point) -> PointArray {
        let transform = self.placement(origin);
        if transform.is_identity() {
            return blended.clone();
        }
        blended.transform(transform)
    }
}

/// Outcome of [`DeltaArray::scale_to_size`].
#[derive(Debug, Clone, PartialEq)]
pub struct SizedScale {
    /// Scale factors that were found.
    pub scale: (f64, f64),
    pub points: PointArray,
    pub iterations: usize,
    /// Whether both dimensions reached the requested size.
    pub converged: bool,
}

impl DeltaArray {
    /// Blend and scale keeping stems at `options.target_stems(current)`.
    ///
    /// Pure: returns a new array and leaves the masters untouched.
    pub fn delta_scale_compensated(&self, current: Stems, options: &ScaleOptions) -> Result<Blend<PointArray>> {
        options.validate()?;
        let coordinate = options.blend_coordinate(current);
        debug!(
            "compensated scale ({}, {}) from stems ({}, {}) via ({}, {})",
            options.scale.0, options.scale.1, current.x, current.y, coordinate.x, coordinate.y
        );
        let blended = self.lerp_at(coordinate, options.extrapolate)?;
        Ok(blended.map(|points| {
            let origin = options.resolve_origin(&points);
            options.place(&points, origin)
        }))
    }

    /// Search scale factors that make the compensated result `width` by
    /// `height` units.
    ///
    /// Each axis steps its factor toward the target and refines the step
    /// tenfold whenever it overshoots. A dimension the masters do not span
    /// (zero extent) keeps its factor from `options`. The search stops once
    /// both sizes round to the target or after [`SCALE_SEARCH_LIMIT`] rounds.
    pub fn scale_to_size(
        &self,
        current: Stems,
        width: f64,
        height: f64,
        options: &ScaleOptions,
    ) -> Result<Blend<SizedScale>> {
        for (name, value) in [("width", width), ("height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid(name, value));
            }
        }

        let start = self.delta_scale_compensated(current, options)?;
        let size = extent(&start.value);
        let mut x = AxisSearch::new(options.scale.0, size.0, width);
        let mut y = AxisSearch::new(options.scale.1, size.1, height);

        let mut result = start;
        let mut iterations = 0;
        while !(x.done() && y.done()) && iterations < SCALE_SEARCH_LIMIT {
            x.step();
            y.step();
            let trial = options.with_scale(x.scale, y.scale);
            result = self.delta_scale_compensated(current, &trial)?;
            let size = extent(&result.value);
            x.observe(size.0);
            y.observe(size.1);
            iterations += 1;
        }

        let converged = x.done() && y.done();
        if !converged {
            warn!("scale search stopped after {iterations} rounds at ({}, {})", x.scale, y.scale);
        }
        debug!("scale to {width}x{height}: ({}, {}) in {iterations} rounds", x.scale, y.scale);
        let scale = (x.scale, y.scale);
        Ok(result.map(|points| SizedScale {
            scale,
            points,
            iterations,
            converged,
        }))
    }
}

fn extent(points: &PointArray) -> (f64, f64) {
    points.bounds().map_or((0.0, 0.0), |b| (b.width(), b.height()))
}

/// One axis of the scale search.
#[derive(Debug, Clone, Copy)]
struct AxisSearch {
    scale: f64,
    previous_scale: f64,
    diff: f64,
    previous_diff: f64,
    precision: f64,
    target: f64,
    active: bool,
}

impl AxisSearch {
    fn new(scale: f64, size: f64, target: f64) -> Self {
        let active = size > 0.0;
        // Start from the plain geometric ratio, which compensation only nudges.
        let scale = if active { scale * target / size } else { scale };
        Self {
            scale,
            previous_scale: scale,
            diff: f64::INFINITY,
            previous_diff: f64::INFINITY,
            precision: 0.1,
            target,
            active,
        }
    }

    fn done(&self) -> bool {
        !self.active || self.diff.round() == 0.0
    }

    fn step(&mut self) {
        if self.done() || !self.diff.is_finite() {
            return;
        }
        if self.diff.abs() >= self.previous_diff.abs() {
            self.scale = self.previous_scale;
            self.diff = self.previous_diff;
            self.precision /= 10.0;
        }
        self.previous_scale = self.scale;
        self.previous_diff = self.diff;
        self.scale += self.precision * self.diff.signum();
        if self.scale <= 0.0 {
            self.scale = self.previous_scale / 2.0;
        }
    }

    fn observe(&mut self, size: f64) {
        if self.active {
            self.diff = self.target - size;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn stems(x: f64) -> Stems {
        Stems::new(x, 40.0)
    }

    fn delta() -> DeltaArray {
        // A stem of the master's own width, standing on the baseline.
        let bar = |w: f64| PointArray::new(vec![Point::new(0.0, 0.0), Point::new(w, 0.0), Point::new(w, 100.0)]);
        DeltaArray::new(vec![bar(50.0), bar(200.0)], vec![stems(50.0), stems(200.0)]).unwrap()
    }

    #[test]
    fn compensation_formula() {
        let current = Stems::new(100.0, 50.0);
        let options = ScaleOptions::default().with_scale(0.5, 2.0).with_intensity(1.0);
        assert_eq!(options.target_stems(current), current);
        assert_eq!(options.blend_coordinate(current), Stems::new(200.0, 25.0));

        let half = ScaleOptions::default().with_scale(2.0, 2.0).with_intensity(0.5).with_compensation(3.0, 0.0);
        assert_eq!(half.target_stems(current), Stems::new(153.0, 75.0));
    }

    #[test]
    fn rejects_bad_options() {
        let delta = delta();
        for options in [
            ScaleOptions::default().with_intensity(1.5),
            ScaleOptions::default().with_scale(0.0, 1.0),
            ScaleOptions::default().with_shift(f64::NAN, 0.0),
            ScaleOptions::default().with_italic_angle(90.0),
        ] {
            assert!(matches!(
                delta.delta_scale_compensated(stems(50.0), &options),
                Err(Error::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn identity_returns_master() {
        let delta = delta();
        let out = delta.delta_scale_compensated(stems(200.0), &ScaleOptions::default()).unwrap();
        assert_eq!(&out.value, delta.master(1).unwrap());
    }

    #[test]
    fn full_intensity_keeps_stem() {
        let delta = delta();
        let options = ScaleOptions::default().with_scale(0.5, 1.0).with_intensity(1.0);
        let out = delta.delta_scale_compensated(stems(50.0), &options).unwrap();
        // blended at 100 units, then halved
        assert_eq!(out.value[1], Point::new(50.0, 0.0));
        assert!(out.is_clean());
    }

    #[test]
    fn origin_pins_the_chosen_corner() {
        let delta = delta();
        let shifted = PointArray::new(delta.master(0).unwrap().iter().map(|p| *p + Point::new(10.0, 0.0)).collect());
        let delta = DeltaArray::new(vec![shifted, delta.master(1).unwrap().clone()], delta.stems().to_vec()).unwrap();
        let options = ScaleOptions::default()
            .with_scale(2.0, 2.0)
            .with_origin(TransformOrigin::BottomLeft);
        let out = delta.delta_scale_compensated(stems(50.0), &options).unwrap();
        assert_eq!(out.value[0], Point::new(10.0, 0.0));
        assert_eq!(out.value[2], Point::new(110.0, 200.0));
    }

    #[test]
    fn italic_is_reapplied_after_scaling() {
        let t = 10f64.to_radians().tan();
        let slanted = |w: f64| PointArray::new(vec![Point::new(0.0, 0.0), Point::new(w, 0.0), Point::new(w + 100.0 * t, 100.0)]);
        let delta = DeltaArray::new(vec![slanted(50.0), slanted(200.0)], vec![stems(50.0), stems(200.0)]).unwrap();
        let options = ScaleOptions::default().with_scale(2.0, 2.0).with_italic_angle(10.0);
        let out = delta.delta_scale_compensated(stems(50.0), &options).unwrap();

        let top = out.value[2];
        assert!((top.x - (100.0 + 200.0 * t)).abs() < 1e-9);
        assert!((top.y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn scale_to_size_finds_width() {
        let delta = delta();
        // width = 100·s + 100 for this bar at half intensity
        let options = ScaleOptions::default().with_intensity(0.5);
        let sized = delta.scale_to_size(stems(200.0), 250.0, 100.0, &options).unwrap();
        assert!(sized.is_clean());
        let result = sized.value;
        assert!(result.converged);
        assert!(result.iterations < SCALE_SEARCH_LIMIT);
        assert!((result.scale.0 - 1.5).abs() < 0.01, "scale {:?}", result.scale);
        let width = result.points.bounds().unwrap().width();
        assert!((width - 250.0).abs() < 0.5, "width {width}");
    }
}
