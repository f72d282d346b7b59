//! Explicit editing context: the font being worked on and the user's
//! blending preferences.

use log::info;
use typerig_core::{Diagnostics, Font, Glyph, Layer, TransformOrigin};

use crate::{
    axis_setup::{AxisSetup, Target},
    blend::Blend,
    error::{Error, Result},
    glyph::GlyphDeltas,
    scale::ScaleOptions,
};

/// Options applied to every target blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preferences {
    pub extrapolate: bool,
    pub intensity: f64,
    pub compensation: (f64, f64),
    pub origin: TransformOrigin,
    /// Blend advance widths and anchors along with the outline.
    pub blend_metrics: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            extrapolate: true,
            intensity: 0.0,
            compensation: (0.0, 0.0),
            origin: TransformOrigin::Baseline,
            blend_metrics: true,
        }
    }
}

impl Preferences {
    /// Scale options for one target, with the font's italic angle.
    pub fn scale_options(&self, scale: (f64, f64), italic_angle: f64) -> ScaleOptions {
        ScaleOptions::default()
            .with_scale(scale.0, scale.1)
            .with_intensity(self.intensity)
            .with_compensation(self.compensation.0, self.compensation.1)
            .with_italic_angle(italic_angle)
            .with_origin(self.origin)
            .with_extrapolate(self.extrapolate)
    }
}

/// The current font plus preferences, passed explicitly to every operation.
#[derive(Debug, Clone)]
pub struct Session {
    pub font: Font,
    pub preferences: Preferences,
}

impl Session {
    pub fn new(font: Font) -> Self {
        Self {
            font,
            preferences: Preferences::default(),
        }
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Setup stored in the font lib.
    pub fn stored_setup(&self) -> Result<Option<AxisSetup>> {
        AxisSetup::load(&self.font)
    }

    /// Blend one layer per target of `setup` for the glyph named `glyph`.
    ///
    /// The glyph is stamped with the axis stems (on a copy), its deltas are
    /// built once, and each target is blended from the first axis layer as
    /// if that layer had the target's stems. Results are named after their
    /// targets and are not inserted into the font.
    pub fn execute_targets(&self, glyph: &str, setup: &AxisSetup) -> Result<Blend<Vec<Layer>>> {
        let mut working: Glyph = self.font.require_glyph(glyph)?.clone();
        let axis = setup.stamp(&mut working)?;
        let axis_names: Vec<&str> = axis.iter().map(String::as_str).collect();
        let deltas = GlyphDeltas::build(&working, &axis_names)?;
        let targets = setup.target_list()?;
        if targets.is_empty() {
            return Err(Error::invalid("targets", "none defined"));
        }

        let italic_angle = self.font.italic_angle();
        let mut diagnostics = Diagnostics::new();
        let mut layers = Vec::with_capacity(targets.len());
        for Target {
            name,
            stems,
            scale,
            color,
        } in targets
        {
            let options = self.preferences.scale_options(scale, italic_angle);
            let mut layer = deltas
                .blend(&working, stems, &options, self.preferences.blend_metrics)?
                .drain_into(&mut diagnostics);
            layer.name = name;
            layer.host = None;
            if !color.is_empty() {
                layer.mark = Some(color);
            }
            layers.push(layer);
        }
        info!("'{glyph}': blended {} targets", layers.len());
        Ok(Blend::with_diagnostics(layers, diagnostics))
    }

    /// Run [`Self::execute_targets`] and store the results in the font,
    /// replacing layers of the same name.
    pub fn apply_targets(&mut self, glyph: &str, setup: &AxisSetup) -> Result<Diagnostics> {
        let (layers, diagnostics) = self.execute_targets(glyph, setup)?.into_parts();
        let target = self
            .font
            .glyph_mut(glyph)
            .ok_or_else(|| typerig_core::Error::GlyphNotFound(glyph.to_string()))?;
        for layer in layers {
            target.set_layer(layer);
        }
        Ok(diagnostics)
    }
}
