use indexmap::IndexMap;
use log::debug;

use super::Glyph;
use crate::{
    adapter::HostHandle,
    error::{Error, Result},
};

/// A design axis of the font.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub name: String,
    pub tag: String,
    pub min: f64,
    pub default: f64,
    pub max: f64,
}

impl Axis {
    pub fn new(name: impl Into<String>, tag: impl Into<String>, min: f64, default: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            min,
            default,
            max,
        }
    }
}

/// Font-wide vertical metrics and slant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub upm: f64,
    pub ascender: f64,
    pub descender: f64,
    pub caps_height: f64,
    pub x_height: f64,
    /// Degrees; positive slants forward.
    pub italic_angle: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            upm: 1000.0,
            ascender: 800.0,
            descender: -200.0,
            caps_height: 700.0,
            x_height: 500.0,
            italic_angle: 0.0,
        }
    }
}

/// A glyph collection with its masters, axes and metrics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Font {
    pub name: String,
    glyphs: IndexMap<String, Glyph>,
    pub masters: Vec<String>,
    pub axes: Vec<Axis>,
    pub metrics: FontMetrics,
    /// Free-form key/value store for tool settings.
    pub lib: IndexMap<String, String>,
    pub host: Option<HostHandle>,
}

impl Font {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyph(&self, name: &str) -> Option<&Glyph> {
        self.glyphs.get(name)
    }

    pub fn glyph_mut(&mut self, name: &str) -> Option<&mut Glyph> {
        self.glyphs.get_mut(name)
    }

    pub fn require_glyph(&self, name: &str) -> Result<&Glyph> {
        self.glyph(name)
            .ok_or_else(|| Error::GlyphNotFound(name.to_string()))
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.values()
    }

    pub fn glyphs_mut(&mut self) -> impl Iterator<Item = &mut Glyph> {
        self.glyphs.values_mut()
    }

    pub fn glyph_names(&self) -> impl Iterator<Item = &str> {
        self.glyphs.keys().map(String::as_str)
    }

    /// Insert or replace a glyph, keeping its position when replacing.
    pub fn insert_glyph(&mut self, glyph: Glyph) -> Option<Glyph> {
        self.glyphs.insert(glyph.name.clone(), glyph)
    }

    pub fn remove_glyph(&mut self, name: &str) -> Option<Glyph> {
        self.glyphs.shift_remove(name)
    }

    pub fn italic_angle(&self) -> f64 {
        self.metrics.italic_angle
    }

    /// Attributes only, without glyphs.
    pub(crate) fn shallow_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            glyphs: IndexMap::new(),
            masters: self.masters.clone(),
            axes: self.axes.clone(),
            metrics: self.metrics,
            lib: self.lib.clone(),
            host: self.host,
        }
    }

    /// Check that every glyph carries a master layer for each font master
    /// and that every layer is internally consistent.
    pub fn validate(&self) -> Result<()> {
        for glyph in self.glyphs.values() {
            let missing: Vec<String> = self
                .masters
                .iter()
                .filter(|m| !glyph.masters().any(|l| &l.name == *m))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(Error::MasterMismatch {
                    glyph: glyph.name.clone(),
                    missing,
                });
            }
            for layer in glyph.layers() {
                layer.validate()?;
            }
        }
        debug!("Validated {} glyphs against {} masters", self.glyphs.len(), self.masters.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Layer, LayerRole};

    #[test]
    fn validate_requires_master_layers() {
        let mut font = Font::new("Test");
        font.masters = vec!["Light".into(), "Bold".into()];
        font.insert_glyph(
            Glyph::new("A")
                .with_layer(Layer::new("Light"))
                .with_layer(Layer::new("Bold").with_role(LayerRole::Service)),
        );

        match font.validate() {
            Err(Error::MasterMismatch { glyph, missing }) => {
                assert_eq!(glyph, "A");
                assert_eq!(missing, vec!["Bold".to_string()]);
            }
            other => panic!("expected master mismatch, got {other:?}"),
        }

        font.insert_glyph(Glyph::new("A").with_layer(Layer::new("Light")).with_layer(Layer::new("Bold")));
        assert!(font.validate().is_ok());
        assert_eq!(font.len(), 1);
    }

    #[test]
    fn glyph_order_is_stable() {
        let mut font = Font::new("Test");
        for name in ["b", "a", "c"] {
            font.insert_glyph(Glyph::new(name));
        }
        font.remove_glyph("a");
        assert_eq!(font.glyph_names().collect::<Vec<_>>(), ["b", "c"]);
        assert!(font.require_glyph("a").is_err());
    }
}
