//! Persisted axis setup: which layers span the blend space and which
//! targets to produce from it.
//!
//! The setup is a JSON object with three ordered groups of fixed-arity rows
//! `[layer, vstem, hstem, width %, height %, color]`:
//!
//! ```json
//! {
//!   "Master Layers": [["Light", 40, 30, 100, 100, "#ff0000"]],
//!   "Virtual Axis":  [["Light", 40, 30, 100, 100, ""], ["Bold", 160, 30, 100, 100, ""]],
//!   "Target Layers": [["Small", 80, 30, 60, 60, ""]]
//! }
//! ```
//!
//! Numeric cells accept numbers or numeric strings; an empty string marks
//! an unset stem. The same document may live in a font's lib under
//! [`LIB_KEY`].

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use typerig_core::{Font, Glyph, Stems};

use crate::error::{Error, Result};

/// Font lib key the setup is stored under.
pub const LIB_KEY: &str = "com.typerig.delta.machine.axissetup";

const DEFAULT_SCALE_PCT: f64 = 100.0;

/// A JSON cell that may hold a number or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    fn number(&self, column: &'static str) -> std::result::Result<Option<f64>, String> {
        match self {
            Cell::Number(v) => Ok(Some(*v)),
            Cell::Text(s) if s.trim().is_empty() => Ok(None),
            Cell::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| format!("{column} '{s}' is not a number")),
        }
    }

    fn text(self) -> String {
        match self {
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => s,
        }
    }

    fn from_option(value: Option<f64>) -> Self {
        value.map_or(Cell::Text(String::new()), Cell::Number)
    }
}

type Row = (String, Cell, Cell, Cell, Cell, Cell);

/// One row of the setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Row", into = "Row")]
pub struct AxisEntry {
    pub layer: String,
    pub vstem: Option<f64>,
    pub hstem: Option<f64>,
    /// Horizontal scale in percent.
    pub width: Option<f64>,
    /// Vertical scale in percent.
    pub height: Option<f64>,
    pub color: String,
}

impl TryFrom<Row> for AxisEntry {
    type Error = String;

    fn try_from((layer, vstem, hstem, width, height, color): Row) -> std::result::Result<Self, String> {
        Ok(Self {
            vstem: vstem.number("vstem")?,
            hstem: hstem.number("hstem")?,
            width: width.number("width")?,
            height: height.number("height")?,
            color: color.text(),
            layer,
        })
    }
}

impl From<AxisEntry> for Row {
    fn from(entry: AxisEntry) -> Self {
        (
            entry.layer,
            Cell::from_option(entry.vstem),
            Cell::from_option(entry.hstem),
            Cell::from_option(entry.width),
            Cell::from_option(entry.height),
            Cell::Text(entry.color),
        )
    }
}

impl AxisEntry {
    /// Entry with unset stems at 100% scale.
    pub fn new(layer: impl Into<String>) -> Self {
        Self {
            layer: layer.into(),
            vstem: None,
            hstem: None,
            width: Some(DEFAULT_SCALE_PCT),
            height: Some(DEFAULT_SCALE_PCT),
            color: String::new(),
        }
    }

    pub fn with_stems(mut self, vstem: f64, hstem: f64) -> Self {
        self.vstem = Some(vstem);
        self.hstem = Some(hstem);
        self
    }

    pub fn with_scale_pct(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Both stems, or `InvalidStems` naming the layer.
    pub fn stems(&self) -> Result<Stems> {
        match (self.vstem, self.hstem) {
            (Some(x), Some(y)) => Ok(Stems::new(x, y)),
            _ => Err(Error::invalid_stems(&self.layer, "stems not set in axis setup")),
        }
    }

    /// Scale factors as fractions, unset cells meaning 100%.
    pub fn scale(&self) -> (f64, f64) {
        (
            self.width.unwrap_or(DEFAULT_SCALE_PCT) / 100.0,
            self.height.unwrap_or(DEFAULT_SCALE_PCT) / 100.0,
        )
    }
}

/// A requested output layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub name: String,
    pub stems: Stems,
    pub scale: (f64, f64),
    pub color: String,
}

/// The three groups of an axis setup, plus any extra groups carried through.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisSetup {
    #[serde(rename = "Master Layers", default)]
    pub masters: Vec<AxisEntry>,
    #[serde(rename = "Virtual Axis", default)]
    pub axis: Vec<AxisEntry>,
    #[serde(rename = "Target Layers", default)]
    pub targets: Vec<AxisEntry>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl AxisSetup {
    /// Fresh setup listing the font's masters with unset stems.
    pub fn for_font(font: &Font) -> Self {
        Self {
            masters: font.masters.iter().map(AxisEntry::new).collect(),
            ..Self::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Setup stored in the font lib, if any.
    pub fn load(font: &Font) -> Result<Option<Self>> {
        font.lib.get(LIB_KEY).map(|text| Self::from_json(text)).transpose()
    }

    pub fn store(&self, font: &mut Font) -> Result<()> {
        font.lib.insert(LIB_KEY.to_string(), serde_json::to_string(self)?);
        Ok(())
    }

    /// Axis layer names with their stems; at least two are required.
    pub fn axis_stems(&self) -> Result<Vec<(&str, Stems)>> {
        if self.axis.len() < 2 {
            return Err(Error::InsufficientAxis {
                axis: "virtual",
                reason: format!("need at least two axis layers, got {}", self.axis.len()),
            });
        }
        self.axis
            .iter()
            .map(|entry| Ok((entry.layer.as_str(), entry.stems()?)))
            .collect()
    }

    /// Write the axis stems onto the matching layers of `glyph` and return
    /// the axis layer names in order.
    pub fn stamp(&self, glyph: &mut Glyph) -> Result<Vec<String>> {
        let axis = self.axis_stems()?;
        let glyph_name = glyph.name.clone();
        let mut names = Vec::with_capacity(axis.len());
        for (name, stems) in axis {
            let layer = glyph
                .layer_mut(name)
                .ok_or_else(|| Error::LayerNotFound(format!("{glyph_name}/{name}")))?;
            layer.stems = Some(stems);
            names.push(name.to_string());
        }
        debug!("Stamped {} axis layers on '{glyph_name}'", names.len());
        Ok(names)
    }

    pub fn target_list(&self) -> Result<Vec<Target>> {
        self.targets
            .iter()
            .map(|entry| {
                let scale = entry.scale();
                if !(scale.0.is_finite() && scale.1.is_finite()) || scale.0 == 0.0 || scale.1 == 0.0 {
                    return Err(Error::invalid("target scale", format!("{:?}", (entry.width, entry.height))));
                }
                Ok(Target {
                    name: entry.layer.clone(),
                    stems: entry.stems()?,
                    scale,
                    color: entry.color.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use typerig_core::Layer;

    use super::*;

    const SAMPLE: &str = r##"{
        "Master Layers": [["Light", "", "", "100.", "100.", "#ff0000"], ["Bold", 160, 30, 100, 100, ""]],
        "Virtual Axis": [["Light", "40", "30", "100.", "100.", ""], ["Bold", 160, 30.0, 100, 100, ""]],
        "Target Layers": [["Small", 80, 30, 60, 50, "blue"]],
        "Notes": {"author": "kv"}
    }"##;

    #[test]
    fn parses_mixed_cells() {
        let setup = AxisSetup::from_json(SAMPLE).unwrap();
        assert_eq!(setup.masters[0].vstem, None);
        assert_eq!(setup.masters[0].color, "#ff0000");
        assert_eq!(setup.axis[0].stems().unwrap(), Stems::new(40.0, 30.0));
        assert_eq!(
            setup.target_list().unwrap(),
            vec![Target {
                name: "Small".into(),
                stems: Stems::new(80.0, 30.0),
                scale: (0.6, 0.5),
                color: "blue".into(),
            }]
        );
        assert!(setup.extra.contains_key("Notes"));
    }

    #[test]
    fn json_keeps_group_order_and_extras() {
        let setup = AxisSetup::from_json(SAMPLE).unwrap();
        let text = setup.to_json().unwrap();
        let masters = text.find("Master Layers").unwrap();
        let axis = text.find("Virtual Axis").unwrap();
        let targets = text.find("Target Layers").unwrap();
        assert!(masters < axis && axis < targets);
        assert_eq!(AxisSetup::from_json(&text).unwrap(), setup);
    }

    #[test]
    fn rejects_bad_rows() {
        assert!(matches!(
            AxisSetup::from_json(r#"{"Virtual Axis": [["Light", "wide", 1, 1, 1, ""]]}"#),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            AxisSetup::from_json(r#"{"Virtual Axis": [["Light", 1, 1]]}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn font_lib_round_trip() {
        let mut font = Font::new("Test");
        font.masters = vec!["Light".into(), "Bold".into()];
        assert_eq!(AxisSetup::load(&font).unwrap(), None);

        let mut setup = AxisSetup::for_font(&font);
        setup.axis.push(AxisEntry::new("Light").with_stems(40.0, 30.0));
        setup.store(&mut font).unwrap();
        assert_eq!(AxisSetup::load(&font).unwrap(), Some(setup));
    }

    #[test]
    fn stamps_axis_layers() {
        let setup = AxisSetup::from_json(SAMPLE).unwrap();
        let mut glyph = Glyph::new("a").with_layer(Layer::new("Light")).with_layer(Layer::new("Bold"));
        let names = setup.stamp(&mut glyph).unwrap();
        assert_eq!(names, vec!["Light".to_string(), "Bold".to_string()]);
        assert_eq!(glyph.layer("Bold").unwrap().stems, Some(Stems::new(160.0, 30.0)));

        let mut missing = Glyph::new("b").with_layer(Layer::new("Light"));
        assert!(matches!(setup.stamp(&mut missing), Err(Error::LayerNotFound(_))));
    }

    #[test]
    fn axis_needs_two_stemmed_layers() {
        let mut setup = AxisSetup::default();
        setup.axis.push(AxisEntry::new("Light").with_stems(40.0, 30.0));
        assert!(matches!(setup.axis_stems(), Err(Error::InsufficientAxis { .. })));

        setup.axis.push(AxisEntry::new("Bold"));
        assert!(matches!(setup.axis_stems(), Err(Error::InvalidStems { .. })));
    }
}
