use std::path::Path;

use anyhow::{Context, Result};
use typerig_core::Glyph;
use typerig_delta::{AxisSetup, GlyphDeltas};

use super::select_glyphs;
use crate::io::{FontFile, resolve_setup};

/// Print the axis layers, stem ranges and anchor coverage of each glyph.
pub fn info(font: &Path, glyphs: &[String], axis: Option<&Path>) -> Result<()> {
    let font = FontFile::new(font).read()?;
    let setup = resolve_setup(axis, &font)?;
    for name in select_glyphs(&font, glyphs) {
        let glyph = font.require_glyph(&name)?;
        match describe(glyph, &setup) {
            Ok(lines) => lines.iter().for_each(|line| println!("{line}")),
            Err(e) => println!("{name}: {e:#}"),
        }
    }
    Ok(())
}

fn describe(glyph: &Glyph, setup: &AxisSetup) -> Result<Vec<String>> {
    let mut working = glyph.clone();
    let axis = setup.stamp(&mut working)?;
    let names: Vec<&str> = axis.iter().map(String::as_str).collect();
    let deltas = GlyphDeltas::build(&working, &names)
        .with_context(|| format!("Cannot build deltas for '{}'", glyph.name))?;

    let advance = deltas.metrics.advance();
    let (x_min, x_max) = advance.x_range();
    let (y_min, y_max) = advance.y_range();
    let mut lines = vec![
        format!("{}: {} contours over {}", glyph.name, deltas.contours.len(), axis.join(", ")),
        format!("  vstem {x_min}..{x_max}, hstem {y_min}..{y_max}"),
    ];
    let points: Vec<String> = deltas.contours.iter().map(|c| c.point_count().to_string()).collect();
    lines.push(format!("  points per contour: [{}]", points.join(", ")));

    let anchors = deltas.metrics.anchors();
    if !anchors.names().is_empty() {
        lines.push(format!("  anchors: {}", anchors.names().join(", ")));
    }
    for (anchor, missing) in anchors.partial() {
        lines.push(format!("  anchor '{anchor}' missing in {}", missing.join(", ")));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use typerig_core::{Anchor, Contour, Layer, Shape};
    use typerig_delta::AxisEntry;

    use super::*;

    fn layer(name: &str, width: f64) -> Layer {
        Layer::new(name)
            .with_advance(width, 1000.0)
            .with_shape(Shape::new(vec![Contour::polygon(&[(0.0, 0.0), (width, 0.0), (0.0, 100.0)])]))
    }

    #[test]
    fn describes_the_blend_space() {
        let mut light = layer("Light", 100.0);
        light.add_anchor(Anchor::new("top", 50.0, 700.0)).unwrap();
        light.add_anchor(Anchor::new("ogonek", 90.0, 0.0)).unwrap();
        let mut bold = layer("Bold", 200.0);
        bold.add_anchor(Anchor::new("top", 100.0, 700.0)).unwrap();
        let glyph = Glyph::new("a").with_layer(light).with_layer(bold);

        let mut setup = AxisSetup::default();
        setup.axis = vec![
            AxisEntry::new("Light").with_stems(40.0, 30.0),
            AxisEntry::new("Bold").with_stems(160.0, 60.0),
        ];

        assert_eq!(
            describe(&glyph, &setup).unwrap(),
            vec![
                "a: 1 contours over Light, Bold".to_string(),
                "  vstem 40..160, hstem 30..60".to_string(),
                "  points per contour: [3]".to_string(),
                "  anchors: top".to_string(),
                "  anchor 'ogonek' missing in Bold".to_string(),
            ]
        );
    }

    #[test]
    fn unstamped_layers_fail() {
        let glyph = Glyph::new("a").with_layer(layer("Light", 100.0));
        let mut setup = AxisSetup::default();
        setup.axis = vec![
            AxisEntry::new("Light").with_stems(40.0, 30.0),
            AxisEntry::new("Bold").with_stems(160.0, 60.0),
        ];
        assert!(describe(&glyph, &setup).is_err());
    }
}
