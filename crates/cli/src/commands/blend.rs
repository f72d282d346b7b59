use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use typerig_delta::{Preferences, Session};

use super::{report, select_glyphs};
use crate::{
    io::{FontFile, resolve_setup},
    parallel::process_parallel_iter,
};

#[derive(Debug, Clone)]
pub struct BlendRequest {
    pub font: PathBuf,
    pub glyphs: Vec<String>,
    pub axis: Option<PathBuf>,
    pub output: PathBuf,
    pub preferences: Preferences,
}

/// Blend the target layers of every selected glyph and write the font.
///
/// Glyphs are blended in parallel; a glyph that fails leaves its layers
/// untouched, and the font is still written before the failure is reported.
pub fn blend(request: &BlendRequest) -> Result<()> {
    let font = FontFile::new(&request.font).read()?;
    let setup = resolve_setup(request.axis.as_deref(), &font)?;
    let glyphs = select_glyphs(&font, &request.glyphs);
    let mut session = Session::new(font).with_preferences(request.preferences);

    let batch = process_parallel_iter("Blend", glyphs, |name| {
        let result = session
            .execute_targets(&name, &setup)
            .with_context(|| format!("Failed to blend '{name}'"))?;
        Ok((name, result))
    });

    let status = batch.ok_or_bail("Blend");
    for (name, result) in batch.outputs {
        let (layers, diagnostics) = result.into_parts();
        report(&name, &diagnostics);
        let glyph = session
            .font
            .glyph_mut(&name)
            .with_context(|| format!("Glyph '{name}' vanished from the font"))?;
        for layer in layers {
            glyph.set_layer(layer);
        }
    }

    FontFile::new(&request.output).write(&session.font)?;
    info!("Wrote {}", request.output.display());
    status
}

#[cfg(test)]
mod tests {
    use std::{env::temp_dir, fs::remove_file};

    use pretty_assertions::assert_eq;
    use typerig_core::{Contour, Font, Glyph, Layer, Shape, Stems};
    use typerig_delta::{AxisEntry, AxisSetup};

    use super::*;

    fn bar(name: &str, width: f64) -> Layer {
        Layer::new(name)
            .with_advance(width + 100.0, 1000.0)
            .with_shape(Shape::new(vec![Contour::polygon(&[
                (50.0, 0.0),
                (50.0 + width, 0.0),
                (50.0 + width, 700.0),
                (50.0, 700.0),
            ])]))
    }

    fn font() -> Font {
        let mut font = Font::new("Bars");
        font.masters = vec!["Thin".into(), "Black".into()];
        font.insert_glyph(Glyph::new("l").with_layer(bar("Thin", 50.0)).with_layer(bar("Black", 200.0)));
        font.insert_glyph(Glyph::new("broken").with_layer(bar("Thin", 50.0)));

        let mut setup = AxisSetup::for_font(&font);
        setup.axis = vec![
            AxisEntry::new("Thin").with_stems(50.0, 40.0),
            AxisEntry::new("Black").with_stems(200.0, 40.0),
        ];
        setup.targets = vec![AxisEntry::new("Medium").with_stems(125.0, 40.0)];
        setup.store(&mut font).unwrap();
        font
    }

    fn request(name: &str, glyphs: &[&str]) -> BlendRequest {
        let path = temp_dir().join(format!("typerig-blend-{}-{name}.xml", std::process::id()));
        FontFile::new(&path).write(&font()).unwrap();
        BlendRequest {
            output: path.clone(),
            font: path,
            glyphs: glyphs.iter().map(|g| g.to_string()).collect(),
            axis: None,
            preferences: Preferences::default(),
        }
    }

    #[test]
    fn writes_target_layers() {
        let request = request("ok", &["l"]);
        blend(&request).unwrap();

        let font = FontFile::new(&request.output).read().unwrap();
        let medium = font.glyph("l").unwrap().layer("Medium").unwrap();
        assert_eq!(medium.stems, Some(Stems::new(125.0, 40.0)));
        assert_eq!(medium.advance_width, 225.0);
        remove_file(&request.output).unwrap();
    }

    #[test]
    fn failures_are_reported_after_writing() {
        let request = request("partial", &[]);
        assert!(blend(&request).is_err());

        let font = FontFile::new(&request.output).read().unwrap();
        assert!(font.glyph("l").unwrap().layer("Medium").is_some());
        assert_eq!(font.glyph("broken").unwrap().len(), 1);
        remove_file(&request.output).unwrap();
    }
}
