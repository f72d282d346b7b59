//! XML serialization of fonts and glyphs.
//!
//! The element tree follows the model: `font` holds `master`, `axis`,
//! `lib` and `glyph` elements; a `glyph` holds `layer`s; a `layer` holds
//! `shape`, `anchor` and `guideline`; a `shape` holds `include` and
//! `contour`; a `contour` holds `point`s.

mod read;
mod write;

pub use read::{read_font, read_glyph};
pub use write::{write_font, write_glyph};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        error::Error,
        geometry::Transform,
        model::{Anchor, Axis, Contour, Font, Glyph, Guideline, Layer, LayerRole, Node, Shape},
    };

    fn sample_font() -> Font {
        let mut shape = Shape::new(vec![
            Contour::closed(vec![
                Node::on(10.0, 0.0).with_name("start"),
                Node::off(10.0, 55.5),
                Node::off(45.0, 100.0),
                Node::on(100.0, 100.0).with_smooth(true),
            ]),
            Contour::new(vec![Node::on(0.0, 0.0), Node::on(0.1, 0.2)], false).with_name("open"),
        ])
        .with_name("body");
        shape.transform = Transform::identity().scale(1.5, 1.0).shift(3.0, 0.0);
        shape.includes.push("dot & accent".into());

        let mut layer = Layer::new("Light")
            .with_advance(520.0, 1000.0)
            .with_stems(60.0, 40.0)
            .with_shape(shape);
        layer.mark = Some("#ff0000".into());
        layer.metric_expressions.rsb = Some("=lsb(\"n\")".into());
        let mut anchor = Anchor::new("top", 250.0, 700.0);
        anchor.y_expr = Some("=capHeight".into());
        layer.add_anchor(anchor).unwrap();
        layer.guidelines.push(Guideline::new(0.0, 500.0, 0.0));

        let mask = Layer::new("Light.mask").with_role(LayerRole::Mask);

        let mut glyph = Glyph::new("a").with_unicode(0x61).with_layer(layer).with_layer(mask);
        glyph.tags = vec!["lower".into(), "latin".into()];

        let mut font = Font::new("Sample <Sans>");
        font.masters = vec!["Light".into()];
        font.axes.push(Axis::new("Weight", "wght", 100.0, 300.0, 900.0));
        font.metrics.italic_angle = 9.5;
        font.lib.insert("com.typerig.test".into(), "{\"a\": [1, 2]}\nline".into());
        font.insert_glyph(glyph);
        font
    }

    #[test]
    fn font_round_trips() {
        let font = sample_font();
        let text = write_font(&font);
        assert_eq!(read_font(&text).unwrap(), font);
    }

    #[test]
    fn glyph_round_trips() {
        let glyph = sample_font().glyph("a").unwrap().clone();
        let text = write_glyph(&glyph);
        assert!(text.contains("<point x=\"10\" y=\"55.5\" type=\"off\"/>"));
        assert_eq!(read_glyph(&text).unwrap(), glyph);
    }

    #[test]
    fn wrong_root_is_rejected() {
        let text = write_glyph(&Glyph::new("a"));
        assert!(matches!(read_font(&text), Err(Error::Parse { .. })));
        assert!(matches!(read_font("<font"), Err(Error::Xml(_))));
    }

    #[test]
    fn bad_values_are_reported() {
        let text = r#"<glyph name="a"><layer name="L"><shape><contour closed="maybe"/></shape></layer></glyph>"#;
        assert!(matches!(read_glyph(text), Err(Error::Parse { .. })));

        let text = r#"<glyph name="a"><layer name="L" stx="10"/></glyph>"#;
        assert!(read_glyph(text).is_err());

        let text = r#"<glyph name="a"><layer name="L"><anchor name="t" x="1" y="1"/><anchor name="t" x="2" y="2"/></layer></glyph>"#;
        assert!(matches!(read_glyph(text), Err(Error::DuplicateAnchor { .. })));
    }
}
