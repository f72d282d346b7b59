use crate::{
    geometry::format_coord,
    model::{Anchor, Contour, Font, Glyph, Guideline, Layer, NodeType, Shape},
};

const INDENT: &str = "  ";

/// Minimal indenting XML writer.
struct XmlWriter {
    out: String,
    depth: usize,
}

type Attrs = Vec<(&'static str, String)>;

impl XmlWriter {
    fn new() -> Self {
        Self {
            out: String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"),
            depth: 0,
        }
    }

    fn start_tag(&mut self, tag: &str, attrs: &Attrs) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push('<');
        self.out.push_str(tag);
        for (key, value) in attrs {
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push_str("=\"");
            self.out.push_str(&escape(value));
            self.out.push('"');
        }
    }

    fn empty(&mut self, tag: &str, attrs: Attrs) {
        self.start_tag(tag, &attrs);
        self.out.push_str("/>\n");
    }

    fn open(&mut self, tag: &str, attrs: Attrs) {
        self.start_tag(tag, &attrs);
        self.out.push_str(">\n");
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push_str(">\n");
    }

    fn text(&mut self, tag: &str, attrs: Attrs, text: &str) {
        self.start_tag(tag, &attrs);
        self.out.push('>');
        self.out.push_str(&escape(text));
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push_str(">\n");
    }

    fn finish(self) -> String {
        self.out
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#10;"),
            other => out.push(other),
        }
    }
    out
}

fn push_opt(attrs: &mut Attrs, key: &'static str, value: &Option<String>) {
    if let Some(value) = value {
        attrs.push((key, value.clone()));
    }
}

fn write_font_body(w: &mut XmlWriter, font: &Font) {
    let m = &font.metrics;
    w.open(
        "font",
        vec![
            ("name", font.name.clone()),
            ("upm", format_coord(m.upm)),
            ("ascender", format_coord(m.ascender)),
            ("descender", format_coord(m.descender)),
            ("caps-height", format_coord(m.caps_height)),
            ("x-height", format_coord(m.x_height)),
            ("italic-angle", format_coord(m.italic_angle)),
        ],
    );
    for master in &font.masters {
        w.empty("master", vec![("name", master.clone())]);
    }
    for axis in &font.axes {
        w.empty(
            "axis",
            vec![
                ("name", axis.name.clone()),
                ("tag", axis.tag.clone()),
                ("min", format_coord(axis.min)),
                ("default", format_coord(axis.default)),
                ("max", format_coord(axis.max)),
            ],
        );
    }
    if !font.lib.is_empty() {
        w.open("lib", Vec::new());
        for (key, value) in &font.lib {
            w.text("entry", vec![("key", key.clone())], value);
        }
        w.close("lib");
    }
    for glyph in font.glyphs() {
        write_glyph_body(w, glyph);
    }
    w.close("font");
}

fn write_glyph_body(w: &mut XmlWriter, glyph: &Glyph) {
    let mut attrs: Attrs = vec![("name", glyph.name.clone())];
    if !glyph.unicodes.is_empty() {
        let unicodes: Vec<String> = glyph.unicodes.iter().map(|u| format!("{u:04X}")).collect();
        attrs.push(("unicodes", unicodes.join(" ")));
    }
    push_opt(&mut attrs, "mark", &glyph.mark);
    if !glyph.tags.is_empty() {
        attrs.push(("tags", glyph.tags.join(" ")));
    }
    w.open("glyph", attrs);
    for layer in glyph.layers() {
        write_layer(w, layer);
    }
    w.close("glyph");
}

fn write_layer(w: &mut XmlWriter, layer: &Layer) {
    let mut attrs: Attrs = vec![
        ("name", layer.name.clone()),
        ("role", layer.role.as_str().to_string()),
        ("width", format_coord(layer.advance_width)),
        ("height", format_coord(layer.advance_height)),
    ];
    push_opt(&mut attrs, "mark", &layer.mark);
    if let Some(stems) = layer.stems {
        attrs.push(("stx", format_coord(stems.x)));
        attrs.push(("sty", format_coord(stems.y)));
    }
    push_opt(&mut attrs, "lsb-expr", &layer.metric_expressions.lsb);
    push_opt(&mut attrs, "rsb-expr", &layer.metric_expressions.rsb);
    push_opt(&mut attrs, "advance-expr", &layer.metric_expressions.advance);

    w.open("layer", attrs);
    for shape in layer.shapes() {
        write_shape(w, shape);
    }
    for anchor in layer.anchors() {
        write_anchor(w, anchor);
    }
    for guideline in &layer.guidelines {
        write_guideline(w, guideline);
    }
    w.close("layer");
}

fn write_shape(w: &mut XmlWriter, shape: &Shape) {
    let mut attrs: Attrs = Vec::new();
    push_opt(&mut attrs, "name", &shape.name);
    if shape.locked {
        attrs.push(("locked", "true".into()));
    }
    if !shape.transform.is_identity() {
        let coeffs: Vec<String> = shape.transform.coeffs().iter().map(|c| format_coord(*c)).collect();
        attrs.push(("transform", coeffs.join(" ")));
    }
    w.open("shape", attrs);
    for include in &shape.includes {
        w.empty("include", vec![("name", include.clone())]);
    }
    for contour in shape.contours() {
        write_contour(w, contour);
    }
    w.close("shape");
}

fn write_contour(w: &mut XmlWriter, contour: &Contour) {
    let mut attrs: Attrs = Vec::new();
    push_opt(&mut attrs, "name", &contour.name);
    attrs.push(("closed", contour.closed.to_string()));
    w.open("contour", attrs);
    for node in contour.nodes() {
        let mut attrs: Attrs = vec![("x", format_coord(node.x())), ("y", format_coord(node.y()))];
        if node.kind() == NodeType::Off {
            attrs.push(("type", "off".into()));
        }
        if node.smooth {
            attrs.push(("smooth", "true".into()));
        }
        push_opt(&mut attrs, "name", &node.name);
        w.empty("point", attrs);
    }
    w.close("contour");
}

fn write_anchor(w: &mut XmlWriter, anchor: &Anchor) {
    let mut attrs: Attrs = vec![
        ("name", anchor.name.clone()),
        ("x", format_coord(anchor.point.x)),
        ("y", format_coord(anchor.point.y)),
    ];
    push_opt(&mut attrs, "x-expr", &anchor.x_expr);
    push_opt(&mut attrs, "y-expr", &anchor.y_expr);
    push_opt(&mut attrs, "tag", &anchor.tag);
    w.empty("anchor", attrs);
}

fn write_guideline(w: &mut XmlWriter, guideline: &Guideline) {
    let mut attrs: Attrs = Vec::new();
    push_opt(&mut attrs, "name", &guideline.name);
    attrs.push(("x", format_coord(guideline.point.x)));
    attrs.push(("y", format_coord(guideline.point.y)));
    attrs.push(("angle", format_coord(guideline.angle)));
    w.empty("guideline", attrs);
}

/// Serialize a whole font document.
pub fn write_font(font: &Font) -> String {
    let mut w = XmlWriter::new();
    write_font_body(&mut w, font);
    w.finish()
}

/// Serialize a single glyph as a standalone document.
pub fn write_glyph(glyph: &Glyph) -> String {
    let mut w = XmlWriter::new();
    write_glyph_body(&mut w, glyph);
    w.finish()
}
