use roxmltree::{Document, Node as XmlNode};

use crate::{
    error::{Error, Result},
    geometry::{Point, Transform},
    model::{
        Anchor, Axis, Contour, Font, FontMetrics, Glyph, Guideline, Layer, LayerRole, Node,
        NodeType, Shape, Stems,
    },
};

fn elements<'a, 'input>(node: XmlNode<'a, 'input>) -> impl Iterator<Item = XmlNode<'a, 'input>> {
    node.children().filter(XmlNode::is_element)
}

fn tag<'a>(node: XmlNode<'a, '_>) -> &'a str {
    node.tag_name().name()
}

fn required<'a>(node: XmlNode<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name)
        .ok_or_else(|| Error::parse(tag(node), format!("missing attribute '{name}'")))
}

fn optional(node: XmlNode<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

fn parse_number(node: XmlNode<'_, '_>, name: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| Error::parse(tag(node), format!("attribute '{name}'='{raw}': {e}")))
}

fn number(node: XmlNode<'_, '_>, name: &str) -> Result<Option<f64>> {
    node.attribute(name).map(|raw| parse_number(node, name, raw)).transpose()
}

fn number_or(node: XmlNode<'_, '_>, name: &str, default: f64) -> Result<f64> {
    Ok(number(node, name)?.unwrap_or(default))
}

fn required_number(node: XmlNode<'_, '_>, name: &str) -> Result<f64> {
    parse_number(node, name, required(node, name)?)
}

fn flag(node: XmlNode<'_, '_>, name: &str) -> Result<bool> {
    match node.attribute(name) {
        None | Some("false") | Some("0") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some(other) => Err(Error::parse(tag(node), format!("attribute '{name}'='{other}' is not a boolean"))),
    }
}

fn expect_root<'a, 'input>(doc: &'a Document<'input>, expected: &str) -> Result<XmlNode<'a, 'input>> {
    let root = doc.root_element();
    if tag(root) != expected {
        return Err(Error::parse(tag(root), format!("expected <{expected}> root element")));
    }
    Ok(root)
}

fn read_font_element(node: XmlNode<'_, '_>) -> Result<Font> {
    let defaults = FontMetrics::default();
    let mut font = Font::new(node.attribute("name").unwrap_or_default());
    font.metrics = FontMetrics {
        upm: number_or(node, "upm", defaults.upm)?,
        ascender: number_or(node, "ascender", defaults.ascender)?,
        descender: number_or(node, "descender", defaults.descender)?,
        caps_height: number_or(node, "caps-height", defaults.caps_height)?,
        x_height: number_or(node, "x-height", defaults.x_height)?,
        italic_angle: number_or(node, "italic-angle", defaults.italic_angle)?,
    };

    for child in elements(node) {
        match tag(child) {
            "master" => font.masters.push(required(child, "name")?.to_string()),
            "axis" => font.axes.push(Axis::new(
                required(child, "name")?,
                child.attribute("tag").unwrap_or_default(),
                required_number(child, "min")?,
                required_number(child, "default")?,
                required_number(child, "max")?,
            )),
            "lib" => {
                for entry in elements(child).filter(|e| tag(*e) == "entry") {
                    let key = required(entry, "key")?.to_string();
                    font.lib.insert(key, entry.text().unwrap_or_default().to_string());
                }
            }
            "glyph" => {
                let glyph = read_glyph_element(child)?;
                if font.insert_glyph(glyph).is_some() {
                    return Err(Error::parse("glyph", "duplicate glyph name"));
                }
            }
            other => log::debug!("Skipping unknown <{other}> in <font>"),
        }
    }
    Ok(font)
}

fn read_glyph_element(node: XmlNode<'_, '_>) -> Result<Glyph> {
    let mut glyph = Glyph::new(required(node, "name")?);
    if let Some(raw) = node.attribute("unicodes") {
        for code in raw.split_whitespace() {
            let value = u32::from_str_radix(code, 16)
                .map_err(|e| Error::parse("glyph", format!("bad unicode '{code}': {e}")))?;
            glyph.unicodes.push(value);
        }
    }
    glyph.mark = optional(node, "mark");
    if let Some(raw) = node.attribute("tags") {
        glyph.tags = raw.split_whitespace().map(str::to_string).collect();
    }
    for child in elements(node).filter(|c| tag(*c) == "layer") {
        glyph.push(read_layer(child)?);
    }
    Ok(glyph)
}

fn read_layer(node: XmlNode<'_, '_>) -> Result<Layer> {
    let mut layer = Layer::new(required(node, "name")?).with_advance(
        number_or(node, "width", 0.0)?,
        number_or(node, "height", 0.0)?,
    );
    if let Some(role) = node.attribute("role") {
        layer.role = role.parse::<LayerRole>()?;
    }
    layer.mark = optional(node, "mark");
    layer.stems = match (number(node, "stx")?, number(node, "sty")?) {
        (Some(x), Some(y)) => Some(Stems::new(x, y)),
        (None, None) => None,
        _ => return Err(Error::parse("layer", "stems need both 'stx' and 'sty'")),
    };
    layer.metric_expressions.lsb = optional(node, "lsb-expr");
    layer.metric_expressions.rsb = optional(node, "rsb-expr");
    layer.metric_expressions.advance = optional(node, "advance-expr");

    for child in elements(node) {
        match tag(child) {
            "shape" => layer.push(read_shape(child)?),
            "anchor" => {
                let mut anchor = Anchor::new(
                    required(child, "name")?,
                    required_number(child, "x")?,
                    required_number(child, "y")?,
                );
                anchor.x_expr = optional(child, "x-expr");
                anchor.y_expr = optional(child, "y-expr");
                anchor.tag = optional(child, "tag");
                layer.add_anchor(anchor)?;
            }
            "guideline" => layer.guidelines.push(Guideline {
                name: optional(child, "name"),
                point: Point::new(number_or(child, "x", 0.0)?, number_or(child, "y", 0.0)?),
                angle: number_or(child, "angle", 0.0)?,
            }),
            other => log::debug!("Skipping unknown <{other}> in <layer>"),
        }
    }
    layer.check_inclusions()?;
    Ok(layer)
}

fn read_shape(node: XmlNode<'_, '_>) -> Result<Shape> {
    let mut shape = Shape::new(Vec::new());
    shape.name = optional(node, "name");
    shape.locked = flag(node, "locked")?;
    if let Some(raw) = node.attribute("transform") {
        let values = raw
            .split_whitespace()
            .map(|v| parse_number(node, "transform", v))
            .collect::<Result<Vec<f64>>>()?;
        let coeffs: [f64; 6] = values
            .try_into()
            .map_err(|_| Error::parse("shape", format!("transform '{raw}' needs six values")))?;
        shape.transform = Transform::from_coeffs(coeffs);
    }
    for child in elements(node) {
        match tag(child) {
            "include" => shape.includes.push(required(child, "name")?.to_string()),
            "contour" => shape.push(read_contour(child)?),
            other => log::debug!("Skipping unknown <{other}> in <shape>"),
        }
    }
    Ok(shape)
}

fn read_contour(node: XmlNode<'_, '_>) -> Result<Contour> {
    let mut contour = Contour::new(Vec::new(), flag(node, "closed")?);
    contour.name = optional(node, "name");
    for point in elements(node).filter(|c| tag(*c) == "point") {
        let kind = match point.attribute("type") {
            None | Some("on") => NodeType::On,
            Some("off") => NodeType::Off,
            Some(other) => return Err(Error::parse("point", format!("unknown type '{other}'"))),
        };
        let mut parsed = Node::new(
            Point::new(required_number(point, "x")?, required_number(point, "y")?),
            kind,
        );
        parsed.smooth = flag(point, "smooth")?;
        parsed.name = optional(point, "name");
        contour.push(parsed);
    }
    Ok(contour)
}

/// Parse a font document.
pub fn read_font(text: &str) -> Result<Font> {
    let doc = Document::parse(text)?;
    read_font_element(expect_root(&doc, "font")?)
}

/// Parse a standalone glyph document.
pub fn read_glyph(text: &str) -> Result<Glyph> {
    let doc = Document::parse(text)?;
    read_glyph_element(expect_root(&doc, "glyph")?)
}
