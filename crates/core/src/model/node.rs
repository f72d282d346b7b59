use std::{fmt, str::FromStr};

use crate::{
    error::{Error, Result},
    geometry::{Point, format_coord},
};

/// Whether a node lies on the outline or is a cubic control point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    On,
    Off,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::On => "on",
            NodeType::Off => "off",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point of a contour.
///
/// The node type is fixed at construction; only coordinates and
/// attributes change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub point: Point,
    kind: NodeType,
    pub smooth: bool,
    pub name: Option<String>,
}

impl Node {
    pub fn new(point: Point, kind: NodeType) -> Self {
        Self {
            point,
            kind,
            smooth: false,
            name: None,
        }
    }

    pub fn on(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), NodeType::On)
    }

    pub fn off(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), NodeType::Off)
    }

    pub fn with_smooth(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn kind(&self) -> NodeType {
        self.kind
    }

    pub fn is_on(&self) -> bool {
        self.kind == NodeType::On
    }

    pub fn x(&self) -> f64 {
        self.point.x
    }

    pub fn y(&self) -> f64 {
        self.point.y
    }

    /// Compact text form: `"x y"` followed by `s` when smooth and `o`
    /// when off-curve.
    pub fn dumps(&self) -> String {
        let mut out = format!("{} {}", format_coord(self.point.x), format_coord(self.point.y));
        if self.smooth {
            out.push_str(" s");
        }
        if self.kind == NodeType::Off {
            out.push_str(" o");
        }
        out
    }

    /// Parse the form produced by [`Node::dumps`].
    pub fn loads(text: &str) -> Result<Self> {
        text.parse()
    }
}

impl FromStr for Node {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let mut coord = |axis: &str| -> Result<f64> {
            let raw = parts
                .next()
                .ok_or_else(|| Error::parse("point", format!("missing {axis} in '{s}'")))?;
            raw.parse::<f64>()
                .map_err(|e| Error::parse("point", format!("bad {axis} '{raw}': {e}")))
        };
        let x = coord("x")?;
        let y = coord("y")?;

        let mut node = Node::on(x, y);
        for flag in parts {
            match flag {
                "s" => node.smooth = true,
                "o" => node.kind = NodeType::Off,
                // Tension flags from other tools carry no meaning here.
                "g2" => {}
                other => {
                    return Err(Error::parse("point", format!("unknown flag '{other}' in '{s}'")));
                }
            }
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dumps_compact_integers() {
        assert_eq!(Node::on(10.0, -20.0).dumps(), "10 -20");
        assert_eq!(Node::off(1.5, 2.0).with_smooth(true).dumps(), "1.5 2 s o");
    }

    #[test]
    fn loads_reads_flags() {
        let node = Node::loads("12.5 40 s o").unwrap();
        assert_eq!(node.point, Point::new(12.5, 40.0));
        assert!(node.smooth);
        assert_eq!(node.kind(), NodeType::Off);

        let back = Node::loads(&node.dumps()).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn loads_rejects_garbage() {
        assert!(Node::loads("12").is_err());
        assert!(Node::loads("a b").is_err());
        assert!(Node::loads("1 2 q").is_err());
    }
}
