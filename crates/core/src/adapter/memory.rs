use std::collections::HashMap;

use super::{AdapterError, Attributes, Host, HostHandle};
use crate::model::{Contour, Font, Glyph, Layer, Shape};

#[derive(Debug, Clone)]
struct Record {
    attributes: Attributes,
    children: Vec<HostHandle>,
}

/// In-memory host: a registry of records addressed by integer handles.
///
/// Behaves like an editor document for tests and tools that have no real
/// editor behind them.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    records: HashMap<HostHandle, Record>,
    root: HostHandle,
    next: u64,
    notifications: Vec<(String, String)>,
}

impl MemoryHost {
    /// Load `font` into a fresh registry.
    pub fn new(font: &Font) -> Self {
        let root = HostHandle(0);
        let mut host = Self {
            records: HashMap::new(),
            root,
            next: 1,
            notifications: Vec::new(),
        };
        host.records.insert(
            root,
            Record {
                attributes: Attributes::of_font(font),
                children: Vec::new(),
            },
        );
        for glyph in font.glyphs() {
            let handle = host.load_glyph(glyph);
            host.attach(root, handle);
        }
        host
    }

    /// `(scope, message)` pairs received through [`Host::notify_changed`].
    pub fn notifications(&self) -> &[(String, String)] {
        &self.notifications
    }

    /// Number of live records, the root included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn alloc(&mut self, attributes: Attributes) -> HostHandle {
        let handle = HostHandle(self.next);
        self.next += 1;
        self.records.insert(
            handle,
            Record {
                attributes,
                children: Vec::new(),
            },
        );
        handle
    }

    fn attach(&mut self, parent: HostHandle, child: HostHandle) {
        if let Some(record) = self.records.get_mut(&parent) {
            record.children.push(child);
        }
    }

    fn load_glyph(&mut self, glyph: &Glyph) -> HostHandle {
        let handle = self.alloc(Attributes::of_glyph(glyph));
        for layer in glyph.layers() {
            let child = self.load_layer(layer);
            self.attach(handle, child);
        }
        handle
    }

    fn load_layer(&mut self, layer: &Layer) -> HostHandle {
        let handle = self.alloc(Attributes::of_layer(layer));
        for shape in layer.shapes() {
            let child = self.load_shape(shape);
            self.attach(handle, child);
        }
        handle
    }

    fn load_shape(&mut self, shape: &Shape) -> HostHandle {
        let handle = self.alloc(Attributes::of_shape(shape));
        for contour in shape.contours() {
            let child = self.load_contour(contour);
            self.attach(handle, child);
        }
        handle
    }

    fn load_contour(&mut self, contour: &Contour) -> HostHandle {
        let handle = self.alloc(Attributes::of_contour(contour));
        for node in contour.nodes() {
            let child = self.alloc(Attributes::Node(node.clone()));
            self.attach(handle, child);
        }
        handle
    }

    fn drop_subtree(&mut self, handle: HostHandle) {
        if let Some(record) = self.records.remove(&handle) {
            for child in record.children {
                self.drop_subtree(child);
            }
        }
    }

    fn record(&self, handle: HostHandle) -> Result<&Record, AdapterError> {
        self.records.get(&handle).ok_or(AdapterError::UnknownHandle(handle))
    }
}

impl Host for MemoryHost {
    fn root(&self) -> HostHandle {
        self.root
    }

    fn children(&self, parent: HostHandle) -> Result<Vec<HostHandle>, AdapterError> {
        Ok(self.record(parent)?.children.clone())
    }

    fn attributes(&self, handle: HostHandle) -> Result<Attributes, AdapterError> {
        Ok(self.record(handle)?.attributes.clone())
    }

    fn set_attributes(&mut self, handle: HostHandle, attributes: Attributes) -> Result<(), AdapterError> {
        let record = self
            .records
            .get_mut(&handle)
            .ok_or(AdapterError::UnknownHandle(handle))?;
        if record.attributes.kind() != attributes.kind() {
            return Err(AdapterError::WrongKind {
                handle,
                expected: record.attributes.kind(),
                actual: attributes.kind(),
            });
        }
        record.attributes = attributes;
        Ok(())
    }

    fn replace_children(
        &mut self,
        parent: HostHandle,
        children: Vec<Attributes>,
    ) -> Result<Vec<HostHandle>, AdapterError> {
        let old = std::mem::take(
            &mut self
                .records
                .get_mut(&parent)
                .ok_or(AdapterError::UnknownHandle(parent))?
                .children,
        );
        for child in old {
            self.drop_subtree(child);
        }

        let handles: Vec<HostHandle> = children.into_iter().map(|a| self.alloc(a)).collect();
        for &handle in &handles {
            self.attach(parent, handle);
        }
        Ok(handles)
    }

    fn notify_changed(&mut self, scope: &str, message: &str) {
        self.notifications.push((scope.to_string(), message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        adapter::HostAdapter,
        model::{Anchor, Eject, Node},
    };

    fn font() -> Font {
        let mut layer = Layer::new("Regular")
            .with_advance(500.0, 1000.0)
            .with_stems(80.0, 60.0)
            .with_shape(Shape::new(vec![Contour::closed(vec![
                Node::on(0.0, 0.0),
                Node::off(0.0, 50.0).with_smooth(true),
                Node::off(50.0, 100.0),
                Node::on(100.0, 100.0),
            ])]));
        layer.add_anchor(Anchor::new("top", 50.0, 100.0)).unwrap();

        let mut font = Font::new("Memory");
        font.masters = vec!["Regular".into()];
        font.insert_glyph(Glyph::new("a").with_unicode(0x61).with_layer(layer));
        font
    }

    #[test]
    fn eject_restores_loaded_font() {
        let source = font();
        let mut host = MemoryHost::new(&source);
        let adapter = HostAdapter::new(&mut host);

        let ejected = adapter.eject_font().unwrap();
        assert!(ejected.glyph("a").unwrap().host.is_some());
        assert_eq!(ejected.eject(), source);
        assert_eq!(adapter.host().masters().unwrap(), vec!["Regular".to_string()]);
    }

    #[test]
    fn glyph_and_layer_lookup() {
        let mut host = MemoryHost::new(&font());
        let glyph = host.glyph("a").unwrap();
        assert!(host.layer(glyph, "Regular").is_ok());
        assert!(matches!(host.layer(glyph, "Bold"), Err(AdapterError::NotFound { .. })));
        assert!(matches!(host.glyph("b"), Err(AdapterError::NotFound { .. })));
        assert_eq!(host.glyph_names().unwrap(), vec!["a".to_string()]);

        let err = host.set_attributes(glyph, Attributes::Node(Node::on(0.0, 0.0)));
        assert!(matches!(err, Err(AdapterError::WrongKind { .. })));
    }

    #[test]
    fn replace_children_drops_old_subtree() {
        let mut host = MemoryHost::new(&font());
        let before = host.len();
        let glyph = host.glyph("a").unwrap();
        let layer = host.layer(glyph, "Regular").unwrap();

        let handles = host.replace_children(layer, vec![]).unwrap();
        assert!(handles.is_empty());
        // shape + contour + 4 nodes
        assert_eq!(host.len(), before - 6);
    }
}
