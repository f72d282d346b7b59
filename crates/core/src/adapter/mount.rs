use log::{debug, info};

use super::{AdapterError, Attributes, Host, HostHandle};
use crate::{
    diagnostics::{Diagnostic, Diagnostics},
    error::{Error, Result},
    model::{Contour, Font, Glyph, Layer, Shape},
};

trait Within<T> {
    fn within(self, context: impl FnOnce() -> String) -> Result<T>;
}

impl<T> Within<T> for std::result::Result<T, AdapterError> {
    fn within(self, context: impl FnOnce() -> String) -> Result<T> {
        self.map_err(|source| Error::adapter(context(), source))
    }
}

/// Outcome of writing a core graph into a host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MountReport {
    /// Objects whose attributes were written in place.
    pub updated: usize,
    /// Child lists that had to be rebuilt.
    pub rebuilt: usize,
    pub diagnostics: Diagnostics,
}

impl MountReport {
    pub fn is_in_place(&self) -> bool {
        self.rebuilt == 0
    }

    fn rebuild(&mut self, scope: String, expected: usize, actual: usize) {
        self.rebuilt += 1;
        self.diagnostics.push(Diagnostic::HostMismatch {
            scope,
            expected,
            actual,
        });
    }
}

/// Translator between a [`Host`] tree and the core model.
///
/// Ejected objects remember the handle they came from in their `host`
/// slot. Use [`crate::model::Eject`] for a copy without them.
pub struct HostAdapter<'h, H: Host> {
    host: &'h mut H,
}

impl<'h, H: Host> HostAdapter<'h, H> {
    pub fn new(host: &'h mut H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &*self.host
    }

    pub fn eject_contour(&self, handle: HostHandle) -> Result<Contour> {
        let context = || format!("ejecting contour {handle}");
        let mut contour = self.host.attributes(handle).and_then(|a| a.into_contour(handle)).within(context)?;
        for child in self.host.children(handle).within(context)? {
            let node = self.host.attributes(child).and_then(|a| a.into_node(child)).within(context)?;
            contour.push(node);
        }
        contour.host = Some(handle);
        Ok(contour)
    }

    pub fn eject_shape(&self, handle: HostHandle) -> Result<Shape> {
        let context = || format!("ejecting shape {handle}");
        let mut shape = self.host.attributes(handle).and_then(|a| a.into_shape(handle)).within(context)?;
        for child in self.host.children(handle).within(context)? {
            shape.push(self.eject_contour(child)?);
        }
        shape.host = Some(handle);
        Ok(shape)
    }

    pub fn eject_layer(&self, handle: HostHandle) -> Result<Layer> {
        let context = || format!("ejecting layer {handle}");
        let mut layer = self.host.attributes(handle).and_then(|a| a.into_layer(handle)).within(context)?;
        for child in self.host.children(handle).within(context)? {
            layer.push(self.eject_shape(child)?);
        }
        layer.host = Some(handle);
        Ok(layer)
    }

    pub fn eject_glyph(&self, handle: HostHandle) -> Result<Glyph> {
        let context = || format!("ejecting glyph {handle}");
        let mut glyph = self.host.attributes(handle).and_then(|a| a.into_glyph(handle)).within(context)?;
        for child in self.host.layers(handle).within(context)? {
            glyph.push(self.eject_layer(child)?);
        }
        glyph.host = Some(handle);
        debug!("Ejected glyph '{}' with {} layers", glyph.name, glyph.len());
        Ok(glyph)
    }

    pub fn eject_glyph_named(&self, name: &str) -> Result<Glyph> {
        let handle = self.host.glyph(name).map_err(|source| match source {
            AdapterError::NotFound { .. } => Error::GlyphNotFound(name.to_string()),
            other => Error::adapter(format!("looking up glyph '{name}'"), other),
        })?;
        self.eject_glyph(handle)
    }

    pub fn eject_font(&self) -> Result<Font> {
        let root = self.host.root();
        let context = || "ejecting font".to_string();
        let mut font = self.host.attributes(root).and_then(|a| a.into_font(root)).within(context)?;
        for child in self.host.children(root).within(context)? {
            font.insert_glyph(self.eject_glyph(child)?);
        }
        font.host = Some(root);
        info!("Ejected font '{}' ({} glyphs)", font.name, font.len());
        Ok(font)
    }

    /// Write `glyph` back to the host object it was ejected from.
    pub fn mount(&mut self, glyph: &Glyph) -> Result<MountReport> {
        let handle = glyph
            .host
            .ok_or_else(|| Error::HostMismatch(format!("glyph '{}' has no host handle", glyph.name)))?;
        self.mount_glyph(handle, glyph)
    }

    /// Write `glyph` into the host glyph at `handle`.
    ///
    /// Levels whose child counts match are updated in place; any level
    /// that differs has its children rebuilt and a diagnostic recorded.
    pub fn mount_glyph(&mut self, handle: HostHandle, glyph: &Glyph) -> Result<MountReport> {
        let mut report = MountReport::default();
        let context = || format!("mounting glyph '{}' into {handle}", glyph.name);

        self.host.set_attributes(handle, Attributes::of_glyph(glyph)).within(context)?;
        report.updated += 1;

        let children = self.host.layers(handle).within(context)?;
        if children.len() == glyph.len() {
            for (&child, layer) in children.iter().zip(glyph.iter()) {
                self.mount_layer_into(child, layer, &mut report)?;
            }
        } else {
            report.rebuild(format!("glyph '{}'", glyph.name), glyph.len(), children.len());
            let attributes = glyph.iter().map(Attributes::of_layer).collect();
            let handles = self.host.replace_children(handle, attributes).within(context)?;
            for (&child, layer) in handles.iter().zip(glyph.iter()) {
                self.rebuild_shapes(child, layer.shapes())?;
            }
        }

        self.host.notify_changed("glyph", &format!("Mounted glyph '{}'", glyph.name));
        debug!(
            "Mounted glyph '{}': {} updated, {} rebuilt",
            glyph.name, report.updated, report.rebuilt
        );
        Ok(report)
    }

    /// Write `layer` into the host layer at `handle`.
    pub fn mount_layer(&mut self, handle: HostHandle, layer: &Layer) -> Result<MountReport> {
        let mut report = MountReport::default();
        self.mount_layer_into(handle, layer, &mut report)?;
        self.host.notify_changed("layer", &format!("Mounted layer '{}'", layer.name));
        Ok(report)
    }

    fn mount_layer_into(&mut self, handle: HostHandle, layer: &Layer, report: &mut MountReport) -> Result<()> {
        let context = || format!("mounting layer '{}' into {handle}", layer.name);
        self.host.set_attributes(handle, Attributes::of_layer(layer)).within(context)?;
        report.updated += 1;

        let children = self.host.children(handle).within(context)?;
        if children.len() == layer.len() {
            for (&child, shape) in children.iter().zip(layer.iter()) {
                self.mount_shape_into(child, shape, report)?;
            }
        } else {
            report.rebuild(format!("layer '{}'", layer.name), layer.len(), children.len());
            self.rebuild_shapes(handle, layer.shapes())?;
        }
        Ok(())
    }

    fn mount_shape_into(&mut self, handle: HostHandle, shape: &Shape, report: &mut MountReport) -> Result<()> {
        let context = || format!("mounting shape into {handle}");
        self.host.set_attributes(handle, Attributes::of_shape(shape)).within(context)?;
        report.updated += 1;

        let children = self.host.children(handle).within(context)?;
        if children.len() == shape.len() {
            for (&child, contour) in children.iter().zip(shape.iter()) {
                self.mount_contour_into(child, contour, report)?;
            }
        } else {
            report.rebuild(format!("shape {handle}"), shape.len(), children.len());
            self.rebuild_contours(handle, shape.contours())?;
        }
        Ok(())
    }

    fn mount_contour_into(
        &mut self,
        handle: HostHandle,
        contour: &Contour,
        report: &mut MountReport,
    ) -> Result<()> {
        let context = || format!("mounting contour into {handle}");
        self.host.set_attributes(handle, Attributes::of_contour(contour)).within(context)?;
        report.updated += 1;

        let children = self.host.children(handle).within(context)?;
        if children.len() == contour.len() {
            for (&child, node) in children.iter().zip(contour.iter()) {
                self.host.set_attributes(child, Attributes::Node(node.clone())).within(context)?;
            }
            report.updated += children.len();
        } else {
            report.rebuild(format!("contour {handle}"), contour.len(), children.len());
            self.rebuild_nodes(handle, contour)?;
        }
        Ok(())
    }

    fn rebuild_shapes(&mut self, parent: HostHandle, shapes: &[Shape]) -> Result<()> {
        let attributes = shapes.iter().map(Attributes::of_shape).collect();
        let handles = self
            .host
            .replace_children(parent, attributes)
            .within(|| format!("rebuilding shapes of {parent}"))?;
        for (&handle, shape) in handles.iter().zip(shapes) {
            self.rebuild_contours(handle, shape.contours())?;
        }
        Ok(())
    }

    fn rebuild_contours(&mut self, parent: HostHandle, contours: &[Contour]) -> Result<()> {
        let attributes = contours.iter().map(Attributes::of_contour).collect();
        let handles = self
            .host
            .replace_children(parent, attributes)
            .within(|| format!("rebuilding contours of {parent}"))?;
        for (&handle, contour) in handles.iter().zip(contours) {
            self.rebuild_nodes(handle, contour)?;
        }
        Ok(())
    }

    fn rebuild_nodes(&mut self, parent: HostHandle, contour: &Contour) -> Result<()> {
        let attributes = contour.iter().cloned().map(Attributes::Node).collect();
        self.host
            .replace_children(parent, attributes)
            .within(|| format!("rebuilding nodes of {parent}"))?;
        Ok(())
    }
}
