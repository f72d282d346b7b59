use kurbo::Rect;

use super::{Layer, Outline};
use crate::{
    adapter::HostHandle,
    error::{Error, Result},
    geometry::union_bounds,
};

/// A glyph with its ordered layers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Glyph {
    pub name: String,
    pub unicodes: Vec<u32>,
    pub mark: Option<String>,
    pub tags: Vec<String>,
    layers: Vec<Layer>,
    active: Option<usize>,
    pub host: Option<HostHandle>,
}

impl Glyph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn with_unicode(mut self, unicode: u32) -> Self {
        self.unicodes.push(unicode);
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.name == name)
    }

    /// Look up a layer, failing with [`Error::LayerNotFound`].
    pub fn require_layer(&self, name: &str) -> Result<&Layer> {
        self.layer(name)
            .ok_or_else(|| Error::LayerNotFound(format!("{}/{}", self.name, name)))
    }

    pub fn masters(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.is_master())
    }

    pub fn insert(&mut self, index: usize, layer: Layer) -> Result<()> {
        if index > self.layers.len() {
            return Err(self.out_of_bounds(index));
        }
        self.layers.insert(index, layer);
        if let Some(active) = self.active.as_mut().filter(|a| **a >= index) {
            *active += 1;
        }
        Ok(())
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn remove(&mut self, index: usize) -> Result<Layer> {
        if index >= self.layers.len() {
            return Err(self.out_of_bounds(index));
        }
        self.active = match self.active {
            Some(active) if active == index => None,
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
        Ok(self.layers.remove(index))
    }

    /// Replace the layer with the same name, or append it.
    ///
    /// Returns the replaced layer, if any.
    pub fn set_layer(&mut self, layer: Layer) -> Option<Layer> {
        match self.layers.iter_mut().find(|l| l.name == layer.name) {
            Some(slot) => Some(std::mem::replace(slot, layer)),
            None => {
                self.layers.push(layer);
                None
            }
        }
    }

    fn out_of_bounds(&self, index: usize) -> Error {
        Error::IndexOutOfBounds {
            container: "glyph",
            index,
            len: self.layers.len(),
        }
    }

    /// Attributes only, without layers.
    pub(crate) fn shallow_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            unicodes: self.unicodes.clone(),
            mark: self.mark.clone(),
            tags: self.tags.clone(),
            layers: Vec::new(),
            active: None,
            host: self.host,
        }
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.layers.get(self.active?)
    }

    /// Make the named layer the single active layer.
    pub fn set_active(&mut self, name: &str) -> Result<()> {
        let index = self
            .layers
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| Error::LayerNotFound(format!("{}/{}", self.name, name)))?;
        self.active = Some(index);
        Ok(())
    }

    /// Union of all master-layer bounds.
    pub fn bounding_box(&self) -> Option<Rect> {
        union_bounds(self.masters().map(|l| l.bounding_box()))
    }
}

impl<'a> IntoIterator for &'a Glyph {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}
