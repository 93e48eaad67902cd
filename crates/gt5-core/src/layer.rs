//! Layer model: ordered, toggleable groupings that strokes belong to.

use crate::error::{DrawingError, DrawingResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a layer. Never reused within a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    /// Display name of the layer.
    pub name: String,
    pub visible: bool,
    /// Locked layers reject new strokes.
    pub locked: bool,
    /// New strokes go to the active layer.
    pub active: bool,
}

impl Layer {
    pub fn new(id: LayerId) -> Self {
        Self {
            id,
            name: format!("Layer {}", id.0),
            visible: true,
            locked: false,
            active: false,
        }
    }
}

/// Ordered list of layers, bottom to top.
///
/// Always holds at least one layer, and exactly one of them is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerStack {
    layers: Vec<Layer>,
    next_id: u32,
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStack {
    /// A stack holding `Layer 1`, active.
    pub fn new() -> Self {
        let mut first = Layer::new(LayerId(1));
        first.active = true;
        Self {
            layers: vec![first],
            next_id: 2,
        }
    }

    /// Rebuild a stack from stored layers, checking the invariants.
    pub fn from_layers(layers: Vec<Layer>, next_id: u32) -> DrawingResult<Self> {
        if layers.is_empty() {
            return Err(DrawingError::InvalidDocument("no layers".to_string()));
        }
        let active = layers.iter().filter(|l| l.active).count();
        if active != 1 {
            return Err(DrawingError::InvalidDocument(format!(
                "expected exactly one active layer, found {active}"
            )));
        }
        let max_id = layers.iter().map(|l| l.id.0).max().unwrap_or(0);
        for (i, layer) in layers.iter().enumerate() {
            if layers[..i].iter().any(|l| l.id == layer.id) {
                return Err(DrawingError::InvalidDocument(format!(
                    "duplicate layer id {}",
                    layer.id
                )));
            }
        }
        let after_max = max_id.checked_add(1).ok_or_else(|| {
            DrawingError::InvalidDocument(format!("layer id {max_id} is out of range"))
        })?;
        Ok(Self {
            layers,
            next_id: next_id.max(after_max),
        })
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn as_slice(&self) -> &[Layer] {
        &self.layers
    }

    /// Id the next added layer will get.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    fn get_mut(&mut self, id: LayerId) -> DrawingResult<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(DrawingError::UnknownLayer(id))
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.get(id).is_some()
    }

    pub fn active(&self) -> Option<&Layer> {
        self.layers.iter().find(|l| l.active)
    }

    pub fn is_visible(&self, id: LayerId) -> bool {
        self.get(id).is_some_and(|l| l.visible)
    }

    /// Append a new layer on top and make it the only active one.
    pub fn add(&mut self) -> DrawingResult<LayerId> {
        let id = LayerId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(DrawingError::LayerIdsExhausted)?;

        for layer in &mut self.layers {
            layer.active = false;
        }
        let mut layer = Layer::new(id);
        layer.active = true;
        self.layers.push(layer);
        Ok(id)
    }

    /// Flip visibility; returns the new value.
    pub fn toggle_visibility(&mut self, id: LayerId) -> DrawingResult<bool> {
        let layer = self.get_mut(id)?;
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }

    /// Flip the lock; returns the new value.
    pub fn toggle_lock(&mut self, id: LayerId) -> DrawingResult<bool> {
        let layer = self.get_mut(id)?;
        layer.locked = !layer.locked;
        Ok(layer.locked)
    }

    pub fn set_active(&mut self, id: LayerId) -> DrawingResult<()> {
        if !self.contains(id) {
            return Err(DrawingError::UnknownLayer(id));
        }
        for layer in &mut self.layers {
            layer.active = layer.id == id;
        }
        Ok(())
    }

    /// Remove a layer.
    ///
    /// With a single layer left this does nothing and returns `Ok(None)`.
    /// Removing the active layer promotes the topmost remaining layer.
    pub fn remove(&mut self, id: LayerId) -> DrawingResult<Option<Layer>> {
        if self.layers.len() <= 1 {
            return Ok(None);
        }
        let index = self
            .layers
            .iter()
            .position(|l| l.id == id)
            .ok_or(DrawingError::UnknownLayer(id))?;

        let removed = self.layers.remove(index);
        if removed.active {
            let last = self.layers.len() - 1;
            for (i, layer) in self.layers.iter_mut().enumerate() {
                layer.active = i == last;
            }
        }
        Ok(Some(removed))
    }
}
