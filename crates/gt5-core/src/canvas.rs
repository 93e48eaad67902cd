//! Drawing state and pointer-driven canvas input.

use crate::config::DrawingConfig;
use crate::error::{DrawingError, DrawingResult};
use crate::history::History;
use crate::layer::{Layer, LayerId, LayerStack};
use crate::shortcuts::{KeyInput, ShortcutAction};
use crate::stroke::{Stroke, shape_outline};
use crate::style::SerializableColor;
use crate::tools::{ToolKind, ToolState};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Canvas dimensions in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Serializable form of a drawing: what gets saved and loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingData {
    pub canvas_size: CanvasSize,
    pub layers: Vec<Layer>,
    pub lines: Vec<Stroke>,
    /// Id the next added layer will get.
    #[serde(default)]
    pub next_layer_id: u32,
}

/// The drawing state: current tool and style, layers, strokes and history.
///
/// Layers are not part of history; undo and redo only restore strokes.
#[derive(Debug, Clone)]
pub struct DrawingStore {
    config: DrawingConfig,
    tool: ToolKind,
    color: SerializableColor,
    brush_size: f64,
    canvas_size: CanvasSize,
    layers: LayerStack,
    lines: Vec<Stroke>,
    history: History,
}

impl Default for DrawingStore {
    fn default() -> Self {
        Self::new(DrawingConfig::default())
    }
}

impl DrawingStore {
    pub fn new(config: DrawingConfig) -> Self {
        Self {
            tool: config.default_tool,
            color: config.default_color,
            brush_size: config.clamp_brush_size(config.default_brush_size),
            canvas_size: CanvasSize::new(config.canvas_width, config.canvas_height),
            layers: LayerStack::new(),
            lines: Vec::new(),
            history: History::with_limit(config.history_limit),
            config,
        }
    }

    /// Restore a saved drawing. History starts with the loaded strokes.
    pub fn from_data(data: DrawingData, config: DrawingConfig) -> DrawingResult<Self> {
        let layers = LayerStack::from_layers(data.layers, data.next_layer_id)?;
        if data.canvas_size.width == 0 || data.canvas_size.height == 0 {
            return Err(DrawingError::InvalidDocument(
                "canvas size must be non-zero".to_string(),
            ));
        }

        let mut store = Self::new(config);
        store.layers = layers;
        store.canvas_size = data.canvas_size;
        store.lines = data.lines;
        store.history.push(&store.lines);
        log::debug!(
            "Loaded drawing with {} strokes on {} layers",
            store.lines.len(),
            store.layers.len()
        );
        Ok(store)
    }

    pub fn to_data(&self) -> DrawingData {
        DrawingData {
            canvas_size: self.canvas_size,
            layers: self.layers.as_slice().to_vec(),
            lines: self.lines.clone(),
            next_layer_id: self.layers.next_id(),
        }
    }

    pub fn config(&self) -> &DrawingConfig {
        &self.config
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        log::debug!("Tool: {tool}");
        self.tool = tool;
    }

    pub fn color(&self) -> SerializableColor {
        self.color
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.color = color;
    }

    pub fn brush_size(&self) -> f64 {
        self.brush_size
    }

    /// Set the brush size, clamped into the configured range.
    pub fn set_brush_size(&mut self, size: f64) {
        self.brush_size = self.config.clamp_brush_size(size);
    }

    pub fn grow_brush(&mut self) {
        self.set_brush_size(self.brush_size + self.config.brush_step);
    }

    pub fn shrink_brush(&mut self) {
        self.set_brush_size(self.brush_size - self.config.brush_step);
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas_size
    }

    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        self.canvas_size = CanvasSize::new(size.width.max(1), size.height.max(1));
    }

    /// Size the canvas to fit a container, leaving the configured margin.
    pub fn fit_to_container(&mut self, width: u32, height: u32) {
        let margin = self.config.container_margin;
        let size = CanvasSize::new(
            width.saturating_sub(margin).min(self.config.max_canvas_width),
            height.saturating_sub(margin).min(self.config.max_canvas_height),
        );
        self.set_canvas_size(size);
        log::debug!(
            "Canvas resized to {}x{}",
            self.canvas_size.width,
            self.canvas_size.height
        );
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.layers.active()
    }

    /// All strokes in insertion order.
    pub fn lines(&self) -> &[Stroke] {
        &self.lines
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Append a stroke and record a history entry. Returns the stroke index.
    pub fn add_line(&mut self, stroke: Stroke) -> DrawingResult<usize> {
        if !self.layers.contains(stroke.layer_id) {
            log::warn!("Rejected stroke for unknown layer {}", stroke.layer_id);
            return Err(DrawingError::UnknownLayer(stroke.layer_id));
        }
        self.lines.push(stroke);
        self.history.push(&self.lines);
        Ok(self.lines.len() - 1)
    }

    /// Replace the points of stroke `index`.
    ///
    /// No new history entry is recorded; the current entry is amended so it
    /// reflects the stroke as it now stands.
    pub fn update_line(&mut self, index: usize, points: Vec<Point>) -> DrawingResult<()> {
        let len = self.lines.len();
        let stroke = self
            .lines
            .get_mut(index)
            .ok_or(DrawingError::StrokeOutOfRange { index, len })?;
        stroke.points = points;
        self.history.amend(&self.lines);
        Ok(())
    }

    /// Add a layer on top and make it active.
    pub fn add_layer(&mut self) -> DrawingResult<LayerId> {
        let id = self.layers.add()?;
        log::debug!("Added layer {id}");
        Ok(id)
    }

    pub fn toggle_layer_visibility(&mut self, id: LayerId) -> DrawingResult<bool> {
        self.layers.toggle_visibility(id)
    }

    pub fn toggle_layer_lock(&mut self, id: LayerId) -> DrawingResult<bool> {
        self.layers.toggle_lock(id)
    }

    pub fn set_active_layer(&mut self, id: LayerId) -> DrawingResult<()> {
        self.layers.set_active(id)
    }

    /// Delete a layer along with its strokes.
    ///
    /// Does nothing when it is the only layer left.
    pub fn delete_layer(&mut self, id: LayerId) -> DrawingResult<Option<Layer>> {
        let Some(removed) = self.layers.remove(id)? else {
            log::debug!("Kept layer {id}: last layer");
            return Ok(None);
        };

        let before = self.lines.len();
        self.lines.retain(|s| s.layer_id != id);
        self.history.push(&self.lines);
        log::debug!(
            "Deleted layer {id} and {} strokes",
            before - self.lines.len()
        );
        Ok(Some(removed))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Step back one history entry. Returns true if the strokes changed.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.lines = snapshot.to_vec();
                log::debug!("Undo: {} strokes", self.lines.len());
                true
            }
            None => false,
        }
    }

    /// Step forward one history entry. Returns true if the strokes changed.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.lines = snapshot.to_vec();
                log::debug!("Redo: {} strokes", self.lines.len());
                true
            }
            None => false,
        }
    }

    /// Strokes on visible layers, bottom layer first.
    ///
    /// Within a layer strokes keep insertion order. Strokes whose layer no
    /// longer exists are skipped.
    pub fn visible_strokes(&self) -> Vec<&Stroke> {
        self.layers
            .iter()
            .filter(|layer| layer.visible)
            .flat_map(|layer| self.lines.iter().filter(move |s| s.layer_id == layer.id))
            .collect()
    }

    /// Topmost visible painted stroke under `point`. Eraser strokes are skipped.
    pub fn stroke_at(&self, point: Point, tolerance: f64) -> Option<&Stroke> {
        self.visible_strokes()
            .into_iter()
            .rev()
            .find(|s| !s.is_eraser() && s.hit_test(point, tolerance))
    }
}

/// Pointer input delivered to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
}

/// Canvas runtime: the drawing store plus the in-progress interaction.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    store: DrawingStore,
    state: ToolState,
}

impl Canvas {
    pub fn new(config: DrawingConfig) -> Self {
        Self::with_store(DrawingStore::new(config))
    }

    pub fn with_store(store: DrawingStore) -> Self {
        Self {
            store,
            state: ToolState::Idle,
        }
    }

    pub fn store(&self) -> &DrawingStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DrawingStore {
        &mut self.store
    }

    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> DrawingResult<()> {
        match event {
            PointerEvent::Down { x, y } => self.handle_pointer_down(Point::new(x, y)),
            PointerEvent::Move { x, y } => self.handle_pointer_move(Point::new(x, y)),
            PointerEvent::Up { x, y } => {
                self.handle_pointer_up(Point::new(x, y));
                Ok(())
            }
        }
    }

    /// Start a stroke on the active layer, or sample a color with the eyedropper.
    pub fn handle_pointer_down(&mut self, point: Point) -> DrawingResult<()> {
        if self.state.is_drawing() {
            self.handle_pointer_up(point);
        }

        let tool = self.store.tool();
        if tool == ToolKind::Eyedropper {
            let tolerance = self.store.config().hit_tolerance;
            if let Some(color) = self.store.stroke_at(point, tolerance).map(|s| s.color) {
                log::debug!("Picked color {color}");
                self.store.set_color(color);
            }
            return Ok(());
        }
        if !tool.creates_stroke() {
            return Ok(());
        }

        let layer = self.store.active_layer().ok_or_else(|| {
            log::warn!("Pointer down with no active layer");
            DrawingError::NoActiveLayer
        })?;
        if layer.locked {
            log::warn!("Pointer down on locked layer {}", layer.id);
            return Err(DrawingError::LayerLocked(layer.id));
        }

        let stroke = Stroke::new(
            tool,
            point,
            self.store.color(),
            self.store.brush_size(),
            layer.id,
        );
        let stroke_index = self.store.add_line(stroke)?;
        self.state = ToolState::Drawing {
            start: point,
            stroke_index,
        };
        Ok(())
    }

    /// Extend the stroke being drawn. Ignored while idle.
    pub fn handle_pointer_move(&mut self, point: Point) -> DrawingResult<()> {
        let ToolState::Drawing {
            start,
            stroke_index,
        } = self.state
        else {
            return Ok(());
        };

        let len = self.store.lines().len();
        let stroke = self
            .store
            .lines()
            .get(stroke_index)
            .ok_or(DrawingError::StrokeOutOfRange {
                index: stroke_index,
                len,
            })?;

        let points = match shape_outline(stroke.tool, start, point) {
            Some(outline) => outline,
            None => {
                let mut points = stroke.points.clone();
                points.push(point);
                points
            }
        };
        self.store.update_line(stroke_index, points)
    }

    /// Finish the stroke being drawn. Returns its index.
    pub fn handle_pointer_up(&mut self, _point: Point) -> Option<usize> {
        match std::mem::take(&mut self.state) {
            ToolState::Drawing { stroke_index, .. } => {
                log::debug!("Finished stroke {stroke_index}");
                Some(stroke_index)
            }
            ToolState::Idle => None,
        }
    }

    /// End the drag in progress, if any.
    fn end_drag(&mut self) {
        if let ToolState::Drawing { stroke_index, .. } = std::mem::take(&mut self.state) {
            log::debug!("Drag on stroke {stroke_index} ended by a history change");
        }
    }

    /// Undo, ending any drag first so no stroke index outlives its stroke.
    pub fn undo(&mut self) -> bool {
        self.end_drag();
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.end_drag();
        self.store.redo()
    }

    /// Delete a layer, ending any drag first.
    pub fn delete_layer(&mut self, id: LayerId) -> DrawingResult<Option<Layer>> {
        self.end_drag();
        self.store.delete_layer(id)
    }

    /// Refit the canvas to a resized container.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.store.fit_to_container(width, height);
    }

    /// Apply a keyboard shortcut. Returns the action taken, if any.
    pub fn handle_key(&mut self, input: &KeyInput) -> Option<ShortcutAction> {
        let action = ShortcutAction::from_key(input)?;
        match action {
            ShortcutAction::SelectTool(tool) => self.store.set_tool(tool),
            ShortcutAction::Undo => {
                if !self.undo() {
                    return None;
                }
            }
            ShortcutAction::Redo => {
                if !self.redo() {
                    return None;
                }
            }
            ShortcutAction::GrowBrush => self.store.grow_brush(),
            ShortcutAction::ShrinkBrush => self.store.shrink_brush(),
        }
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black() -> SerializableColor {
        SerializableColor::black()
    }

    fn dot(x: f64, layer: LayerId) -> Stroke {
        Stroke::new(ToolKind::Brush, Point::new(x, 0.0), black(), 5.0, layer)
    }

    #[test]
    fn test_defaults() {
        let store = DrawingStore::default();
        assert_eq!(store.tool(), ToolKind::Brush);
        assert_eq!(store.color().to_hex(), "#FF5722");
        assert_eq!(store.brush_size(), 10.0);
        assert_eq!(store.canvas_size(), CanvasSize::new(800, 600));
        assert_eq!(store.layers().len(), 1);
        assert!(store.lines().is_empty());
        assert_eq!(store.history().index(), None);
    }

    #[test]
    fn test_add_line_grows_history_by_one() {
        let mut store = DrawingStore::default();
        for n in 1..=6 {
            store.add_line(dot(n as f64, LayerId(1))).unwrap();
            assert_eq!(store.history().len(), n);
            assert_eq!(store.history().index(), Some(n - 1));
        }
    }

    #[test]
    fn test_add_line_rejects_unknown_layer() {
        let mut store = DrawingStore::default();
        let err = store.add_line(dot(0.0, LayerId(9))).unwrap_err();
        assert_eq!(err, DrawingError::UnknownLayer(LayerId(9)));
        assert!(store.lines().is_empty());
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_single_stroke_scenario() {
        let mut store = DrawingStore::default();
        store.add_line(dot(0.0, LayerId(1))).unwrap();
        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.history().len(), 1);

        // First entry cannot be undone
        assert!(!store.undo());
        assert_eq!(store.lines().len(), 1);

        store.add_line(dot(10.0, LayerId(1))).unwrap();
        assert!(store.undo());
        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.lines()[0].points, vec![Point::new(0.0, 0.0)]);
    }

    #[test]
    fn test_undo_then_redo_restores_lines() {
        let mut store = DrawingStore::default();
        for n in 0..4 {
            store.add_line(dot(n as f64, LayerId(1))).unwrap();
            store
                .update_line(n, vec![Point::new(n as f64, 0.0), Point::new(n as f64, 9.0)])
                .unwrap();
        }
        let before = store.lines().to_vec();
        assert!(store.undo());
        assert!(store.redo());
        assert_eq!(store.lines(), before.as_slice());
    }

    #[test]
    fn test_update_line_out_of_range() {
        let mut store = DrawingStore::default();
        store.add_line(dot(0.0, LayerId(1))).unwrap();
        let before = store.lines().to_vec();

        let err = store.update_line(3, vec![Point::ZERO]).unwrap_err();
        assert_eq!(err, DrawingError::StrokeOutOfRange { index: 3, len: 1 });
        assert_eq!(store.lines(), before.as_slice());
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_update_line_does_not_push_history() {
        let mut store = DrawingStore::default();
        store.add_line(dot(0.0, LayerId(1))).unwrap();
        store
            .update_line(0, vec![Point::ZERO, Point::new(5.0, 5.0)])
            .unwrap();
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history().current().unwrap()[0].points.len(), 2);
    }

    #[test]
    fn test_delete_sole_layer_is_noop() {
        let mut store = DrawingStore::default();
        store.add_line(dot(0.0, LayerId(1))).unwrap();
        assert_eq!(store.delete_layer(LayerId(1)), Ok(None));
        assert_eq!(store.layers().len(), 1);
        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_delete_active_layer_removes_its_strokes() {
        let mut store = DrawingStore::default();
        store.add_line(dot(0.0, LayerId(1))).unwrap();
        let second = store.add_layer().unwrap();
        store.add_line(dot(1.0, second)).unwrap();
        let third = store.add_layer().unwrap();
        store.set_active_layer(second).unwrap();

        let removed = store.delete_layer(second).unwrap().unwrap();
        assert_eq!(removed.id, second);
        assert_eq!(store.active_layer().unwrap().id, third);
        assert_eq!(store.layers().iter().filter(|l| l.active).count(), 1);
        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.history().len(), 3);

        // Undo brings the strokes back, but their layer is gone
        assert!(store.undo());
        assert_eq!(store.lines().len(), 2);
        assert_eq!(store.visible_strokes().len(), 1);
    }

    #[test]
    fn test_layer_ops_reject_unknown_ids() {
        let mut store = DrawingStore::default();
        store.add_layer().unwrap();
        let unknown = LayerId(77);
        assert!(store.toggle_layer_visibility(unknown).is_err());
        assert!(store.toggle_layer_lock(unknown).is_err());
        assert!(store.set_active_layer(unknown).is_err());
        assert_eq!(
            store.delete_layer(unknown),
            Err(DrawingError::UnknownLayer(unknown))
        );
    }

    #[test]
    fn test_visible_strokes_in_layer_order() {
        let mut store = DrawingStore::default();
        let top = store.add_layer().unwrap();
        store.add_line(dot(1.0, top)).unwrap();
        store.add_line(dot(2.0, LayerId(1))).unwrap();
        store.add_line(dot(3.0, top)).unwrap();

        let xs: Vec<f64> = store
            .visible_strokes()
            .iter()
            .map(|s| s.points[0].x)
            .collect();
        assert_eq!(xs, vec![2.0, 1.0, 3.0]);

        store.toggle_layer_visibility(top).unwrap();
        assert_eq!(store.visible_strokes().len(), 1);
    }

    #[test]
    fn test_brush_size_clamped() {
        let mut store = DrawingStore::default();
        store.set_brush_size(500.0);
        assert_eq!(store.brush_size(), 100.0);
        store.grow_brush();
        assert_eq!(store.brush_size(), 100.0);
        store.set_brush_size(3.0);
        store.shrink_brush();
        assert_eq!(store.brush_size(), 1.0);
        store.grow_brush();
        assert_eq!(store.brush_size(), 6.0);
    }

    #[test]
    fn test_fit_to_container() {
        let mut store = DrawingStore::default();
        store.fit_to_container(1000, 500);
        assert_eq!(store.canvas_size(), CanvasSize::new(960, 460));
        store.fit_to_container(3000, 2000);
        assert_eq!(store.canvas_size(), CanvasSize::new(1200, 800));
        store.fit_to_container(10, 10);
        assert_eq!(store.canvas_size(), CanvasSize::new(1, 1));
    }

    #[test]
    fn test_data_round_trip() {
        let mut store = DrawingStore::default();
        let top = store.add_layer().unwrap();
        store.add_line(dot(1.0, top)).unwrap();
        store.delete_layer(LayerId(1)).unwrap();

        let json = serde_json::to_string(&store.to_data()).unwrap();
        let data: DrawingData = serde_json::from_str(&json).unwrap();
        let loaded = DrawingStore::from_data(data, DrawingConfig::default()).unwrap();

        assert_eq!(loaded.lines(), store.lines());
        assert_eq!(loaded.layers(), store.layers());
        assert_eq!(loaded.history().len(), 1);
        assert_eq!(loaded.layers().next_id(), 3);
    }

    #[test]
    fn test_from_data_rejects_bad_layers() {
        let data = DrawingData {
            canvas_size: CanvasSize::new(800, 600),
            layers: Vec::new(),
            lines: Vec::new(),
            next_layer_id: 1,
        };
        let err = DrawingStore::from_data(data, DrawingConfig::default()).unwrap_err();
        assert!(matches!(err, DrawingError::InvalidDocument(_)));
    }

    #[test]
    fn test_from_data_rejects_exhausted_layer_ids() {
        let mut data = DrawingStore::default().to_data();
        data.layers[0].id = LayerId(u32::MAX);
        let err = DrawingStore::from_data(data, DrawingConfig::default()).unwrap_err();
        assert!(matches!(err, DrawingError::InvalidDocument(_)));

        let mut data = DrawingStore::default().to_data();
        data.next_layer_id = u32::MAX;
        let mut store = DrawingStore::from_data(data, DrawingConfig::default()).unwrap();
        assert_eq!(store.add_layer(), Err(DrawingError::LayerIdsExhausted));
        assert_eq!(store.layers().len(), 1);
    }

    #[test]
    fn test_history_limit_from_config() {
        let config = DrawingConfig {
            history_limit: Some(3),
            ..DrawingConfig::default()
        };
        let mut store = DrawingStore::new(config);
        for x in 0..6 {
            store.add_line(dot(x as f64, LayerId(1))).unwrap();
        }
        assert_eq!(store.history().len(), 3);
        while store.undo() {}
        assert_eq!(store.lines().len(), 4);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_pointer_drag_draws_freehand_stroke() {
        let mut canvas = Canvas::default();
        canvas.handle_pointer_down(Point::new(0.0, 0.0)).unwrap();
        canvas.handle_pointer_move(Point::new(5.0, 0.0)).unwrap();
        canvas.handle_pointer_move(Point::new(10.0, 5.0)).unwrap();
        assert_eq!(canvas.handle_pointer_up(Point::new(10.0, 5.0)), Some(0));

        let lines = canvas.store().lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].points.len(), 3);
        assert_eq!(lines[0].tool, ToolKind::Brush);
        assert_eq!(lines[0].size, 10.0);
        assert_eq!(canvas.store().history().len(), 1);
        assert!(!canvas.state().is_drawing());
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut canvas = Canvas::default();
        canvas.handle_pointer_move(Point::new(5.0, 5.0)).unwrap();
        assert!(canvas.store().lines().is_empty());
        assert_eq!(canvas.handle_pointer_up(Point::ZERO), None);
    }

    #[test]
    fn test_shape_tool_regenerates_outline() {
        let mut canvas = Canvas::default();
        canvas.store_mut().set_tool(ToolKind::Rectangle);
        canvas.handle_pointer_down(Point::new(0.0, 0.0)).unwrap();
        canvas.handle_pointer_move(Point::new(50.0, 50.0)).unwrap();
        canvas.handle_pointer_move(Point::new(20.0, 10.0)).unwrap();
        canvas.handle_pointer_up(Point::new(20.0, 10.0));

        let stroke = &canvas.store().lines()[0];
        assert_eq!(stroke.points.len(), 5);
        assert_eq!(stroke.bounds(), kurbo::Rect::new(0.0, 0.0, 20.0, 10.0));
    }

    #[test]
    fn test_locked_layer_rejects_input() {
        let mut canvas = Canvas::default();
        canvas.store_mut().toggle_layer_lock(LayerId(1)).unwrap();
        let err = canvas.handle_pointer_down(Point::ZERO).unwrap_err();
        assert_eq!(err, DrawingError::LayerLocked(LayerId(1)));
        assert!(canvas.store().lines().is_empty());
        assert!(!canvas.state().is_drawing());
    }

    #[test]
    fn test_eyedropper_picks_topmost_color() {
        let mut canvas = Canvas::default();
        let red = SerializableColor::new(255, 0, 0, 255);
        let blue = SerializableColor::new(0, 0, 255, 255);
        for color in [red, blue] {
            canvas.store_mut().set_color(color);
            canvas.handle_pointer_down(Point::new(0.0, 0.0)).unwrap();
            canvas.handle_pointer_move(Point::new(100.0, 0.0)).unwrap();
            canvas.handle_pointer_up(Point::new(100.0, 0.0));
        }

        canvas.store_mut().set_tool(ToolKind::Eyedropper);
        canvas.store_mut().set_color(black());
        canvas.handle_pointer_down(Point::new(50.0, 1.0)).unwrap();
        assert_eq!(canvas.store().color(), blue);
        assert_eq!(canvas.store().lines().len(), 2);

        canvas.handle_pointer_down(Point::new(50.0, 80.0)).unwrap();
        assert_eq!(canvas.store().color(), blue);
    }

    #[test]
    fn test_hand_and_text_do_not_draw() {
        let mut canvas = Canvas::default();
        for tool in [ToolKind::Hand, ToolKind::Text] {
            canvas.store_mut().set_tool(tool);
            canvas.handle_pointer_down(Point::ZERO).unwrap();
            canvas.handle_pointer_move(Point::new(1.0, 1.0)).unwrap();
        }
        assert!(canvas.store().lines().is_empty());
    }

    #[test]
    fn test_key_shortcuts() {
        let mut canvas = Canvas::default();
        canvas.handle_key(&KeyInput::new("e"));
        assert_eq!(canvas.store().tool(), ToolKind::Eraser);

        canvas.handle_key(&KeyInput::new("]"));
        assert_eq!(canvas.store().brush_size(), 15.0);
        canvas.handle_key(&KeyInput::new("["));
        canvas.handle_key(&KeyInput::new("["));
        assert_eq!(canvas.store().brush_size(), 5.0);

        canvas.handle_pointer_down(Point::ZERO).unwrap();
        canvas.handle_pointer_up(Point::ZERO);
        canvas.handle_pointer_down(Point::new(1.0, 1.0)).unwrap();
        canvas.handle_pointer_up(Point::new(1.0, 1.0));

        let undo = KeyInput::new("z").with_ctrl();
        assert_eq!(canvas.handle_key(&undo), Some(ShortcutAction::Undo));
        assert_eq!(canvas.store().lines().len(), 1);
        assert_eq!(canvas.handle_key(&undo), None);

        let redo = KeyInput::new("y").with_meta();
        assert_eq!(canvas.handle_key(&redo), Some(ShortcutAction::Redo));
        assert_eq!(canvas.store().lines().len(), 2);
    }

    #[test]
    fn test_undo_mid_drag_ends_stroke() {
        let mut canvas = Canvas::default();
        canvas.handle_pointer_down(Point::ZERO).unwrap();
        canvas.handle_pointer_up(Point::ZERO);
        canvas.handle_pointer_down(Point::new(1.0, 1.0)).unwrap();
        canvas.handle_key(&KeyInput::new("z").with_ctrl());
        assert!(!canvas.state().is_drawing());
        canvas.handle_pointer_move(Point::new(2.0, 2.0)).unwrap();
        assert_eq!(canvas.store().lines().len(), 1);
    }

    #[test]
    fn test_history_calls_end_drag() {
        let mut canvas = Canvas::default();
        canvas.handle_pointer_down(Point::ZERO).unwrap();
        canvas.handle_pointer_up(Point::ZERO);
        canvas.handle_pointer_down(Point::new(1.0, 1.0)).unwrap();
        assert!(canvas.undo());
        assert!(!canvas.state().is_drawing());
        canvas.handle_pointer_move(Point::new(2.0, 2.0)).unwrap();

        canvas.handle_pointer_down(Point::new(3.0, 3.0)).unwrap();
        assert!(!canvas.redo());
        assert!(!canvas.state().is_drawing());

        let top = canvas.store_mut().add_layer().unwrap();
        canvas.handle_pointer_down(Point::new(4.0, 4.0)).unwrap();
        assert!(canvas.delete_layer(top).unwrap().is_some());
        assert!(!canvas.state().is_drawing());
        canvas.handle_pointer_move(Point::new(5.0, 5.0)).unwrap();
        assert_eq!(canvas.store().lines().len(), 2);
    }

    #[test]
    fn test_pointer_event_dispatch() {
        let mut canvas = Canvas::default();
        let events: Vec<PointerEvent> = serde_json::from_str(
            r#"[
                {"type": "down", "x": 0, "y": 0},
                {"type": "move", "x": 3, "y": 4},
                {"type": "up", "x": 3, "y": 4}
            ]"#,
        )
        .unwrap();
        for event in events {
            canvas.handle_pointer(event).unwrap();
        }
        assert_eq!(canvas.store().lines()[0].points.len(), 2);
    }
}
