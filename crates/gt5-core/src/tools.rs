//! Tool system for the drawing canvas.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Brush,
    Pencil,
    Eraser,
    Rectangle,
    Circle,
    Line,
    Text,
    Hand,
    Eyedropper,
}

/// How a stroke is composited onto its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Paint over existing pixels.
    #[default]
    SourceOver,
    /// Remove existing pixels where the stroke covers them.
    DestinationOut,
}

impl ToolKind {
    pub const ALL: [ToolKind; 9] = [
        ToolKind::Brush,
        ToolKind::Pencil,
        ToolKind::Eraser,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Line,
        ToolKind::Text,
        ToolKind::Hand,
        ToolKind::Eyedropper,
    ];

    /// Lowercase tool name, as stored in strokes.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Brush => "brush",
            ToolKind::Pencil => "pencil",
            ToolKind::Eraser => "eraser",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Line => "line",
            ToolKind::Text => "text",
            ToolKind::Hand => "hand",
            ToolKind::Eyedropper => "eyedropper",
        }
    }

    /// Single-letter keyboard shortcut for this tool.
    pub fn shortcut(self) -> char {
        match self {
            ToolKind::Brush => 'b',
            ToolKind::Pencil => 'p',
            ToolKind::Eraser => 'e',
            ToolKind::Rectangle => 'r',
            ToolKind::Circle => 'c',
            ToolKind::Line => 'l',
            ToolKind::Text => 't',
            ToolKind::Hand => 'h',
            ToolKind::Eyedropper => 'i',
        }
    }

    /// Look up a tool by its shortcut letter (case-insensitive).
    pub fn from_shortcut(key: char) -> Option<Self> {
        let key = key.to_ascii_lowercase();
        Self::ALL.into_iter().find(|tool| tool.shortcut() == key)
    }

    /// Tools that accumulate pointer positions into a stroke.
    pub fn is_freehand(self) -> bool {
        matches!(self, ToolKind::Brush | ToolKind::Pencil | ToolKind::Eraser)
    }

    /// Tools whose outline is rebuilt from the drag start to the pointer.
    pub fn is_shape(self) -> bool {
        matches!(self, ToolKind::Rectangle | ToolKind::Circle | ToolKind::Line)
    }

    /// Whether pointer-down with this tool creates a stroke.
    pub fn creates_stroke(self) -> bool {
        self.is_freehand() || self.is_shape()
    }

    pub fn blend_mode(self) -> BlendMode {
        match self {
            ToolKind::Eraser => BlendMode::DestinationOut,
            _ => BlendMode::SourceOver,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State of a pointer interaction on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToolState {
    /// Waiting for pointer-down.
    #[default]
    Idle,
    /// A stroke is being drawn.
    Drawing {
        /// Where the drag started.
        start: Point,
        /// Index of the stroke being drawn in the stroke list.
        stroke_index: usize,
    },
}

impl ToolState {
    pub fn is_drawing(&self) -> bool {
        matches!(self, ToolState::Drawing { .. })
    }
}
