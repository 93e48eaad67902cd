//! Keyboard shortcut registry and key resolution.

use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};

/// A key press, as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyInput {
    /// Key name: a single character such as `"b"` or `"["`, or a named key.
    pub key: String,
    pub ctrl: bool,
    /// Cmd on macOS. Treated the same as Ctrl.
    pub meta: bool,
    pub shift: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Ctrl or Cmd held.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    fn single_char(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    SelectTool(ToolKind),
    Undo,
    Redo,
    GrowBrush,
    ShrinkBrush,
}

impl ShortcutAction {
    /// Resolve a key press to an action.
    pub fn from_key(input: &KeyInput) -> Option<Self> {
        let c = input.single_char()?;

        if input.command() {
            return match c.to_ascii_lowercase() {
                'z' if input.shift => Some(ShortcutAction::Redo),
                'z' => Some(ShortcutAction::Undo),
                'y' => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        match c {
            '[' => Some(ShortcutAction::ShrinkBrush),
            ']' => Some(ShortcutAction::GrowBrush),
            _ => ToolKind::from_shortcut(c).map(ShortcutAction::SelectTool),
        }
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl/Cmd");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// The key press this shortcut describes.
    pub fn to_input(&self) -> KeyInput {
        KeyInput {
            key: self.key.to_ascii_lowercase(),
            ctrl: self.ctrl,
            meta: false,
            shift: self.shift,
        }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("B", false, false, "Brush"),
            Shortcut::new("P", false, false, "Pencil"),
            Shortcut::new("E", false, false, "Eraser"),
            Shortcut::new("R", false, false, "Rectangle"),
            Shortcut::new("C", false, false, "Circle"),
            Shortcut::new("L", false, false, "Line"),
            Shortcut::new("T", false, false, "Text"),
            Shortcut::new("H", false, false, "Hand"),
            Shortcut::new("I", false, false, "Eyedropper"),
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
            Shortcut::new("[", false, false, "Decrease brush size"),
            Shortcut::new("]", false, false, "Increase brush size"),
        ]
    }

    /// Help text, one shortcut per line.
    pub fn help_text() -> String {
        Self::all()
            .iter()
            .map(|s| format!("  {:20} {}", s.format(), s.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_keys() {
        assert_eq!(
            ShortcutAction::from_key(&KeyInput::new("b")),
            Some(ShortcutAction::SelectTool(ToolKind::Brush))
        );
        assert_eq!(
            ShortcutAction::from_key(&KeyInput::new("I")),
            Some(ShortcutAction::SelectTool(ToolKind::Eyedropper))
        );
        assert_eq!(ShortcutAction::from_key(&KeyInput::new("q")), None);
    }

    #[test]
    fn test_modified_letters_do_not_select_tools() {
        assert_eq!(ShortcutAction::from_key(&KeyInput::new("b").with_ctrl()), None);
    }

    #[test]
    fn test_undo_redo_keys() {
        let undo = KeyInput::new("z").with_ctrl();
        assert_eq!(ShortcutAction::from_key(&undo), Some(ShortcutAction::Undo));

        let cmd_undo = KeyInput::new("z").with_meta();
        assert_eq!(ShortcutAction::from_key(&cmd_undo), Some(ShortcutAction::Undo));

        let redo = KeyInput::new("Z").with_ctrl().with_shift();
        assert_eq!(ShortcutAction::from_key(&redo), Some(ShortcutAction::Redo));

        let redo_y = KeyInput::new("y").with_ctrl();
        assert_eq!(ShortcutAction::from_key(&redo_y), Some(ShortcutAction::Redo));
    }

    #[test]
    fn test_brush_keys() {
        assert_eq!(
            ShortcutAction::from_key(&KeyInput::new("[")),
            Some(ShortcutAction::ShrinkBrush)
        );
        assert_eq!(
            ShortcutAction::from_key(&KeyInput::new("]")),
            Some(ShortcutAction::GrowBrush)
        );
    }

    #[test]
    fn test_named_keys_are_ignored() {
        assert_eq!(ShortcutAction::from_key(&KeyInput::new("Escape")), None);
        assert_eq!(ShortcutAction::from_key(&KeyInput::new("")), None);
    }

    #[test]
    fn test_registry_entries_resolve() {
        for shortcut in ShortcutRegistry::all() {
            assert!(
                ShortcutAction::from_key(&shortcut.to_input()).is_some(),
                "{} does not resolve",
                shortcut.format()
            );
        }
    }

    #[test]
    fn test_format() {
        assert_eq!(Shortcut::new("Z", true, true, "Redo").format(), "Ctrl/Cmd+Shift+Z");
        assert_eq!(Shortcut::new("[", false, false, "").format(), "[");
    }
}
