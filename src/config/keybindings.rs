//! Keybinding configuration types and parsing.
//!
//! Every action can be bound to several keys. Bindings are written as strings
//! such as `"S"`, `"Escape"` or `"Ctrl+Z"` in the `[keybindings]` table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // Session
    Exit,
    Save,
    Copy,

    // Canvas editing
    ClearCanvas,
    Undo,
    ToggleWidgetScale,

    // Tool selection
    SelectRectangle,
    SelectArrow,
    SelectBullet,
}

/// A single keybinding: a key name with optional modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyBinding {
    /// Parse a keybinding string like "Ctrl+Z" or "Escape".
    ///
    /// Modifiers can appear in any order and spaces around '+' are ignored.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty keybinding string".to_string());
        }

        let normalized = s.replace(" + ", "+").replace("+ ", "+").replace(" +", "+");

        let mut ctrl = false;
        let mut shift = false;
        let mut alt = false;
        let mut key_parts = Vec::new();

        for part in normalized.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "shift" => shift = true,
                "alt" => alt = true,
                _ => key_parts.push(part),
            }
        }

        if key_parts.is_empty() {
            return Err(format!("No key specified in: {}", s));
        }

        // "Ctrl++" splits into two empty parts; the key is '+'.
        let key = key_parts.join("+");
        let key = if key.is_empty() { "+".to_string() } else { key };

        Ok(Self {
            key,
            ctrl,
            shift,
            alt,
        })
    }

    /// Check if this keybinding matches the current input state.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool, alt: bool) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == ctrl
            && self.shift == shift
            && self.alt == alt
    }
}

/// Configuration for all keybindings.
///
/// ```toml
/// [keybindings]
/// exit = ["Escape", "Ctrl+Q"]
/// undo = ["Backspace", "Ctrl+Z"]
/// select_bullet = ["E", "B"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeybindingsConfig {
    #[serde(default = "default_exit")]
    pub exit: Vec<String>,

    #[serde(default = "default_save")]
    pub save: Vec<String>,

    #[serde(default = "default_copy")]
    pub copy: Vec<String>,

    #[serde(default = "default_clear_canvas")]
    pub clear_canvas: Vec<String>,

    #[serde(default = "default_undo")]
    pub undo: Vec<String>,

    #[serde(default = "default_toggle_widget_scale")]
    pub toggle_widget_scale: Vec<String>,

    #[serde(default = "default_select_rectangle")]
    pub select_rectangle: Vec<String>,

    #[serde(default = "default_select_arrow")]
    pub select_arrow: Vec<String>,

    #[serde(default = "default_select_bullet")]
    pub select_bullet: Vec<String>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            exit: default_exit(),
            save: default_save(),
            copy: default_copy(),
            clear_canvas: default_clear_canvas(),
            undo: default_undo(),
            toggle_widget_scale: default_toggle_widget_scale(),
            select_rectangle: default_select_rectangle(),
            select_arrow: default_select_arrow(),
            select_bullet: default_select_bullet(),
        }
    }
}

impl KeybindingsConfig {
    /// Build a lookup map from keybindings to actions.
    ///
    /// Returns an error if any keybinding string is invalid or if the same
    /// binding is assigned twice.
    pub fn build_action_map(&self) -> Result<HashMap<KeyBinding, Action>, String> {
        let mut map = HashMap::new();

        let table: [(&[String], Action); 9] = [
            (&self.exit, Action::Exit),
            (&self.save, Action::Save),
            (&self.copy, Action::Copy),
            (&self.clear_canvas, Action::ClearCanvas),
            (&self.undo, Action::Undo),
            (&self.toggle_widget_scale, Action::ToggleWidgetScale),
            (&self.select_rectangle, Action::SelectRectangle),
            (&self.select_arrow, Action::SelectArrow),
            (&self.select_bullet, Action::SelectBullet),
        ];

        for (bindings, action) in table {
            for binding_str in bindings {
                let binding = KeyBinding::parse(binding_str)?;
                if let Some(existing_action) = map.insert(binding, action) {
                    return Err(format!(
                        "Duplicate keybinding '{}' assigned to both {:?} and {:?}",
                        binding_str, existing_action, action
                    ));
                }
            }
        }

        Ok(map)
    }
}

// =============================================================================
// Default keybindings
// =============================================================================

fn default_exit() -> Vec<String> {
    vec!["Escape".to_string()]
}

fn default_save() -> Vec<String> {
    vec!["S".to_string()]
}

fn default_copy() -> Vec<String> {
    vec!["Ctrl+C".to_string()]
}

fn default_clear_canvas() -> Vec<String> {
    vec!["C".to_string()]
}

fn default_undo() -> Vec<String> {
    vec!["Backspace".to_string(), "Ctrl+Z".to_string()]
}

fn default_toggle_widget_scale() -> Vec<String> {
    vec!["Z".to_string()]
}

fn default_select_rectangle() -> Vec<String> {
    vec!["R".to_string()]
}

fn default_select_arrow() -> Vec<String> {
    vec!["A".to_string()]
}

fn default_select_bullet() -> Vec<String> {
    vec!["E".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let binding = KeyBinding::parse("Escape").unwrap();
        assert_eq!(binding.key, "Escape");
        assert!(!binding.ctrl && !binding.shift && !binding.alt);
    }

    #[test]
    fn test_parse_modifiers_any_order() {
        let a = KeyBinding::parse("Ctrl+Shift+Z").unwrap();
        let b = KeyBinding::parse("shift + ctrl + z").unwrap();
        assert!(a.ctrl && a.shift);
        assert!(b.matches("Z", true, true, false));
        assert!(a.matches("z", true, true, false));
    }

    #[test]
    fn test_parse_plus_key() {
        let binding = KeyBinding::parse("Ctrl++").unwrap();
        assert_eq!(binding.key, "+");
        assert!(binding.ctrl);
    }

    #[test]
    fn test_parse_rejects_modifier_only() {
        assert!(KeyBinding::parse("Ctrl+Shift").is_err());
        assert!(KeyBinding::parse("   ").is_err());
    }

    #[test]
    fn test_matches_requires_exact_modifiers() {
        let binding = KeyBinding::parse("Z").unwrap();
        assert!(binding.matches("z", false, false, false));
        assert!(!binding.matches("z", true, false, false));
    }

    #[test]
    fn test_default_action_map() {
        let map = KeybindingsConfig::default().build_action_map().unwrap();
        let lookup = |s: &str| map.get(&KeyBinding::parse(s).unwrap()).copied();
        assert_eq!(lookup("S"), Some(Action::Save));
        assert_eq!(lookup("Escape"), Some(Action::Exit));
        assert_eq!(lookup("C"), Some(Action::ClearCanvas));
        assert_eq!(lookup("Backspace"), Some(Action::Undo));
        assert_eq!(lookup("Ctrl+Z"), Some(Action::Undo));
        assert_eq!(lookup("Ctrl+C"), Some(Action::Copy));
        assert_eq!(lookup("R"), Some(Action::SelectRectangle));
        assert_eq!(lookup("A"), Some(Action::SelectArrow));
        assert_eq!(lookup("E"), Some(Action::SelectBullet));
        assert_eq!(lookup("Z"), Some(Action::ToggleWidgetScale));
    }

    #[test]
    fn test_duplicate_binding_is_rejected() {
        let config = KeybindingsConfig {
            save: vec!["R".to_string()],
            ..KeybindingsConfig::default()
        };
        let err = config.build_action_map().unwrap_err();
        assert!(err.contains("Duplicate keybinding 'R'"), "{err}");
    }
}
