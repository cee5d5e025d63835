use crate::config::Action;
use crate::input::{events::Key, tool::Tool};

use super::{ExportRequest, InputState};

impl InputState {
    /// Processes a key press event.
    ///
    /// Modifier keys only update the modifier state; any other key is
    /// looked up in the keybinding map together with the held modifiers.
    pub fn on_key_press(&mut self, key: Key) {
        match key {
            Key::Shift => {
                self.modifiers.shift = true;
                return;
            }
            Key::Ctrl => {
                self.modifiers.ctrl = true;
                return;
            }
            Key::Alt => {
                self.modifiers.alt = true;
                return;
            }
            _ => {}
        }

        // Convert key to string for action lookup
        let key_str = match key {
            Key::Char(c) => c.to_string(),
            Key::Escape => "Escape".to_string(),
            Key::Return => "Return".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Delete => "Delete".to_string(),
            Key::Tab => "Tab".to_string(),
            Key::Space => "Space".to_string(),
            _ => return,
        };

        if let Some(action) = self.find_action(&key_str) {
            self.handle_action(action);
        }
    }

    /// Handle an action triggered by a keybinding.
    pub(super) fn handle_action(&mut self, action: Action) {
        match action {
            Action::Exit => {
                log::info!("Exit requested");
                self.should_exit = true;
            }
            Action::Save => self.set_pending_export(ExportRequest::Save),
            Action::Copy => {
                self.set_pending_export(ExportRequest::Copy);
                // Key releases can be missed while the clipboard helper runs
                self.modifiers = Default::default();
            }
            Action::ClearCanvas => self.clear(),
            Action::Undo => self.undo(),
            Action::ToggleWidgetScale => self.toggle_widget_scale(),
            Action::SelectRectangle => self.select_tool(Tool::Rectangle),
            Action::SelectArrow => self.select_tool(Tool::Arrow),
            Action::SelectBullet => self.select_tool(Tool::Bullet),
        }
    }

    /// Processes a key release event.
    ///
    /// Only tracks modifier key releases to update the modifier state.
    pub fn on_key_release(&mut self, key: Key) {
        match key {
            Key::Shift => self.modifiers.shift = false,
            Key::Ctrl => self.modifiers.ctrl = false,
            Key::Alt => self.modifiers.alt = false,
            _ => {}
        }
    }
}
