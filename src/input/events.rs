//! Backend-neutral input event types.

/// Generic key representation.
///
/// The windowing backend maps its native keysyms to these values so the
/// controller never sees platform key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Regular character key (a-z, 0-9, symbols)
    Char(char),
    /// Escape key
    Escape,
    /// Return/Enter key
    Return,
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Tab key
    Tab,
    /// Space bar
    Space,
    /// Shift modifier
    Shift,
    /// Ctrl modifier
    Ctrl,
    /// Alt modifier
    Alt,
    /// Unmapped or unrecognized key
    Unknown,
}

impl Key {
    /// Returns true for keys that only change modifier state.
    pub fn is_modifier(self) -> bool {
        matches!(self, Key::Shift | Key::Ctrl | Key::Alt)
    }
}

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button (draws and clicks toolbar icons)
    Left,
    /// Right mouse button (cancels an active drag)
    Right,
    /// Middle mouse button (unused)
    Middle,
}
