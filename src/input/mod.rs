//! Input handling and tool state machine.
//!
//! This module translates backend keyboard and mouse events into canvas and
//! toolbar mutations. It owns the current tool and colour selection (through
//! the toolbar), the drag state machine, and the redraw bookkeeping.

pub mod events;
pub mod modifiers;
pub mod state;
pub mod tool;

// Re-export commonly used types at module level
pub use events::{Key, MouseButton};
pub use modifiers::Modifiers;
pub use state::{DrawingState, ExportRequest, InputState};
pub use tool::Tool;
