// Feeds pointer motion and button events into the drawing state.
use log::debug;
use smithay_client_toolkit::seat::pointer::{
    BTN_LEFT, BTN_MIDDLE, BTN_RIGHT, PointerEvent, PointerEventKind, PointerHandler,
};
use wayland_client::{Connection, QueueHandle, protocol::wl_pointer};

use imgmark::input::MouseButton;

use super::super::state::WaylandState;

fn map_button(button: u32) -> Option<MouseButton> {
    match button {
        BTN_LEFT => Some(MouseButton::Left),
        BTN_MIDDLE => Some(MouseButton::Middle),
        BTN_RIGHT => Some(MouseButton::Right),
        _ => None,
    }
}

impl PointerHandler for WaylandState {
    fn pointer_frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _pointer: &wl_pointer::WlPointer,
        events: &[PointerEvent],
    ) {
        for event in events {
            let x = event.position.0 as i32;
            let y = event.position.1 as i32;
            match event.kind {
                PointerEventKind::Enter { .. } => {
                    debug!("Pointer entered at ({}, {})", x, y);
                    self.current_mouse_x = x;
                    self.current_mouse_y = y;
                }
                PointerEventKind::Leave { .. } => {
                    debug!("Pointer left surface");
                }
                PointerEventKind::Motion { .. } => {
                    self.current_mouse_x = x;
                    self.current_mouse_y = y;
                    self.input_state.on_mouse_motion(x, y);
                }
                PointerEventKind::Press { button, .. } => {
                    debug!("Button {} pressed at ({}, {})", button, x, y);
                    if let Some(mb) = map_button(button) {
                        self.input_state.on_mouse_press(mb, x, y);
                    }
                }
                PointerEventKind::Release { button, .. } => {
                    debug!("Button {} released", button);
                    if let Some(mb) = map_button(button) {
                        self.input_state.on_mouse_release(mb, x, y);
                    }
                }
                PointerEventKind::Axis { .. } => {}
            }
        }
    }
}
