// Responds to xdg toplevel configure/close events; every configure repaints the whole window.
use log::info;
use smithay_client_toolkit::shell::xdg::window::{Window, WindowConfigure, WindowHandler};
use wayland_client::{Connection, QueueHandle};

use super::super::state::WaylandState;

impl WindowHandler for WaylandState {
    fn request_close(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _window: &Window) {
        info!("Window closed by compositor");
        self.input_state.should_exit = true;
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _window: &Window,
        configure: WindowConfigure,
        _serial: u32,
    ) {
        info!(
            "Window configured: suggested {:?}x{:?}, keeping {}x{}",
            configure.new_size.0,
            configure.new_size.1,
            self.surface.width(),
            self.surface.height()
        );

        // Buffer contents may be gone after a restore
        self.input_state.force_full_redraw();
        self.surface.set_configured(true);
        self.surface.set_frame_callback_pending(false);
    }
}
