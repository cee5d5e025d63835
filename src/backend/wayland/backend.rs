// Coordinates backend startup/shutdown and drives the event loop while delegating
// rendering & protocol state to `WaylandState` and its handler modules.
use anyhow::{Context, Result};
use log::{debug, info, warn};
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    shell::{
        WaylandSurface,
        xdg::{XdgShell, window::WindowDecorations},
    },
    shm::Shm,
};
use wayland_client::{Connection, globals::registry_queue_init};

use super::state::WaylandState;
use crate::backend::BackendOptions;
use imgmark::input::InputState;

/// Consecutive failed frames tolerated before giving up.
const MAX_RENDER_FAILURES: u32 = 10;

/// Wayland backend state
pub struct WaylandBackend {
    options: BackendOptions,
}

impl WaylandBackend {
    pub fn new(options: BackendOptions) -> Self {
        Self { options }
    }

    pub fn run(self, input_state: InputState) -> Result<InputState> {
        info!("Starting Wayland backend");

        // Connect to Wayland compositor
        let conn =
            Connection::connect_to_env().context("Failed to connect to Wayland compositor")?;
        debug!("Connected to Wayland display");

        // Initialize registry and event queue
        let (globals, mut event_queue) =
            registry_queue_init(&conn).context("Failed to initialize Wayland registry")?;
        let qh = event_queue.handle();

        // Bind global interfaces
        let compositor_state =
            CompositorState::bind(&globals, &qh).context("wl_compositor not available")?;
        debug!("Bound compositor");

        let xdg_shell = XdgShell::bind(&globals, &qh).context("xdg_wm_base not available")?;
        debug!("Bound xdg shell");

        let shm = Shm::bind(&globals, &qh).context("wl_shm not available")?;
        debug!("Bound shared memory");

        let output_state = OutputState::new(&globals, &qh);
        debug!("Initialized output state");

        let seat_state = SeatState::new(&globals, &qh);
        debug!("Initialized seat state");

        let registry_state = RegistryState::new(&globals);

        let (width, height) = input_state.window_size();
        let mut state = WaylandState::new(
            registry_state,
            compositor_state,
            xdg_shell,
            shm,
            output_state,
            seat_state,
            input_state,
            self.options.output_path,
        )?;

        // Create the toplevel window; its size is fixed to the image plus toolbar
        info!("Creating {}x{} window", width, height);
        let wl_surface = state.compositor_state.create_surface(&qh);
        let window =
            state
                .xdg_shell
                .create_window(wl_surface, WindowDecorations::RequestServer, &qh);
        window.set_title(self.options.title);
        window.set_app_id("imgmark");
        window.set_min_size(Some((width as u32, height as u32)));
        window.set_max_size(Some((width as u32, height as u32)));
        window.commit();

        state.surface.set_window(window);
        info!("Window created");

        let mut consecutive_render_failures = 0u32;

        // Main event loop
        let mut loop_error: Option<anyhow::Error> = None;
        loop {
            if state.input_state.should_exit {
                info!("Exit requested, breaking event loop");
                break;
            }

            // Dispatch all pending events (blocking) but check should_exit after each batch
            if let Err(e) = event_queue.blocking_dispatch(&mut state) {
                warn!("Event queue error: {}", e);
                loop_error = Some(anyhow::anyhow!("Wayland event queue error: {}", e));
                break;
            }

            if let Some(request) = state.input_state.take_pending_export() {
                state.handle_export(request);
            }

            if state.input_state.should_exit {
                info!("Exit requested after dispatch, breaking event loop");
                break;
            }

            // Render only once the previous frame has been shown
            let can_render = state.surface.is_configured()
                && state.input_state.needs_redraw
                && !state.surface.frame_callback_pending();

            if can_render {
                match state.render(&qh) {
                    Ok(()) => {
                        consecutive_render_failures = 0;
                        state.surface.set_frame_callback_pending(true);
                    }
                    Err(e) => {
                        consecutive_render_failures += 1;
                        warn!(
                            "Rendering error (attempt {}/{}): {}",
                            consecutive_render_failures, MAX_RENDER_FAILURES, e
                        );

                        if consecutive_render_failures >= MAX_RENDER_FAILURES {
                            return Err(anyhow::anyhow!(
                                "Too many consecutive render failures ({}), exiting: {}",
                                consecutive_render_failures,
                                e
                            ));
                        }

                        // Clear redraw flag to avoid infinite error loop
                        state.input_state.needs_redraw = false;
                    }
                }
            } else if state.input_state.needs_redraw && state.surface.frame_callback_pending() {
                debug!("Main loop: Skipping render - frame callback already pending");
            }
        }

        info!("Wayland backend exiting");

        match loop_error {
            Some(e) => Err(e),
            None => Ok(state.input_state),
        }
    }
}
