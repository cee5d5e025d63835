// Holds the live Wayland protocol state shared by the backend loop and the handler
// submodules; provides rendering and export routing used across them.
use anyhow::{Context, Result};
use cairo::ImageSurface;
use log::{debug, error, info};
use smithay_client_toolkit::{
    compositor::CompositorState, output::OutputState, registry::RegistryState, seat::SeatState,
    shell::WaylandSurface, shell::xdg::XdgShell, shm::Shm,
};
use std::path::PathBuf;
use wayland_client::{
    QueueHandle,
    protocol::{wl_keyboard, wl_pointer, wl_shm},
};

use imgmark::{
    export,
    input::{ExportRequest, InputState},
    util::Rect,
};

use super::surface::SurfaceState;

/// Buffers in the SHM pool; one on screen, one being filled.
const BUFFER_COUNT: usize = 2;

/// Internal Wayland state shared across modules.
pub(super) struct WaylandState {
    // Wayland protocol objects
    pub(super) registry_state: RegistryState,
    pub(super) compositor_state: CompositorState,
    pub(super) xdg_shell: XdgShell,
    pub(super) shm: Shm,
    pub(super) output_state: OutputState,
    pub(super) seat_state: SeatState,
    pub(super) keyboard: Option<wl_keyboard::WlKeyboard>,
    pub(super) pointer: Option<wl_pointer::WlPointer>,

    // Surface and buffer management
    pub(super) surface: SurfaceState,
    /// Persistent back-buffer; only damaged regions are repainted into it
    pub(super) frame: ImageSurface,

    // Input state
    pub(super) input_state: InputState,
    pub(super) current_mouse_x: i32,
    pub(super) current_mouse_y: i32,

    // Export
    pub(super) output_path: PathBuf,
}

impl WaylandState {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        registry_state: RegistryState,
        compositor_state: CompositorState,
        xdg_shell: XdgShell,
        shm: Shm,
        output_state: OutputState,
        seat_state: SeatState,
        input_state: InputState,
        output_path: PathBuf,
    ) -> Result<Self> {
        let (width, height) = input_state.window_size();
        let frame = ImageSurface::create(cairo::Format::ARgb32, width, height)
            .context("Failed to create frame buffer")?;

        Ok(Self {
            registry_state,
            compositor_state,
            xdg_shell,
            shm,
            output_state,
            seat_state,
            keyboard: None,
            pointer: None,
            surface: SurfaceState::new(width as u32, height as u32),
            frame,
            input_state,
            current_mouse_x: 0,
            current_mouse_y: 0,
            output_path,
        })
    }

    pub(super) fn render(&mut self, qh: &QueueHandle<Self>) -> Result<()> {
        debug!("=== RENDER START ===");
        let width = self.surface.width();
        let height = self.surface.height();

        let dirty_regions = self
            .input_state
            .render_frame(&self.frame)
            .context("Failed to render frame")?;

        // Get a buffer from the pool
        let (buffer, canvas) = {
            let pool = self.surface.ensure_pool(&self.shm, BUFFER_COUNT)?;
            debug!("Requesting buffer from pool");
            pool.create_buffer(
                width as i32,
                height as i32,
                (width * 4) as i32,
                wl_shm::Format::Argb8888,
            )
            .context("Failed to create buffer")?
        };

        // Pool buffers come back with stale contents, so the whole back-buffer
        // is copied; damage only tells the compositor what changed on screen.
        let row_bytes = width as usize * 4;
        let stride = self.frame.stride() as usize;
        self.frame
            .with_data(|data| {
                for (dst, src) in canvas
                    .chunks_exact_mut(row_bytes)
                    .zip(data.chunks(stride))
                {
                    dst.copy_from_slice(&src[..row_bytes]);
                }
            })
            .context("Failed to read frame buffer")?;

        // Attach buffer and commit
        debug!("Attaching buffer and committing surface");
        let wl_surface = self
            .surface
            .window()
            .context("Window not created")?
            .wl_surface();
        wl_surface.attach(Some(buffer.wl_buffer()), 0, 0);

        let dirty_regions = resolve_damage_regions(width as i32, height as i32, dirty_regions);
        for rect in &dirty_regions {
            debug!(
                "Damaging buffer region x={} y={} w={} h={}",
                rect.x, rect.y, rect.width, rect.height
            );
            wl_surface.damage_buffer(rect.x, rect.y, rect.width, rect.height);
        }

        wl_surface.frame(qh, wl_surface.clone());
        wl_surface.commit();
        debug!("=== RENDER COMPLETE ===");

        Ok(())
    }

    /// Performs a save or copy requested by the controller.
    ///
    /// Failures are logged and the session continues.
    pub(super) fn handle_export(&mut self, request: ExportRequest) {
        let image = match self.input_state.composited_image() {
            Ok(image) => image,
            Err(e) => {
                error!("Failed to composite image for export: {}", e);
                return;
            }
        };

        match request {
            ExportRequest::Save => match export::save_surface(image, &self.output_path) {
                Ok(()) => info!("Saved annotated image to {}", self.output_path.display()),
                Err(e) => error!(
                    "Failed to save annotated image to {}: {}",
                    self.output_path.display(),
                    e
                ),
            },
            ExportRequest::Copy => {
                if let Err(e) = export::copy_surface(image) {
                    error!("Failed to copy annotated image: {}", e);
                }
            }
        }

        // The helper process may have swallowed key releases
        self.input_state.modifiers = Default::default();
    }
}

/// Drops empty rectangles; an empty set still damages the whole buffer so a
/// freshly attached buffer is never ignored.
fn resolve_damage_regions(width: i32, height: i32, mut regions: Vec<Rect>) -> Vec<Rect> {
    regions.retain(Rect::is_valid);

    if regions.is_empty()
        && let Some(full) = Rect::new(0, 0, width, height)
    {
        regions.push(full);
    }

    regions
}
