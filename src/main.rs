use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser};
use log::{info, warn};

use imgmark::{Config, draw::Canvas, draw::pixels, export, input::InputState};

mod backend;

#[derive(Parser, Debug)]
#[command(name = "imgmark")]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("IMGMARK_GIT_HASH"), ")"),
    about = "Annotate an image with rectangles, arrows and numbered bullets"
)]
struct Cli {
    /// Image to annotate (PNG or JPEG)
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Where the save action writes the result (overrides $ANNOTATED)
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Snap grid in pixels, 0 disables snapping (overrides $GRID_SIZE)
    #[arg(long, short = 'g', value_name = "N")]
    grid_size: Option<u32>,

    /// Do not copy the result to the clipboard on exit
    #[arg(long, action = ArgAction::SetTrue)]
    no_copy: bool,
}

fn load_config(cli: &Cli) -> Config {
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config: {:#}; using defaults", e);
            Config::default()
        }
    };
    config.apply_env();

    if let Some(path) = &cli.output {
        config.output.path = path.clone();
    }
    if let Some(size) = cli.grid_size {
        config.drawing.grid_size = size;
    }
    config.validate_and_clamp();
    config
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(&cli);

    let background = pixels::load_background(&cli.image)
        .with_context(|| format!("Failed to load image {}", cli.image.display()))?;
    info!(
        "Loaded {} ({}x{})",
        cli.image.display(),
        background.width(),
        background.height()
    );

    // Check for Wayland environment
    if std::env::var("WAYLAND_DISPLAY").is_err() {
        log::error!("WAYLAND_DISPLAY not set - this application requires Wayland.");
        return Err(anyhow!("WAYLAND_DISPLAY not set"));
    }

    let action_map = config
        .keybindings
        .build_action_map()
        .map_err(|e| anyhow!("Invalid keybindings: {}", e))?;
    let canvas =
        Canvas::new(background, config.snap_grid()).context("Failed to create canvas")?;
    let input_state = InputState::new(canvas, config.render_context(), action_map);

    let options = backend::BackendOptions {
        output_path: config.output_path(),
        title: format!("imgmark - {}", cli.image.display()),
    };
    let mut state = backend::run_wayland(input_state, options)?;

    if cli.no_copy || !config.output.copy_on_exit {
        info!("Skipping clipboard hand-off");
        return Ok(());
    }

    let image = state
        .composited_image()
        .context("Failed to composite annotated image")?;
    export::copy_surface(image).context("Failed to copy annotated image to clipboard")?;
    info!("Annotated image copied to clipboard");

    Ok(())
}
