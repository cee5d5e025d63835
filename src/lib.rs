//! Library exports for the imgmark annotation tool.
//!
//! Everything except the windowing backend lives here so that rendering,
//! hit-testing and export can be exercised without a compositor.

pub mod config;
pub mod draw;
pub mod export;
pub mod input;
pub mod ui;
pub mod util;

pub use config::Config;
