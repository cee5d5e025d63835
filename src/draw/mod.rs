//! Rendering primitives and shape definitions (Cairo-based).
//!
//! This module defines the core drawing types used for image annotation:
//! - [`Color`]: RGBA color representation and the annotation palette
//! - [`Shape`]: Rectangle, arrow and bullet annotations with a raster cache
//! - [`Canvas`]: Background image plus the ordered shape list
//! - Supersampled rasterizers and pixel conversion helpers

pub mod canvas;
pub mod color;
pub mod dirty;
pub mod font;
pub mod pixels;
pub mod render;
pub mod shape;

// Re-export commonly used types at module level
pub use canvas::{BulletNumbers, Canvas};
pub use color::Color;
pub use dirty::DirtyTracker;
pub use font::FontDescriptor;
pub use render::{RenderContext, WidgetScale};
pub use shape::{Shape, ShapeKind};
