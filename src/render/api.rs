//! Public API for the render system

pub use crate::render::font::{text_height, text_width, GLYPH_HEIGHT, GLYPH_WIDTH};
pub use crate::render::frame::{Color, FrameBuffer};
