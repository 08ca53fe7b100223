//! Frame Composition Module
//!
//! Owned RGBA frame buffer with clipped drawing primitives and a small
//! bitmap font. Plugins draw into the buffer during the render pass; the
//! display backend consumes the composited result.

// Internal modules - all access should go through api module
pub(crate) mod font;
pub(crate) mod frame;

// Public API module - the only public interface for the render system
pub mod api;
