//! Built-in Overlay Plugins
//!
//! The overlay plugins that ship with the runtime. Each registers itself
//! through the `builtin!` macro and is discovered automatically.

pub(crate) mod border_padding;
pub(crate) mod compass;
pub(crate) mod control_panel;
pub(crate) mod detection_overlay;
pub(crate) mod fps_counter;
pub(crate) mod unit_markers;

pub mod api;
