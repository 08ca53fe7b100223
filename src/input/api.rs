//! Public API for the input system

pub use crate::input::keys::Key;
pub use crate::input::manager::{BindCategory, KeyBinding, KeybindRegistry};
