//! Input Management Module
//!
//! Key representation and the app-level keybind registry. Keys claimed by
//! plugins during the frame pipeline never reach these bindings.

// Internal modules - all access should go through api module
pub(crate) mod keys;
pub(crate) mod manager;

// Public API module - the only public interface for the input system
pub mod api;
