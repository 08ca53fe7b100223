//! Plugin System Module
//!
//! Trait-based overlay plugin runtime: discovery of builtin and manifest
//! plugin types, dependency-ordered loading, hot reload, and the per-frame
//! update/event/render/key pipeline.

// Internal modules - all access should go through api module
pub(crate) mod builtin;
pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod external;
pub(crate) mod manager;
pub(crate) mod registry;
pub(crate) mod resolver;
pub(crate) mod traits;
pub(crate) mod types;

// Public API module - the only public interface for the plugin system
pub mod api;
