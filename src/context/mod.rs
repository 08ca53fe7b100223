//! Shared Blackboard Module
//!
//! One mutable key/value store plus a bounded event queue, shared by every
//! plugin for inter-plugin data exchange. All mutation happens from the
//! single frame-loop thread.

// Internal modules - all access should go through api module
pub(crate) mod blackboard;
pub(crate) mod error;
pub(crate) mod types;

// Public API module - the only public interface for the context system
pub mod api;
