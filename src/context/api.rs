//! Public API for the shared blackboard
//!
//! External modules should import from here rather than directly from
//! internal modules.

pub use crate::context::blackboard::{ContextEvent, HudContext, MAX_EVENTS};

pub use crate::context::error::{ContextError, ContextResult};

pub use crate::context::types::{
    keys, BorderPadding, BoundingBox, Detection, FriendlyUnit, PaddingBounds, PlayerPosition,
    RfAlert, WifiAlert,
};
