//! Shared blackboard: session frame dimensions, a string-keyed state map and
//! a bounded event queue.
//!
//! State entries are provided by exactly one owning producer by convention,
//! not enforced. Consumers treat a missing key as the expected empty case
//! unless they use the strict accessor `require`.

use std::any::Any;
use std::collections::{HashMap, VecDeque};

use crate::context::error::{ContextError, ContextResult};

/// Maximum number of queued events. Emitting beyond this drops the oldest
/// entry, never the newest.
pub const MAX_EVENTS: usize = 1000;

/// A queued inter-plugin event
#[derive(Debug, Clone, PartialEq)]
pub struct ContextEvent {
    pub event_type: String,
    pub data: serde_json::Value,
}

impl ContextEvent {
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }
}

/// Shared state for one running application.
///
/// Frame dimensions are fixed for the session. Values are stored as
/// `Box<dyn Any + Send>` so typed records and opaque capability handles
/// share one map; accessors downcast back to the caller's type.
pub struct HudContext {
    frame_width: u32,
    frame_height: u32,
    state: HashMap<String, Box<dyn Any + Send>>,
    events: VecDeque<ContextEvent>,
}

impl std::fmt::Debug for HudContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HudContext")
            .field("frame_width", &self.frame_width)
            .field("frame_height", &self.frame_height)
            .field("state_keys", &self.state.keys().collect::<Vec<_>>())
            .field("pending_events", &self.events.len())
            .finish()
    }
}

impl HudContext {
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            state: HashMap::new(),
            events: VecDeque::new(),
        }
    }

    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    /// Overwrite `state[key]` with a new value
    pub fn provide<T: Any + Send>(&mut self, key: &str, value: T) {
        self.state.insert(key.to_string(), Box::new(value));
    }

    /// Strict accessor for declared hard dependencies.
    ///
    /// Fails with `MissingHardDependency` naming the requesting plugin and
    /// the key when absent, and with `TypeMismatch` when the stored value is
    /// not a `T`.
    pub fn require<T: Any>(&self, plugin_name: &str, key: &str) -> ContextResult<&T> {
        match self.state.get(key) {
            None => Err(ContextError::MissingHardDependency {
                plugin_name: plugin_name.to_string(),
                key: key.to_string(),
            }),
            Some(value) => {
                value
                    .downcast_ref::<T>()
                    .ok_or_else(|| ContextError::TypeMismatch {
                        plugin_name: plugin_name.to_string(),
                        key: key.to_string(),
                        expected: std::any::type_name::<T>(),
                    })
            }
        }
    }

    /// Soft accessor: `None` when the key is absent or of a different type
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.state.get(key).and_then(|value| value.downcast_ref::<T>())
    }

    /// Soft accessor with a fallback, never fails
    pub fn get_or<'a, T: Any>(&'a self, key: &str, default: &'a T) -> &'a T {
        self.get(key).unwrap_or(default)
    }

    pub fn has(&self, key: &str) -> bool {
        self.state.contains_key(key)
    }

    /// Append to the bounded event queue, dropping the oldest entry if full
    pub fn emit(&mut self, event_type: &str, data: serde_json::Value) {
        self.events.push_back(ContextEvent::new(event_type, data));
        while self.events.len() > MAX_EVENTS {
            self.events.pop_front();
        }
    }

    /// Return and clear all queued events.
    ///
    /// Called once per frame by the manager; events emitted while this
    /// frame's batch is being dispatched are seen next frame.
    pub fn drain_events(&mut self) -> Vec<ContextEvent> {
        self.events.drain(..).collect()
    }

    /// Drop all queued events without dispatching them
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Remove a state entry; true if the key was present
    pub fn remove(&mut self, key: &str) -> bool {
        self.state.remove(key).is_some()
    }
}
