//! Plugin Trait System
//!
//! Core trait and shared state for overlay plugins.
//!
//! # Plugin Architecture
//!
//! Plugins are overlay units driven by the frame loop. Each frame the
//! manager calls `update` on every enabled plugin, dispatches queued
//! events, then composes the frame by passing the image buffer through
//! every enabled-and-visible plugin's `render` in ascending z-order.
//! Data moves between plugins only through the shared blackboard, never
//! by direct reference.
//!
//! Plugins do NOT own the frame loop, the capture source, or input
//! handling; the manager calls them, and they answer through return
//! values and blackboard writes.

use crate::context::api::{ContextEvent, HudContext};
use crate::input::api::Key;
use crate::plugin::config::PluginConfig;
use crate::plugin::error::PluginResult;
use crate::plugin::types::{PluginMetadata, PluginStatus};
use crate::render::api::FrameBuffer;

/// State every plugin instance carries: identity, placement, visibility
///
/// Implementations embed one `PluginCore` and expose it through
/// `core()`/`core_mut()`; the trait's provided methods do the rest.
#[derive(Debug, Clone)]
pub struct PluginCore {
    pub metadata: PluginMetadata,
    pub config: PluginConfig,
    pub visible: bool,
}

impl PluginCore {
    pub fn new(metadata: PluginMetadata) -> Self {
        Self {
            metadata,
            config: PluginConfig::default(),
            visible: true,
        }
    }

    pub fn with_config(metadata: PluginMetadata, config: PluginConfig) -> Self {
        Self {
            metadata,
            config,
            visible: true,
        }
    }
}

/// Base trait that all overlay plugins implement
///
/// Lifecycle methods are called by the plugin manager only. `initialize`
/// returning `Ok(false)` discards the instance without a `cleanup` call.
/// Errors from any lifecycle method are caught at the manager boundary;
/// a failing plugin never takes the frame loop down with it.
pub trait HudPlugin: Send {
    /// Shared plugin state (metadata, config, visibility)
    fn core(&self) -> &PluginCore;

    /// Mutable access to shared plugin state
    fn core_mut(&mut self) -> &mut PluginCore;

    /// One-time setup; may read and write the blackboard. Returning
    /// `Ok(false)` means the plugin declines to load.
    fn initialize(&mut self, ctx: &mut HudContext) -> PluginResult<bool>;

    /// Per-frame state update, called before rendering for every
    /// enabled plugin
    fn update(&mut self, delta_time: f64, ctx: &mut HudContext) -> PluginResult<()>;

    /// Draw onto the frame and return it. The returned buffer must keep
    /// the session's dimensions; the manager discards mismatched output
    /// and keeps the input frame.
    fn render(&mut self, frame: FrameBuffer, ctx: &HudContext) -> PluginResult<FrameBuffer>;

    /// React to one queued event; called once per event per enabled plugin
    fn handle_event(&mut self, _event: &ContextEvent, _ctx: &mut HudContext) -> PluginResult<()> {
        Ok(())
    }

    /// Handle a key press; `Ok(true)` claims the key and stops dispatch
    fn handle_key(&mut self, _key: Key, _ctx: &mut HudContext) -> PluginResult<bool> {
        Ok(false)
    }

    /// Release resources at unload; never called for instances whose
    /// `initialize` did not return `Ok(true)`
    fn cleanup(&mut self, _ctx: &mut HudContext) -> PluginResult<()> {
        Ok(())
    }

    fn metadata(&self) -> &PluginMetadata {
        &self.core().metadata
    }

    fn name(&self) -> &str {
        &self.core().metadata.name
    }

    fn config(&self) -> &PluginConfig {
        &self.core().config
    }

    fn config_mut(&mut self) -> &mut PluginConfig {
        &mut self.core_mut().config
    }

    fn is_enabled(&self) -> bool {
        self.core().metadata.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.core_mut().metadata.enabled = enabled;
    }

    fn is_visible(&self) -> bool {
        self.core().visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.core_mut().visible = visible;
    }

    fn toggle_visibility(&mut self) {
        let core = self.core_mut();
        core.visible = !core.visible;
    }

    /// Resolved drawing origin for this instance's anchor and offsets
    fn origin(&self, ctx: &HudContext) -> (i32, i32) {
        self.core().config.origin(ctx.frame_width(), ctx.frame_height())
    }

    /// Runtime snapshot for the published plugin roster
    fn status(&self) -> PluginStatus {
        let core = self.core();
        PluginStatus {
            name: core.metadata.name.clone(),
            version: core.metadata.version.clone(),
            author: core.metadata.author.clone(),
            description: core.metadata.description.clone(),
            enabled: core.metadata.enabled,
            visible: core.visible,
            z_index: core.config.z_index,
        }
    }
}
