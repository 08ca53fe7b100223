//! Type definitions for the plugin system
//!
//! This module contains the core data structures used throughout
//! the plugin system for metadata, discovery, and plugin management.

use std::path::PathBuf;

use crate::context::api::ContextEvent;
use crate::plugin::traits::HudPlugin;

/// Plugin metadata, fixed at registration time
///
/// `dependencies` names plugins that must load first regardless of data
/// flow. `provides`/`consumes` name blackboard keys and drive inferred
/// ordering during dependency resolution. `enabled` is the only field the
/// runtime toggles after registration.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginMetadata {
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
    pub dependencies: Vec<String>,
    pub provides: Vec<String>,
    pub consumes: Vec<String>,
    pub enabled: bool,
}

impl Default for PluginMetadata {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: "1.0.0".to_string(),
            author: String::new(),
            description: String::new(),
            dependencies: Vec::new(),
            provides: Vec::new(),
            consumes: Vec::new(),
            enabled: true,
        }
    }
}

/// Snapshot of one loaded plugin, published to the blackboard each frame
/// so overlay plugins (the control panel) can display runtime state
#[derive(Debug, Clone, PartialEq)]
pub struct PluginStatus {
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
    pub enabled: bool,
    pub visible: bool,
    pub z_index: i32,
}

/// Discovery result with plugin metadata and loading mechanism
pub struct DiscoveredPlugin {
    pub metadata: PluginMetadata,
    pub source: PluginSource,
}

impl std::fmt::Debug for DiscoveredPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveredPlugin")
            .field("metadata", &self.metadata)
            .field("source", &self.source)
            .finish()
    }
}

/// Source of a discovered plugin
#[derive(Clone)]
pub enum PluginSource {
    /// Compiled-in plugin factory
    Builtin {
        factory: fn() -> Box<dyn HudPlugin>,
    },
    /// TOML widget manifest on disk
    Manifest { path: PathBuf },
}

impl std::fmt::Debug for PluginSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginSource::Builtin { .. } => f.write_str("Builtin"),
            PluginSource::Manifest { path } => f.debug_struct("Manifest").field("path", path).finish(),
        }
    }
}

/// Event type plugins emit to ask the manager to change another plugin
pub const PLUGIN_COMMAND_EVENT: &str = "plugin_command";

/// Runtime command parsed from a `plugin_command` event
///
/// Plugins cannot hold a reference to the manager that owns them, so
/// control-style plugins emit these as events and the manager applies
/// them between frames.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginCommand {
    ToggleEnabled { plugin_name: String },
    ToggleVisibility { plugin_name: String },
    Reload { plugin_name: String },
    ReloadAll,
    /// One auto-reload sweep over modified manifest plugins
    AutoReload,
}

impl PluginCommand {
    /// Parse a queued event into a command; `None` for unrelated event
    /// types or malformed payloads
    pub fn from_event(event: &ContextEvent) -> Option<PluginCommand> {
        if event.event_type != PLUGIN_COMMAND_EVENT {
            return None;
        }
        let action = event.data.get("action")?.as_str()?;
        let plugin_name = || {
            event
                .data
                .get("plugin")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };
        match action {
            "toggle_enabled" => Some(PluginCommand::ToggleEnabled {
                plugin_name: plugin_name()?,
            }),
            "toggle_visibility" => Some(PluginCommand::ToggleVisibility {
                plugin_name: plugin_name()?,
            }),
            "reload" => Some(PluginCommand::Reload {
                plugin_name: plugin_name()?,
            }),
            "reload_all" => Some(PluginCommand::ReloadAll),
            "auto_reload" => Some(PluginCommand::AutoReload),
            _ => None,
        }
    }

    /// Build the event a plugin emits to request this command
    pub fn to_event(&self) -> ContextEvent {
        let data = match self {
            PluginCommand::ToggleEnabled { plugin_name } => {
                serde_json::json!({"action": "toggle_enabled", "plugin": plugin_name})
            }
            PluginCommand::ToggleVisibility { plugin_name } => {
                serde_json::json!({"action": "toggle_visibility", "plugin": plugin_name})
            }
            PluginCommand::Reload { plugin_name } => {
                serde_json::json!({"action": "reload", "plugin": plugin_name})
            }
            PluginCommand::ReloadAll => serde_json::json!({"action": "reload_all"}),
            PluginCommand::AutoReload => serde_json::json!({"action": "auto_reload"}),
        };
        ContextEvent::new(PLUGIN_COMMAND_EVENT, data)
    }
}
