//! Public API for the plugin system
//!
//! External modules should import from here rather than directly from
//! internal modules.

// Core plugin management
pub use crate::plugin::manager::{DiscoveryConfig, PluginManager};

// Error handling
pub use crate::plugin::error::{PluginError, PluginResult};

// The plugin trait and its embedded state
pub use crate::plugin::traits::{HudPlugin, PluginCore};

// Plugin metadata, discovery records and runtime commands
pub use crate::plugin::types::{
    DiscoveredPlugin, PluginCommand, PluginMetadata, PluginSource, PluginStatus,
    PLUGIN_COMMAND_EVENT,
};

// Per-plugin placement and settings
pub use crate::plugin::config::{AnchorPosition, PluginConfig, DEFAULT_EDGE_INSET};

// Plugin registry for management
pub use crate::plugin::registry::PluginRegistry;

// Manifest-defined plugins
pub use crate::plugin::external::manifest::{
    discover_manifest_plugins, ManifestPlugin, PluginManifest, WidgetSpec,
};
