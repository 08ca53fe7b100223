//! Plugin Error Types

use crate::context::api::ContextError;

/// Result type alias for plugin operations
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Error types for plugin system operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PluginError {
    /// Plugin not found in the registry
    #[error("Plugin not found: {plugin_name}")]
    PluginNotFound { plugin_name: String },

    /// A plugin with the same name is already registered
    #[error("Plugin already registered: {plugin_name}")]
    AlreadyRegistered { plugin_name: String },

    /// Dependency resolution found a cycle; names list only the plugins
    /// that are part of the cycle, in registration order
    #[error("Circular dependency detected among plugins: {}", .plugin_names.join(", "))]
    CircularDependency { plugin_names: Vec<String> },

    /// Plugin failed to load or initialize
    #[error("Failed to load plugin '{plugin_name}': {cause}")]
    LoadError { plugin_name: String, cause: String },

    /// Plugin execution failed
    #[error("Plugin '{plugin_name}' failed during '{operation}': {cause}")]
    ExecutionError {
        plugin_name: String,
        operation: String,
        cause: String,
    },

    /// Plugin discovery failed (unreadable directory, bad manifest)
    #[error("Plugin discovery failed: {message}")]
    DiscoveryError { message: String },

    /// Shared context error surfaced through a plugin operation
    #[error(transparent)]
    Context(#[from] ContextError),
}

impl crate::core::error_handling::ContextualError for PluginError {
    fn is_user_actionable(&self) -> bool {
        match self {
            // The operator can fix these: rename a plugin, break the cycle,
            // point --plugin-dir at a real directory, reorder loading
            PluginError::PluginNotFound { .. } => true,
            PluginError::AlreadyRegistered { .. } => true,
            PluginError::CircularDependency { .. } => true,
            PluginError::DiscoveryError { .. } => true,
            PluginError::Context(ContextError::MissingHardDependency { .. }) => true,
            // Internal plugin failures
            PluginError::LoadError { .. } => false,
            PluginError::ExecutionError { .. } => false,
            PluginError::Context(_) => false,
        }
    }

    fn user_message(&self) -> Option<String> {
        if self.is_user_actionable() {
            Some(self.to_string())
        } else {
            None
        }
    }
}
