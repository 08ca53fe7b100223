//! Blackboard Error Handling
//!
//! Error types for strict blackboard access. Soft accessors never fail;
//! these errors only arise from the hard-dependency accessor.

use thiserror::Error;

/// Result type alias for blackboard operations
pub type ContextResult<T> = std::result::Result<T, ContextError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContextError {
    /// Strict accessor called for a key that is absent
    #[error("Plugin '{plugin_name}' requires '{key}' in context. Make sure the providing plugin is loaded first and has lower z_index.")]
    MissingHardDependency { plugin_name: String, key: String },

    /// Key present but the stored value has a different type than requested
    #[error("Plugin '{plugin_name}' requires '{key}' as {expected}, but the stored value has a different type")]
    TypeMismatch {
        plugin_name: String,
        key: String,
        expected: &'static str,
    },
}
