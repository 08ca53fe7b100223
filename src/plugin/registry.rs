//! Plugin Registry
//!
//! Name-keyed registry of discovered plugin types. Registration never
//! instantiates anything; the registry hands out fresh instances on
//! demand and tracks manifest modification times so the manager can spot
//! edited plugins.

use std::time::SystemTime;

use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::external::manifest::ManifestPlugin;
use crate::plugin::traits::HudPlugin;
use crate::plugin::types::{DiscoveredPlugin, PluginMetadata, PluginSource};

/// One registered plugin type
pub(crate) struct RegisteredPlugin {
    pub discovered: DiscoveredPlugin,
    /// Manifest mtime seen at registration or last reload; `None` for
    /// builtins, which have no backing file
    pub recorded_mtime: Option<SystemTime>,
}

/// Registry of discovered plugin types, keyed by plugin name
///
/// Registration order is preserved; it is the default candidate order
/// when no explicit load list is given.
pub struct PluginRegistry {
    entries: Vec<RegisteredPlugin>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.names())
            .finish()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register a discovered plugin type; duplicate names are rejected
    pub fn register(&mut self, discovered: DiscoveredPlugin) -> PluginResult<()> {
        let name = discovered.metadata.name.clone();
        if self.has(&name) {
            return Err(PluginError::AlreadyRegistered { plugin_name: name });
        }

        let recorded_mtime = match &discovered.source {
            PluginSource::Builtin { .. } => None,
            PluginSource::Manifest { path } => manifest_mtime(path),
        };
        self.entries.push(RegisteredPlugin {
            discovered,
            recorded_mtime,
        });
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.discovered.metadata.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.discovered.metadata.name.clone())
            .collect()
    }

    pub fn metadata(&self, name: &str) -> Option<&PluginMetadata> {
        self.entry(name).map(|e| &e.discovered.metadata)
    }

    /// Whether the named plugin is backed by a manifest file
    pub fn is_manifest(&self, name: &str) -> bool {
        matches!(
            self.entry(name).map(|e| &e.discovered.source),
            Some(PluginSource::Manifest { .. })
        )
    }

    pub(crate) fn entry(&self, name: &str) -> Option<&RegisteredPlugin> {
        self.entries
            .iter()
            .find(|e| e.discovered.metadata.name == name)
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut RegisteredPlugin> {
        self.entries
            .iter_mut()
            .find(|e| e.discovered.metadata.name == name)
    }

    /// Construct a fresh instance of a registered plugin
    ///
    /// Builtins come from their registered factory. Manifest plugins
    /// re-parse their file, so an edited manifest takes effect on the
    /// next instantiation; the registered metadata and recorded mtime
    /// are refreshed at the same time. A manifest that changed its
    /// `name` no longer matches its registration and fails.
    pub fn instantiate(&mut self, name: &str) -> PluginResult<Box<dyn HudPlugin>> {
        let source = self
            .entry(name)
            .map(|e| e.discovered.source.clone())
            .ok_or_else(|| PluginError::PluginNotFound {
                plugin_name: name.to_string(),
            })?;

        match source {
            PluginSource::Builtin { factory } => Ok(factory()),
            PluginSource::Manifest { path } => {
                let plugin = ManifestPlugin::from_path(&path)?;
                if plugin.name() != name {
                    return Err(PluginError::LoadError {
                        plugin_name: name.to_string(),
                        cause: format!(
                            "manifest {} now declares name '{}'",
                            path.display(),
                            plugin.name()
                        ),
                    });
                }
                if let Some(entry) = self.entry_mut(name) {
                    entry.discovered.metadata = plugin.metadata().clone();
                    entry.recorded_mtime = manifest_mtime(&path);
                }
                Ok(Box::new(plugin))
            }
        }
    }

    /// Names of plugins whose backing manifest changed since it was
    /// recorded; recorded times are left untouched until a reload
    pub fn modified_plugins(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|e| {
                let PluginSource::Manifest { path } = &e.discovered.source else {
                    return None;
                };
                let recorded = e.recorded_mtime?;
                let current = manifest_mtime(path)?;
                if current > recorded {
                    Some(e.discovered.metadata.name.clone())
                } else {
                    None
                }
            })
            .collect()
    }
}

fn manifest_mtime(path: &std::path::Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
