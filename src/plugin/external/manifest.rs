//! Manifest-defined widget plugins
//!
//! External plugins are TOML manifests in the plugin directory, one file
//! per plugin. A manifest declares the same metadata a builtin registers
//! plus a `[widget]` table choosing a draw style. The file is re-parsed
//! every time an instance is constructed, so editing a manifest and
//! reloading the plugin picks up the change without a restart.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::context::api::HudContext;
use crate::plugin::config::PluginConfig;
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::traits::{HudPlugin, PluginCore};
use crate::plugin::types::{DiscoveredPlugin, PluginMetadata, PluginSource};
use crate::render::api::{Color, FrameBuffer};

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_scale() -> u32 {
    2
}

fn default_color() -> String {
    "white".to_string()
}

fn default_size() -> u32 {
    40
}

fn default_gap() -> u32 {
    8
}

fn default_thickness() -> u32 {
    1
}

/// Parsed plugin manifest
#[derive(Debug, Clone, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub provides: Vec<String>,
    #[serde(default)]
    pub consumes: Vec<String>,
    pub widget: WidgetSpec,
    #[serde(default)]
    pub config: PluginConfig,
}

/// Draw style for a manifest plugin
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WidgetSpec {
    /// Static text at the configured origin
    Label {
        text: String,
        #[serde(default = "default_scale")]
        scale: u32,
        #[serde(default = "default_color")]
        color: String,
    },
    /// Center-gap crosshair around the configured origin
    Crosshair {
        #[serde(default = "default_size")]
        size: u32,
        #[serde(default = "default_gap")]
        gap: u32,
        #[serde(default = "default_thickness")]
        thickness: u32,
        #[serde(default = "default_color")]
        color: String,
    },
}

impl PluginManifest {
    /// Read and parse a manifest file
    pub fn from_path(path: &Path) -> PluginResult<PluginManifest> {
        let raw = std::fs::read_to_string(path).map_err(|e| PluginError::DiscoveryError {
            message: format!("cannot read manifest {}: {}", path.display(), e),
        })?;
        toml::from_str(&raw).map_err(|e| PluginError::DiscoveryError {
            message: format!("invalid manifest {}: {}", path.display(), e),
        })
    }

    pub fn metadata(&self) -> PluginMetadata {
        PluginMetadata {
            name: self.name.clone(),
            version: self.version.clone(),
            author: self.author.clone(),
            description: self.description.clone(),
            dependencies: self.dependencies.clone(),
            provides: self.provides.clone(),
            consumes: self.consumes.clone(),
            enabled: true,
        }
    }
}

/// Plugin instance backed by a manifest file
pub struct ManifestPlugin {
    core: PluginCore,
    widget: WidgetSpec,
    color: Color,
}

impl ManifestPlugin {
    pub fn from_manifest(manifest: &PluginManifest) -> ManifestPlugin {
        let color_name = match &manifest.widget {
            WidgetSpec::Label { color, .. } => color,
            WidgetSpec::Crosshair { color, .. } => color,
        };
        let color = Color::parse(color_name).unwrap_or(Color::WHITE);
        ManifestPlugin {
            core: PluginCore::with_config(manifest.metadata(), manifest.config.clone()),
            widget: manifest.widget.clone(),
            color,
        }
    }

    pub fn from_path(path: &Path) -> PluginResult<ManifestPlugin> {
        Ok(ManifestPlugin::from_manifest(&PluginManifest::from_path(path)?))
    }
}

impl HudPlugin for ManifestPlugin {
    fn core(&self) -> &PluginCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PluginCore {
        &mut self.core
    }

    fn initialize(&mut self, _ctx: &mut HudContext) -> PluginResult<bool> {
        log::debug!("Manifest plugin '{}' initialized", self.name());
        Ok(true)
    }

    fn update(&mut self, _delta_time: f64, _ctx: &mut HudContext) -> PluginResult<()> {
        Ok(())
    }

    fn render(&mut self, mut frame: FrameBuffer, ctx: &HudContext) -> PluginResult<FrameBuffer> {
        let (x, y) = self.origin(ctx);
        match &self.widget {
            WidgetSpec::Label { text, scale, .. } => {
                frame.draw_text(text, x, y, *scale, self.color);
            }
            WidgetSpec::Crosshair {
                size,
                gap,
                thickness,
                ..
            } => {
                let size = *size as i32;
                let gap = *gap as i32;
                for offset in 0..*thickness as i32 {
                    let t = offset - (*thickness as i32 / 2);
                    frame.draw_line(x - size, y + t, x - gap, y + t, self.color);
                    frame.draw_line(x + gap, y + t, x + size, y + t, self.color);
                    frame.draw_line(x + t, y - size, x + t, y - gap, self.color);
                    frame.draw_line(x + t, y + gap, x + t, y + size, self.color);
                }
            }
        }
        Ok(frame)
    }
}

/// Scan a directory for `*.toml` manifests
///
/// Unparseable manifests are logged and skipped; they never abort
/// discovery of the rest.
pub fn discover_manifest_plugins(plugin_dir: &Path) -> Vec<DiscoveredPlugin> {
    let pattern = plugin_dir.join("*.toml");
    let Some(pattern) = pattern.to_str().map(str::to_string) else {
        log::warn!("Plugin directory path is not valid UTF-8: {}", plugin_dir.display());
        return Vec::new();
    };

    let paths = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(e) => {
            log::warn!("Cannot scan plugin directory {}: {}", plugin_dir.display(), e);
            return Vec::new();
        }
    };

    let mut discovered: Vec<DiscoveredPlugin> = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                log::warn!("Skipping unreadable manifest: {}", e);
                continue;
            }
        };
        match PluginManifest::from_path(&path) {
            Ok(manifest) => {
                if let Some(previous) = seen.get(&manifest.name) {
                    log::warn!(
                        "Skipping manifest {}: plugin '{}' already discovered from {}",
                        path.display(),
                        manifest.name,
                        previous.display()
                    );
                    continue;
                }
                log::debug!(
                    "Discovered manifest plugin '{}' from {}",
                    manifest.name,
                    path.display()
                );
                seen.insert(manifest.name.clone(), path.clone());
                discovered.push(DiscoveredPlugin {
                    metadata: manifest.metadata(),
                    source: PluginSource::Manifest { path },
                });
            }
            Err(e) => {
                log::warn!("{}", e);
            }
        }
    }

    discovered
}
