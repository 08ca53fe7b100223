//! Plugin Manager
//!
//! Central coordinator for plugin lifecycle and the per-frame passes.
//! Owns the type registry and the loaded instances, drives discovery,
//! dependency-ordered loading, hot reload, and the update/event/render/key
//! pipeline. Every plugin call site catches the plugin's failure, logs it
//! with the plugin's identity, and keeps the frame going.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::context::api::{keys, HudContext};
use crate::input::api::Key;
use crate::plugin::builtin;
use crate::plugin::config::PluginConfig;
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::external::manifest::discover_manifest_plugins;
use crate::plugin::registry::PluginRegistry;
use crate::plugin::resolver::resolve_load_order;
use crate::plugin::traits::HudPlugin;
use crate::plugin::types::{DiscoveredPlugin, PluginCommand, PluginMetadata, PluginStatus};
use crate::render::api::FrameBuffer;

/// Configuration for plugin discovery
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Directory scanned for manifest plugins; `None` skips the scan
    pub plugin_dir: Option<PathBuf>,
    /// Plugins to exclude from discovery, by name
    pub excluded_plugins: Vec<String>,
    /// Whether to include compiled-in plugins
    pub include_builtins: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            plugin_dir: None,
            excluded_plugins: Vec::new(),
            include_builtins: true,
        }
    }
}

/// Owns the plugin registry and all loaded plugin instances
pub struct PluginManager {
    registry: PluginRegistry,
    /// Loaded instances in load order; render re-sorts by z-index
    plugins: Vec<Box<dyn HudPlugin>>,
    /// Commands collected from `plugin_command` events, applied between
    /// frames
    pending_commands: Vec<PluginCommand>,
}

impl std::fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginManager")
            .field("registry", &self.registry)
            .field("loaded", &self.loaded_names())
            .field("pending_commands", &self.pending_commands.len())
            .finish()
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginManager {
    pub fn new() -> Self {
        Self {
            registry: PluginRegistry::new(),
            plugins: Vec::new(),
            pending_commands: Vec::new(),
        }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Register one discovered plugin type directly
    pub fn register(&mut self, discovered: DiscoveredPlugin) -> PluginResult<()> {
        self.registry.register(discovered)
    }

    /// Discover plugin types from builtins and the manifest directory
    ///
    /// Returns the number of types registered. A duplicate name or an
    /// unparseable manifest skips that entry and keeps going.
    pub fn discover(&mut self, config: &DiscoveryConfig) -> usize {
        let mut candidates: Vec<DiscoveredPlugin> = Vec::new();

        if config.include_builtins {
            candidates.extend(builtin::api::get_all_builtin_plugins());
        }
        if let Some(dir) = &config.plugin_dir {
            candidates.extend(discover_manifest_plugins(dir));
        }

        let mut registered = 0;
        for discovered in candidates {
            let name = discovered.metadata.name.clone();
            if config.excluded_plugins.contains(&name) {
                log::debug!("Excluding plugin from discovery: {}", name);
                continue;
            }
            match self.registry.register(discovered) {
                Ok(()) => {
                    log::debug!("Discovered plugin: {}", name);
                    registered += 1;
                }
                Err(e) => log::warn!("Skipping duplicate plugin registration: {}", e),
            }
        }

        log::info!("Discovered {} plugins", registered);
        registered
    }

    pub fn loaded_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn loaded_names(&self) -> Vec<String> {
        self.plugins.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn HudPlugin> {
        self.plugins
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn HudPlugin + 'static)> {
        self.plugins
            .iter_mut()
            .find(|p| p.name() == name)
            .map(|p| p.as_mut())
    }

    /// Runtime status of every loaded plugin, in load order
    pub fn list_plugins(&self) -> Vec<PluginStatus> {
        self.plugins.iter().map(|p| p.status()).collect()
    }

    /// Publish the roster snapshot to the blackboard for overlay plugins
    pub fn publish_roster(&self, ctx: &mut HudContext) {
        ctx.provide(keys::PLUGIN_ROSTER, self.list_plugins());
    }

    /// Resolve dependency order over the requested plugins and load each
    ///
    /// A cycle fails the whole batch before anything loads. Requested
    /// names missing from the registry are warned about and skipped.
    /// Returns the names that actually loaded, in load order.
    pub fn load_with_dependencies(
        &mut self,
        requests: Vec<(String, Option<PluginConfig>)>,
        ctx: &mut HudContext,
    ) -> PluginResult<Vec<String>> {
        let candidates: Vec<(String, PluginMetadata)> = requests
            .iter()
            .map(|(name, _)| {
                let metadata = self
                    .registry
                    .metadata(name)
                    .cloned()
                    .unwrap_or_else(|| PluginMetadata {
                        name: name.clone(),
                        ..Default::default()
                    });
                (name.clone(), metadata)
            })
            .collect();

        let order = resolve_load_order(&candidates)?;
        log::info!("Loading plugins in dependency order: {}", order.join(" -> "));

        let mut config_map: HashMap<String, Option<PluginConfig>> = requests.into_iter().collect();

        let mut loaded = Vec::new();
        for name in order {
            if !self.registry.has(&name) {
                log::warn!("Plugin not found: {}", name);
                continue;
            }
            let config = config_map.remove(&name).flatten();
            match self.load(&name, config, ctx) {
                Ok(true) => loaded.push(name),
                Ok(false) => {}
                Err(e) => log::error!("Error loading plugin {}: {}", name, e),
            }
        }
        Ok(loaded)
    }

    /// Instantiate and initialize one registered plugin
    ///
    /// Declared hard dependencies missing from the already-loaded set are
    /// logged as a warning, not an error. `Ok(false)` means the instance
    /// was discarded: it declined to load, failed to initialize, or could
    /// not be constructed.
    pub fn load(
        &mut self,
        name: &str,
        config: Option<PluginConfig>,
        ctx: &mut HudContext,
    ) -> PluginResult<bool> {
        if !self.registry.has(name) {
            return Err(PluginError::PluginNotFound {
                plugin_name: name.to_string(),
            });
        }
        if self.is_loaded(name) {
            log::warn!("Plugin '{}' is already loaded", name);
            return Ok(false);
        }

        if let Some(metadata) = self.registry.metadata(name) {
            let missing: Vec<&str> = metadata
                .dependencies
                .iter()
                .filter(|dep| !self.is_loaded(dep))
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                log::warn!(
                    "Plugin '{}' has missing dependencies: {}",
                    name,
                    missing.join(", ")
                );
            }
        }

        let mut plugin = match self.registry.instantiate(name) {
            Ok(plugin) => plugin,
            Err(e) => {
                log::error!("Error loading plugin {}: {}", name, e);
                return Ok(false);
            }
        };
        if let Some(config) = config {
            plugin.core_mut().config = config;
        }

        match plugin.initialize(ctx) {
            Ok(true) => {
                let metadata = plugin.metadata();
                if metadata.provides.is_empty() {
                    log::info!("Loaded plugin: {} v{}", metadata.name, metadata.version);
                } else {
                    log::info!(
                        "Loaded plugin: {} v{} [provides: {}]",
                        metadata.name,
                        metadata.version,
                        metadata.provides.join(", ")
                    );
                }
                self.plugins.push(plugin);
                Ok(true)
            }
            Ok(false) => {
                log::warn!("Failed to initialize plugin: {}", name);
                Ok(false)
            }
            Err(e) => {
                log::error!("Error initializing plugin {}: {}", name, e);
                Ok(false)
            }
        }
    }

    /// Unload one plugin: `cleanup` (failure logged), then removal
    pub fn unload(&mut self, name: &str, ctx: &mut HudContext) -> PluginResult<()> {
        let index = self
            .plugins
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| PluginError::PluginNotFound {
                plugin_name: name.to_string(),
            })?;

        let mut plugin = self.plugins.remove(index);
        if let Err(e) = plugin.cleanup(ctx) {
            log::error!("Error unloading plugin {}: {}", name, e);
        }
        log::info!("Unloaded plugin: {}", name);
        Ok(())
    }

    /// Hot-replace one loaded plugin
    ///
    /// The new instance is built from the currently registered type and
    /// inherits the old instance's config and visibility; everything else
    /// starts fresh. Returns `Ok(false)` when the plugin is not loaded or
    /// the replacement fails to come up.
    pub fn reload(&mut self, name: &str, ctx: &mut HudContext) -> PluginResult<bool> {
        let Some(plugin) = self.get(name) else {
            log::warn!("Plugin {} not found", name);
            return Ok(false);
        };
        let saved_config = plugin.config().clone();
        let saved_visible = plugin.is_visible();

        self.unload(name, ctx)?;

        match self.load(name, Some(saved_config), ctx) {
            Ok(true) => {
                if let Some(new_plugin) = self.get_mut(name) {
                    new_plugin.set_visible(saved_visible);
                }
                log::info!("Reloaded plugin: {}", name);
                Ok(true)
            }
            Ok(false) => {
                log::warn!("Failed to reload plugin: {}", name);
                Ok(false)
            }
            Err(e) => {
                log::error!("Error reloading plugin {}: {}", name, e);
                Ok(false)
            }
        }
    }

    /// Names of registered plugins whose backing manifest changed on disk
    pub fn check_for_updates(&self) -> Vec<String> {
        self.registry.modified_plugins()
    }

    /// Reload every loaded plugin whose source changed; returns how many
    /// reloaded
    pub fn auto_reload_modified(&mut self, ctx: &mut HudContext) -> usize {
        let modified = self.check_for_updates();
        let mut reloaded = 0;
        for name in modified {
            match self.reload(&name, ctx) {
                Ok(true) => reloaded += 1,
                Ok(false) => {}
                Err(e) => log::error!("Error reloading plugin {}: {}", name, e),
            }
        }
        reloaded
    }

    pub fn enable_plugin(&mut self, name: &str) -> bool {
        match self.get_mut(name) {
            Some(plugin) => {
                plugin.set_enabled(true);
                log::info!("Enabled plugin: {}", name);
                true
            }
            None => {
                log::warn!("Plugin not found: {}", name);
                false
            }
        }
    }

    pub fn disable_plugin(&mut self, name: &str) -> bool {
        match self.get_mut(name) {
            Some(plugin) => {
                plugin.set_enabled(false);
                log::info!("Disabled plugin: {}", name);
                true
            }
            None => {
                log::warn!("Plugin not found: {}", name);
                false
            }
        }
    }

    /// Per-frame update pass over every enabled plugin
    pub fn update_all(&mut self, delta_time: f64, ctx: &mut HudContext) {
        for plugin in &mut self.plugins {
            if !plugin.is_enabled() {
                continue;
            }
            if let Err(e) = plugin.update(delta_time, ctx) {
                log::error!("Error updating plugin {}: {}", plugin.name(), e);
            }
        }
    }

    /// Dispatch this frame's queued events to every enabled plugin, then
    /// clear the queue
    ///
    /// `plugin_command` events are also collected here for
    /// `apply_commands`. Events emitted while dispatching are cleared
    /// with the rest of the batch.
    pub fn dispatch_events(&mut self, ctx: &mut HudContext) {
        let events = ctx.drain_events();
        for event in &events {
            for plugin in &mut self.plugins {
                if !plugin.is_enabled() {
                    continue;
                }
                if let Err(e) = plugin.handle_event(event, ctx) {
                    log::error!("Error handling event in {}: {}", plugin.name(), e);
                }
            }
        }
        self.pending_commands
            .extend(events.iter().filter_map(PluginCommand::from_event));
        ctx.clear_events();
    }

    /// Compose the frame through every enabled-and-visible plugin in
    /// ascending z-index order
    ///
    /// Each plugin's output becomes the next one's input. A plugin that
    /// fails or returns a buffer of the wrong size contributes nothing;
    /// its input frame carries forward unchanged.
    pub fn render_all(&mut self, frame: FrameBuffer, ctx: &HudContext) -> FrameBuffer {
        let mut order: Vec<usize> = (0..self.plugins.len())
            .filter(|&i| self.plugins[i].is_enabled() && self.plugins[i].is_visible())
            .collect();
        order.sort_by_key(|&i| self.plugins[i].config().z_index);

        let mut frame = frame;
        for index in order {
            let snapshot = frame.clone();
            match self.plugins[index].render(frame, ctx) {
                Ok(rendered) => {
                    if rendered.dimensions() == snapshot.dimensions() {
                        frame = rendered;
                    } else {
                        let (w, h) = rendered.dimensions();
                        log::error!(
                            "Plugin '{}' rendered a {}x{} frame into a {}x{} session; output discarded",
                            self.plugins[index].name(),
                            w,
                            h,
                            snapshot.width(),
                            snapshot.height()
                        );
                        frame = snapshot;
                    }
                }
                Err(e) => {
                    log::error!(
                        "Error rendering plugin {}: {}",
                        self.plugins[index].name(),
                        e
                    );
                    frame = snapshot;
                }
            }
        }
        frame
    }

    /// Offer a key to every enabled plugin in load order until one
    /// claims it
    pub fn handle_key(&mut self, key: Key, ctx: &mut HudContext) -> bool {
        for plugin in &mut self.plugins {
            if !plugin.is_enabled() {
                continue;
            }
            match plugin.handle_key(key, ctx) {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => log::error!("Error handling key in {}: {}", plugin.name(), e),
            }
        }
        false
    }

    /// Apply commands collected from `plugin_command` events; returns the
    /// number applied
    pub fn apply_commands(&mut self, ctx: &mut HudContext) -> usize {
        let commands = std::mem::take(&mut self.pending_commands);
        let applied = commands.len();
        for command in commands {
            match command {
                PluginCommand::ToggleEnabled { plugin_name } => {
                    let enabled = self.get(&plugin_name).map(|p| p.is_enabled());
                    match enabled {
                        Some(true) => {
                            self.disable_plugin(&plugin_name);
                        }
                        Some(false) => {
                            self.enable_plugin(&plugin_name);
                        }
                        None => log::warn!("Plugin not found: {}", plugin_name),
                    }
                }
                PluginCommand::ToggleVisibility { plugin_name } => match self.get_mut(&plugin_name)
                {
                    Some(plugin) => plugin.toggle_visibility(),
                    None => log::warn!("Plugin not found: {}", plugin_name),
                },
                PluginCommand::Reload { plugin_name } => {
                    if let Err(e) = self.reload(&plugin_name, ctx) {
                        log::error!("Error reloading plugin {}: {}", plugin_name, e);
                    }
                }
                PluginCommand::ReloadAll => {
                    for name in self.loaded_names() {
                        if let Err(e) = self.reload(&name, ctx) {
                            log::error!("Error reloading plugin {}: {}", name, e);
                        }
                    }
                }
                PluginCommand::AutoReload => {
                    let reloaded = self.auto_reload_modified(ctx);
                    if reloaded > 0 {
                        log::info!("Auto-reloaded {} modified plugins", reloaded);
                    }
                }
            }
        }
        applied
    }

    /// Unload every plugin, most recently loaded first
    pub fn shutdown(&mut self, ctx: &mut HudContext) {
        for name in self.loaded_names().into_iter().rev() {
            if let Err(e) = self.unload(&name, ctx) {
                log::error!("Error unloading plugin {}: {}", name, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::traits::PluginCore;
    use crate::plugin::types::PluginSource;
    use crate::render::api::Color;
    use serde_json::json;

    /// Test plugin that records its lifecycle into the blackboard, so
    /// manager behavior is observable without downcasting
    struct Recorder {
        core: PluginCore,
        init_result: PluginResult<bool>,
        fail_render: bool,
        resize_render: bool,
        paint: Option<Color>,
        claim: Option<Key>,
    }

    impl Recorder {
        fn new(name: &str, deps: &[&str], provides: &[&str], consumes: &[&str]) -> Self {
            let metadata = PluginMetadata {
                name: name.to_string(),
                dependencies: deps.iter().map(|s| s.to_string()).collect(),
                provides: provides.iter().map(|s| s.to_string()).collect(),
                consumes: consumes.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            };
            Self {
                core: PluginCore::new(metadata),
                init_result: Ok(true),
                fail_render: false,
                resize_render: false,
                paint: None,
                claim: None,
            }
        }

        fn bump(ctx: &mut HudContext, key: &str) {
            let next = ctx.get::<u32>(key).copied().unwrap_or(0) + 1;
            ctx.provide(key, next);
        }
    }

    impl HudPlugin for Recorder {
        fn core(&self) -> &PluginCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut PluginCore {
            &mut self.core
        }

        fn initialize(&mut self, ctx: &mut HudContext) -> PluginResult<bool> {
            let mut order = ctx.get::<Vec<String>>("init_order").cloned().unwrap_or_default();
            order.push(self.name().to_string());
            ctx.provide("init_order", order);
            for key in &self.core.metadata.provides.clone() {
                ctx.provide(key, true);
            }
            self.init_result.clone()
        }

        fn update(&mut self, _delta_time: f64, ctx: &mut HudContext) -> PluginResult<()> {
            Self::bump(ctx, &format!("updates.{}", self.name()));
            Ok(())
        }

        fn render(&mut self, mut frame: FrameBuffer, _ctx: &HudContext) -> PluginResult<FrameBuffer> {
            if self.resize_render {
                return Ok(FrameBuffer::new(8, 8));
            }
            if let Some(color) = self.paint {
                frame.fill(color);
            }
            if self.fail_render {
                return Err(PluginError::ExecutionError {
                    plugin_name: self.name().to_string(),
                    operation: "render".to_string(),
                    cause: "scripted failure".to_string(),
                });
            }
            Ok(frame)
        }

        fn handle_event(
            &mut self,
            event: &crate::context::api::ContextEvent,
            ctx: &mut HudContext,
        ) -> PluginResult<()> {
            Self::bump(ctx, &format!("events.{}.{}", self.name(), event.event_type));
            Ok(())
        }

        fn handle_key(&mut self, key: Key, ctx: &mut HudContext) -> PluginResult<bool> {
            if self.claim == Some(key) {
                ctx.provide("claimed_by", self.name().to_string());
                return Ok(true);
            }
            Ok(false)
        }

        fn cleanup(&mut self, ctx: &mut HudContext) -> PluginResult<()> {
            let mut order = ctx
                .get::<Vec<String>>("cleanup_order")
                .cloned()
                .unwrap_or_default();
            order.push(self.name().to_string());
            ctx.provide("cleanup_order", order);
            Ok(())
        }
    }

    fn discovered(factory: fn() -> Box<dyn HudPlugin>) -> DiscoveredPlugin {
        DiscoveredPlugin {
            metadata: factory().metadata().clone(),
            source: PluginSource::Builtin { factory },
        }
    }

    fn provider() -> Box<dyn HudPlugin> {
        Box::new(Recorder::new("provider", &[], &["feed"], &[]))
    }

    fn consumer() -> Box<dyn HudPlugin> {
        Box::new(Recorder::new("consumer", &[], &[], &["feed"]))
    }

    fn independent() -> Box<dyn HudPlugin> {
        Box::new(Recorder::new("independent", &[], &[], &[]))
    }

    fn hard_dependent() -> Box<dyn HudPlugin> {
        Box::new(Recorder::new("hard_dependent", &["provider"], &[], &[]))
    }

    fn decliner() -> Box<dyn HudPlugin> {
        let mut plugin = Recorder::new("decliner", &[], &[], &[]);
        plugin.init_result = Ok(false);
        Box::new(plugin)
    }

    fn cyclic_a() -> Box<dyn HudPlugin> {
        Box::new(Recorder::new("cyclic_a", &["cyclic_b"], &[], &[]))
    }

    fn cyclic_b() -> Box<dyn HudPlugin> {
        Box::new(Recorder::new("cyclic_b", &["cyclic_a"], &[], &[]))
    }

    fn red_low() -> Box<dyn HudPlugin> {
        let mut plugin = Recorder::new("red_low", &[], &[], &[]);
        plugin.paint = Some(Color::RED);
        plugin.core.config.z_index = 1;
        Box::new(plugin)
    }

    fn green_high() -> Box<dyn HudPlugin> {
        let mut plugin = Recorder::new("green_high", &[], &[], &[]);
        plugin.paint = Some(Color::GREEN);
        plugin.core.config.z_index = 10;
        Box::new(plugin)
    }

    fn faulty_painter() -> Box<dyn HudPlugin> {
        let mut plugin = Recorder::new("faulty_painter", &[], &[], &[]);
        plugin.paint = Some(Color::WHITE);
        plugin.fail_render = true;
        Box::new(plugin)
    }

    fn resizer() -> Box<dyn HudPlugin> {
        let mut plugin = Recorder::new("resizer", &[], &[], &[]);
        plugin.resize_render = true;
        Box::new(plugin)
    }

    fn claimer() -> Box<dyn HudPlugin> {
        let mut plugin = Recorder::new("claimer", &[], &[], &[]);
        plugin.claim = Some(Key::Char('x'));
        Box::new(plugin)
    }

    fn request(names: &[&str]) -> Vec<(String, Option<PluginConfig>)> {
        names.iter().map(|n| (n.to_string(), None)).collect()
    }

    #[test]
    fn test_load_with_dependencies_orders_by_data_flow() {
        let mut manager = PluginManager::new();
        manager.register(discovered(consumer)).unwrap();
        manager.register(discovered(provider)).unwrap();

        let mut ctx = HudContext::new(64, 64);
        let loaded = manager
            .load_with_dependencies(request(&["consumer", "provider"]), &mut ctx)
            .unwrap();

        assert_eq!(loaded, vec!["provider", "consumer"]);
        assert_eq!(
            ctx.get::<Vec<String>>("init_order").unwrap(),
            &vec!["provider".to_string(), "consumer".to_string()]
        );
    }

    #[test]
    fn test_cycle_aborts_batch_atomically() {
        let mut manager = PluginManager::new();
        manager.register(discovered(cyclic_a)).unwrap();
        manager.register(discovered(cyclic_b)).unwrap();
        manager.register(discovered(independent)).unwrap();

        let mut ctx = HudContext::new(64, 64);
        let err = manager
            .load_with_dependencies(request(&["cyclic_a", "cyclic_b", "independent"]), &mut ctx)
            .unwrap_err();

        assert_eq!(
            err,
            PluginError::CircularDependency {
                plugin_names: vec!["cyclic_a".to_string(), "cyclic_b".to_string()]
            }
        );
        assert_eq!(manager.loaded_count(), 0);
        assert!(ctx.get::<Vec<String>>("init_order").is_none());
    }

    #[test]
    fn test_unknown_request_is_skipped_with_warning() {
        let mut manager = PluginManager::new();
        manager.register(discovered(independent)).unwrap();

        let mut ctx = HudContext::new(64, 64);
        let loaded = manager
            .load_with_dependencies(request(&["independent", "ghost"]), &mut ctx)
            .unwrap();

        assert_eq!(loaded, vec!["independent"]);
    }

    #[test]
    fn test_missing_hard_dependency_is_non_fatal() {
        let mut manager = PluginManager::new();
        manager.register(discovered(hard_dependent)).unwrap();

        let mut ctx = HudContext::new(64, 64);
        // provider is not even registered; load proceeds with a warning
        assert!(manager.load("hard_dependent", None, &mut ctx).unwrap());
        assert!(manager.is_loaded("hard_dependent"));
    }

    #[test]
    fn test_declined_initialize_never_enters_loaded_set() {
        let mut manager = PluginManager::new();
        manager.register(discovered(decliner)).unwrap();

        let mut ctx = HudContext::new(64, 64);
        assert!(!manager.load("decliner", None, &mut ctx).unwrap());
        assert!(!manager.is_loaded("decliner"));

        manager.update_all(0.016, &mut ctx);
        assert!(ctx.get::<u32>("updates.decliner").is_none());
        assert!(ctx.get::<Vec<String>>("cleanup_order").is_none());
    }

    #[test]
    fn test_load_twice_is_rejected() {
        let mut manager = PluginManager::new();
        manager.register(discovered(independent)).unwrap();

        let mut ctx = HudContext::new(64, 64);
        assert!(manager.load("independent", None, &mut ctx).unwrap());
        assert!(!manager.load("independent", None, &mut ctx).unwrap());
        assert_eq!(manager.loaded_count(), 1);
    }

    #[test]
    fn test_disabled_plugin_is_skipped_by_passes() {
        let mut manager = PluginManager::new();
        manager.register(discovered(independent)).unwrap();

        let mut ctx = HudContext::new(64, 64);
        manager.load("independent", None, &mut ctx).unwrap();
        assert!(manager.disable_plugin("independent"));

        manager.update_all(0.016, &mut ctx);
        assert!(ctx.get::<u32>("updates.independent").is_none());

        // still loaded, no cleanup happened
        assert!(manager.is_loaded("independent"));
        assert!(ctx.get::<Vec<String>>("cleanup_order").is_none());

        assert!(manager.enable_plugin("independent"));
        manager.update_all(0.016, &mut ctx);
        assert_eq!(ctx.get::<u32>("updates.independent"), Some(&1));
    }

    #[test]
    fn test_render_order_follows_z_index_not_load_order() {
        let mut manager = PluginManager::new();
        manager.register(discovered(green_high)).unwrap();
        manager.register(discovered(red_low)).unwrap();

        let mut ctx = HudContext::new(16, 16);
        // load the high-z plugin first; low-z must still paint first
        manager.load("green_high", None, &mut ctx).unwrap();
        manager.load("red_low", None, &mut ctx).unwrap();

        let frame = manager.render_all(FrameBuffer::new(16, 16), &ctx);
        assert_eq!(frame.pixel(0, 0), Some(Color::GREEN));
    }

    #[test]
    fn test_render_fault_restores_input_frame() {
        let mut manager = PluginManager::new();
        manager.register(discovered(faulty_painter)).unwrap();

        let mut ctx = HudContext::new(16, 16);
        manager.load("faulty_painter", None, &mut ctx).unwrap();

        // the plugin paints the whole frame white and then fails; none of
        // its output may survive
        let frame = manager.render_all(FrameBuffer::new(16, 16), &ctx);
        assert_eq!(frame.pixel(8, 8), Some(Color::BLACK));
    }

    #[test]
    fn test_render_dimension_mismatch_is_discarded() {
        let mut manager = PluginManager::new();
        manager.register(discovered(resizer)).unwrap();

        let mut ctx = HudContext::new(16, 16);
        manager.load("resizer", None, &mut ctx).unwrap();

        let frame = manager.render_all(FrameBuffer::new(16, 16), &ctx);
        assert_eq!(frame.dimensions(), (16, 16));
    }

    #[test]
    fn test_invisible_plugin_updates_but_does_not_render(){
        let mut manager = PluginManager::new();
        manager.register(discovered(red_low)).unwrap();

        let mut ctx = HudContext::new(16, 16);
        manager.load("red_low", None, &mut ctx).unwrap();
        manager.get_mut("red_low").unwrap().set_visible(false);

        manager.update_all(0.016, &mut ctx);
        assert_eq!(ctx.get::<u32>("updates.red_low"), Some(&1));

        let frame = manager.render_all(FrameBuffer::new(16, 16), &ctx);
        assert_eq!(frame.pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_event_dispatch_reaches_enabled_plugins_then_clears() {
        let mut manager = PluginManager::new();
        manager.register(discovered(independent)).unwrap();
        manager.register(discovered(provider)).unwrap();

        let mut ctx = HudContext::new(16, 16);
        manager.load("independent", None, &mut ctx).unwrap();
        manager.load("provider", None, &mut ctx).unwrap();
        manager.disable_plugin("provider");

        ctx.emit("alert", json!({"level": 1}));
        manager.dispatch_events(&mut ctx);

        assert_eq!(ctx.get::<u32>("events.independent.alert"), Some(&1));
        assert!(ctx.get::<u32>("events.provider.alert").is_none());
        assert_eq!(ctx.pending_events(), 0);
    }

    #[test]
    fn test_key_dispatch_stops_at_first_claim() {
        let mut manager = PluginManager::new();
        manager.register(discovered(claimer)).unwrap();
        manager.register(discovered(independent)).unwrap();

        let mut ctx = HudContext::new(16, 16);
        manager.load("claimer", None, &mut ctx).unwrap();
        manager.load("independent", None, &mut ctx).unwrap();

        assert!(manager.handle_key(Key::Char('x'), &mut ctx));
        assert_eq!(
            ctx.get::<String>("claimed_by").map(String::as_str),
            Some("claimer")
        );
        assert!(!manager.handle_key(Key::Char('q'), &mut ctx));
    }

    #[test]
    fn test_reload_preserves_config_and_visibility() {
        let mut manager = PluginManager::new();
        manager.register(discovered(independent)).unwrap();

        let mut ctx = HudContext::new(16, 16);
        let config = PluginConfig {
            z_index: 5,
            ..Default::default()
        };
        manager.load("independent", Some(config), &mut ctx).unwrap();
        manager.get_mut("independent").unwrap().set_visible(false);

        manager.update_all(0.016, &mut ctx);
        assert_eq!(ctx.get::<u32>("updates.independent"), Some(&1));

        assert!(manager.reload("independent", &mut ctx).unwrap());

        let plugin = manager.get("independent").unwrap();
        assert_eq!(plugin.config().z_index, 5);
        assert!(!plugin.is_visible());
        // fresh instance went through initialize again
        assert_eq!(
            ctx.get::<Vec<String>>("init_order").unwrap().len(),
            2
        );
    }

    #[test]
    fn test_reload_unloaded_plugin_returns_false() {
        let mut manager = PluginManager::new();
        manager.register(discovered(independent)).unwrap();

        let mut ctx = HudContext::new(16, 16);
        assert!(!manager.reload("independent", &mut ctx).unwrap());
    }

    #[test]
    fn test_plugin_command_events_apply_between_frames() {
        let mut manager = PluginManager::new();
        manager.register(discovered(independent)).unwrap();

        let mut ctx = HudContext::new(16, 16);
        manager.load("independent", None, &mut ctx).unwrap();

        let command = PluginCommand::ToggleEnabled {
            plugin_name: "independent".to_string(),
        };
        let event = command.to_event();
        ctx.emit(&event.event_type, event.data);

        manager.dispatch_events(&mut ctx);
        assert_eq!(manager.apply_commands(&mut ctx), 1);
        assert!(!manager.get("independent").unwrap().is_enabled());
    }

    #[test]
    fn test_roster_snapshot_published_to_blackboard() {
        let mut manager = PluginManager::new();
        manager.register(discovered(independent)).unwrap();

        let mut ctx = HudContext::new(16, 16);
        manager.load("independent", None, &mut ctx).unwrap();
        manager.publish_roster(&mut ctx);

        let roster = ctx.get::<Vec<PluginStatus>>(keys::PLUGIN_ROSTER).unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "independent");
        assert!(roster[0].enabled);
    }

    #[test]
    fn test_shutdown_unloads_in_reverse_order() {
        let mut manager = PluginManager::new();
        manager.register(discovered(provider)).unwrap();
        manager.register(discovered(consumer)).unwrap();

        let mut ctx = HudContext::new(16, 16);
        manager
            .load_with_dependencies(request(&["provider", "consumer"]), &mut ctx)
            .unwrap();

        manager.shutdown(&mut ctx);
        assert_eq!(manager.loaded_count(), 0);
        assert_eq!(
            ctx.get::<Vec<String>>("cleanup_order").unwrap(),
            &vec!["consumer".to_string(), "provider".to_string()]
        );
    }

    #[test]
    fn test_discovery_respects_exclusions() {
        let mut manager = PluginManager::new();
        let config = DiscoveryConfig {
            plugin_dir: None,
            excluded_plugins: vec!["fps_counter".to_string()],
            include_builtins: true,
        };
        manager.discover(&config);

        assert!(!manager.registry().has("fps_counter"));
        assert!(manager.registry().has("compass"));
    }
}
