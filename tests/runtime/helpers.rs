//! Fixture plugins for runtime integration tests
//!
//! The crate's internal mocks are not visible here, so the fixtures are
//! built on the public plugin API only.

use scopehud::context::api::HudContext;
use scopehud::input::api::Key;
use scopehud::plugin::api::{
    DiscoveredPlugin, HudPlugin, PluginCore, PluginMetadata, PluginResult, PluginSource,
};
use scopehud::render::api::{Color, FrameBuffer};

/// Scriptable fixture plugin
pub struct Fixture {
    core: PluginCore,
    pub decline_init: bool,
    pub fail_render: bool,
    pub paint: Option<Color>,
    pub claim: Option<Key>,
}

impl Fixture {
    pub fn new(name: &str, deps: &[&str], provides: &[&str], consumes: &[&str]) -> Self {
        let metadata = PluginMetadata {
            name: name.to_string(),
            dependencies: deps.iter().map(|s| s.to_string()).collect(),
            provides: provides.iter().map(|s| s.to_string()).collect(),
            consumes: consumes.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        Self {
            core: PluginCore::new(metadata),
            decline_init: false,
            fail_render: false,
            paint: None,
            claim: None,
        }
    }
}

impl HudPlugin for Fixture {
    fn core(&self) -> &PluginCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PluginCore {
        &mut self.core
    }

    fn initialize(&mut self, ctx: &mut HudContext) -> PluginResult<bool> {
        let mut order = ctx
            .get::<Vec<String>>("init_order")
            .cloned()
            .unwrap_or_default();
        order.push(self.name().to_string());
        ctx.provide("init_order", order);
        for key in self.core.metadata.provides.clone() {
            ctx.provide(&key, true);
        }
        Ok(!self.decline_init)
    }

    fn update(&mut self, _delta_time: f64, ctx: &mut HudContext) -> PluginResult<()> {
        let key = format!("updates.{}", self.name());
        let next = ctx.get::<u32>(&key).copied().unwrap_or(0) + 1;
        ctx.provide(&key, next);
        Ok(())
    }

    fn render(&mut self, mut frame: FrameBuffer, _ctx: &HudContext) -> PluginResult<FrameBuffer> {
        if let Some(color) = self.paint {
            frame.fill(color);
        }
        if self.fail_render {
            return Err(scopehud::plugin::api::PluginError::ExecutionError {
                plugin_name: self.name().to_string(),
                operation: "render".to_string(),
                cause: "scripted failure".to_string(),
            });
        }
        Ok(frame)
    }

    fn handle_key(&mut self, key: Key, ctx: &mut HudContext) -> PluginResult<bool> {
        if self.claim == Some(key) {
            ctx.provide("claimed_by", self.name().to_string());
            return Ok(true);
        }
        Ok(false)
    }
}

/// A `DiscoveredPlugin` wrapping a fixture factory
pub fn discovered(factory: fn() -> Box<dyn HudPlugin>) -> DiscoveredPlugin {
    DiscoveredPlugin {
        metadata: factory().metadata().clone(),
        source: PluginSource::Builtin { factory },
    }
}
