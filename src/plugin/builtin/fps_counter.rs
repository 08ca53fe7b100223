//! Frame-rate counter overlay
//!
//! Counts frames between refreshes and renders `FPS: N.N` near the
//! top-right corner. Hidden by default; key `f` toggles it.

use crate::builtin;
use crate::context::api::HudContext;
use crate::input::api::Key;
use crate::plugin::config::AnchorPosition;
use crate::plugin::error::PluginResult;
use crate::plugin::traits::{HudPlugin, PluginCore};
use crate::plugin::types::{DiscoveredPlugin, PluginMetadata, PluginSource};
use crate::render::api::{Color, FrameBuffer};

const DEFAULT_UPDATE_INTERVAL_SECONDS: f64 = 0.5;
const DEFAULT_VISIBILITY: bool = false;
const X_OFFSET_FROM_RIGHT: i32 = -100;
const Y_OFFSET_FROM_TOP: i32 = 10;
const TEXT_SCALE: u32 = 2;

fn metadata() -> PluginMetadata {
    PluginMetadata {
        name: "fps_counter".to_string(),
        version: "1.0.0".to_string(),
        author: "scopehud".to_string(),
        description: "Displays current frame rate".to_string(),
        ..Default::default()
    }
}

pub struct FpsCounter {
    core: PluginCore,
    fps: f64,
    frame_count: u32,
    update_interval: f64,
    time_since_update: f64,
    text_color: Color,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            core: PluginCore::new(metadata()),
            fps: 0.0,
            frame_count: 0,
            update_interval: DEFAULT_UPDATE_INTERVAL_SECONDS,
            time_since_update: 0.0,
            text_color: Color::rgb(220, 220, 210),
        }
    }
}

impl FpsCounter {
    fn refresh_fps(&mut self) {
        if self.time_since_update > 0.0 {
            self.fps = self.frame_count as f64 / self.time_since_update;
        } else {
            self.fps = 0.0;
        }
        self.frame_count = 0;
        self.time_since_update = 0.0;
    }
}

impl HudPlugin for FpsCounter {
    fn core(&self) -> &PluginCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PluginCore {
        &mut self.core
    }

    fn initialize(&mut self, _ctx: &mut HudContext) -> PluginResult<bool> {
        let config = &mut self.core.config;
        config.position = AnchorPosition::TopRight;
        config.x = X_OFFSET_FROM_RIGHT;
        config.y = Y_OFFSET_FROM_TOP;

        // Non-positive intervals would divide by zero in the refresh
        let configured = config.get_f64("fps_update_interval", DEFAULT_UPDATE_INTERVAL_SECONDS);
        self.update_interval = if configured > 0.0 {
            configured
        } else {
            DEFAULT_UPDATE_INTERVAL_SECONDS
        };

        self.core.visible = config.get_bool("visible", DEFAULT_VISIBILITY);
        Ok(true)
    }

    fn update(&mut self, delta_time: f64, _ctx: &mut HudContext) -> PluginResult<()> {
        self.frame_count += 1;
        self.time_since_update += delta_time;
        if self.time_since_update >= self.update_interval {
            self.refresh_fps();
        }
        Ok(())
    }

    fn render(&mut self, mut frame: FrameBuffer, ctx: &HudContext) -> PluginResult<FrameBuffer> {
        let (x, y) = self.origin(ctx);
        let text = format!("FPS: {:.1}", self.fps);
        frame.draw_text(&text, x, y, TEXT_SCALE, self.text_color);
        Ok(frame)
    }

    fn handle_key(&mut self, key: Key, _ctx: &mut HudContext) -> PluginResult<bool> {
        if key == Key::Char('f') {
            self.toggle_visibility();
            log::info!(
                "FPS counter: {}",
                if self.is_visible() { "ON" } else { "OFF" }
            );
            return Ok(true);
        }
        Ok(false)
    }
}

pub fn discover() -> DiscoveredPlugin {
    DiscoveredPlugin {
        metadata: metadata(),
        source: PluginSource::Builtin {
            factory: || Box::new(FpsCounter::default()),
        },
    }
}

builtin!(discover);
