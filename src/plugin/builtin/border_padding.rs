//! Safe-area producer
//!
//! Publishes the `border_padding` record other overlays use to stay clear
//! of the display's physical border, and optionally draws the boundary so
//! the padding can be tuned live with `[`, `]` and `b`.

use serde_json::json;

use crate::builtin;
use crate::context::api::{keys, BorderPadding, HudContext, PaddingBounds};
use crate::input::api::Key;
use crate::plugin::error::PluginResult;
use crate::plugin::traits::{HudPlugin, PluginCore};
use crate::plugin::types::{DiscoveredPlugin, PluginMetadata, PluginSource};
use crate::render::api::{Color, FrameBuffer};

const DEFAULT_PADDING: i32 = 40;
const DEFAULT_STEP: i32 = 5;
const CORNER_MARKER_LENGTH: i32 = 20;
const MEASUREMENT_SCALE: u32 = 1;

fn metadata() -> PluginMetadata {
    PluginMetadata {
        name: "border_padding".to_string(),
        version: "1.0.0".to_string(),
        author: "scopehud".to_string(),
        description: "Publishes the safe drawing area and renders its boundary".to_string(),
        provides: vec!["border_padding".to_string()],
        ..Default::default()
    }
}

pub struct BorderPaddingPlugin {
    core: PluginCore,
    padding_top: i32,
    padding_bottom: i32,
    padding_left: i32,
    padding_right: i32,
    step: i32,
    show_boundaries: bool,
    show_measurements: bool,
    boundary_color: Color,
}

impl Default for BorderPaddingPlugin {
    fn default() -> Self {
        Self {
            core: PluginCore::new(metadata()),
            padding_top: DEFAULT_PADDING,
            padding_bottom: DEFAULT_PADDING,
            padding_left: DEFAULT_PADDING,
            padding_right: DEFAULT_PADDING,
            step: DEFAULT_STEP,
            show_boundaries: true,
            show_measurements: true,
            boundary_color: Color::CYAN,
        }
    }
}

impl BorderPaddingPlugin {
    /// Padding may not push the boundary past a quarter of the short edge
    fn max_padding(ctx: &HudContext) -> i32 {
        (ctx.frame_width().min(ctx.frame_height()) / 4) as i32
    }

    fn current_record(&self, ctx: &HudContext) -> BorderPadding {
        let frame_width = ctx.frame_width() as i32;
        let frame_height = ctx.frame_height() as i32;
        let x_min = self.padding_left;
        let x_max = frame_width - self.padding_right;
        let y_min = self.padding_top;
        let y_max = frame_height - self.padding_bottom;
        BorderPadding {
            padding_top: self.padding_top,
            padding_bottom: self.padding_bottom,
            padding_left: self.padding_left,
            padding_right: self.padding_right,
            bounds: PaddingBounds {
                x_min,
                x_max,
                y_min,
                y_max,
                width: (x_max - x_min).max(0) as u32,
                height: (y_max - y_min).max(0) as u32,
            },
        }
    }

    fn publish(&self, ctx: &mut HudContext) {
        let record = self.current_record(ctx);
        ctx.provide(keys::BORDER_PADDING, record);
    }

    fn adjust_all(&mut self, delta: i32, ctx: &mut HudContext) {
        let max = Self::max_padding(ctx);
        self.padding_top = (self.padding_top + delta).clamp(0, max);
        self.padding_bottom = (self.padding_bottom + delta).clamp(0, max);
        self.padding_left = (self.padding_left + delta).clamp(0, max);
        self.padding_right = (self.padding_right + delta).clamp(0, max);
        self.publish(ctx);
        ctx.emit(
            "padding_changed",
            json!({
                "top": self.padding_top,
                "bottom": self.padding_bottom,
                "left": self.padding_left,
                "right": self.padding_right,
            }),
        );
        log::info!(
            "Border padding: top={} bottom={} left={} right={}",
            self.padding_top,
            self.padding_bottom,
            self.padding_left,
            self.padding_right
        );
    }

    fn draw_corner_markers(&self, frame: &mut FrameBuffer, bounds: &PaddingBounds) {
        let len = CORNER_MARKER_LENGTH;
        let (x_min, x_max, y_min, y_max) = (bounds.x_min, bounds.x_max - 1, bounds.y_min, bounds.y_max - 1);
        let color = self.boundary_color;

        frame.draw_line(x_min, y_min, x_min + len, y_min, color);
        frame.draw_line(x_min, y_min, x_min, y_min + len, color);

        frame.draw_line(x_max - len, y_min, x_max, y_min, color);
        frame.draw_line(x_max, y_min, x_max, y_min + len, color);

        frame.draw_line(x_min, y_max - len, x_min, y_max, color);
        frame.draw_line(x_min, y_max, x_min + len, y_max, color);

        frame.draw_line(x_max, y_max - len, x_max, y_max, color);
        frame.draw_line(x_max - len, y_max, x_max, y_max, color);
    }
}

impl HudPlugin for BorderPaddingPlugin {
    fn core(&self) -> &PluginCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PluginCore {
        &mut self.core
    }

    fn initialize(&mut self, ctx: &mut HudContext) -> PluginResult<bool> {
        let max = Self::max_padding(ctx);
        let config = &self.core.config;
        self.padding_top = (config.get_i64("padding_top", DEFAULT_PADDING as i64) as i32).clamp(0, max);
        self.padding_bottom =
            (config.get_i64("padding_bottom", DEFAULT_PADDING as i64) as i32).clamp(0, max);
        self.padding_left =
            (config.get_i64("padding_left", DEFAULT_PADDING as i64) as i32).clamp(0, max);
        self.padding_right =
            (config.get_i64("padding_right", DEFAULT_PADDING as i64) as i32).clamp(0, max);
        self.step = (config.get_i64("padding_step", DEFAULT_STEP as i64) as i32).max(1);
        self.show_boundaries = config.get_bool("show_boundaries", true);
        self.show_measurements = config.get_bool("show_measurements", true);
        self.boundary_color = Color::parse(&config.get_string("boundary_color", "cyan"))
            .unwrap_or(Color::CYAN);

        self.publish(ctx);
        Ok(true)
    }

    fn update(&mut self, _delta_time: f64, ctx: &mut HudContext) -> PluginResult<()> {
        // Re-publish every frame so a consumer loaded later still sees it
        self.publish(ctx);
        Ok(())
    }

    fn render(&mut self, mut frame: FrameBuffer, ctx: &HudContext) -> PluginResult<FrameBuffer> {
        if !self.show_boundaries {
            return Ok(frame);
        }
        let record = self.current_record(ctx);
        let bounds = record.bounds;

        frame.draw_rect(
            bounds.x_min,
            bounds.y_min,
            bounds.width,
            bounds.height,
            self.boundary_color.with_alpha(160),
            1,
        );
        self.draw_corner_markers(&mut frame, &bounds);

        if self.show_measurements {
            let text = format!(
                "pad t{} b{} l{} r{}",
                self.padding_top, self.padding_bottom, self.padding_left, self.padding_right
            );
            frame.draw_text(
                &text,
                bounds.x_min + 4,
                bounds.y_min + 4,
                MEASUREMENT_SCALE,
                self.boundary_color,
            );
        }
        Ok(frame)
    }

    fn handle_key(&mut self, key: Key, ctx: &mut HudContext) -> PluginResult<bool> {
        match key {
            Key::Char('[') => {
                self.adjust_all(-self.step, ctx);
                Ok(true)
            }
            Key::Char(']') => {
                self.adjust_all(self.step, ctx);
                Ok(true)
            }
            Key::Char('b') => {
                self.show_boundaries = !self.show_boundaries;
                log::info!(
                    "Padding boundaries: {}",
                    if self.show_boundaries { "ON" } else { "OFF" }
                );
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

pub fn discover() -> DiscoveredPlugin {
    DiscoveredPlugin {
        metadata: metadata(),
        source: PluginSource::Builtin {
            factory: || Box::new(BorderPaddingPlugin::default()),
        },
    }
}

builtin!(discover);
