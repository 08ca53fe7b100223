//! Friendly-unit sidebar
//!
//! Lists the nearest friendly units down the right edge of the safe area
//! with callsign, bearing and distance. Renders nothing when no tactical
//! feed is loaded.

use crate::builtin;
use crate::context::api::{keys, BorderPadding, FriendlyUnit, HudContext};
use crate::plugin::error::PluginResult;
use crate::plugin::traits::{HudPlugin, PluginCore};
use crate::plugin::types::{DiscoveredPlugin, PluginMetadata, PluginSource};
use crate::render::api::{text_height, text_width, Color, FrameBuffer};

const DEFAULT_MAX_UNITS: usize = 5;
const TEXT_SCALE: u32 = 1;
const LINE_GAP: i32 = 4;
const ENTRY_GAP: i32 = 8;
/// Offset of the sidebar below the compass tape region
const TOP_OFFSET: i32 = 60;

fn metadata() -> PluginMetadata {
    PluginMetadata {
        name: "unit_markers".to_string(),
        version: "1.0.0".to_string(),
        author: "scopehud".to_string(),
        description: "Sidebar listing the nearest friendly units".to_string(),
        consumes: vec!["friendly_units".to_string(), "border_padding".to_string()],
        ..Default::default()
    }
}

fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1}KM", meters / 1000.0)
    } else {
        format!("{:.0}M", meters)
    }
}

pub struct UnitMarkers {
    core: PluginCore,
    nearest: Vec<FriendlyUnit>,
    max_units: usize,
    text_color: Color,
}

impl Default for UnitMarkers {
    fn default() -> Self {
        Self {
            core: PluginCore::new(metadata()),
            nearest: Vec::new(),
            max_units: DEFAULT_MAX_UNITS,
            text_color: Color::GREEN,
        }
    }
}

impl HudPlugin for UnitMarkers {
    fn core(&self) -> &PluginCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PluginCore {
        &mut self.core
    }

    fn initialize(&mut self, _ctx: &mut HudContext) -> PluginResult<bool> {
        let configured = self.core.config.get_i64("max_units", DEFAULT_MAX_UNITS as i64);
        self.max_units = if configured > 0 {
            configured as usize
        } else {
            DEFAULT_MAX_UNITS
        };
        self.text_color = Color::parse(&self.core.config.get_string("text_color", "green"))
            .unwrap_or(Color::GREEN);
        Ok(true)
    }

    fn update(&mut self, _delta_time: f64, ctx: &mut HudContext) -> PluginResult<()> {
        let mut units = ctx
            .get::<Vec<FriendlyUnit>>(keys::FRIENDLY_UNITS)
            .cloned()
            .unwrap_or_default();
        units.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        units.truncate(self.max_units);
        self.nearest = units;
        Ok(())
    }

    fn render(&mut self, mut frame: FrameBuffer, ctx: &HudContext) -> PluginResult<FrameBuffer> {
        if self.nearest.is_empty() {
            return Ok(frame);
        }
        let full = BorderPadding::full_frame(ctx.frame_width(), ctx.frame_height());
        let bounds = ctx.get_or(keys::BORDER_PADDING, &full).bounds;

        let line_height = text_height(TEXT_SCALE) as i32 + LINE_GAP;
        let mut y = bounds.y_min + TOP_OFFSET;

        for unit in &self.nearest {
            if y + 2 * line_height > bounds.y_max {
                break;
            }
            let detail = format!("{:03.0} {}", unit.bearing, format_distance(unit.distance));
            let width = text_width(&unit.callsign, TEXT_SCALE).max(text_width(&detail, TEXT_SCALE));
            let x = bounds.x_max - width as i32 - 4;

            frame.draw_text(&unit.callsign, x, y, TEXT_SCALE, self.text_color);
            frame.draw_text(&detail, x, y + line_height, TEXT_SCALE, self.text_color);
            y += 2 * line_height + ENTRY_GAP;
        }
        Ok(frame)
    }
}

pub fn discover() -> DiscoveredPlugin {
    DiscoveredPlugin {
        metadata: metadata(),
        source: PluginSource::Builtin {
            factory: || Box::new(UnitMarkers::default()),
        },
    }
}

builtin!(discover);
