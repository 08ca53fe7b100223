//! Sliding compass tape
//!
//! Renders a horizontal tape across the top of the safe area showing the
//! wearer's heading with the eight principal directions and up to two
//! friendly-unit markers inside the visible ±90° arc.

use crate::builtin;
use crate::context::api::{
    keys, BorderPadding, FriendlyUnit, HudContext, PlayerPosition,
};
use crate::plugin::error::PluginResult;
use crate::plugin::traits::{HudPlugin, PluginCore};
use crate::plugin::types::{DiscoveredPlugin, PluginMetadata, PluginSource};
use crate::render::api::{text_height, Color, FrameBuffer};

/// Degrees visible to each side of the heading
const HALF_ARC_DEGREES: f64 = 90.0;
/// Tape baseline offset below the top padding edge
const BAR_Y_OFFSET: i32 = 30;
const CARDINAL_TICK_HEIGHT: i32 = 12;
const INTERCARDINAL_TICK_HEIGHT: i32 = 8;
const MAX_FRIENDLY_MARKERS: usize = 2;
const READOUT_SCALE: u32 = 2;
const LABEL_SCALE: u32 = 1;

const DIRECTIONS: [(f64, &str); 8] = [
    (0.0, "N"),
    (45.0, "NE"),
    (90.0, "E"),
    (135.0, "SE"),
    (180.0, "S"),
    (225.0, "SW"),
    (270.0, "W"),
    (315.0, "NW"),
];

fn metadata() -> PluginMetadata {
    PluginMetadata {
        name: "compass".to_string(),
        version: "1.0.0".to_string(),
        author: "scopehud".to_string(),
        description: "Sliding compass tape with friendly-unit markers".to_string(),
        consumes: vec!["border_padding".to_string()],
        ..Default::default()
    }
}

/// Signed angular offset of `bearing` from `heading`, in -180..=180
fn relative_bearing(bearing: f64, heading: f64) -> f64 {
    let rel = (bearing - heading) % 360.0;
    if rel > 180.0 {
        rel - 360.0
    } else if rel < -180.0 {
        rel + 360.0
    } else {
        rel
    }
}

pub struct Compass {
    core: PluginCore,
    heading: f64,
    friendly_bearings: Vec<(String, f64)>,
    tape_color: Color,
    friendly_color: Color,
}

impl Default for Compass {
    fn default() -> Self {
        Self {
            core: PluginCore::new(metadata()),
            heading: 0.0,
            friendly_bearings: Vec::new(),
            tape_color: Color::WHITE,
            friendly_color: Color::GREEN,
        }
    }
}

impl Compass {
    fn draw_diamond(frame: &mut FrameBuffer, cx: i32, cy: i32, radius: i32, color: Color) {
        frame.draw_line(cx, cy - radius, cx + radius, cy, color);
        frame.draw_line(cx + radius, cy, cx, cy + radius, color);
        frame.draw_line(cx, cy + radius, cx - radius, cy, color);
        frame.draw_line(cx - radius, cy, cx, cy - radius, color);
    }
}

impl HudPlugin for Compass {
    fn core(&self) -> &PluginCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PluginCore {
        &mut self.core
    }

    fn initialize(&mut self, _ctx: &mut HudContext) -> PluginResult<bool> {
        self.tape_color = Color::parse(&self.core.config.get_string("tape_color", "white"))
            .unwrap_or(Color::WHITE);
        Ok(true)
    }

    fn update(&mut self, _delta_time: f64, ctx: &mut HudContext) -> PluginResult<()> {
        if let Some(position) = ctx.get::<PlayerPosition>(keys::PLAYER_POSITION) {
            self.heading = position.heading.rem_euclid(360.0);
        }
        self.friendly_bearings = ctx
            .get::<Vec<FriendlyUnit>>(keys::FRIENDLY_UNITS)
            .map(|units| {
                units
                    .iter()
                    .map(|u| (u.callsign.clone(), u.bearing))
                    .collect()
            })
            .unwrap_or_default();
        Ok(())
    }

    fn render(&mut self, mut frame: FrameBuffer, ctx: &HudContext) -> PluginResult<FrameBuffer> {
        let full = BorderPadding::full_frame(ctx.frame_width(), ctx.frame_height());
        let padding = ctx.get_or(keys::BORDER_PADDING, &full);
        let bounds = padding.bounds;

        let bar_y = padding.padding_top + BAR_Y_OFFSET;
        let center_x = (bounds.x_min + bounds.x_max) / 2;
        let half_width = ((bounds.x_max - bounds.x_min) / 2) as f64;
        if half_width <= 0.0 {
            return Ok(frame);
        }
        let px_per_degree = half_width / HALF_ARC_DEGREES;

        frame.draw_line(bounds.x_min, bar_y, bounds.x_max - 1, bar_y, self.tape_color);

        for (bearing, label) in DIRECTIONS {
            let rel = relative_bearing(bearing, self.heading);
            if rel.abs() > HALF_ARC_DEGREES {
                continue;
            }
            let x = center_x + (rel * px_per_degree) as i32;
            let height = if label.len() == 1 {
                CARDINAL_TICK_HEIGHT
            } else {
                INTERCARDINAL_TICK_HEIGHT
            };
            frame.draw_line(x, bar_y - height, x, bar_y, self.tape_color);
            let label_y = bar_y - height - text_height(LABEL_SCALE) as i32 - 2;
            frame.draw_text_centered(label, x, label_y, LABEL_SCALE, self.tape_color);
        }

        for (callsign, bearing) in self.friendly_bearings.iter().take(MAX_FRIENDLY_MARKERS) {
            let rel = relative_bearing(*bearing, self.heading);
            if rel.abs() > HALF_ARC_DEGREES {
                continue;
            }
            let x = center_x + (rel * px_per_degree) as i32;
            Self::draw_diamond(&mut frame, x, bar_y + 8, 4, self.friendly_color);
            frame.draw_text_centered(callsign, x, bar_y + 14, LABEL_SCALE, self.friendly_color);
        }

        let readout = format!("{:03.0}", self.heading);
        frame.draw_text_centered(
            &readout,
            center_x,
            bar_y + 4,
            READOUT_SCALE,
            self.tape_color,
        );
        Ok(frame)
    }
}

pub fn discover() -> DiscoveredPlugin {
    DiscoveredPlugin {
        metadata: metadata(),
        source: PluginSource::Builtin {
            factory: || Box::new(Compass::default()),
        },
    }
}

builtin!(discover);
