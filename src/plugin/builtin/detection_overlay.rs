//! Object-detection overlay
//!
//! Draws the bounding boxes published under `yolo_detections`, colored by
//! identity, with a track label above each box. Renders nothing when no
//! detection producer is loaded.

use crate::builtin;
use crate::context::api::{keys, Detection, HudContext};
use crate::plugin::error::PluginResult;
use crate::plugin::traits::{HudPlugin, PluginCore};
use crate::plugin::types::{DiscoveredPlugin, PluginMetadata, PluginSource};
use crate::render::api::{text_height, Color, FrameBuffer};

const BOX_THICKNESS: u32 = 2;
const LABEL_SCALE: u32 = 1;

fn metadata() -> PluginMetadata {
    PluginMetadata {
        name: "detection_overlay".to_string(),
        version: "1.0.0".to_string(),
        author: "scopehud".to_string(),
        description: "Bounding boxes and labels for tracked detections".to_string(),
        consumes: vec!["yolo_detections".to_string()],
        ..Default::default()
    }
}

/// Box color by identity: friends green, hostiles red, everything else yellow
fn identity_color(identity: Option<&str>) -> Color {
    match identity.map(|s| s.to_ascii_lowercase()).as_deref() {
        Some("friend") | Some("friendly") => Color::GREEN,
        Some("foe") | Some("hostile") => Color::RED,
        _ => Color::YELLOW,
    }
}

fn label_for(detection: &Detection) -> String {
    let identity = detection.identity.as_deref().unwrap_or("unknown");
    format!(
        "{} #{} {:.0}%",
        identity.to_ascii_uppercase(),
        detection.track_id,
        detection.confidence * 100.0
    )
}

pub struct DetectionOverlay {
    core: PluginCore,
}

impl Default for DetectionOverlay {
    fn default() -> Self {
        Self {
            core: PluginCore::new(metadata()),
        }
    }
}

impl HudPlugin for DetectionOverlay {
    fn core(&self) -> &PluginCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PluginCore {
        &mut self.core
    }

    fn initialize(&mut self, _ctx: &mut HudContext) -> PluginResult<bool> {
        Ok(true)
    }

    fn update(&mut self, _delta_time: f64, _ctx: &mut HudContext) -> PluginResult<()> {
        Ok(())
    }

    fn render(&mut self, mut frame: FrameBuffer, ctx: &HudContext) -> PluginResult<FrameBuffer> {
        let Some(detections) = ctx.get::<Vec<Detection>>(keys::YOLO_DETECTIONS) else {
            return Ok(frame);
        };

        for detection in detections {
            let color = identity_color(detection.identity.as_deref());
            let bbox = detection.bbox;
            frame.draw_rect(bbox.x, bbox.y, bbox.width, bbox.height, color, BOX_THICKNESS);

            let label = label_for(detection);
            let label_y = bbox.y - text_height(LABEL_SCALE) as i32 - 2;
            frame.draw_text(&label, bbox.x, label_y, LABEL_SCALE, color);
        }
        Ok(frame)
    }
}

pub fn discover() -> DiscoveredPlugin {
    DiscoveredPlugin {
        metadata: metadata(),
        source: PluginSource::Builtin {
            factory: || Box::new(DetectionOverlay::default()),
        },
    }
}

builtin!(discover);
