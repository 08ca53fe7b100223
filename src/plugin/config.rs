//! Per-instance plugin configuration
//!
//! Placement (anchor plus offsets), paint order, and an open settings map.
//! Anchored positions add the configured x/y offsets to the anchor's
//! reference point; `Custom` uses the offsets verbatim.

use std::collections::HashMap;

use serde::Deserialize;

/// Pixels between an edge anchor and the frame border
pub const DEFAULT_EDGE_INSET: i32 = 10;

/// Named anchor for overlay placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnchorPosition {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    #[default]
    Custom,
}

/// Placement and settings for one plugin instance
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    pub position: AnchorPosition,
    pub x: i32,
    pub y: i32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub z_index: i32,
    pub settings: HashMap<String, toml::Value>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            position: AnchorPosition::Custom,
            x: 0,
            y: 0,
            width: None,
            height: None,
            z_index: 0,
            settings: HashMap::new(),
        }
    }
}

impl PluginConfig {
    /// Resolved top-left drawing origin for the session's frame size
    pub fn origin(&self, frame_width: u32, frame_height: u32) -> (i32, i32) {
        let mut x = self.x;
        let mut y = self.y;
        let w = frame_width as i32;
        let h = frame_height as i32;

        match self.position {
            AnchorPosition::TopLeft => {
                x += DEFAULT_EDGE_INSET;
                y += DEFAULT_EDGE_INSET;
            }
            AnchorPosition::TopCenter => {
                x += w / 2;
                y += DEFAULT_EDGE_INSET;
            }
            AnchorPosition::TopRight => {
                x += w - DEFAULT_EDGE_INSET;
                y += DEFAULT_EDGE_INSET;
            }
            AnchorPosition::CenterLeft => {
                x += DEFAULT_EDGE_INSET;
                y += h / 2;
            }
            AnchorPosition::Center => {
                x += w / 2;
                y += h / 2;
            }
            AnchorPosition::CenterRight => {
                x += w - DEFAULT_EDGE_INSET;
                y += h / 2;
            }
            AnchorPosition::BottomLeft => {
                x += DEFAULT_EDGE_INSET;
                y += h - DEFAULT_EDGE_INSET;
            }
            AnchorPosition::BottomCenter => {
                x += w / 2;
                y += h - DEFAULT_EDGE_INSET;
            }
            AnchorPosition::BottomRight => {
                x += w - DEFAULT_EDGE_INSET;
                y += h - DEFAULT_EDGE_INSET;
            }
            AnchorPosition::Custom => {}
        }

        (x, y)
    }

    /// Get a string setting with a default value
    pub fn get_string(&self, key: &str, default: &str) -> String {
        if let Some(toml::Value::String(s)) = self.settings.get(key) {
            s.clone()
        } else {
            default.to_string()
        }
    }

    /// Get a boolean setting with a default value
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        if let Some(toml::Value::Boolean(b)) = self.settings.get(key) {
            *b
        } else {
            default
        }
    }

    /// Get an integer setting with a default value
    pub fn get_i64(&self, key: &str, default: i64) -> i64 {
        if let Some(toml::Value::Integer(i)) = self.settings.get(key) {
            *i
        } else {
            default
        }
    }

    /// Get a float setting with a default value; integer values coerce
    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        match self.settings.get(key) {
            Some(toml::Value::Float(f)) => *f,
            Some(toml::Value::Integer(i)) => *i as f64,
            _ => default,
        }
    }
}
