//! Documented value shapes for the stable blackboard keys
//!
//! The blackboard itself is stringly keyed and open to unknown future keys;
//! these are the agreed shapes for the keys external collaborators and
//! builtin plugins exchange. Producers validate at their boundary and store
//! these types; consumers downcast through the typed accessors.

use chrono::{DateTime, Utc};

/// Stable blackboard key names
pub mod keys {
    /// Capture-control capability handle (whitelisted property get/set).
    /// Published by the camera collaborator when hardware is attached;
    /// absent under the synthetic producers.
    pub const CAMERA_HANDLE: &str = "camera_handle";
    /// `PlayerPosition` of the wearer
    pub const PLAYER_POSITION: &str = "player_position";
    /// `Vec<FriendlyUnit>` from the tactical network
    pub const FRIENDLY_UNITS: &str = "friendly_units";
    /// `Vec<RfAlert>`, most recent 10
    pub const RF_ALERTS: &str = "rf_alerts";
    /// `Vec<WifiAlert>`, most recent 10
    pub const WIFI_ALERTS: &str = "wifi_alerts";
    /// `Vec<Detection>` from the object-detection collaborator
    pub const YOLO_DETECTIONS: &str = "yolo_detections";
    /// `BorderPadding` safe-area record
    pub const BORDER_PADDING: &str = "border_padding";
    /// `Vec<PluginStatus>` snapshot published by the runtime manager
    pub const PLUGIN_ROSTER: &str = "plugin_roster";
}

/// Current position and orientation of the wearer
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above sea level
    pub altitude: f64,
    /// Degrees, 0 = north, clockwise; consumers normalize with `% 360`
    pub heading: f64,
    pub timestamp: DateTime<Utc>,
}

/// One friendly unit reported over the tactical network
#[derive(Debug, Clone, PartialEq)]
pub struct FriendlyUnit {
    pub id: String,
    pub callsign: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Bearing from the wearer, degrees
    pub bearing: f64,
    /// Distance from the wearer, meters
    pub distance: f64,
    pub status: String,
}

/// Pixel-space detection rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// One tracked object detection
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub track_id: u64,
    /// 0.0 ..= 1.0
    pub confidence: f32,
    pub identity: Option<String>,
}

/// RF spectrum alert
#[derive(Debug, Clone, PartialEq)]
pub struct RfAlert {
    pub frequency_mhz: f64,
    pub rssi_dbm: f64,
    pub label: String,
    pub timestamp: DateTime<Utc>,
}

/// WiFi device alert
#[derive(Debug, Clone, PartialEq)]
pub struct WifiAlert {
    pub ssid: String,
    pub bssid: String,
    pub rssi_dbm: f64,
    pub channel: u32,
    pub timestamp: DateTime<Utc>,
}

/// Usable drawing area inside the display's physical border
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddingBounds {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
    pub width: u32,
    pub height: u32,
}

/// Safe-area record published under `keys::BORDER_PADDING`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderPadding {
    pub padding_top: i32,
    pub padding_bottom: i32,
    pub padding_left: i32,
    pub padding_right: i32,
    pub bounds: PaddingBounds,
}

impl BorderPadding {
    /// Zero-padding record covering the whole frame. Consumers use this as
    /// the soft default when no border-padding producer is loaded.
    pub fn full_frame(frame_width: u32, frame_height: u32) -> Self {
        Self {
            padding_top: 0,
            padding_bottom: 0,
            padding_left: 0,
            padding_right: 0,
            bounds: PaddingBounds {
                x_min: 0,
                x_max: frame_width as i32,
                y_min: 0,
                y_max: frame_height as i32,
                width: frame_width,
                height: frame_height,
            },
        }
    }
}
