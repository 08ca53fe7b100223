//! Frame loop and synthetic data producers
//!
//! Without camera or sensor hardware attached, the loop synthesizes its
//! inputs: a gradient-plus-reticle backdrop, a position walker circling
//! the default site, canned detections and friendly units, and periodic
//! RF/WiFi alerts. All of it is seeded at the producer boundary each
//! frame, exactly where real collaborators would publish.

use std::time::Instant;

use chrono::Utc;

use crate::context::api::{
    keys, BoundingBox, Detection, FriendlyUnit, HudContext, PlayerPosition, RfAlert, WifiAlert,
};
use crate::input::api::{Key, KeybindRegistry};
use crate::plugin::api::PluginManager;
use crate::render::api::{Color, FrameBuffer};

// Default simulated site: Colorado Springs
const DEFAULT_LATITUDE: f64 = 38.8339;
const DEFAULT_LONGITUDE: f64 = -104.8214;
const DEFAULT_ALTITUDE_M: f64 = 1839.0;
/// Heading sweep rate, degrees per second
const HEADING_SWEEP_RATE: f64 = 12.0;
/// Simulated walking speed in degrees of lat/lon per second
const WALK_RATE: f64 = 0.00002;

const RATE_LOG_INTERVAL_FRAMES: u64 = 60;

/// Seconds between simulated RF/WiFi alerts
const ALERT_INTERVAL_SECONDS: f64 = 5.0;
/// The alert feeds retain only the most recent entries
const MAX_ALERTS: usize = 10;

/// App-level action resolved from an unclaimed key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Help,
    Snapshot,
    Other(String),
}

/// Offer a key to the plugins first; only unclaimed keys reach the
/// app-level registry
pub fn handle_app_key(
    manager: &mut PluginManager,
    keybinds: &KeybindRegistry,
    key: Key,
    ctx: &mut HudContext,
) -> Option<AppAction> {
    if manager.handle_key(key, ctx) {
        return None;
    }
    keybinds.resolve(key).map(|action| match action {
        "quit" => AppAction::Quit,
        "help" => AppAction::Help,
        "snapshot" => AppAction::Snapshot,
        other => AppAction::Other(other.to_string()),
    })
}

/// Deterministic stand-ins for the camera, GPS and tactical feeds
pub struct SyntheticProducers {
    elapsed: f64,
    latitude: f64,
    longitude: f64,
    rf_alerts: Vec<RfAlert>,
    wifi_alerts: Vec<WifiAlert>,
    alert_seq: u64,
    next_alert_at: f64,
}

impl SyntheticProducers {
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            rf_alerts: Vec::new(),
            wifi_alerts: Vec::new(),
            alert_seq: 0,
            next_alert_at: ALERT_INTERVAL_SECONDS,
        }
    }

    /// Advance the simulation and publish this frame's inputs
    pub fn publish(&mut self, delta_time: f64, ctx: &mut HudContext) {
        self.elapsed += delta_time;
        let heading = (self.elapsed * HEADING_SWEEP_RATE).rem_euclid(360.0);
        let heading_rad = heading.to_radians();
        self.latitude += WALK_RATE * delta_time * heading_rad.cos();
        self.longitude += WALK_RATE * delta_time * heading_rad.sin();

        ctx.provide(
            keys::PLAYER_POSITION,
            PlayerPosition {
                latitude: self.latitude,
                longitude: self.longitude,
                altitude: DEFAULT_ALTITUDE_M,
                heading,
                timestamp: Utc::now(),
            },
        );
        ctx.provide(keys::FRIENDLY_UNITS, self.friendly_units());
        ctx.provide(keys::YOLO_DETECTIONS, self.detections(ctx.frame_width(), ctx.frame_height()));

        if self.elapsed >= self.next_alert_at {
            self.push_alerts();
            self.next_alert_at += ALERT_INTERVAL_SECONDS;
        }
        ctx.provide(keys::RF_ALERTS, self.rf_alerts.clone());
        ctx.provide(keys::WIFI_ALERTS, self.wifi_alerts.clone());
    }

    /// Append one alert to each feed, keeping only the most recent entries
    fn push_alerts(&mut self) {
        self.alert_seq += 1;
        self.rf_alerts.push(RfAlert {
            frequency_mhz: 433.0 + (self.alert_seq % 4) as f64 * 0.25,
            rssi_dbm: -60.0 - (self.alert_seq % 20) as f64,
            label: format!("drone-ctl-{}", self.alert_seq),
            timestamp: Utc::now(),
        });
        self.wifi_alerts.push(WifiAlert {
            ssid: format!("tracked-ap-{}", self.alert_seq),
            bssid: format!("de:ad:be:ef:00:{:02x}", self.alert_seq % 256),
            rssi_dbm: -50.0 - (self.alert_seq % 30) as f64,
            channel: 1 + (self.alert_seq % 11) as u32,
            timestamp: Utc::now(),
        });
        if self.rf_alerts.len() > MAX_ALERTS {
            self.rf_alerts.remove(0);
        }
        if self.wifi_alerts.len() > MAX_ALERTS {
            self.wifi_alerts.remove(0);
        }
    }

    fn friendly_units(&self) -> Vec<FriendlyUnit> {
        vec![
            FriendlyUnit {
                id: "u-01".to_string(),
                callsign: "ALPHA1".to_string(),
                latitude: self.latitude + 0.002,
                longitude: self.longitude,
                bearing: (self.elapsed * 3.0).rem_euclid(360.0),
                distance: 220.0,
                status: "active".to_string(),
            },
            FriendlyUnit {
                id: "u-02".to_string(),
                callsign: "BRAVO2".to_string(),
                latitude: self.latitude,
                longitude: self.longitude + 0.01,
                bearing: (90.0 + self.elapsed * 1.5).rem_euclid(360.0),
                distance: 870.0,
                status: "active".to_string(),
            },
        ]
    }

    fn detections(&self, frame_width: u32, frame_height: u32) -> Vec<Detection> {
        // one tracked friend drifting across the frame, one unknown; the
        // drift range collapses to a single column on very narrow frames
        let drift = ((self.elapsed * 20.0) as i32).rem_euclid((frame_width as i32 - 120).max(1));
        vec![
            Detection {
                bbox: BoundingBox {
                    x: drift,
                    y: frame_height as i32 / 3,
                    width: 80,
                    height: 120,
                },
                track_id: 1,
                confidence: 0.91,
                identity: Some("friend".to_string()),
            },
            Detection {
                bbox: BoundingBox {
                    x: frame_width as i32 / 2 + 60,
                    y: frame_height as i32 / 2,
                    width: 64,
                    height: 96,
                },
                track_id: 2,
                confidence: 0.57,
                identity: None,
            },
        ]
    }

    /// Dark vertical gradient with a center reticle, standing in for the
    /// camera feed
    pub fn backdrop(&self, width: u32, height: u32) -> FrameBuffer {
        let mut frame = FrameBuffer::new(width, height);
        for y in 0..height as i32 {
            let shade = 12 + (y as u32 * 28 / height.max(1)) as u8;
            frame.draw_line(0, y, width as i32 - 1, y, Color::rgb(shade, shade, shade + 4));
        }

        let cx = width as i32 / 2;
        let cy = height as i32 / 2;
        let reticle = Color::rgba(160, 160, 160, 140);
        frame.draw_line(cx - 24, cy, cx - 8, cy, reticle);
        frame.draw_line(cx + 8, cy, cx + 24, cy, reticle);
        frame.draw_line(cx, cy - 24, cx, cy - 8, reticle);
        frame.draw_line(cx, cy + 8, cx, cy + 24, reticle);
        frame
    }
}

impl Default for SyntheticProducers {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `frames` frames of the full pipeline and return the last
/// composited frame
pub fn run(
    manager: &mut PluginManager,
    ctx: &mut HudContext,
    frames: u64,
) -> FrameBuffer {
    let mut producers = SyntheticProducers::new();
    let mut last_instant = Instant::now();
    let mut rate_window_start = Instant::now();
    let mut last_frame = FrameBuffer::new(ctx.frame_width(), ctx.frame_height());

    for frame_index in 0..frames {
        let now = Instant::now();
        let delta_time = now.duration_since(last_instant).as_secs_f64();
        last_instant = now;

        last_frame = run_frame(manager, ctx, &mut producers, delta_time);

        if (frame_index + 1) % RATE_LOG_INTERVAL_FRAMES == 0 {
            let window = rate_window_start.elapsed().as_secs_f64();
            if window > 0.0 {
                log::info!(
                    "Frame {}: {:.1} fps over the last {} frames",
                    frame_index + 1,
                    RATE_LOG_INTERVAL_FRAMES as f64 / window,
                    RATE_LOG_INTERVAL_FRAMES
                );
            }
            rate_window_start = Instant::now();
        }
    }
    last_frame
}

/// One full frame: producers, roster snapshot, update, events, deferred
/// commands, then composition
pub fn run_frame(
    manager: &mut PluginManager,
    ctx: &mut HudContext,
    producers: &mut SyntheticProducers,
    delta_time: f64,
) -> FrameBuffer {
    producers.publish(delta_time, ctx);
    manager.publish_roster(ctx);
    manager.update_all(delta_time, ctx);
    manager.dispatch_events(ctx);
    manager.apply_commands(ctx);

    let backdrop = producers.backdrop(ctx.frame_width(), ctx.frame_height());
    manager.render_all(backdrop, ctx)
}
