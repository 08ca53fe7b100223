//! Interactive plugin control panel
//!
//! Hidden overlay (key `p`) listing every other loaded plugin from the
//! roster snapshot, with enable/visibility/reload controls. The panel
//! cannot call back into the manager that owns it, so every action is
//! emitted as a `plugin_command` event and applied between frames.

use crate::builtin;
use crate::context::api::{keys, HudContext};
use crate::input::api::Key;
use crate::plugin::config::AnchorPosition;
use crate::plugin::error::PluginResult;
use crate::plugin::traits::{HudPlugin, PluginCore};
use crate::plugin::types::{
    DiscoveredPlugin, PluginCommand, PluginMetadata, PluginSource, PluginStatus,
};
use crate::render::api::{text_height, Color, FrameBuffer};

/// Renders above every ordinary overlay
const PANEL_Z_INDEX: i32 = 1000;
const DEFAULT_AUTO_RELOAD_INTERVAL_SECONDS: f64 = 1.0;
const PANEL_WIDTH: u32 = 460;
const ROW_SCALE: u32 = 1;
const TITLE_SCALE: u32 = 2;
const PANEL_PADDING: i32 = 10;

const PANEL_BACKGROUND: Color = Color::rgba(0, 0, 0, 190);
const HIGHLIGHT: Color = Color::rgba(60, 90, 140, 200);
const HELP_COLOR: Color = Color::GRAY;

fn metadata() -> PluginMetadata {
    PluginMetadata {
        name: "control_panel".to_string(),
        version: "1.0.0".to_string(),
        author: "scopehud".to_string(),
        description: "Interactive panel for plugin enable/visibility/reload".to_string(),
        consumes: vec!["plugin_roster".to_string()],
        ..Default::default()
    }
}

pub struct ControlPanel {
    core: PluginCore,
    selected_index: usize,
    entries: Vec<PluginStatus>,
    auto_reload: bool,
    auto_reload_interval: f64,
    time_since_check: f64,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            core: PluginCore::new(metadata()),
            selected_index: 0,
            entries: Vec::new(),
            auto_reload: false,
            auto_reload_interval: DEFAULT_AUTO_RELOAD_INTERVAL_SECONDS,
            time_since_check: 0.0,
        }
    }
}

impl ControlPanel {
    fn selected_name(&self) -> Option<&str> {
        self.entries
            .get(self.selected_index)
            .map(|entry| entry.name.as_str())
    }

    fn emit_command(&self, command: PluginCommand, ctx: &mut HudContext) {
        let event = command.to_event();
        ctx.emit(&event.event_type, event.data);
    }

    fn move_selection(&mut self, delta: i32) {
        if self.entries.is_empty() {
            self.selected_index = 0;
            return;
        }
        let len = self.entries.len() as i32;
        let next = (self.selected_index as i32 + delta).rem_euclid(len);
        self.selected_index = next as usize;
    }

    fn row_height() -> i32 {
        text_height(ROW_SCALE) as i32 + 6
    }
}

impl HudPlugin for ControlPanel {
    fn core(&self) -> &PluginCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PluginCore {
        &mut self.core
    }

    fn initialize(&mut self, _ctx: &mut HudContext) -> PluginResult<bool> {
        let config = &mut self.core.config;
        config.position = AnchorPosition::Center;
        config.z_index = PANEL_Z_INDEX;

        let interval = config.get_f64(
            "auto_reload_check_interval",
            DEFAULT_AUTO_RELOAD_INTERVAL_SECONDS,
        );
        self.auto_reload_interval = if interval > 0.0 {
            interval
        } else {
            DEFAULT_AUTO_RELOAD_INTERVAL_SECONDS
        };
        self.auto_reload = config.get_bool("auto_reload", false);

        // panel starts hidden regardless of the visibility default
        self.core.visible = false;
        Ok(true)
    }

    fn update(&mut self, delta_time: f64, ctx: &mut HudContext) -> PluginResult<()> {
        self.entries = ctx
            .get::<Vec<PluginStatus>>(keys::PLUGIN_ROSTER)
            .map(|roster| {
                roster
                    .iter()
                    .filter(|status| status.name != self.name())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if self.selected_index >= self.entries.len() && !self.entries.is_empty() {
            self.selected_index = self.entries.len() - 1;
        }

        if self.auto_reload {
            self.time_since_check += delta_time;
            if self.time_since_check >= self.auto_reload_interval {
                self.time_since_check = 0.0;
                self.emit_command(PluginCommand::AutoReload, ctx);
            }
        }
        Ok(())
    }

    fn render(&mut self, mut frame: FrameBuffer, ctx: &HudContext) -> PluginResult<FrameBuffer> {
        let row_height = Self::row_height();
        let title_height = text_height(TITLE_SCALE) as i32 + 8;
        let help_height = 2 * row_height;
        let panel_height =
            (title_height + (self.entries.len() as i32) * row_height + help_height + 2 * PANEL_PADDING)
                as u32;

        let x = (ctx.frame_width() as i32 - PANEL_WIDTH as i32) / 2;
        let y = (ctx.frame_height() as i32 - panel_height as i32) / 2;

        frame.fill_rect(x, y, PANEL_WIDTH, panel_height, PANEL_BACKGROUND);
        frame.draw_rect(x, y, PANEL_WIDTH, panel_height, Color::WHITE.with_alpha(120), 1);

        let mut cursor_y = y + PANEL_PADDING;
        frame.draw_text("PLUGINS", x + PANEL_PADDING, cursor_y, TITLE_SCALE, Color::WHITE);
        let auto_label = if self.auto_reload { "AUTO: ON" } else { "AUTO: OFF" };
        frame.draw_text(
            auto_label,
            x + PANEL_WIDTH as i32 - 120,
            cursor_y + 4,
            ROW_SCALE,
            if self.auto_reload { Color::GREEN } else { HELP_COLOR },
        );
        cursor_y += title_height;

        for (index, entry) in self.entries.iter().enumerate() {
            if index == self.selected_index {
                frame.fill_rect(
                    x + 2,
                    cursor_y - 2,
                    PANEL_WIDTH - 4,
                    row_height as u32,
                    HIGHLIGHT,
                );
            }
            let enabled = if entry.enabled { "ENABLED" } else { "DISABLED" };
            let visible = if entry.visible { "VISIBLE" } else { "HIDDEN" };
            let color = if entry.enabled { Color::WHITE } else { HELP_COLOR };

            frame.draw_text(&entry.name, x + PANEL_PADDING, cursor_y, ROW_SCALE, color);
            frame.draw_text(enabled, x + 220, cursor_y, ROW_SCALE, color);
            frame.draw_text(visible, x + 330, cursor_y, ROW_SCALE, color);
            cursor_y += row_height;
        }

        frame.draw_text(
            "UP/DOWN SELECT  E ENABLE  V VISIBILITY",
            x + PANEL_PADDING,
            cursor_y,
            ROW_SCALE,
            HELP_COLOR,
        );
        frame.draw_text(
            "R RELOAD  A AUTO-RELOAD  P CLOSE",
            x + PANEL_PADDING,
            cursor_y + row_height,
            ROW_SCALE,
            HELP_COLOR,
        );
        Ok(frame)
    }

    fn handle_key(&mut self, key: Key, ctx: &mut HudContext) -> PluginResult<bool> {
        if key == Key::Char('p') {
            self.toggle_visibility();
            log::info!(
                "Control panel: {}",
                if self.is_visible() { "OPEN" } else { "CLOSED" }
            );
            return Ok(true);
        }
        if !self.is_visible() {
            return Ok(false);
        }

        match key {
            Key::Up | Key::Char('k') => {
                self.move_selection(-1);
                Ok(true)
            }
            Key::Down | Key::Char('j') => {
                self.move_selection(1);
                Ok(true)
            }
            Key::Char('e') => {
                if let Some(name) = self.selected_name() {
                    self.emit_command(
                        PluginCommand::ToggleEnabled {
                            plugin_name: name.to_string(),
                        },
                        ctx,
                    );
                }
                Ok(true)
            }
            Key::Char('v') => {
                if let Some(name) = self.selected_name() {
                    self.emit_command(
                        PluginCommand::ToggleVisibility {
                            plugin_name: name.to_string(),
                        },
                        ctx,
                    );
                }
                Ok(true)
            }
            Key::Char('r') => {
                if let Some(name) = self.selected_name() {
                    self.emit_command(
                        PluginCommand::Reload {
                            plugin_name: name.to_string(),
                        },
                        ctx,
                    );
                }
                Ok(true)
            }
            Key::Char('a') => {
                self.auto_reload = !self.auto_reload;
                self.time_since_check = 0.0;
                log::info!(
                    "Auto-reload: {}",
                    if self.auto_reload { "ON" } else { "OFF" }
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
            factory: || Box::new(ControlPanel::default()),
        },
    }
}

builtin!(discover);
