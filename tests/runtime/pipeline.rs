//! The per-frame pipeline through the public manager API

use scopehud::context::api::{HudContext, MAX_EVENTS};
use scopehud::input::api::Key;
use scopehud::plugin::api::{HudPlugin, PluginConfig, PluginManager};
use scopehud::render::api::{Color, FrameBuffer};
use serde_json::json;

use crate::runtime::helpers::{discovered, Fixture};

fn red_low() -> Box<dyn HudPlugin> {
    let mut plugin = Fixture::new("red_low", &[], &[], &[]);
    plugin.paint = Some(Color::RED);
    plugin.core_mut().config.z_index = 1;
    Box::new(plugin)
}

fn green_high() -> Box<dyn HudPlugin> {
    let mut plugin = Fixture::new("green_high", &[], &[], &[]);
    plugin.paint = Some(Color::GREEN);
    plugin.core_mut().config.z_index = 10;
    Box::new(plugin)
}

fn white_faulty() -> Box<dyn HudPlugin> {
    let mut plugin = Fixture::new("white_faulty", &[], &[], &[]);
    plugin.paint = Some(Color::WHITE);
    plugin.fail_render = true;
    plugin.core_mut().config.z_index = 5;
    Box::new(plugin)
}

fn decliner() -> Box<dyn HudPlugin> {
    let mut plugin = Fixture::new("decliner", &[], &[], &[]);
    plugin.decline_init = true;
    Box::new(plugin)
}

fn x_claimer() -> Box<dyn HudPlugin> {
    let mut plugin = Fixture::new("x_claimer", &[], &[], &[]);
    plugin.claim = Some(Key::Char('x'));
    Box::new(plugin)
}

#[test]
fn z_order_beats_load_order() {
    let mut manager = PluginManager::new();
    manager.register(discovered(green_high)).unwrap();
    manager.register(discovered(red_low)).unwrap();

    let mut ctx = HudContext::new(16, 16);
    manager.load("green_high", None, &mut ctx).unwrap();
    manager.load("red_low", None, &mut ctx).unwrap();

    let frame = manager.render_all(FrameBuffer::new(16, 16), &ctx);
    assert_eq!(frame.pixel(8, 8), Some(Color::GREEN));
}

#[test]
fn faulty_render_contributes_nothing_and_others_continue() {
    let mut manager = PluginManager::new();
    manager.register(discovered(red_low)).unwrap();
    manager.register(discovered(white_faulty)).unwrap();
    manager.register(discovered(green_high)).unwrap();

    let mut ctx = HudContext::new(16, 16);
    for name in ["red_low", "white_faulty", "green_high"] {
        manager.load(name, None, &mut ctx).unwrap();
    }

    // red (z=1) paints, white (z=5) fails after painting, green (z=10)
    // still paints over the restored frame
    let frame = manager.render_all(FrameBuffer::new(16, 16), &ctx);
    assert_eq!(frame.pixel(8, 8), Some(Color::GREEN));

    // with green disabled the surviving output is red, not white
    manager.disable_plugin("green_high");
    let frame = manager.render_all(FrameBuffer::new(16, 16), &ctx);
    assert_eq!(frame.pixel(8, 8), Some(Color::RED));
}

#[test]
fn declined_initialize_stays_out_of_the_pipeline() {
    let mut manager = PluginManager::new();
    manager.register(discovered(decliner)).unwrap();

    let mut ctx = HudContext::new(16, 16);
    assert!(!manager.load("decliner", None, &mut ctx).unwrap());
    assert!(!manager.is_loaded("decliner"));

    manager.update_all(0.016, &mut ctx);
    assert!(ctx.get::<u32>("updates.decliner").is_none());
}

#[test]
fn disabled_plugin_is_skipped_until_reenabled() {
    let mut manager = PluginManager::new();
    manager.register(discovered(red_low)).unwrap();

    let mut ctx = HudContext::new(16, 16);
    manager.load("red_low", None, &mut ctx).unwrap();
    manager.disable_plugin("red_low");

    manager.update_all(0.016, &mut ctx);
    assert!(ctx.get::<u32>("updates.red_low").is_none());
    let frame = manager.render_all(FrameBuffer::new(16, 16), &ctx);
    assert_eq!(frame.pixel(0, 0), Some(Color::BLACK));

    manager.enable_plugin("red_low");
    manager.update_all(0.016, &mut ctx);
    assert_eq!(ctx.get::<u32>("updates.red_low"), Some(&1));
}

#[test]
fn event_queue_caps_at_one_thousand() {
    let mut ctx = HudContext::new(16, 16);
    for i in 0..(MAX_EVENTS + 5) {
        ctx.emit("tick", json!(i));
    }

    assert_eq!(ctx.pending_events(), MAX_EVENTS);
    let events = ctx.drain_events();
    assert_eq!(events.first().unwrap().data, json!(5));
    assert_eq!(events.last().unwrap().data, json!(MAX_EVENTS + 4));
}

#[test]
fn key_dispatch_stops_at_first_claim() {
    let mut manager = PluginManager::new();
    manager.register(discovered(x_claimer)).unwrap();
    manager.register(discovered(red_low)).unwrap();

    let mut ctx = HudContext::new(16, 16);
    manager.load("x_claimer", None, &mut ctx).unwrap();
    manager.load("red_low", None, &mut ctx).unwrap();

    assert!(manager.handle_key(Key::Char('x'), &mut ctx));
    assert_eq!(
        ctx.get::<String>("claimed_by").map(String::as_str),
        Some("x_claimer")
    );
    assert!(!manager.handle_key(Key::Char('q'), &mut ctx));
}

#[test]
fn reload_preserves_config_and_visibility() {
    let mut manager = PluginManager::new();
    manager.register(discovered(red_low)).unwrap();

    let mut ctx = HudContext::new(16, 16);
    let config = PluginConfig {
        z_index: 5,
        ..Default::default()
    };
    manager.load("red_low", Some(config), &mut ctx).unwrap();
    manager.get_mut("red_low").unwrap().set_visible(false);

    assert!(manager.reload("red_low", &mut ctx).unwrap());

    let plugin = manager.get("red_low").unwrap();
    assert_eq!(plugin.config().z_index, 5);
    assert!(!plugin.is_visible());
    // the replacement instance went through initialize again
    assert_eq!(ctx.get::<Vec<String>>("init_order").unwrap().len(), 2);
}
