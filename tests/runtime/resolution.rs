//! Dependency resolution and load ordering through the manager

use scopehud::context::api::HudContext;
use scopehud::plugin::api::{HudPlugin, PluginConfig, PluginError, PluginManager};

use crate::runtime::helpers::{discovered, Fixture};

fn request(names: &[&str]) -> Vec<(String, Option<PluginConfig>)> {
    names.iter().map(|n| (n.to_string(), None)).collect()
}

fn diamond_a() -> Box<dyn HudPlugin> {
    Box::new(Fixture::new("diamond_a", &[], &["x"], &[]))
}

fn diamond_b() -> Box<dyn HudPlugin> {
    Box::new(Fixture::new("diamond_b", &[], &["y"], &["x"]))
}

fn diamond_c() -> Box<dyn HudPlugin> {
    Box::new(Fixture::new("diamond_c", &[], &["z"], &["x"]))
}

fn diamond_d() -> Box<dyn HudPlugin> {
    Box::new(Fixture::new("diamond_d", &[], &[], &["y", "z"]))
}

#[test]
fn diamond_resolves_with_providers_first() {
    let mut manager = PluginManager::new();
    manager.register(discovered(diamond_d)).unwrap();
    manager.register(discovered(diamond_c)).unwrap();
    manager.register(discovered(diamond_b)).unwrap();
    manager.register(discovered(diamond_a)).unwrap();

    let mut ctx = HudContext::new(64, 64);
    let loaded = manager
        .load_with_dependencies(
            request(&["diamond_d", "diamond_c", "diamond_b", "diamond_a"]),
            &mut ctx,
        )
        .unwrap();

    let position = |name: &str| loaded.iter().position(|n| n == name).unwrap();
    assert_eq!(loaded.len(), 4);
    assert!(position("diamond_a") < position("diamond_b"));
    assert!(position("diamond_a") < position("diamond_c"));
    assert!(position("diamond_b") < position("diamond_d"));
    assert!(position("diamond_c") < position("diamond_d"));
    // requested order breaks the B/C tie
    assert!(position("diamond_c") < position("diamond_b"));
}

fn cycle_a() -> Box<dyn HudPlugin> {
    Box::new(Fixture::new("cycle_a", &["cycle_b"], &[], &[]))
}

fn cycle_b() -> Box<dyn HudPlugin> {
    Box::new(Fixture::new("cycle_b", &["cycle_a"], &[], &[]))
}

fn cycle_tail() -> Box<dyn HudPlugin> {
    // depends on the cycle but is not part of it
    Box::new(Fixture::new("cycle_tail", &["cycle_a"], &[], &[]))
}

#[test]
fn cycle_error_names_only_the_cycle_members() {
    let mut manager = PluginManager::new();
    manager.register(discovered(cycle_a)).unwrap();
    manager.register(discovered(cycle_b)).unwrap();
    manager.register(discovered(cycle_tail)).unwrap();

    let mut ctx = HudContext::new(64, 64);
    let err = manager
        .load_with_dependencies(request(&["cycle_tail", "cycle_a", "cycle_b"]), &mut ctx)
        .unwrap_err();

    match err {
        PluginError::CircularDependency { plugin_names } => {
            assert_eq!(plugin_names, vec!["cycle_a", "cycle_b"]);
        }
        other => panic!("expected CircularDependency, got {}", other),
    }
    // nothing loaded, nothing initialized
    assert_eq!(manager.loaded_count(), 0);
    assert!(ctx.get::<Vec<String>>("init_order").is_none());
}

fn loner_one() -> Box<dyn HudPlugin> {
    Box::new(Fixture::new("loner_one", &[], &[], &[]))
}

fn loner_two() -> Box<dyn HudPlugin> {
    Box::new(Fixture::new("loner_two", &[], &[], &[]))
}

#[test]
fn independent_plugins_load_in_requested_order() {
    let mut manager = PluginManager::new();
    manager.register(discovered(loner_one)).unwrap();
    manager.register(discovered(loner_two)).unwrap();

    let mut ctx = HudContext::new(64, 64);
    let loaded = manager
        .load_with_dependencies(request(&["loner_two", "loner_one"]), &mut ctx)
        .unwrap();
    assert_eq!(loaded, vec!["loner_two", "loner_one"]);
}

#[test]
fn unknown_names_are_skipped_not_fatal() {
    let mut manager = PluginManager::new();
    manager.register(discovered(loner_one)).unwrap();

    let mut ctx = HudContext::new(64, 64);
    let loaded = manager
        .load_with_dependencies(request(&["ghost", "loner_one"]), &mut ctx)
        .unwrap();
    assert_eq!(loaded, vec!["loner_one"]);
}

fn needs_loner() -> Box<dyn HudPlugin> {
    Box::new(Fixture::new("needs_loner", &["loner_one"], &[], &[]))
}

#[test]
fn missing_hard_dependency_warns_but_loads() {
    let mut manager = PluginManager::new();
    manager.register(discovered(needs_loner)).unwrap();

    let mut ctx = HudContext::new(64, 64);
    let loaded = manager
        .load_with_dependencies(request(&["needs_loner"]), &mut ctx)
        .unwrap();
    assert_eq!(loaded, vec!["needs_loner"]);
}
