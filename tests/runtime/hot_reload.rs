//! Manifest discovery, hot reload and auto-reload

use std::fs;
use std::time::{Duration, SystemTime};

use serial_test::serial;

use scopehud::context::api::HudContext;
use scopehud::plugin::api::{DiscoveryConfig, PluginConfig, PluginManager};

const LABEL_MANIFEST: &str = r#"
name = "banner"
version = "1.2.0"
description = "Static banner"

[widget]
kind = "label"
text = "SCOPE-1"
color = "yellow"

[config]
position = "top_center"
"#;

const CROSSHAIR_MANIFEST: &str = r#"
name = "reticle"

[widget]
kind = "crosshair"

[config]
position = "center"
"#;

fn manifest_only_discovery(dir: &std::path::Path) -> DiscoveryConfig {
    DiscoveryConfig {
        plugin_dir: Some(dir.to_path_buf()),
        excluded_plugins: Vec::new(),
        include_builtins: false,
    }
}

fn bump_mtime(path: &std::path::Path) {
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();
}

#[test]
fn discovery_registers_manifests_and_skips_invalid() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("banner.toml"), LABEL_MANIFEST).unwrap();
    fs::write(dir.path().join("reticle.toml"), CROSSHAIR_MANIFEST).unwrap();
    fs::write(dir.path().join("broken.toml"), "name = ").unwrap();

    let mut manager = PluginManager::new();
    let registered = manager.discover(&manifest_only_discovery(dir.path()));

    assert_eq!(registered, 2);
    assert!(manager.registry().has("banner"));
    assert!(manager.registry().has("reticle"));
    assert_eq!(
        manager.registry().metadata("banner").unwrap().version,
        "1.2.0"
    );
}

#[test]
fn loaded_manifest_plugin_survives_reload_with_state() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("banner.toml"), LABEL_MANIFEST).unwrap();

    let mut manager = PluginManager::new();
    manager.discover(&manifest_only_discovery(dir.path()));

    let mut ctx = HudContext::new(320, 240);
    let config = PluginConfig {
        z_index: 5,
        ..Default::default()
    };
    assert!(manager.load("banner", Some(config), &mut ctx).unwrap());
    manager.get_mut("banner").unwrap().set_visible(false);

    assert!(manager.reload("banner", &mut ctx).unwrap());
    let plugin = manager.get("banner").unwrap();
    assert_eq!(plugin.config().z_index, 5);
    assert!(!plugin.is_visible());
}

#[test]
fn reload_picks_up_edited_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("banner.toml");
    fs::write(&path, LABEL_MANIFEST).unwrap();

    let mut manager = PluginManager::new();
    manager.discover(&manifest_only_discovery(dir.path()));

    let mut ctx = HudContext::new(320, 240);
    assert!(manager.load("banner", None, &mut ctx).unwrap());

    fs::write(&path, LABEL_MANIFEST.replace("1.2.0", "1.3.0")).unwrap();
    assert!(manager.reload("banner", &mut ctx).unwrap());
    assert_eq!(
        manager.registry().metadata("banner").unwrap().version,
        "1.3.0"
    );
}

#[test]
#[serial]
fn auto_reload_reloads_exactly_the_modified_plugins() {
    let dir = tempfile::tempdir().unwrap();
    let banner = dir.path().join("banner.toml");
    fs::write(&banner, LABEL_MANIFEST).unwrap();
    fs::write(dir.path().join("reticle.toml"), CROSSHAIR_MANIFEST).unwrap();

    let mut manager = PluginManager::new();
    manager.discover(&manifest_only_discovery(dir.path()));

    let mut ctx = HudContext::new(320, 240);
    assert!(manager.load("banner", None, &mut ctx).unwrap());
    assert!(manager.load("reticle", None, &mut ctx).unwrap());

    assert!(manager.check_for_updates().is_empty());
    assert_eq!(manager.auto_reload_modified(&mut ctx), 0);

    bump_mtime(&banner);
    assert_eq!(manager.check_for_updates(), vec!["banner"]);
    assert_eq!(manager.auto_reload_modified(&mut ctx), 1);

    // the reload recorded the new mtime; a second sweep is a no-op
    assert_eq!(manager.auto_reload_modified(&mut ctx), 0);
}

#[test]
#[serial]
fn renamed_manifest_fails_reload_and_unloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("banner.toml");
    fs::write(&path, LABEL_MANIFEST).unwrap();

    let mut manager = PluginManager::new();
    manager.discover(&manifest_only_discovery(dir.path()));

    let mut ctx = HudContext::new(320, 240);
    assert!(manager.load("banner", None, &mut ctx).unwrap());

    fs::write(&path, LABEL_MANIFEST.replace("banner", "other_name")).unwrap();
    // the replacement instance cannot be built from the renamed manifest
    assert!(!manager.reload("banner", &mut ctx).unwrap());
    assert!(!manager.is_loaded("banner"));
}
