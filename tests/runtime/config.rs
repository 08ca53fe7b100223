//! App configuration parsing and keybind building

use std::fs;

use scopehud::app::api::AppConfig;
use scopehud::input::api::Key;
use scopehud::plugin::api::AnchorPosition;

#[test]
fn defaults_without_a_config_file() {
    let config = AppConfig::default();
    assert_eq!(config.display.width, 1280);
    assert_eq!(config.display.height, 720);
    assert!(config.plugins.is_empty());
}

#[test]
fn full_config_round_trip_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scopehud.toml");
    fs::write(
        &path,
        r#"
[display]
width = 1920
height = 1080

[[plugins]]
name = "fps_counter"
visible = false
position = "top_right"
x = -120
z_index = 50

[plugins.settings]
fps_update_interval = 0.25

[[plugins]]
name = "border_padding"
enabled = false

[keybinds.display]
b = "toggle_boundaries"

[keybinds.system]
q = "quit"
"#,
    )
    .unwrap();

    let config = AppConfig::load(Some(&path)).unwrap();
    assert_eq!(config.display.width, 1920);
    assert_eq!(config.plugins.len(), 2);

    let fps = &config.plugins[0];
    assert_eq!(fps.name, "fps_counter");
    assert!(fps.enabled);
    assert!(!fps.visible);
    assert_eq!(fps.config.position, AnchorPosition::TopRight);
    assert_eq!(fps.config.x, -120);
    assert_eq!(fps.config.z_index, 50);
    assert_eq!(fps.config.get_f64("fps_update_interval", 0.0), 0.25);

    let padding = &config.plugins[1];
    assert!(!padding.enabled);
    assert!(padding.visible);

    let keybinds = config.build_keybinds();
    assert_eq!(keybinds.resolve(Key::Char('b')), Some("toggle_boundaries"));
    assert_eq!(keybinds.resolve(Key::Char('q')), Some("quit"));
    // built-in bindings survive alongside config entries
    assert_eq!(keybinds.resolve(Key::Char('s')), Some("snapshot"));
}

#[test]
fn explicit_missing_config_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(AppConfig::load(Some(&missing)).is_err());
}

#[test]
fn keybind_help_groups_by_category_priority() {
    let config: AppConfig = toml::from_str(
        r#"
[keybinds.movement]
w = "walk_forward"

[keybinds.yolo]
y = "toggle_yolo"
"#,
    )
    .unwrap();

    let registry = config.build_keybinds();
    let lines = registry.help_lines();
    let idx = |needle: &str| lines.iter().position(|l| l.contains(needle)).unwrap();

    // system < yolo < movement
    assert!(idx("[system]") < idx("[yolo]"));
    assert!(idx("[yolo]") < idx("[movement]"));
}
