//! Application startup and top-level control flow

use std::io::IsTerminal;

use clap::Parser;
use prettytable::{row, Table};

use crate::app::cli::Cli;
use crate::app::config::AppConfig;
use crate::app::frame_loop;
use crate::context::api::HudContext;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::version;
use crate::plugin::api::{DiscoveryConfig, PluginConfig, PluginManager};

/// Run the application; the returned code goes straight to
/// `process::exit`
pub fn run() -> i32 {
    let cli = Cli::parse();

    let color_enabled = cli.color_enabled(std::io::stdout().is_terminal());
    if let Err(e) = init_logging(
        cli.log_level.as_deref(),
        cli.log_format.as_deref(),
        cli.log_file.as_deref().and_then(|p| p.to_str()),
        color_enabled,
    ) {
        eprintln!("Failed to initialise logging: {}", e);
        return 1;
    }

    log::info!(
        "scopehud {} (api {}, built {}, {})",
        env!("CARGO_PKG_VERSION"),
        version::get_api_version(),
        version::build_time(),
        version::git_hash()
    );

    let config = match AppConfig::load(cli.config_file.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log_error_with_context(&e, "Failed to load configuration");
            return 1;
        }
    };

    let mut manager = PluginManager::new();
    let discovery = DiscoveryConfig {
        plugin_dir: cli.plugin_dir.clone(),
        excluded_plugins: cli.exclude_plugin.clone(),
        include_builtins: true,
    };
    manager.discover(&discovery);

    if cli.list_plugins {
        print_plugin_table(&manager);
        return 0;
    }

    let width = cli.width.unwrap_or(config.display.width);
    let height = cli.height.unwrap_or(config.display.height);
    let mut ctx = HudContext::new(width, height);

    let requests: Vec<(String, Option<PluginConfig>)> = if config.plugins.is_empty() {
        manager
            .registry()
            .names()
            .into_iter()
            .map(|name| (name, None))
            .collect()
    } else {
        config
            .plugins
            .iter()
            .map(|entry| (entry.name.clone(), Some(entry.config.clone())))
            .collect()
    };

    let loaded = match manager.load_with_dependencies(requests, &mut ctx) {
        Ok(loaded) => loaded,
        Err(e) => {
            log_error_with_context(&e, "Failed to load plugins");
            return 1;
        }
    };
    log::info!("Loaded {} plugins: {}", loaded.len(), loaded.join(", "));

    // config-file enabled/visible state applies after load
    for entry in &config.plugins {
        if let Some(plugin) = manager.get_mut(&entry.name) {
            plugin.set_enabled(entry.enabled);
            plugin.set_visible(entry.visible);
        }
    }

    let keybinds = config.build_keybinds();
    log::debug!("Keybinds:\n{}", keybinds.help_lines().join("\n"));

    let final_frame = frame_loop::run(&mut manager, &mut ctx, cli.frames);

    let mut exit_code = 0;
    if let Some(path) = &cli.snapshot {
        match std::fs::write(path, final_frame.to_ppm_bytes()) {
            Ok(()) => log::info!("Wrote snapshot to {}", path.display()),
            Err(e) => {
                log::error!("Failed to write snapshot {}: {}", path.display(), e);
                exit_code = 1;
            }
        }
    }

    manager.shutdown(&mut ctx);
    exit_code
}

fn print_plugin_table(manager: &PluginManager) {
    let mut table = Table::new();
    table.add_row(row!["NAME", "VERSION", "SOURCE", "PROVIDES", "CONSUMES", "DESCRIPTION"]);
    for name in manager.registry().names() {
        if let Some(metadata) = manager.registry().metadata(&name) {
            let source = if manager.registry().is_manifest(&name) {
                "manifest"
            } else {
                "builtin"
            };
            table.add_row(row![
                metadata.name,
                metadata.version,
                source,
                metadata.provides.join(", "),
                metadata.consumes.join(", "),
                metadata.description
            ]);
        }
    }
    table.printstd();
}
