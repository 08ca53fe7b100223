//! Command-line arguments

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "scopehud")]
#[command(about = "Heads-up display plugin runtime")]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Plugin manifest directory
    #[arg(short = 'p', long = "plugin-dir", value_name = "DIR")]
    pub plugin_dir: Option<PathBuf>,

    /// Plugins to exclude from discovery (repeatable)
    #[arg(long = "exclude-plugin", value_name = "NAME", action = ArgAction::Append)]
    pub exclude_plugin: Vec<String>,

    /// List discovered plugins and exit
    #[arg(long = "list-plugins")]
    pub list_plugins: bool,

    /// Number of frames to run before shutting down
    #[arg(short = 'n', long = "frames", value_name = "N", default_value_t = 300)]
    pub frames: u64,

    /// Frame width override
    #[arg(long = "width", value_name = "PIXELS")]
    pub width: Option<u32>,

    /// Frame height override
    #[arg(long = "height", value_name = "PIXELS")]
    pub height: Option<u32>,

    /// Write the final composited frame as a PPM image
    #[arg(short = 's', long = "snapshot", value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force colored log output
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Cli {
    /// Color choice: explicit flags win, otherwise follow `is_tty`
    pub fn color_enabled(&self, is_tty: bool) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            is_tty
        }
    }
}
