//! Public API for the application shell

pub use crate::app::config::{
    AppConfig, AppConfigError, AppConfigResult, DisplayConfig, PluginEntry,
};
pub use crate::app::frame_loop::{handle_app_key, run_frame, AppAction, SyntheticProducers};
