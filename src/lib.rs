pub mod app;
pub mod context;
pub mod core;
pub mod input;
pub mod plugin;
pub mod render;
