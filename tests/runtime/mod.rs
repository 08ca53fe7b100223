pub mod helpers;

mod config;
mod hot_reload;
mod pipeline;
mod resolution;
