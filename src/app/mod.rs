//! Application module

pub(crate) mod cli;
pub(crate) mod config;
pub(crate) mod frame_loop;

pub mod api;
pub mod startup;
