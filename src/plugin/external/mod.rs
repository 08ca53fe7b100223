//! Manifest-backed external plugins

pub(crate) mod manifest;
