//! Resolve, download, cache and query Yarn symbol mappings per product version.

pub mod config;
pub mod logging;
pub mod mapping;
pub mod yarn;
