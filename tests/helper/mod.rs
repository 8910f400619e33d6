//! Shared fixtures for end-to-end lookup tests

#![allow(dead_code)]

pub mod artifacts;
pub mod server;

pub use artifacts::{merged_v2_jar, tiny_v1_gz};
pub use server::{MappingServer, create_test_handler};
