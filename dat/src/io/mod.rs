//! Filesystem-backed records, containers and their configuration.

pub mod codec;
pub mod config;
pub mod container;
pub mod record;
pub mod resolve;
pub mod store;
