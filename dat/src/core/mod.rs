//! Deterministic, pure logic over in-memory specs.
//!
//! Nothing here touches the filesystem or reads the clock; callers pass the
//! date in so template rendering stays testable.

pub mod access;
pub mod key_path;
pub mod spec;
pub mod template;
