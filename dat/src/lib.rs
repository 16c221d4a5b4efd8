//! Filesystem-backed persistence for nested, schema-free records.
//!
//! A record ("dat") is a nested mapping bound to a directory; its content lives
//! in a `_spec_.yaml` file inside that directory. The crate is split the same
//! way the data flows:
//!
//! - **[`core`]**: Pure logic over in-memory specs: dotted get/set, literal
//!   coercion, path templates. No I/O.
//! - **[`io`]**: Path resolution against the root, save/load/delete, container
//!   discovery and configuration.
//! - **[`registry`]**: Declared type names (`main.class`) mapped to the
//!   constructor that rebuilds the right variant at load time.

pub mod core;
pub mod error;
pub mod io;
pub mod logging;
pub mod registry;
pub mod root;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::core::access::{get, get_or, gets, set, sets};
pub use crate::core::key_path::KeyPath;
pub use crate::core::spec::{Spec, SpecSource, SpecTarget};
pub use crate::error::{DatError, ErrorKind, Result};
pub use crate::io::container::Container;
pub use crate::io::record::{Dat, Record};
pub use crate::io::store::Store;
pub use crate::registry::Registry;
