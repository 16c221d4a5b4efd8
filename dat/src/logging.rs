//! Development-time tracing for the `dat` binary.
//!
//! # What gets logged
//!
//! - **`info`**: record saves and deletes, keyed by the record path.
//! - **`debug`**: construction, load-time type dispatch, container listings
//!   and unique-path probing.
//!
//! Events go to stderr only. The spec files under the root are the product
//! output and are never affected by `RUST_LOG`. The library emits events but
//! never installs a subscriber; that is left to the binary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber for development logging.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=dat=debug dat ls gamesets/bb
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
