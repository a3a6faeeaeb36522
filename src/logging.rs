//! Log subscriber setup for the `keplot` binary.
//!
//! The filter comes from `RUST_LOG` when set, otherwise from the level passed in.
//! Per-sample convergence messages are emitted at `debug`, individual Newton steps at `trace`.
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a compact stderr subscriber.
///
/// Calling it twice is harmless: the second installation attempt is ignored.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
