//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system, honouring `RUST_LOG` and defaulting to `info`
pub fn init() {
    // A second call (e.g. from several tests) is harmless.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}
