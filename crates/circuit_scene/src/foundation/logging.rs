//! Logging setup
//!
//! The crate logs through the `log` facade; binaries pick the backend.
//! These helpers install `env_logger`, which honours `RUST_LOG`.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system with `RUST_LOG` (default: errors only)
pub fn init() {
    let _ = env_logger::try_init();
}

/// Initialize logging with `default_level` used when `RUST_LOG` is unset.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_with_level(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        init_with_level("debug");
        init();
        init_with_level("warn");
        info!("logging initialized");
    }
}
