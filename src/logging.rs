//! Logger set-up for the drop demo and tests.
//!
//! Library code logs through the `log` facade only; hosts embedding the
//! plugin install whatever logger they like. `RUST_LOG` overrides the level
//! chosen here.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Level used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs `env_logger` as the global logger.
///
/// Calling this more than once is harmless; later calls keep the first
/// logger.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // `try_init` only fails if a logger is already installed.
    if builder.try_init().is_err() {
        log::trace!("logger already initialised");
    }
}
