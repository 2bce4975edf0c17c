//! Tracing subscriber setup for the binary.
//!
//! Diagnostic lines from workers are emitted at `debug` level, the run
//! lifecycle at `info`. `RUST_LOG` takes precedence over `verbose`.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Installs a global `fmt` subscriber writing to stderr.
///
/// Returns `false` if a global subscriber was already installed, in which
/// case the call changes nothing.
pub fn init_tracing(verbose: bool) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "info");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn test_init_twice() {
        init_tracing(false);
        assert!(!init_tracing(true));
    }
}
