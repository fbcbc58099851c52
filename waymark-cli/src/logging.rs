//! Log output for the command-line interface.
//!
//! Library crates log through the `log` facade; the subscriber installed
//! here captures those records and writes them to stderr so stdout stays
//! reserved for JSON output. Filtering follows `RUST_LOG`, defaulting to
//! `info`.

use log::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber.
///
/// Returns `false`, leaving the existing subscriber in place, when one is
/// already installed.
pub fn init() -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    match tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
    {
        Ok(()) => true,
        Err(err) => {
            debug!("keeping existing log subscriber: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn second_install_keeps_the_first() {
        // The first call may find a subscriber installed elsewhere in the
        // process, so only the repeat is asserted.
        init();
        assert!(!init());
    }
}
