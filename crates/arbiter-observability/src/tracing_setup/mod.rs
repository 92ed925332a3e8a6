//! Tracing setup: JSON logs filtered by `ARBITER_LOG`.

pub mod events;
pub mod spans;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global JSON subscriber.
///
/// Reads per-target levels from `ARBITER_LOG` (for example
/// `ARBITER_LOG=arbiter_engine=debug,arbiter_ledger=info`), falling back to
/// `default_level`. Only the first call in a process does anything; it
/// returns false when another subscriber is already installed.
pub fn init_tracing(default_level: &str) -> bool {
    let mut installed = false;
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("ARBITER_LOG")
            .unwrap_or_else(|_| EnvFilter::new(default_level));
        installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .try_init()
            .is_ok();
    });
    installed
}
