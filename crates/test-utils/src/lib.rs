//! Shared helpers for the `shell-relay` integration tests.

pub mod builders;
pub mod recording_sink;
pub mod scripted_lines;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

pub use builders::SettingsBuilder;
pub use recording_sink::RecordingSink;
pub use scripted_lines::ScriptedLines;

/// Upper bound for any single awaited step in a test. Real subprocesses are
/// involved, so this is generous.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

static INIT: Once = Once::new();

/// Install a test-captured tracing subscriber once per test binary.
///
/// Filter comes from `RUST_LOG` (default `info`), e.g.
/// `RUST_LOG=shell_relay::exec=debug`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `f`, failing the test if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .unwrap_or_else(|_| panic!("test step timed out after {TEST_TIMEOUT:?}"))
}
