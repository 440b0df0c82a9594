//! Shared helpers for dirpoll's integration tests.

pub mod builders;
pub mod recording_action;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use dirpoll::types::CycleMessage;
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};

/// Upper bound for any single awaited step in a test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Install a test subscriber once per test binary.
///
/// Output goes through the test writer, so it only shows up for failing
/// tests or with `--nocapture`. `DIRPOLL_LOG=debug` raises the level.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("DIRPOLL_LOG")
            .unwrap_or_else(|_| EnvFilter::new("dirpoll=info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `f`, panicking if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(value) => value,
        Err(_) => panic!("test step timed out after {TEST_TIMEOUT:?}"),
    }
}

/// Receive messages up to and including the next `End`.
///
/// Returns whatever arrived before the channel closed if no `End` came.
pub async fn next_cycle(rx: &mut mpsc::Receiver<CycleMessage>) -> Vec<CycleMessage> {
    let mut cycle = Vec::new();
    while let Some(msg) = rx.recv().await {
        let done = msg == CycleMessage::End;
        cycle.push(msg);
        if done {
            break;
        }
    }
    cycle
}
