use std::time::Duration;

use crate::{Result, StateStore};

/// Waits for the store to become reachable with a bounded poll.
///
/// Pings the store up to `attempts` times, sleeping `interval` between
/// attempts, and gives up deterministically after exhaustion by
/// returning the last transport error. This is the pattern used for
/// any operation that must wait on eventual external readiness.
pub async fn wait_ready<S: StateStore + ?Sized>(
    store: &S,
    attempts: u32,
    interval: Duration,
) -> Result<()> {
    let mut last_err = None;

    for attempt in 1..=attempts {
        match store.ping().await {
            Ok(()) => {
                tracing::debug!(store = store.store_name(), attempt, "state store ready");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!(
                    store = store.store_name(),
                    attempt,
                    error = %e,
                    "state store not ready"
                );
                last_err = Some(e);
            }
        }

        if attempt < attempts {
            tokio::time::sleep(interval).await;
        }
    }

    // attempts >= 1, so a failure always leaves an error behind
    Err(last_err.expect("at least one ping attempt"))
}
