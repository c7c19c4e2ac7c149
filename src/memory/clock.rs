// Background expiry clock for the in-memory provider.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::table::Table;
use crate::metrics;

/// Ticks every `every` until `token` is cancelled, counting down temporary
/// entries and evicting the ones that reach zero.
pub(crate) async fn run(
    token: CancellationToken,
    name: String,
    table: Arc<Mutex<Table>>,
    every: Duration,
) {
    let mut ticker = interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    debug!(
        component = "memory",
        event = "clock_started",
        provider = %name,
        tick_ms = as_millis(every),
        "expiry clock started"
    );

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                debug!(component = "memory", event = "clock_stopped", provider = %name, "expiry clock stopped");
                return;
            }
            _ = ticker.tick() => {
                let (evicted, len) = {
                    let mut table = table.lock();
                    let evicted = table.tick();
                    (evicted, table.len())
                };
                metrics::set_memory_length(&name, len);
                if !evicted.is_empty() {
                    metrics::add_memory_evictions(&name, evicted.len() as u64);
                    debug!(
                        component = "memory",
                        event = "entries_expired",
                        provider = %name,
                        evicted = evicted.len(),
                        remaining = len,
                        "expired entries evicted"
                    );
                }
            }
        }
    }
}

fn as_millis(every: Duration) -> u64 {
    u64::try_from(every.as_millis()).unwrap_or(u64::MAX)
}
