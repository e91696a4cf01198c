use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::session::store::SessionStore;

/// Runs [`SessionStore::sweep`] every `period`, independent of traffic.
///
/// The task lives until it is aborted or the runtime shuts down.
pub fn spawn_sweeper(store: Arc<SessionStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let removed = store.sweep();
            if removed > 0 {
                tracing::info!(removed, remaining = store.len(), "Expired sessions swept");
            } else {
                tracing::debug!(remaining = store.len(), "Session sweep found nothing idle");
            }
        }
    })
}
