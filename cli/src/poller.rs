//! Subscriber polling step.

use std::future::Future;

use subhop_trigger::{SubscriberSource, SubscriberTracker, Trigger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    /// The count increased and the cycle ran to completion.
    Fired { previous: u64, current: u64 },
    /// The count could not be read; the baseline is unchanged.
    FetchFailed,
}

/// Drives the tracker from a source, one reading per tick.
#[derive(Debug, Default)]
pub struct Poller {
    tracker: SubscriberTracker,
}

impl Poller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch one reading and, on an increase, run `on_fire` to completion.
    pub async fn tick<S, F, Fut>(&mut self, source: &S, on_fire: F) -> TickOutcome
    where
        S: SubscriberSource,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let count = match source.fetch().await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch subscriber count");
                return TickOutcome::FetchFailed;
            }
        };

        match self.tracker.observe(count) {
            Trigger::Idle => TickOutcome::Idle,
            Trigger::Fire { previous, current } => {
                tracing::info!(previous, current, "Subscriber count increased");
                on_fire().await;
                TickOutcome::Fired { previous, current }
            }
        }
    }

    #[must_use]
    pub fn last_count(&self) -> Option<u64> {
        self.tracker.last()
    }
}
