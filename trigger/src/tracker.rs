/// Decision for one subscriber reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Idle,
    /// The count went up since the previous reading. One cycle, however large the jump.
    Fire { previous: u64, current: u64 },
}

/// Compares successive readings.
///
/// The first reading only sets the baseline. Every reading replaces the
/// baseline, so after a drop the next increase is measured from the lower value.
#[derive(Debug, Default)]
pub struct SubscriberTracker {
    last: Option<u64>,
}

impl SubscriberTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, count: u64) -> Trigger {
        let previous = self.last.replace(count);
        match previous {
            Some(previous) if count > previous => Trigger::Fire {
                previous,
                current: count,
            },
            Some(previous) => {
                if count < previous {
                    tracing::debug!(previous, current = count, "Subscriber count dropped");
                }
                Trigger::Idle
            }
            None => {
                tracing::info!(count, "Subscriber baseline established");
                Trigger::Idle
            }
        }
    }

    #[must_use]
    pub fn last(&self) -> Option<u64> {
        self.last
    }
}
