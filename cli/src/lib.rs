//! subhop - teleports a subject to a safe random spot on subscriber increases.
//!
//! # Architecture
//!
//! ```text
//! main() -> Poller::tick() -> SubscriberSource::fetch() -> SubscriberTracker
//!                                   |
//!                                   v (Trigger::Fire)
//!                  run_cycle(): connect -> lookup -> search -> tp -> disconnect
//! ```
//!
//! One cycle completes before the next poll sleep, so at most one
//! search/teleport is in flight.

pub mod cycle;
pub mod poller;

pub use cycle::{CycleOutcome, run_cycle, search_and_teleport};
pub use poller::{Poller, TickOutcome};
