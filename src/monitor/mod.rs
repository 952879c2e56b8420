//! Poll schedulers driving the fetch/diff/notify/commit cycles
//!
//! One scheduler instance drives one monitored domain. The game-feed and
//! status-page monitors run as independent tasks on fixed timers and never
//! block each other. A cycle that overruns its interval causes the
//! overlapping tick to be skipped rather than running two cycles against the
//! same seen state.
//!
//! Cycle state machine per domain:
//!
//! ```text
//! Idle → Fetching → Diffing → Notifying → Committing → Idle
//!          │
//!          └─ Unavailable ───────────────────────────→ Idle
//! ```
//!
//! Failures inside a cycle are caught at the cycle boundary and logged; a
//! failed cycle is never fatal to the scheduler.

mod games;
mod status;

pub use games::GameMonitor;
pub use status::StatusMonitor;

use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Fixed-interval timer that skips (not stacks) missed ticks
pub(crate) fn cycle_timer(period: Duration) -> Interval {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_cycle_timer_skips_missed_ticks() {
        let mut timer = cycle_timer(Duration::from_secs(10));
        timer.tick().await; // first tick fires immediately

        // Simulate a cycle overrunning three intervals.
        tokio::time::advance(Duration::from_secs(35)).await;
        timer.tick().await;

        // Only one more tick is pending, not three.
        let next = timer.tick();
        tokio::select! {
            _ = next => panic!("skipped ticks should not stack"),
            _ = tokio::time::sleep(Duration::from_secs(1)) => {}
        }
    }
}
