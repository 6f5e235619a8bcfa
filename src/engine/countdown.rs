//! Review-window countdown: the injectable clock, remaining-time math, and
//! the tokio timer that races operator input.
//!
//! The timer is owned by whoever started it through [`TimerHandle`]; there is
//! no ambient interval. Cancellation is synchronous, and the engine rejects a
//! stale expiry anyway once the ticket has left PendingReview, so whichever
//! of the operator and the timer acts first wins.

use chrono::{DateTime, Duration, Utc};
use tokio::task::JoinHandle;

/// Review window before a refund-only ticket is auto-refunded: 3 days.
pub const REVIEW_WINDOW_SECS: i64 = 3 * 24 * 60 * 60;

pub fn review_window() -> Duration {
    Duration::seconds(REVIEW_WINDOW_SECS)
}

/// Clock source for deadline comparisons, injectable for tests.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Time left before the deadline, clamped to zero.
pub fn remaining(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (deadline - now).max(Duration::zero())
}

/// Renders a remaining duration as `Nd HH:MM:SS`.
pub fn format_remaining(left: Duration) -> String {
    let secs = left.num_seconds().max(0);
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    format!("{days}d {hours:02}:{minutes:02}:{seconds:02}")
}

/// Ownership handle for a running countdown.
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Stop the countdown. After this returns, the expiry callback can no
    /// longer fire.
    pub fn cancel(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

pub struct Countdown;

impl Countdown {
    /// Start a ticking countdown toward `deadline`.
    ///
    /// `on_tick` runs once per tick with the time left; `on_expiry` runs
    /// exactly once when the clock reaches the deadline. Dropping the ticks
    /// and aborting through the returned handle is the caller's only way to
    /// stop it early.
    pub fn start<C, T, E>(
        clock: C,
        deadline: DateTime<Utc>,
        tick: std::time::Duration,
        mut on_tick: T,
        on_expiry: E,
    ) -> TimerHandle
    where
        C: Clock + Send + 'static,
        T: FnMut(Duration) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut on_expiry = Some(on_expiry);
            loop {
                let now = clock.now();
                if now >= deadline {
                    if let Some(fire) = on_expiry.take() {
                        fire();
                    }
                    break;
                }
                on_tick(remaining(deadline, now));
                tokio::time::sleep(tick).await;
            }
        });
        TimerHandle { task }
    }
}
