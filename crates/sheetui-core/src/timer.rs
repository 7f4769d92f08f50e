#![forbid(unsafe_code)]

//! Host-driven timers with cancellation.
//!
//! Sheets sequence their animations with fixed delays (a short stagger
//! before sliding in, a longer one before removal). Instead of handing
//! callbacks to a platform timer, each delay is recorded in a
//! [`TimerQueue`] and fires when the host advances time past its deadline.
//!
//! # Invariants
//!
//! 1. `now` never moves backwards; `advance_to` with an earlier instant is
//!    ignored.
//! 2. Due timers pop in deadline order; equal deadlines pop in scheduling
//!    order.
//! 3. A cancelled timer never fires. Cancelling twice, or cancelling a timer
//!    that already fired, returns `false`.
//!
//! # Failure Modes
//!
//! None. Delays that overflow the clock saturate at `Duration::MAX`.

use std::time::Duration;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw id value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct PendingTimer<T> {
    id: TimerId,
    deadline: Duration,
    payload: T,
}

/// Ordered set of pending timers driven by an explicit clock.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    now: Duration,
    next_id: u64,
    /// Sorted by `(deadline, id)`.
    pending: Vec<PendingTimer<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Current queue time.
    #[inline]
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers still pending.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timers are pending.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule `payload` to fire `delay` after the current time.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now.saturating_add(delay);
        let at = self
            .pending
            .partition_point(|t| (t.deadline, t.id) <= (deadline, id));
        self.pending.insert(
            at,
            PendingTimer {
                id,
                deadline,
                payload,
            },
        );
        id
    }

    /// Cancel a pending timer. Returns `true` if it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.pending.iter().position(|t| t.id == id) {
            Some(idx) => {
                self.pending.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Whether `id` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.first().map(|t| t.deadline)
    }

    /// Move the clock forward to `now`. Earlier instants are ignored.
    pub fn advance_to(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Move the clock forward by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Pop the earliest timer whose deadline has passed.
    pub fn pop_due(&mut self) -> Option<(TimerId, T)> {
        let due = self.pending.first().is_some_and(|t| t.deadline <= self.now);
        if !due {
            return None;
        }
        let timer = self.pending.remove(0);
        Some((timer.id, timer.payload))
    }

    /// Drop every pending timer, returning how many were cancelled.
    pub fn clear(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }
}

/// Monotonic clock abstraction.
///
/// Hosts read this before driving a [`TimerQueue`]; library code never
/// calls `Instant::now()` directly.
pub trait MonotonicClock {
    /// Elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;
}

/// Clock whose time is set explicitly by the host or a test.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl MonotonicClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Wall clock measured from its creation.
///
/// Uses `web_time::Instant`, which maps to `performance.now()` on wasm32
/// and `std::time::Instant` elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    epoch: web_time::Instant,
}

impl WallClock {
    /// Start a clock at the current instant.
    #[must_use]
    pub fn start() -> Self {
        Self {
            epoch: web_time::Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::start()
    }
}

impl MonotonicClock for WallClock {
    fn now_mono(&self) -> Duration {
        self.epoch.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_500: Duration = Duration::from_millis(500);

    #[test]
    fn nothing_fires_before_deadline() {
        let mut q = TimerQueue::new();
        q.schedule(MS_100, "a");
        q.advance(Duration::from_millis(99));
        assert_eq!(q.pop_due(), None);
        q.advance(Duration::from_millis(1));
        assert!(matches!(q.pop_due(), Some((_, "a"))));
        assert!(q.is_empty());
    }

    #[test]
    fn due_timers_pop_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(MS_500, "late");
        q.schedule(MS_100, "early");
        q.advance(Duration::from_secs(1));
        assert_eq!(q.pop_due().map(|(_, p)| p), Some("early"));
        assert_eq!(q.pop_due().map(|(_, p)| p), Some("late"));
        assert_eq!(q.pop_due(), None);
    }

    #[test]
    fn equal_deadlines_keep_schedule_order() {
        let mut q = TimerQueue::new();
        let a = q.schedule(MS_100, 1);
        let b = q.schedule(MS_100, 2);
        assert!(a < b);
        q.advance(MS_100);
        assert_eq!(q.pop_due(), Some((a, 1)));
        assert_eq!(q.pop_due(), Some((b, 2)));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let id = q.schedule(MS_100, ());
        assert!(q.is_pending(id));
        assert!(q.cancel(id));
        assert!(!q.cancel(id));
        assert!(!q.is_pending(id));
        q.advance(Duration::from_secs(5));
        assert_eq!(q.pop_due(), None);
    }

    #[test]
    fn schedule_is_relative_to_current_time() {
        let mut q = TimerQueue::new();
        q.advance_to(Duration::from_secs(10));
        q.schedule(MS_100, ());
        assert_eq!(q.next_deadline(), Some(Duration::from_millis(10_100)));
    }

    #[test]
    fn advance_to_never_rewinds() {
        let mut q: TimerQueue<()> = TimerQueue::new();
        q.advance_to(Duration::from_secs(2));
        q.advance_to(Duration::from_secs(1));
        assert_eq!(q.now(), Duration::from_secs(2));
    }

    #[test]
    fn clear_drops_everything() {
        let mut q = TimerQueue::new();
        q.schedule(MS_100, ());
        q.schedule(MS_500, ());
        assert_eq!(q.len(), 2);
        assert_eq!(q.clear(), 2);
        assert!(q.is_empty());
        assert_eq!(q.next_deadline(), None);
    }

    #[test]
    fn deterministic_clock_advances() {
        let mut clock = DeterministicClock::new();
        clock.advance(MS_100);
        clock.advance(MS_100);
        assert_eq!(clock.now_mono(), Duration::from_millis(200));
        clock.set(Duration::from_secs(3));
        assert_eq!(clock.now_mono(), Duration::from_secs(3));
    }

    #[test]
    fn wall_clock_is_monotonic() {
        let clock = WallClock::start();
        let a = clock.now_mono();
        let b = clock.now_mono();
        assert!(b >= a);
    }
}
