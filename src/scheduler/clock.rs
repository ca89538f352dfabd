//! Timers driven by host-supplied instants
//!
//! Nothing here sleeps or reads the wall clock on its own: the host passes
//! `Instant`s in, which keeps the scheduler single-threaded and lets tests
//! drive it with synthetic time.

use std::time::{Duration, Instant};

/// Fixed-interval timer (the simulation clock)
///
/// Late ticks are not compensated beyond the catch-up cap.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: Duration,
    next_due: Instant,
}

impl IntervalTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of ticks due at `now`, at most `max_ticks`
    ///
    /// When more than `max_ticks` are owed the backlog is dropped and the
    /// timer re-arms one interval after `now`.
    pub fn poll(&mut self, now: Instant, max_ticks: u32) -> u32 {
        let mut due = 0;
        while now >= self.next_due && due < max_ticks {
            self.next_due += self.interval;
            due += 1;
        }
        if now >= self.next_due {
            log::warn!(
                "step timer fell behind by {:?}, dropping backlog",
                now - self.next_due
            );
            self.next_due = now + self.interval;
        }
        due
    }
}

/// Frames and steps completed during the last full second
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rates {
    pub frames_per_second: u32,
    pub steps_per_second: u32,
}

/// Per-second frame/step counter
#[derive(Debug, Clone)]
pub struct RateCounter {
    window_start: Instant,
    frames: u32,
    steps: u32,
    last: Rates,
}

impl RateCounter {
    const WINDOW: Duration = Duration::from_secs(1);

    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            steps: 0,
            last: Rates::default(),
        }
    }

    pub fn reset(&mut self, now: Instant) {
        *self = Self::new(now);
    }

    #[inline]
    pub fn count_frame(&mut self) {
        self.frames += 1;
    }

    #[inline]
    pub fn count_step(&mut self) {
        self.steps += 1;
    }

    /// Close the current window if a second has passed
    pub fn roll(&mut self, now: Instant) -> Option<Rates> {
        if now.duration_since(self.window_start) < Self::WINDOW {
            return None;
        }
        self.last = Rates {
            frames_per_second: self.frames,
            steps_per_second: self.steps,
        };
        self.frames = 0;
        self.steps = 0;
        self.window_start += Self::WINDOW;
        if now.duration_since(self.window_start) >= Self::WINDOW {
            self.window_start = now;
        }
        Some(self.last)
    }

    #[inline]
    pub fn latest(&self) -> Rates {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_on_schedule() {
        let t0 = Instant::now();
        let mut timer = IntervalTimer::new(Duration::from_millis(10), t0);
        assert_eq!(timer.poll(t0 + Duration::from_millis(5), 8), 0);
        assert_eq!(timer.poll(t0 + Duration::from_millis(10), 8), 1);
        assert_eq!(timer.poll(t0 + Duration::from_millis(35), 8), 2);
    }

    #[test]
    fn test_timer_drops_backlog() {
        let t0 = Instant::now();
        let mut timer = IntervalTimer::new(Duration::from_millis(10), t0);
        let late = t0 + Duration::from_millis(500);
        assert_eq!(timer.poll(late, 8), 8);
        // Re-armed relative to `late`, not owed the remaining 42 ticks
        assert_eq!(timer.poll(late + Duration::from_millis(9), 8), 0);
        assert_eq!(timer.poll(late + Duration::from_millis(10), 8), 1);
    }

    #[test]
    fn test_rate_counter_windows() {
        let t0 = Instant::now();
        let mut rates = RateCounter::new(t0);
        for _ in 0..30 {
            rates.count_frame();
        }
        for _ in 0..60 {
            rates.count_step();
        }
        assert!(rates.roll(t0 + Duration::from_millis(999)).is_none());
        let r = rates.roll(t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(r.frames_per_second, 30);
        assert_eq!(r.steps_per_second, 60);
        assert_eq!(rates.latest(), r);
        rates.count_step();
        let r = rates.roll(t0 + Duration::from_secs(2)).unwrap();
        assert_eq!(r.steps_per_second, 1);
    }
}
