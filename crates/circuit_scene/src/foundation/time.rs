//! Session time utilities

use std::time::{Duration, Instant};

/// Monotonic clock anchored at the start of a scene session.
///
/// Signal-trace timestamps are expressed as nanoseconds since the session
/// started; the render loop uses [`SessionClock::frame`] to measure frame deltas.
#[derive(Debug, Clone)]
pub struct SessionClock {
    started: Instant,
    last_frame: Instant,
    frame_count: u64,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionClock {
    /// Start a new session clock
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_frame: now,
            frame_count: 0,
        }
    }

    /// Time elapsed since the session started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Nanoseconds since the session started, saturating at `u64::MAX`
    pub fn now_nanos(&self) -> u64 {
        u64::try_from(self.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    /// Mark a frame boundary and return the seconds since the previous one
    pub fn frame(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;
        delta
    }

    /// Number of frames marked so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_nanos_is_monotonic() {
        let clock = SessionClock::new();
        let first = clock.now_nanos();
        std::thread::sleep(Duration::from_millis(1));
        assert!(clock.now_nanos() > first);
    }

    #[test]
    fn test_frame_counts_and_measures() {
        let mut clock = SessionClock::new();
        std::thread::sleep(Duration::from_millis(2));
        let delta = clock.frame();
        assert!(delta > 0.0);
        assert_eq!(clock.frame_count(), 1);
    }
}
