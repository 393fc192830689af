//! Gapless playback scheduling for inbound voice fragments.
//!
//! Each fragment is placed at max(playback clock, end of the previously
//! scheduled fragment): fragments never overlap and never leave a gap beyond
//! arrival latency. An interruption (barge-in) drops everything pending and
//! resets the clock to zero.

/// Pure scheduling state, in seconds of playback-clock time.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSchedule {
    /// End time of the last scheduled fragment.
    cursor: f64,
}

impl PlaybackSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a fragment of `duration` seconds arriving at clock time
    /// `now`, returning its start time.
    pub fn schedule(&mut self, now: f64, duration: f64) -> f64 {
        let start = now.max(self.cursor);
        self.cursor = start + duration;
        start
    }

    /// Clock time at which everything scheduled so far has finished.
    pub fn end_of_queue(&self) -> f64 {
        self.cursor
    }

    /// True when nothing scheduled is still pending at clock time `now`.
    pub fn idle_at(&self, now: f64) -> bool {
        now >= self.cursor
    }

    /// Barge-in: drop all pending playback and reset the clock origin.
    pub fn reset(&mut self) {
        self.cursor = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_to_back_fragments_are_gapless() {
        let mut schedule = PlaybackSchedule::new();
        // First fragment arrives at t=0.0 and lasts 0.5s; the second arrives
        // while the first is still playing.
        let s1 = schedule.schedule(0.0, 0.5);
        let s2 = schedule.schedule(0.2, 0.3);
        assert_eq!(s1, 0.0);
        assert_eq!(s2, 0.5);
        assert_eq!(schedule.end_of_queue(), 0.8);
    }

    #[test]
    fn test_late_fragment_starts_at_arrival() {
        let mut schedule = PlaybackSchedule::new();
        schedule.schedule(0.0, 0.5);
        // Arrives after the first fragment finished: start equals arrival.
        let s2 = schedule.schedule(1.2, 0.4);
        assert_eq!(s2, 1.2);
        assert_eq!(schedule.end_of_queue(), 1.6);
    }

    #[test]
    fn test_start_is_max_of_arrival_and_prev_end() {
        let mut schedule = PlaybackSchedule::new();
        let d1 = 0.7;
        let d2 = 0.2;
        let t1 = 0.1;
        let t2 = 0.3;
        let s1 = schedule.schedule(t1, d1);
        let s2 = schedule.schedule(t2, d2);
        assert_eq!(s2, t2.max(s1 + d1));
    }

    #[test]
    fn test_idle_tracking() {
        let mut schedule = PlaybackSchedule::new();
        assert!(schedule.idle_at(0.0));
        schedule.schedule(0.0, 0.5);
        assert!(!schedule.idle_at(0.4));
        assert!(schedule.idle_at(0.5));
    }

    #[test]
    fn test_reset_clears_pending_and_clock() {
        let mut schedule = PlaybackSchedule::new();
        schedule.schedule(0.0, 10.0);
        assert!(!schedule.idle_at(1.0));

        schedule.reset();
        assert!(schedule.idle_at(0.0));
        assert_eq!(schedule.end_of_queue(), 0.0);

        // Scheduling after a reset starts from the new clock origin.
        let start = schedule.schedule(0.0, 0.25);
        assert_eq!(start, 0.0);
    }
}
