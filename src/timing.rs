// Elapsed-time accounting
//
// Time retrieval is injected through the [`Clock`] trait so elapsed-time
// logic stays deterministic under test. Elapsed spans are rounded to the
// nearest millisecond, not truncated; a missed sample simply elapses more
// milliseconds on the next call.

use std::time::Instant;

/// Monotonic time source driving the pipeline's elapsed-time accounting.
pub trait Clock: Send {
    fn now(&self) -> Instant;
}

/// Default clock backed by `Instant::now`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Milliseconds between two instants, rounded to nearest.
pub fn elapsed_millis(now: Instant, last: Instant) -> u32 {
    let ms = now.saturating_duration_since(last).as_secs_f64() * 1000.0;
    (ms + 0.5) as u32
}

/// Accumulates time since the last reported reading.
///
/// The counter only grows between reports and is zeroed when the gate
/// surfaces one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportTimer {
    ms_since_reported: u32,
}

impl ReportTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulate(&mut self, elapsed_ms: u32) {
        self.ms_since_reported = self.ms_since_reported.saturating_add(elapsed_ms);
    }

    pub fn ms_since_reported(&self) -> u32 {
        self.ms_since_reported
    }

    pub fn reset(&mut self) {
        self.ms_since_reported = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_elapsed_rounds_to_nearest() {
        let base = Instant::now();
        let later = base + Duration::from_micros(40_700);
        assert_eq!(elapsed_millis(later, base), 41, "40.7 ms rounds up");

        let later = base + Duration::from_micros(40_300);
        assert_eq!(elapsed_millis(later, base), 40, "40.3 ms rounds down");
    }

    #[test]
    fn test_elapsed_zero_for_same_instant() {
        let base = Instant::now();
        assert_eq!(elapsed_millis(base, base), 0);
    }

    #[test]
    fn test_elapsed_saturates_on_reversed_instants() {
        let base = Instant::now();
        let later = base + Duration::from_millis(10);
        assert_eq!(elapsed_millis(base, later), 0);
    }

    #[test]
    fn test_report_timer_accumulates_and_resets() {
        let mut timer = ReportTimer::new();
        timer.accumulate(40);
        timer.accumulate(41);
        assert_eq!(timer.ms_since_reported(), 81);
        timer.reset();
        assert_eq!(timer.ms_since_reported(), 0);
    }

    #[test]
    fn test_report_timer_saturates() {
        let mut timer = ReportTimer::new();
        timer.accumulate(u32::MAX);
        timer.accumulate(100);
        assert_eq!(timer.ms_since_reported(), u32::MAX);
    }
}
