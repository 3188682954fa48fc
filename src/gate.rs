// Event gate - decides when an engine output is worth surfacing
//
// The engine nominally emits once per second, often repeating the same
// figures. The gate reports when either figure changes, or as a periodic
// heartbeat when an unchanged, non-trivial reading has been held for more
// than the configured threshold. A (0, 0) output means "no signal" and is
// never force-reported.

use serde::{Deserialize, Serialize};

use crate::timing::ReportTimer;
use crate::types::{EngineOutput, HeartRateReading};

/// The last reading the gate decided to surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedReading {
    /// Last reported heart rate in whole BPM
    pub heart_rate_bpm: i32,
    /// Last reported confidence score
    pub confidence: i32,
    /// Heart rate in tenths of a BPM, the externally reported unit
    pub bpm10: i32,
    #[serde(skip)]
    timer: ReportTimer,
}

impl ReportedReading {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add measured elapsed time ahead of the next gate decision.
    pub fn accumulate_elapsed(&mut self, elapsed_ms: u32) {
        self.timer.accumulate(elapsed_ms);
    }

    /// Milliseconds since the last surfaced reading.
    pub fn ms_since_reported(&self) -> u32 {
        self.timer.ms_since_reported()
    }

    /// Zero everything, as on session start.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Gate decision for the engine's latest output.
    ///
    /// Returns true and records the reading when it should be surfaced:
    /// either figure changed, or the heartbeat threshold elapsed while the
    /// reading is non-trivial (both figures nonzero). On report the
    /// elapsed-time accumulator resets.
    pub fn should_report(&mut self, output: EngineOutput, heartbeat_ms: u32) -> bool {
        let changed = output.heart_rate_bpm != self.heart_rate_bpm
            || output.confidence != self.confidence;
        let heartbeat_due = self.timer.ms_since_reported() > heartbeat_ms
            && output.heart_rate_bpm != 0
            && output.confidence != 0;

        if !(changed || heartbeat_due) {
            return false;
        }

        self.heart_rate_bpm = output.heart_rate_bpm;
        self.confidence = output.confidence;
        self.bpm10 = output.heart_rate_bpm * 10;
        self.timer.reset();
        true
    }

    /// The reading in host units (tenths of BPM plus confidence).
    pub fn reading(&self) -> HeartRateReading {
        HeartRateReading {
            bpm10: self.bpm10,
            confidence: self.confidence,
        }
    }
}
