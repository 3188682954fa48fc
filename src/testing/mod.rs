//! Deterministic test collaborators.
//!
//! The real estimation engine is a closed vendor blob only available on
//! device, which makes local testing painful. This module provides a
//! scripted stand-in honoring the [`EstimationEngine`] contract and a
//! manually advanced clock, so the session, conditioning and gating logic
//! can be exercised without hardware. Trace fixtures for the CLI harness
//! live in [`trace`](crate::testing::trace).

mod trace;

pub use trace::{replay_trace, synthetic_trace, ReportEvent, SampleTrace, TraceStep};

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::engine::{ConditionedInput, EstimationEngine};
use crate::timing::Clock;
use crate::types::{EngineOutput, SportMode};

/// Scripted engine stub returning pre-programmed outputs.
///
/// Each `ingest` call consumes the next scripted output; once the script is
/// exhausted the last output is held, mirroring an engine that keeps
/// repeating a stable estimate. `reset` returns the output to `(0, 0)` as a
/// freshly initialized engine would.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    script: VecDeque<EngineOutput>,
    current: EngineOutput,
    reset_calls: usize,
    ingest_calls: usize,
    last_input: Option<ConditionedInput>,
    last_elapsed_ms: Option<u32>,
    last_sport_mode: Option<SportMode>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outputs(outputs: &[EngineOutput]) -> Self {
        Self {
            script: outputs.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Append one output to the script.
    pub fn push_output(&mut self, output: EngineOutput) {
        self.script.push_back(output);
    }

    pub fn reset_calls(&self) -> usize {
        self.reset_calls
    }

    pub fn ingest_calls(&self) -> usize {
        self.ingest_calls
    }

    pub fn last_input(&self) -> Option<ConditionedInput> {
        self.last_input
    }

    pub fn last_elapsed_ms(&self) -> Option<u32> {
        self.last_elapsed_ms
    }

    pub fn last_sport_mode(&self) -> Option<SportMode> {
        self.last_sport_mode
    }
}

impl EstimationEngine for ScriptedEngine {
    fn reset(&mut self) {
        self.reset_calls += 1;
        self.current = EngineOutput::default();
    }

    fn ingest(
        &mut self,
        input: &ConditionedInput,
        elapsed_ms: u32,
        sport_mode: SportMode,
        _aux_flags: u32,
    ) {
        self.ingest_calls += 1;
        self.last_input = Some(*input);
        self.last_elapsed_ms = Some(elapsed_ms);
        self.last_sport_mode = Some(sport_mode);
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
    }

    fn latest_output(&self) -> EngineOutput {
        self.current
    }
}

/// Manually advanced clock for deterministic elapsed-time tests.
pub struct ManualClock {
    start: Instant,
    offset_ms: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset_ms: 0,
        }
    }

    /// Move the clock forward by `ms` milliseconds.
    pub fn advance_ms(&mut self, ms: u64) {
        self.offset_ms += ms;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + Duration::from_millis(self.offset_ms)
    }
}
