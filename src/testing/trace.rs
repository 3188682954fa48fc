//! JSON sample-trace fixtures.
//!
//! A trace is a recorded (or synthesized) sequence of wear-detector frames
//! with optional scripted engine outputs, replayable through the pipeline
//! for regression runs and CLI experiments. Engine outputs ride along in
//! the trace because the real estimator only exists on device.

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::HrmConfig;
use crate::error::TraceError;
use crate::pipeline::HrmPipeline;
use crate::types::{AccelVector, EngineOutput, HeartRateReading, RawSample};

use super::{ManualClock, ScriptedEngine};

/// One step of a trace: advance the clock, optionally script the engine's
/// next output, then ingest the frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceStep {
    /// Milliseconds to advance the clock before ingesting
    pub advance_ms: u32,
    pub frame: RawSample,
    /// Output the scripted engine returns for this ingest; `None` repeats
    /// the previous one, as the real engine does between estimate updates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_output: Option<EngineOutput>,
}

/// A replayable sequence of sensor frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleTrace {
    pub steps: Vec<TraceStep>,
}

impl SampleTrace {
    /// Load a trace from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TraceError> {
        let contents = fs::read_to_string(&path).map_err(|err| TraceError::ReadFailed {
            path: path.as_ref().display().to_string(),
            reason: err.to_string(),
        })?;
        let trace: SampleTrace =
            serde_json::from_str(&contents).map_err(|err| TraceError::ParseFailed {
                reason: err.to_string(),
            })?;
        if trace.steps.is_empty() {
            return Err(TraceError::Empty);
        }
        Ok(trace)
    }
}

/// A reading surfaced during replay, tagged with the step that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEvent {
    pub step: usize,
    pub reading: HeartRateReading,
}

/// Drive a trace through a fresh pipeline and collect the surfaced readings.
pub fn replay_trace(trace: &SampleTrace, config: HrmConfig) -> Vec<ReportEvent> {
    let mut pipeline = HrmPipeline::new(config, ScriptedEngine::new(), ManualClock::new());
    let mut events = Vec::new();

    for (step, entry) in trace.steps.iter().enumerate() {
        pipeline.clock_mut().advance_ms(entry.advance_ms as u64);
        if let Some(output) = entry.engine_output {
            pipeline.engine_mut().push_output(output);
        }
        if pipeline.process_sample(&entry.frame) {
            let reading = pipeline.last_reading();
            tracing::debug!(
                step,
                bpm10 = reading.bpm10,
                confidence = reading.confidence,
                "reading surfaced during replay"
            );
            events.push(ReportEvent { step, reading });
        }
    }

    events
}

/// Generate a deterministic synthetic trace.
///
/// Produces a pulsatile PPG signal with noise, small accelerometer jitter,
/// a removal gap in the middle third, and an engine estimate that updates
/// roughly once per second with a slowly wandering heart rate.
pub fn synthetic_trace(steps: usize, poll_interval_ms: u32, seed: u64) -> SampleTrace {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bpm: i32 = 72;
    let mut confidence: i32 = 80;
    let steps_per_second = (1000 / poll_interval_ms.max(1)).max(1) as usize;

    let removal_start = steps / 3;
    let removal_end = removal_start + steps / 10;

    let trace_steps = (0..steps)
        .map(|i| {
            let worn = !(removal_start..removal_end).contains(&i);
            let phase = i as f64 * poll_interval_ms as f64 / 1000.0 * (bpm as f64 / 60.0);
            let pulse = (phase * 2.0 * std::f64::consts::PI).sin() * 60.0;
            let ppg_value = 2000 + pulse as i32 + rng.gen_range(-15..=15);

            let engine_output = if worn && i % steps_per_second == 0 {
                bpm = (bpm + rng.gen_range(-2..=2)).clamp(50, 110);
                confidence = (confidence + rng.gen_range(-5..=5)).clamp(0, 100);
                Some(EngineOutput {
                    heart_rate_bpm: bpm,
                    confidence,
                })
            } else {
                None
            };

            TraceStep {
                advance_ms: poll_interval_ms,
                frame: RawSample {
                    is_wearing: worn,
                    ppg_value,
                    env_value: rng.gen_range(0..8),
                    was_adjusted: false,
                    accel: AccelVector::new(
                        rng.gen_range(-300..=300),
                        rng.gen_range(-300..=300),
                        8192 + rng.gen_range(-300..=300),
                    ),
                },
                engine_output,
            }
        })
        .collect();

    SampleTrace { steps: trace_steps }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_trace_json_roundtrip() {
        let trace = synthetic_trace(50, 40, 7);
        let json = serde_json::to_string(&trace).unwrap();
        let parsed: SampleTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.steps.len(), trace.steps.len());
        assert_eq!(parsed.steps[0].frame, trace.steps[0].frame);
    }

    #[test]
    fn test_synthetic_trace_is_deterministic() {
        let a = synthetic_trace(100, 40, 42);
        let b = synthetic_trace(100, 40, 42);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_synthetic_trace_has_removal_gap() {
        let trace = synthetic_trace(120, 40, 1);
        assert!(trace.steps.iter().any(|s| !s.frame.is_wearing));
        assert!(trace.steps.first().unwrap().frame.is_wearing);
        assert!(trace.steps.last().unwrap().frame.is_wearing);
    }

    #[test]
    fn test_replay_surfaces_readings() {
        let trace = synthetic_trace(250, 40, 3);
        let events = replay_trace(&trace, HrmConfig::default());
        assert!(
            !events.is_empty(),
            "a multi-second worn trace must surface at least one reading"
        );
        for event in &events {
            assert!(event.step < trace.steps.len());
        }
    }

    #[test]
    fn test_replay_reports_nothing_for_unworn_trace() {
        let mut trace = synthetic_trace(100, 40, 5);
        for step in &mut trace.steps {
            step.frame.is_wearing = false;
        }
        let events = replay_trace(&trace, HrmConfig::default());
        assert!(events.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = SampleTrace::load("does/not/exist.json").unwrap_err();
        assert_eq!(err.code(), crate::error::TraceErrorCodes::READ_FAILED);
    }

    #[test]
    fn test_load_rejects_empty_trace() {
        let dir = std::env::temp_dir().join("hrm_pipeline_trace_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.json");
        std::fs::write(&path, r#"{"steps": []}"#).unwrap();
        assert_eq!(SampleTrace::load(&path).unwrap_err(), TraceError::Empty);
    }
}
