// HrmPipeline - per-sample drive of the estimation engine
//
// One ingestion call processes a sample to completion: session update ->
// conditioning -> engine call -> gate decision. State is exclusively owned
// by the pipeline value and mutated only here; callers that need concurrent
// ingestion must serialize access themselves, since the engine assumes one
// logical stream of calls.

use std::time::Instant;

use log::debug;

use crate::conditioner::{condition, Conditioned};
use crate::config::HrmConfig;
use crate::engine::{ConditionedInput, EstimationEngine};
use crate::gate::ReportedReading;
use crate::session::{SessionAction, SessionState};
use crate::telemetry::{EventAugmenter, NoopAugmenter, PipelineSnapshot};
use crate::timing::{elapsed_millis, Clock};
use crate::types::{HeartRateReading, RawSample, SportMode, PPG_ADJUSTED_FLAG};

/// Stateful layer between the wear detector and the estimation engine.
pub struct HrmPipeline<E, C> {
    config: HrmConfig,
    engine: E,
    clock: C,
    session: SessionState,
    reported: ReportedReading,
    sport_mode: SportMode,
    last_sample_time: Instant,
    last_conditioned: Conditioned,
    augmenter: Box<dyn EventAugmenter + Send>,
}

impl<E: EstimationEngine, C: Clock> HrmPipeline<E, C> {
    /// Build a pipeline in its initialized state (not worn, zeroed report,
    /// current time stamped as the last-sample time).
    pub fn new(config: HrmConfig, engine: E, clock: C) -> Self {
        let now = clock.now();
        let sport_mode = config.gate.sport_mode;
        Self {
            config,
            engine,
            clock,
            session: SessionState::new(),
            reported: ReportedReading::new(),
            sport_mode,
            last_sample_time: now,
            last_conditioned: Conditioned {
                filtered: 0,
                new_mean: 0,
                raw_clamped: 0,
                accel: Default::default(),
            },
            augmenter: Box::new(NoopAugmenter),
        }
    }

    /// Zero all session and report state, mark not-worn, restore the
    /// configured sport mode and stamp the current time. Idempotent as a
    /// full reset.
    pub fn init(&mut self) {
        self.session.reset();
        self.reported.clear();
        self.sport_mode = self.config.gate.sport_mode;
        self.last_sample_time = self.clock.now();
        self.last_conditioned = Conditioned {
            filtered: 0,
            new_mean: 0,
            raw_clamped: 0,
            accel: Default::default(),
        };
    }

    /// Ingest one sample from the wear detector.
    ///
    /// Returns true when a new reportable reading is available via
    /// [`last_reading`](Self::last_reading); on false the caller must not
    /// emit an event.
    pub fn process_sample(&mut self, frame: &RawSample) -> bool {
        // The interval to the previous call is measured before anything
        // else, including on not-worn cycles, so a removal gap shows up as
        // one long elapsed span on the next worn sample.
        let now = self.clock.now();
        let elapsed = elapsed_millis(now, self.last_sample_time);
        self.last_sample_time = now;

        match self.session.begin_sample(frame.is_wearing) {
            SessionAction::Reset => {
                debug!("[Pipeline] Worn session start, resetting engine");
                self.engine.reset();
                self.reported.clear();
            }
            SessionAction::Skip => return false,
            SessionAction::Continue => {}
        }

        let conditioned = condition(
            frame.ppg_value,
            frame.accel,
            self.session.running_mean(),
            self.session.reseed_pending(),
            &self.config.filter,
        );
        self.session.store_mean(conditioned.new_mean);
        self.last_conditioned = conditioned;

        let adjusted_flag = if frame.was_adjusted {
            PPG_ADJUSTED_FLAG
        } else {
            0
        };
        let input = ConditionedInput {
            filtered: conditioned.filtered,
            ppg_sample: frame.ppg_value as u16 | adjusted_flag,
            env_sample: frame.env_value,
            accel: conditioned.accel,
        };

        // The gate's accumulator always tracks measured time; the static
        // sample time only substitutes what the engine sees.
        self.reported.accumulate_elapsed(elapsed);
        let engine_elapsed = if self.config.timing.use_static_sample_time {
            self.config.timing.nominal_poll_interval_ms
        } else {
            elapsed
        };
        self.engine.ingest(&input, engine_elapsed, self.sport_mode, 0);

        let output = self.engine.latest_output();
        if self
            .reported
            .should_report(output, self.config.gate.heartbeat_ms)
        {
            debug!(
                "[Pipeline] Reporting {} bpm (confidence {})",
                output.heart_rate_bpm, output.confidence
            );
            return true;
        }
        false
    }

    /// The last reading the gate surfaced, in host units.
    pub fn last_reading(&self) -> HeartRateReading {
        self.reported.reading()
    }

    pub fn is_worn(&self) -> bool {
        self.session.is_worn()
    }

    /// Select the operating mode forwarded to the engine from the next
    /// sample on. The pipeline itself never branches on it.
    pub fn set_sport_mode(&mut self, mode: SportMode) {
        self.sport_mode = mode;
    }

    pub fn sport_mode(&self) -> SportMode {
        self.sport_mode
    }

    /// Install the augmenter consulted when hosts package event objects.
    pub fn set_augmenter(&mut self, augmenter: Box<dyn EventAugmenter + Send>) {
        self.augmenter = augmenter;
    }

    /// Read-only view of the state augmenters may inspect.
    pub fn snapshot(&self) -> PipelineSnapshot {
        let reading = self.reported.reading();
        PipelineSnapshot {
            filtered: self.last_conditioned.filtered,
            raw_clamped: self.last_conditioned.raw_clamped,
            running_mean: self.session.running_mean(),
            is_worn: self.session.is_worn(),
            bpm10: reading.bpm10,
            confidence: reading.confidence,
        }
    }

    /// Let the installed augmenter attach fields to a heart-rate event.
    pub fn augment_heart_rate_event(&self, fields: &mut serde_json::Map<String, serde_json::Value>) {
        self.augmenter.augment_heart_rate_event(&self.snapshot(), fields);
    }

    /// Let the installed augmenter attach fields to a raw-sample event.
    pub fn augment_raw_event(&self, fields: &mut serde_json::Map<String, serde_json::Value>) {
        self.augmenter.augment_raw_event(&self.snapshot(), fields);
    }

    /// Access to the engine, mainly for scripted engines in tests.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Access to the clock, mainly for manual clocks in tests.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::DiagnosticsAugmenter;
    use crate::testing::{ManualClock, ScriptedEngine};
    use crate::types::{AccelVector, EngineOutput};

    fn worn_frame(ppg: i32) -> RawSample {
        RawSample {
            is_wearing: true,
            ppg_value: ppg,
            env_value: 3,
            was_adjusted: false,
            accel: AccelVector::new(0, 0, 8192),
        }
    }

    fn unworn_frame() -> RawSample {
        RawSample {
            is_wearing: false,
            ..worn_frame(0)
        }
    }

    fn pipeline(
        outputs: &[EngineOutput],
    ) -> HrmPipeline<ScriptedEngine, ManualClock> {
        HrmPipeline::new(
            HrmConfig::default(),
            ScriptedEngine::with_outputs(outputs),
            ManualClock::new(),
        )
    }

    #[test]
    fn test_not_worn_returns_false_and_touches_nothing() {
        let mut p = pipeline(&[EngineOutput {
            heart_rate_bpm: 70,
            confidence: 90,
        }]);
        assert!(!p.process_sample(&unworn_frame()));
        assert_eq!(p.engine_mut().ingest_calls(), 0, "engine never sees the sample");
        assert_eq!(p.last_reading().bpm10, 0);
        assert!(!p.is_worn());
    }

    #[test]
    fn test_worn_transition_resets_engine_exactly_once() {
        let mut p = pipeline(&[EngineOutput::default()]);
        p.process_sample(&worn_frame(1000));
        p.process_sample(&worn_frame(1001));
        assert_eq!(p.engine_mut().reset_calls(), 1);

        // removal and re-wear resets again
        p.process_sample(&unworn_frame());
        p.process_sample(&worn_frame(1000));
        assert_eq!(p.engine_mut().reset_calls(), 2);
    }

    #[test]
    fn test_transition_clears_reported_before_comparison() {
        let output = EngineOutput {
            heart_rate_bpm: 70,
            confidence: 90,
        };
        let mut p = pipeline(&[output, output]);
        assert!(p.process_sample(&worn_frame(1000)));

        // take the sensor off and back on; same engine output must report
        // again because the reading was cleared on the transition
        p.process_sample(&unworn_frame());
        assert!(
            p.process_sample(&worn_frame(1000)),
            "cleared reading treats the old output as a change"
        );
    }

    #[test]
    fn test_first_worn_sample_filters_to_zero() {
        let mut p = pipeline(&[EngineOutput::default()]);
        p.process_sample(&worn_frame(1234));
        let snap = p.snapshot();
        assert_eq!(snap.filtered, 0);
        assert_eq!(snap.running_mean, 1234);
    }

    #[test]
    fn test_engine_receives_remapped_acceleration() {
        let mut p = pipeline(&[EngineOutput::default()]);
        let mut frame = worn_frame(1000);
        frame.accel = AccelVector::new(8192, 0, 0);
        p.process_sample(&frame);
        let input = p.engine_mut().last_input().expect("engine saw one sample");
        assert_eq!(input.accel, AccelVector::new(0, -256, 0));
    }

    #[test]
    fn test_adjusted_flag_set_on_ppg_sample() {
        let mut p = pipeline(&[EngineOutput::default()]);
        let mut frame = worn_frame(0x0123);
        frame.was_adjusted = true;
        p.process_sample(&frame);
        let input = p.engine_mut().last_input().unwrap();
        assert_eq!(input.ppg_sample, 0x1123);
        assert_eq!(input.env_sample, 3);
    }

    #[test]
    fn test_static_sample_time_substitutes_engine_interval() {
        let mut config = HrmConfig::default();
        config.timing.use_static_sample_time = true;
        config.timing.nominal_poll_interval_ms = 40;
        let clock = ManualClock::new();
        let mut p = HrmPipeline::new(config, ScriptedEngine::new(), clock);

        p.process_sample(&worn_frame(1000));
        // jittered arrival: 57 ms measured, engine still told 40
        p.clock_mut().advance_ms(57);
        p.process_sample(&worn_frame(1000));
        assert_eq!(p.engine_mut().last_elapsed_ms(), Some(40));
    }

    #[test]
    fn test_measured_elapsed_reaches_engine_by_default() {
        let mut p = pipeline(&[]);
        p.process_sample(&worn_frame(1000));
        p.clock_mut().advance_ms(57);
        p.process_sample(&worn_frame(1000));
        assert_eq!(p.engine_mut().last_elapsed_ms(), Some(57));
    }

    #[test]
    fn test_init_is_idempotent() {
        let mut p = pipeline(&[EngineOutput {
            heart_rate_bpm: 70,
            confidence: 90,
        }]);
        p.process_sample(&worn_frame(1000));
        p.init();
        let once = (p.is_worn(), p.last_reading(), p.snapshot());
        p.init();
        let twice = (p.is_worn(), p.last_reading(), p.snapshot());
        assert_eq!(once, twice);
        assert!(!p.is_worn());
        assert_eq!(p.last_reading().bpm10, 0);
    }

    #[test]
    fn test_augmenter_sees_conditioner_values() {
        let mut p = pipeline(&[EngineOutput::default()]);
        p.set_augmenter(Box::new(DiagnosticsAugmenter));
        p.process_sample(&worn_frame(1000));
        p.process_sample(&worn_frame(1010));

        let mut fields = serde_json::Map::new();
        p.augment_raw_event(&mut fields);
        assert_eq!(fields["filt"], serde_json::Value::from((1010 - 1000) * 256));

        let mut fields = serde_json::Map::new();
        p.augment_heart_rate_event(&mut fields);
        assert!(fields.is_empty(), "diagnostics augmenter only touches raw events");
    }
}
