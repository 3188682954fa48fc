//! Estimation engine abstraction.
//!
//! The heart-rate estimator (motion-artifact cancellation, spectral
//! analysis, confidence scoring) is a closed, pre-built collaborator. The
//! pipeline only depends on this call contract: reset once per worn-session
//! start, ingest one conditioned sample per cycle, read back the latest
//! estimate. Production code binds the real engine; tests bind a scripted
//! stub from [`crate::testing`].

use crate::types::{AccelVector, EngineOutput, SportMode};

/// One conditioned sample in the engine's input domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionedInput {
    /// Mean-removed, clamped PPG value
    pub filtered: i32,
    /// Detector's raw PPG word; bit 0x1000 marks a gain-adjusted sample
    pub ppg_sample: u16,
    /// Ambient-light reading taken alongside the PPG sample
    pub env_sample: u16,
    /// Acceleration in the engine's wrist frame, 1 g = 256
    pub accel: AccelVector,
}

/// Contract assumed of the external estimation engine.
///
/// The engine is stateful across calls and must be reset exactly once per
/// worn-session start. The pipeline never inspects its internal state.
pub trait EstimationEngine {
    /// Reinitialize internal state for a new worn session.
    fn reset(&mut self);

    /// Feed one conditioned sample. `aux_flags` is reserved and always zero
    /// in this integration.
    fn ingest(
        &mut self,
        input: &ConditionedInput,
        elapsed_ms: u32,
        sport_mode: SportMode,
        aux_flags: u32,
    );

    /// Latest heart-rate estimate and confidence score.
    fn latest_output(&self) -> EngineOutput;
}
