// Shared data carriers for the heart-rate pipeline
//
// These are the plain value types passed between the wear detector, the
// conditioning stages and the estimation engine. They carry no behavior
// beyond construction helpers; all policy lives in the pipeline modules.

use serde::{Deserialize, Serialize};

/// Bit set on the engine's PPG sample word when the analog front end
/// adjusted its gain while this sample was captured.
pub const PPG_ADJUSTED_FLAG: u16 = 0x1000;

/// 3-axis acceleration vector.
///
/// The same type is used for the sensor's native scale (1 g = 8192) and the
/// engine's scale (1 g = 256); the conditioner performs the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccelVector {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl AccelVector {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

/// Operating mode forwarded opaquely to the estimation engine.
///
/// The pipeline never branches on this; it is carried through to every
/// `ingest` call so the engine can tune its motion model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SportMode {
    #[default]
    Normal,
    Running,
    Cycling,
}

impl SportMode {
    /// Numeric selector in the engine's calling convention.
    pub fn as_engine_code(self) -> u32 {
        match self {
            SportMode::Normal => 0,
            SportMode::Running => 1,
            SportMode::Cycling => 2,
        }
    }
}

/// One raw sample delivered by the wear/contact detector.
///
/// `ppg_value` is the optical intensity in sensor units; `env_value` the
/// ambient-light reading taken alongside it. `was_adjusted` marks samples
/// captured while the front end re-ranged its gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSample {
    pub is_wearing: bool,
    pub ppg_value: i32,
    pub env_value: u16,
    pub was_adjusted: bool,
    /// Acceleration in the sensor's native scale (1 g = 8192).
    pub accel: AccelVector,
}

/// Latest estimate read back from the engine after an `ingest` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineOutput {
    pub heart_rate_bpm: i32,
    pub confidence: i32,
}

/// A reading the gate decided to surface to the host.
///
/// `bpm10` is the externally reported unit (tenths of a BPM).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateReading {
    pub bpm10: i32,
    pub confidence: i32,
}
