//! Configuration for the heart-rate pipeline
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling device-specific tuning (clamp range, poll cadence, gate
//! threshold) without recompilation. Missing or invalid files fall back
//! to defaults with a logged warning.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::types::SportMode;

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HrmConfig {
    pub filter: FilterConfig,
    pub timing: TimingConfig,
    pub gate: GateConfig,
}

/// Sample conditioning parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Lower bound of the engine's valid input domain
    pub value_min: i32,
    /// Upper bound of the engine's valid input domain
    pub value_max: i32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        // The engine ingests i16 samples; the filter clamps into that domain.
        Self {
            value_min: -32768,
            value_max: 32767,
        }
    }
}

/// Elapsed-time policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Nominal interval between samples in milliseconds
    pub nominal_poll_interval_ms: u32,
    /// Feed the engine the nominal interval instead of the measured elapsed
    /// time. Useful when samples arrive at a fixed cadence and scheduling
    /// jitter should not perturb the engine.
    pub use_static_sample_time: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            nominal_poll_interval_ms: 40,
            use_static_sample_time: false,
        }
    }
}

/// Event gate parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Force a re-report of an unchanged, non-trivial reading after this
    /// many milliseconds. The engine nominally emits once per second; the
    /// 2 s default tolerates one missed cycle.
    pub heartbeat_ms: u32,
    /// Sport mode forwarded to the engine on every ingest call
    pub sport_mode: SportMode,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            heartbeat_ms: 2000,
            sport_mode: SportMode::Normal,
        }
    }
}

impl HrmConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or defaults if the file is missing or
    /// malformed (logged as a warning).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}
