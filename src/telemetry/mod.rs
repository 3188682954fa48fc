//! Event augmentation hooks.
//!
//! Hosts package readings into outward-facing event objects themselves;
//! these hooks let an integration attach extra diagnostic fields (for
//! example the conditioner's filtered/clamped values) to those objects
//! without the pipeline knowing their shape. Augmenters read a snapshot of
//! pipeline state and may never mutate it. Both hooks default to no-ops.

use serde_json::{Map, Value};

/// Read-only view of pipeline state offered to augmenters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSnapshot {
    /// Latest mean-removed, clamped PPG value
    pub filtered: i32,
    /// Latest raw PPG value clamped to the engine range
    pub raw_clamped: i32,
    /// Running mean used for DC removal
    pub running_mean: i32,
    /// Whether the sensor currently detects skin contact
    pub is_worn: bool,
    /// Last reported heart rate in tenths of a BPM
    pub bpm10: i32,
    /// Last reported confidence score
    pub confidence: i32,
}

/// Extension points for attaching extra fields to outward event objects.
pub trait EventAugmenter {
    /// Called when the host packages a heart-rate event.
    fn augment_heart_rate_event(&self, _snapshot: &PipelineSnapshot, _fields: &mut Map<String, Value>) {}

    /// Called when the host packages a raw-sample event.
    fn augment_raw_event(&self, _snapshot: &PipelineSnapshot, _fields: &mut Map<String, Value>) {}
}

/// Default augmenter: attaches nothing to either event.
#[derive(Debug, Default)]
pub struct NoopAugmenter;

impl EventAugmenter for NoopAugmenter {}

/// Diagnostic augmenter exposing the conditioner's intermediate values on
/// raw-sample events.
#[derive(Debug, Default)]
pub struct DiagnosticsAugmenter;

impl EventAugmenter for DiagnosticsAugmenter {
    fn augment_raw_event(&self, snapshot: &PipelineSnapshot, fields: &mut Map<String, Value>) {
        fields.insert("filt".into(), Value::from(snapshot.filtered));
        fields.insert("raw".into(), Value::from(snapshot.raw_clamped));
        fields.insert("avg".into(), Value::from(snapshot.running_mean));
    }
}
