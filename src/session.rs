// Worn/unworn session tracking
//
// A worn session is a contiguous period of skin contact. Crossing into a
// worn session requires resetting the estimation engine and reseeding the
// running mean from the next raw sample; leaving one suspends processing
// entirely. The transition logic is a total function over two booleans,
// so there are no error paths.

/// Action the pipeline must take for the current sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Not-worn -> worn transition: reset the engine, zero the reported
    /// reading, reseed the running mean from this sample, then process it.
    Reset,
    /// Sensor is not on skin: skip processing this cycle.
    Skip,
    /// Steady worn state: process normally.
    Continue,
}

/// Tracks skin contact and owns the DC-removal running mean.
#[derive(Debug, Clone)]
pub struct SessionState {
    is_worn: bool,
    running_mean: i32,
    reseed_pending: bool,
}

impl SessionState {
    /// Fresh state: not worn, mean unseeded.
    pub fn new() -> Self {
        Self {
            is_worn: false,
            running_mean: 0,
            reseed_pending: false,
        }
    }

    /// Apply the wear detector's verdict for the incoming sample.
    pub fn begin_sample(&mut self, is_currently_worn: bool) -> SessionAction {
        if is_currently_worn && !self.is_worn {
            self.is_worn = true;
            self.reseed_pending = true;
            return SessionAction::Reset;
        }
        self.is_worn = is_currently_worn;
        if !self.is_worn {
            return SessionAction::Skip;
        }
        SessionAction::Continue
    }

    pub fn is_worn(&self) -> bool {
        self.is_worn
    }

    /// Running mean of raw PPG values. Only meaningful while worn.
    pub fn running_mean(&self) -> i32 {
        self.running_mean
    }

    /// Whether the mean must be reseeded from the next raw sample. Cleared
    /// by [`store_mean`](Self::store_mean).
    pub fn reseed_pending(&self) -> bool {
        self.reseed_pending
    }

    /// Store the conditioner's updated mean and clear any pending reseed.
    pub fn store_mean(&mut self, mean: i32) {
        self.running_mean = mean;
        self.reseed_pending = false;
    }

    /// Reset to the fresh not-worn state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
