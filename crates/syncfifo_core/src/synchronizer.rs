//! Multi-stage synchronizer for control inputs from outside the tick domain.
//!
//! An external producer or consumer may change its control lines at any
//! moment relative to the buffer's tick. Each such line passes through a
//! chain of N latches before any state machine looks at it, so the value a
//! controller sees is always one that was stable for a whole tick.
//!
//! The chain bounds metastability, it does not filter glitches: a raw input
//! that toggles faster than N ticks may be captured at any point of its
//! transition. Callers that need debouncing must hold the line for at least
//! N ticks.

use crate::FifoError;
use crate::bit_utils::BitPack;
use crate::config::check_stages;

/// Fixed-latency shift-register synchronizer for one boolean signal.
///
/// Stage history is packed into a single `u64`, bit 0 being the newest
/// sample. The output is the value the raw input held exactly `stages`
/// ticks earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalSynchronizer {
    /// Number of latches in the chain.
    stages: u8,

    /// Latched samples, newest in bit 0, oldest in bit `stages - 1`.
    history: u64,
}

impl SignalSynchronizer {
    /// Creates a synchronizer with all stages cleared.
    ///
    /// # Arguments
    ///
    /// * `stages` - Chain length, 2 to 64 inclusive
    pub fn new(stages: u8) -> Result<Self, FifoError> {
        check_stages(stages)?;
        Ok(Self::cleared(stages))
    }

    /// Builds a cleared chain from a stage count that is already validated.
    pub(crate) const fn cleared(stages: u8) -> Self {
        Self { stages, history: 0 }
    }

    /// Advances the chain by one tick.
    ///
    /// Returns the oldest stage's value before the shift, then shifts `raw`
    /// into the newest stage. The returned value is therefore the raw input
    /// of `stages` ticks ago.
    #[inline]
    pub fn observe(&mut self, raw: bool) -> bool {
        BitPack::shift_in(&mut self.history, self.stages as u32, raw)
    }

    /// Domain reset: every stage, and hence the output, becomes `false`.
    #[inline]
    pub fn reset(&mut self) {
        self.history = 0;
    }

    /// Value that the next call to `observe` will return.
    #[inline]
    pub fn output(&self) -> bool {
        BitPack::get(self.history, self.stages as u32 - 1)
    }

    #[inline]
    pub fn stages(&self) -> u8 {
        self.stages
    }
}
