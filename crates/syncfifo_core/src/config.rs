//! Construction-time parameters for a ring buffer instance.
//!
//! Capacity and synchronizer depth are fixed for the lifetime of a buffer.
//! Both are validated here so that every later component can rely on
//! `capacity >= 2` and `2 <= sync_stages <= 64` without re-checking.

use crate::FifoError;
use syncfifo_common::defaults;

/// Validated capacity and synchronizer depth for a `RingBuffer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoConfig {
    capacity: usize,
    sync_stages: u8,
}

impl Default for FifoConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::CAPACITY,
            sync_stages: defaults::SYNC_STAGES,
        }
    }
}

impl FifoConfig {
    /// Creates a configuration after checking both parameters.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of storage slots (at least 2)
    /// * `sync_stages` - Flip-flop stages per input synchronizer (2 to 64)
    ///
    /// # Returns
    ///
    /// The configuration, or the first parameter error found. Values are
    /// never clamped into range.
    pub fn new(capacity: usize, sync_stages: u8) -> Result<Self, FifoError> {
        if capacity < defaults::MIN_CAPACITY {
            return Err(FifoError::CapacityTooSmall { capacity });
        }
        check_stages(sync_stages)?;
        Ok(Self {
            capacity,
            sync_stages,
        })
    }

    /// Creates a configuration with the default two-stage synchronizers.
    pub fn with_capacity(capacity: usize) -> Result<Self, FifoError> {
        Self::new(capacity, defaults::SYNC_STAGES)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn sync_stages(&self) -> u8 {
        self.sync_stages
    }
}

pub(crate) fn check_stages(stages: u8) -> Result<(), FifoError> {
    if !(defaults::MIN_SYNC_STAGES..=defaults::MAX_SYNC_STAGES).contains(&stages) {
        return Err(FifoError::InvalidStageCount { stages });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = FifoConfig::default();
        assert_eq!(FifoConfig::new(cfg.capacity(), cfg.sync_stages()), Ok(cfg));
    }

    #[test]
    fn rejects_small_capacity() {
        assert_eq!(
            FifoConfig::new(1, 2),
            Err(FifoError::CapacityTooSmall { capacity: 1 })
        );
        assert!(FifoConfig::with_capacity(0).is_err());
        assert!(FifoConfig::with_capacity(2).is_ok());
    }

    #[test]
    fn rejects_stage_count_out_of_range() {
        assert_eq!(
            FifoConfig::new(4, 1),
            Err(FifoError::InvalidStageCount { stages: 1 })
        );
        assert!(FifoConfig::new(4, 65).is_err());
        assert!(FifoConfig::new(4, 64).is_ok());
    }
}
