//! Periodic pulse generator counted in ticks.

use crate::FifoError;

/// Period, width and offset of a pulse train, all in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseConfig {
    pub period: u32,
    pub width: u32,
    pub offset: u32,
}

impl PulseConfig {
    pub fn validate(&self) -> Result<(), FifoError> {
        if self.period == 0 || self.width > self.period || self.offset >= self.period {
            return Err(FifoError::InvalidPulse {
                period: self.period,
                width: self.width,
                offset: self.offset,
            });
        }
        Ok(())
    }
}

/// Emits a `width`-tick pulse once per `period`, delayed by `offset`.
#[derive(Debug, Clone)]
pub struct PulseGenerator {
    config: PulseConfig,
    counter: u32,
}

impl PulseGenerator {
    pub fn new(config: PulseConfig) -> Result<Self, FifoError> {
        config.validate()?;
        Ok(Self { config, counter: 0 })
    }

    /// Advances one tick. Clear or disable rewinds the counter and drives low.
    pub fn tick(&mut self, enable: bool, clear: bool) -> bool {
        if clear || !enable {
            self.counter = 0;
            return false;
        }
        let PulseConfig {
            period,
            width,
            offset,
        } = self.config;
        let position = if self.counter >= offset {
            self.counter - offset
        } else {
            self.counter + (period - offset)
        };
        self.counter = (self.counter + 1) % period;
        position < width
    }

    #[inline]
    pub fn config(&self) -> PulseConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn pulse_train_with_offset() {
        let mut pulse = PulseGenerator::new(PulseConfig {
            period: 5,
            width: 2,
            offset: 1,
        })
        .unwrap();
        let train: Vec<bool> = (0..10).map(|_| pulse.tick(true, false)).collect();
        assert_eq!(
            train,
            [false, true, true, false, false, false, true, true, false, false]
        );
    }

    #[test]
    fn clear_restarts_period() {
        let cfg = PulseConfig {
            period: 3,
            width: 1,
            offset: 0,
        };
        let mut pulse = PulseGenerator::new(cfg).unwrap();
        assert!(pulse.tick(true, false));
        assert!(!pulse.tick(true, false));
        assert!(!pulse.tick(true, true));
        assert!(pulse.tick(true, false));
    }

    #[test]
    fn rejects_inconsistent_shape() {
        let bad = [(0, 0, 0), (4, 5, 0), (4, 1, 4)];
        for (period, width, offset) in bad {
            assert!(
                PulseGenerator::new(PulseConfig {
                    period,
                    width,
                    offset
                })
                .is_err()
            );
        }
    }
}
