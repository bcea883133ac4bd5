//! Clock divider producing a slower periodic level from the tick.
//!
//! The divider is a free-running counter over `ratio = input / output`
//! ticks. Phase shift rotates the high window inside the period, duty cycle
//! sets its length. A ratio of one bypasses the counter entirely.

use crate::FifoError;

/// Parameters of a `ClockDivider`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DividerConfig {
    /// Frequency of the tick driving the divider, in hertz.
    pub input_hz: u64,
    /// Requested output frequency, in hertz.
    pub output_hz: u64,
    /// Phase shift of the high window, percent of a period (0..100).
    pub phase_pct: u8,
    /// High time, percent of a period (0..=100).
    pub duty_pct: u8,
    /// Level driven while disabled or cleared.
    pub idle: bool,
}

impl DividerConfig {
    /// Checks the parameters and returns the integer division ratio.
    ///
    /// The output frequency must divide the input frequency exactly; a
    /// ratio that would round is refused rather than silently producing a
    /// faster clock.
    pub fn ratio(&self) -> Result<u64, FifoError> {
        if self.output_hz == 0
            || self.output_hz > self.input_hz
            || self.input_hz % self.output_hz != 0
        {
            return Err(FifoError::InvalidFrequency {
                input_hz: self.input_hz,
                output_hz: self.output_hz,
            });
        }
        if self.phase_pct >= 100 {
            return Err(FifoError::InvalidPercent {
                name: "phase",
                value: self.phase_pct,
            });
        }
        if self.duty_pct > 100 {
            return Err(FifoError::InvalidPercent {
                name: "duty",
                value: self.duty_pct,
            });
        }
        Ok(self.input_hz / self.output_hz)
    }
}

/// Divided clock generator.
#[derive(Debug, Clone)]
pub struct ClockDivider {
    config: DividerConfig,
    ratio: u64,
    high_ticks: u64,
    offset: u64,
    counter: u64,
    output: bool,
}

impl ClockDivider {
    /// Builds a divider after validating `config`.
    pub fn new(config: DividerConfig) -> Result<Self, FifoError> {
        let ratio = config.ratio()?;
        Ok(Self {
            config,
            ratio,
            high_ticks: percent_of(ratio, config.duty_pct),
            offset: percent_of(ratio, config.phase_pct),
            counter: 0,
            output: config.idle,
        })
    }

    /// Advances one input tick and returns the output level.
    ///
    /// `clear` and a low `enable` both rewind the counter and drive the idle
    /// level. In bypass (ratio 1) every enabled tick yields `true`.
    pub fn tick(&mut self, enable: bool, clear: bool) -> bool {
        if clear || !enable {
            self.counter = 0;
            self.output = self.config.idle;
            return self.output;
        }

        if self.is_bypass() {
            self.output = true;
            return self.output;
        }

        let position = if self.counter >= self.offset {
            self.counter - self.offset
        } else {
            self.counter + (self.ratio - self.offset)
        };
        self.output = position < self.high_ticks;
        self.counter = (self.counter + 1) % self.ratio;
        self.output
    }

    #[inline]
    pub fn is_bypass(&self) -> bool {
        self.ratio == 1
    }

    #[inline]
    pub fn ratio(&self) -> u64 {
        self.ratio
    }

    #[inline]
    pub fn output(&self) -> bool {
        self.output
    }
}

fn percent_of(ratio: u64, pct: u8) -> u64 {
    (ratio as u128 * pct as u128 / 100) as u64
}

/// One-tick strobe on each rising edge of a level.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    last: bool,
}

impl EdgeDetector {
    pub fn rising(&mut self, level: bool) -> bool {
        let edge = level && !self.last;
        self.last = level;
        edge
    }
}
