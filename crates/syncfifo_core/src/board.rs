//! Top-level wiring of the demonstration board.
//!
//! Connects a switch bank and three push buttons to an 8-bit ring buffer
//! and mirrors its outputs on a 16-bit LED bank. The buttons reach the
//! buffer unfiltered: bouncing and arbitrary timing are exactly what its
//! input synchronizers exist for. A clock divider blinks a heartbeat LED and
//! a pulse generator can stand in for the consumer ("auto-drain").
//!
//! Bit assignments live in `syncfifo_common::board`.

use crate::FifoError;
use crate::clock_div::{ClockDivider, DividerConfig, EdgeDetector};
use crate::config::FifoConfig;
use crate::pulse_gen::{PulseConfig, PulseGenerator};
use crate::ring_buffer::{FifoInputs, FifoOutputs, RingBuffer};
use syncfifo_common::board as pins;

/// Construction parameters for a `Board`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    pub fifo: FifoConfig,
    pub heartbeat: DividerConfig,
    pub auto_drain: PulseConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            fifo: FifoConfig::default(),
            heartbeat: DividerConfig {
                input_hz: 1_000,
                output_hz: 2,
                phase_pct: 0,
                duty_pct: 50,
                idle: false,
            },
            auto_drain: PulseConfig {
                period: 64,
                width: 8,
                offset: 0,
            },
        }
    }
}

/// Raw board inputs for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardInputs {
    pub switches: u16,
    pub btn_push: bool,
    pub btn_pop: bool,
    pub btn_clear: bool,
    pub reset: bool,
}

/// The assembled board.
pub struct Board {
    fifo: RingBuffer<u8>,
    heartbeat: ClockDivider,
    beat: EdgeDetector,
    beats: u64,
    auto_drain: PulseGenerator,
    last: FifoOutputs<u8>,
}

impl Board {
    pub fn new(config: BoardConfig) -> Result<Self, FifoError> {
        let fifo = RingBuffer::new(config.fifo);
        let last = fifo.outputs();
        Ok(Self {
            fifo,
            heartbeat: ClockDivider::new(config.heartbeat)?,
            beat: EdgeDetector::default(),
            beats: 0,
            auto_drain: PulseGenerator::new(config.auto_drain)?,
            last,
        })
    }

    /// Advances the board by one tick and returns the LED bank.
    pub fn tick(&mut self, inputs: BoardInputs) -> u16 {
        let heartbeat = self.heartbeat.tick(
            inputs.switches & pins::SW_HEARTBEAT != 0,
            inputs.reset,
        );
        if inputs.reset {
            self.beats = 0;
        }
        if self.beat.rising(heartbeat) {
            self.beats += 1;
        }
        let drain = self
            .auto_drain
            .tick(inputs.switches & pins::SW_AUTO_DRAIN != 0, inputs.reset);

        self.last = self.fifo.tick(&FifoInputs {
            reset: inputs.reset,
            clear: inputs.btn_clear,
            data: (inputs.switches & pins::SW_DATA_MASK) as u8,
            valid: inputs.btn_push,
            ack: inputs.btn_pop || drain,
        });

        Self::leds(&self.last, heartbeat)
    }

    /// Packs fifo outputs and the heartbeat level into the LED bank.
    pub fn leds(out: &FifoOutputs<u8>, heartbeat: bool) -> u16 {
        let mut leds = out.data as u16 & pins::LED_DATA_MASK;
        if out.valid {
            leds |= pins::LED_VALID;
        }
        if out.ack {
            leds |= pins::LED_ACK;
        }
        leds |= (out.flags.bits() as u16) << pins::LED_FLAGS_SHIFT;
        if heartbeat {
            leds |= pins::LED_HEARTBEAT;
        }
        leds
    }

    #[inline]
    pub fn fifo(&self) -> &RingBuffer<u8> {
        &self.fifo
    }

    /// Heartbeat periods started since the last reset.
    #[inline]
    pub fn beats(&self) -> u64 {
        self.beats
    }

    #[inline]
    pub fn outputs(&self) -> FifoOutputs<u8> {
        self.last
    }
}
