//! Clock-synchronous ring buffer with 4-phase handshakes on both sides.
//!
//! `RingBuffer::tick` is one clock edge. Every tick first takes a snapshot
//! (flags from the current cursors, the synchronized control signals, the
//! store and both controller states), computes every next state from that
//! snapshot alone, and only then commits all of them together. No
//! component ever sees another's half-updated value, so the result does not
//! depend on the order in which the controllers are evaluated.

use crate::FifoError;
use crate::config::FifoConfig;
use crate::occupancy::{FifoFlags, Occupancy, OccupancyTracker};
use crate::read_ctrl::{ReadController, ReadInputs, ReadState};
use crate::synchronizer::SignalSynchronizer;
use crate::write_ctrl::{WriteController, WriteInputs, WriteState};
use alloc::vec;
use alloc::vec::Vec;

/// External signals sampled on one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FifoInputs<T> {
    /// Domain reset. Applied on this very tick, overriding everything else.
    pub reset: bool,
    /// Domain clear. Passes through a synchronizer before taking effect.
    pub clear: bool,
    /// Payload offered by the producer; must be stable while `valid` is high.
    pub data: T,
    /// Producer request.
    pub valid: bool,
    /// Consumer acknowledgment.
    pub ack: bool,
}

/// Registered outputs after a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FifoOutputs<T> {
    /// Head element presented to the consumer.
    pub data: T,
    /// High while `data` is a live element awaiting `ack`.
    pub valid: bool,
    /// Acknowledgment to the producer.
    pub ack: bool,
    pub flags: FifoFlags,
}

/// Activity counters since the last reset or clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FifoCounters {
    /// Writes whose cursor advance has been committed.
    pub accepted: u64,
    /// Reads whose cursor advance has been committed.
    pub completed: u64,
    /// Ticks on which a synchronized `valid` was refused because of Full.
    pub refused_ticks: u64,
}

/// Bounded single-producer single-consumer buffer stepped by `tick`.
pub struct RingBuffer<T> {
    config: FifoConfig,
    storage: Vec<T>,
    writer: WriteController,
    reader: ReadController<T>,
    sync_clear: SignalSynchronizer,
    sync_valid: SignalSynchronizer,
    sync_ack: SignalSynchronizer,
    counters: FifoCounters,
    stalled: bool,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Builds a buffer in its post-reset state.
    pub fn new(config: FifoConfig) -> Self {
        let sync = SignalSynchronizer::cleared(config.sync_stages());
        Self {
            config,
            storage: vec![T::default(); config.capacity()],
            writer: WriteController::new(),
            reader: ReadController::new(),
            sync_clear: sync,
            sync_valid: sync,
            sync_ack: sync,
            counters: FifoCounters::default(),
            stalled: false,
        }
    }

    /// Validates the parameters and builds the buffer.
    pub fn with_capacity(capacity: usize, sync_stages: u8) -> Result<Self, FifoError> {
        Ok(Self::new(FifoConfig::new(capacity, sync_stages)?))
    }

    /// Advances the whole buffer by one tick.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Raw external signals for this tick
    ///
    /// # Returns
    ///
    /// The registered outputs after the tick boundary, with the flags
    /// recomputed from the committed cursors.
    pub fn tick(&mut self, inputs: &FifoInputs<T>) -> FifoOutputs<T> {
        if inputs.reset {
            self.domain_reset();
            return self.outputs();
        }

        let capacity = self.config.capacity();

        // Snapshot: everything below reads only start-of-tick state.
        let occupancy = self.occupancy();
        let clear = self.sync_clear.observe(inputs.clear);
        let valid = self.sync_valid.observe(inputs.valid);
        let ack = self.sync_ack.observe(inputs.ack);

        let w = self.writer.step(
            WriteInputs {
                valid,
                full: occupancy.flags.full,
                payload: inputs.data,
            },
            capacity,
        );
        let r = self.reader.step(
            ReadInputs {
                ack,
                empty: occupancy.flags.empty,
            },
            &self.storage,
        );

        // Commit.
        if let Some((slot, value)) = w.store {
            if let Some(cell) = self.storage.get_mut(slot) {
                *cell = value;
            }
        }
        self.writer = w.next;
        self.reader = r.next;

        if clear {
            tracing::debug!("synchronized clear: forcing both controllers to reset");
            self.writer.force_reset();
            self.reader.force_reset();
            self.counters = FifoCounters::default();
            self.stalled = false;
            return self.outputs();
        }

        if w.accepted {
            self.counters.accepted += 1;
            tracing::trace!(slot = w.next.cursor().index, "write accepted");
        }
        if r.completed {
            self.counters.completed += 1;
            tracing::trace!(slot = r.next.cursor().index, "read completed");
        }
        if w.refused {
            self.counters.refused_ticks += 1;
            if !self.stalled {
                tracing::trace!("write refused: buffer full");
            }
        }
        self.stalled = w.refused;

        self.outputs()
    }

    /// Depth and flags derived from the current cursors.
    #[inline]
    pub fn occupancy(&self) -> Occupancy {
        OccupancyTracker::evaluate(
            self.writer.cursor(),
            self.reader.cursor(),
            self.config.capacity(),
        )
    }

    /// Current registered outputs, without advancing time.
    pub fn outputs(&self) -> FifoOutputs<T> {
        FifoOutputs {
            data: self.reader.data(),
            valid: self.reader.valid(),
            ack: self.writer.ack(),
            flags: self.occupancy().flags,
        }
    }

    #[inline]
    pub fn config(&self) -> FifoConfig {
        self.config
    }

    #[inline]
    pub fn counters(&self) -> FifoCounters {
        self.counters
    }

    #[inline]
    pub fn write_state(&self) -> WriteState {
        self.writer.state()
    }

    #[inline]
    pub fn read_state(&self) -> ReadState {
        self.reader.state()
    }

    #[inline]
    pub fn writer(&self) -> &WriteController {
        &self.writer
    }

    #[inline]
    pub fn reader(&self) -> &ReadController<T> {
        &self.reader
    }

    fn domain_reset(&mut self) {
        tracing::debug!("domain reset");
        self.sync_clear.reset();
        self.sync_valid.reset();
        self.sync_ack.reset();
        self.writer.hard_reset();
        self.reader.hard_reset();
        self.counters = FifoCounters::default();
        self.stalled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> FifoInputs<u8> {
        FifoInputs::default()
    }

    #[test]
    fn starts_empty_in_reset_states() {
        let fifo = RingBuffer::<u8>::with_capacity(4, 2).unwrap();
        assert_eq!(fifo.write_state(), WriteState::ResetWrite);
        assert_eq!(fifo.read_state(), ReadState::ResetRead);
        let out = fifo.outputs();
        assert!(out.flags.empty && out.flags.almost_empty);
        assert!(!out.valid && !out.ack);
    }

    #[test]
    fn leaves_reset_after_one_tick() {
        let mut fifo = RingBuffer::<u8>::with_capacity(4, 2).unwrap();
        fifo.tick(&idle());
        assert_eq!(fifo.write_state(), WriteState::WaitValid);
        assert_eq!(fifo.read_state(), ReadState::WaitConsumerAck);
    }

    #[test]
    fn valid_reaches_writer_after_sync_latency() {
        let mut fifo = RingBuffer::<u8>::with_capacity(4, 3).unwrap();
        fifo.tick(&idle());
        let req = FifoInputs {
            data: 7,
            valid: true,
            ..idle()
        };
        for _ in 0..3 {
            fifo.tick(&req);
            assert_eq!(fifo.write_state(), WriteState::WaitValid);
        }
        fifo.tick(&req);
        assert_eq!(fifo.write_state(), WriteState::WriteSlot);
    }

    #[test]
    fn domain_reset_is_immediate() {
        let mut fifo = RingBuffer::<u8>::with_capacity(4, 2).unwrap();
        fifo.tick(&idle());
        let req = FifoInputs {
            data: 1,
            valid: true,
            ..idle()
        };
        for _ in 0..6 {
            fifo.tick(&req);
        }
        assert_eq!(fifo.occupancy().depth, 1);

        let out = fifo.tick(&FifoInputs {
            reset: true,
            ..req
        });
        assert!(out.flags.empty);
        assert!(!out.ack);
        assert_eq!(fifo.write_state(), WriteState::ResetWrite);
        assert_eq!(fifo.counters(), FifoCounters::default());
    }
}
