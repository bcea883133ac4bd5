//! Cycle-level model of a clock-synchronous handshake FIFO.
//!
//! This crate provides the bounded ring buffer with its write and read
//! handshake controllers, the occupancy arithmetic that derives the status
//! flags, and the input synchronizer that admits control signals from an
//! unrelated timing domain. Supporting generators and the demonstration
//! board wiring are included. All modules are `no_std` and only need
//! `alloc` for the element store.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

/// Single-word bit helpers for shift registers.
pub mod bit_utils;

/// Top-level wiring of switches, buttons and LEDs around an 8-bit buffer.
///
/// Demonstrates the buffer fed by raw, unsynchronized push buttons, with a
/// heartbeat clock divider and an optional pulse-driven consumer.
pub mod board;

/// Clock divider with phase, duty cycle and bypass, plus an edge strobe.
///
/// Produces slower periodic levels from the tick. Used to derive enables
/// for lower-frequency logic around the buffer; not part of the buffer's
/// own correctness surface.
pub mod clock_div;

/// Construction-time configuration of a ring buffer.
pub mod config;

/// Cursor arithmetic and the five occupancy flags.
///
/// Computes depth from the write and read cursors, using the wrap bits to
/// tell an empty buffer from a full one when the indices coincide. The
/// flag bands overlap on purpose and are evaluated independently.
pub mod occupancy;

/// Periodic pulse generator with period, width and offset in ticks.
pub mod pulse_gen;

/// Read-side handshake controller.
///
/// Presents the head element with a valid flag, waits for the consumer's
/// acknowledgment to rise and fall, then advances the read cursor.
pub mod read_ctrl;

/// The ring buffer orchestrator.
///
/// Owns the element store, the three input synchronizers and both
/// controllers, and advances them in lock-step with double-buffered state.
pub mod ring_buffer;

/// Multi-stage synchronizer for asynchronous control inputs.
///
/// Delays a raw boolean by a fixed number of ticks so that only
/// domain-stable values reach the state machines.
pub mod synchronizer;

/// Write-side handshake controller.
///
/// Waits for a producer request while the buffer has room, stores the
/// payload, advances the write cursor and acknowledges until the request
/// is released.
pub mod write_ctrl;

pub use config::FifoConfig;
pub use occupancy::{Cursor, FifoFlags, Occupancy, OccupancyTracker};
pub use ring_buffer::{FifoCounters, FifoInputs, FifoOutputs, RingBuffer};
pub use synchronizer::SignalSynchronizer;

/// Construction errors.
///
/// Raised only when a component is built with parameters outside its legal
/// range. Once constructed, nothing in this crate fails: protocol misuse by
/// a producer or consumer is absorbed as backpressure, not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FifoError {
    /// The requested capacity is below two slots.
    ///
    /// With a single slot the wrap-bit scheme still separates Empty from
    /// Full, but the flag bands degenerate, so such buffers are refused.
    #[error("capacity {capacity} is below the minimum of 2 slots")]
    CapacityTooSmall { capacity: usize },

    /// The synchronizer stage count is outside 2..=64.
    ///
    /// Fewer than two stages gives no metastability margin; more than 64
    /// does not fit the packed stage history.
    #[error("synchronizer stage count {stages} is outside 2..=64")]
    InvalidStageCount { stages: u8 },

    /// A clock divider was asked for an output of zero, above its input, or
    /// one that does not divide the input evenly.
    #[error("cannot divide {input_hz} Hz down to {output_hz} Hz")]
    InvalidFrequency { input_hz: u64, output_hz: u64 },

    /// A clock divider percentage is out of range.
    #[error("{name} of {value}% is out of range")]
    InvalidPercent { name: &'static str, value: u8 },

    /// A pulse generator shape does not fit inside its period.
    #[error("pulse of width {width} at offset {offset} does not fit period {period}")]
    InvalidPulse { period: u32, width: u32, offset: u32 },
}
