//! Common definitions and constants shared across the synchronous FIFO workspace.
//!
//! This crate provides the bit layout of the status flag vector, the pin map
//! of the demonstration board, and the default construction parameters used
//! by the core model, the stimulus tooling and the host CLI.

#![no_std]

// Bit positions of the five-bit occupancy flag vector.
//
// Every flag owns one independent bit. The bands overlap, so more than one
// bit may be set in the same tick. Capture files and the board LEDs reuse
// this layout verbatim.
pub mod flags {
    /// Set when the write and read cursors coincide with equal wrap bits.
    pub const EMPTY: u8 = 1 << 0;

    /// Set when at most one element is stored.
    pub const ALMOST_EMPTY: u8 = 1 << 1;

    /// Set when at least half of the slots (rounded up) are occupied.
    pub const HALF_FULL: u8 = 1 << 2;

    /// Set when at most one free slot remains.
    pub const ALMOST_FULL: u8 = 1 << 3;

    /// Set when the write and read cursors coincide with differing wrap bits.
    pub const FULL: u8 = 1 << 4;

    /// Mask covering all five flag bits.
    pub const MASK: u8 = EMPTY | ALMOST_EMPTY | HALF_FULL | ALMOST_FULL | FULL;

    /// Number of flag bits in the vector.
    pub const COUNT: usize = 5;

    /// Short labels, indexed by bit position, used in dashboards and traces.
    pub const LABELS: [&str; COUNT] = ["E", "AE", "HF", "AF", "F"];
}

/// Default construction parameters.
///
/// Shared by the core configuration types and by the host CLI so that a
/// script without header directives and a bare `FifoConfig::default()` agree.
pub mod defaults {
    /// Number of flip-flop stages in each input synchronizer.
    ///
    /// Two stages is the conventional minimum for admitting a signal from an
    /// unrelated timing domain.
    pub const SYNC_STAGES: u8 = 2;

    /// Smallest legal synchronizer depth.
    pub const MIN_SYNC_STAGES: u8 = 2;

    /// Largest synchronizer depth; the stage history is one packed `u64`.
    pub const MAX_SYNC_STAGES: u8 = 64;

    /// Default number of storage slots.
    pub const CAPACITY: usize = 16;

    /// Smallest legal capacity.
    ///
    /// A single-slot buffer cannot tell "one element" from "full" through the
    /// banded flags, so two is the floor.
    pub const MIN_CAPACITY: usize = 2;

    /// Default payload width in bits for stimulus scripts.
    pub const PAYLOAD_WIDTH: u32 = 8;
}

/// Pin map of the demonstration board.
///
/// The board exposes a 16-bit switch bank, three push buttons and a 16-bit
/// LED bank. These constants fix which bit carries which signal so that the
/// wiring module and the dashboard renderer cannot drift apart.
pub mod board {
    /// Switches carrying the 8-bit payload presented to the producer side.
    pub const SW_DATA_MASK: u16 = 0x00FF;

    /// Switch enabling the auto-drain pulse on the consumer side.
    pub const SW_AUTO_DRAIN: u16 = 1 << 14;

    /// Switch enabling the heartbeat clock divider.
    pub const SW_HEARTBEAT: u16 = 1 << 15;

    /// LEDs showing the payload output.
    pub const LED_DATA_MASK: u16 = 0x00FF;

    /// LED mirroring the output-valid signal.
    pub const LED_VALID: u16 = 1 << 8;

    /// LED mirroring the producer acknowledgment.
    pub const LED_ACK: u16 = 1 << 9;

    /// Shift applied to the five-bit flag vector on the LED bank.
    pub const LED_FLAGS_SHIFT: u32 = 10;

    /// LED driven by the heartbeat divider.
    pub const LED_HEARTBEAT: u16 = 1 << 15;
}
