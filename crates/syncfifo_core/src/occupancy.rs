//! Cursor arithmetic and occupancy flags for the circular store.
//!
//! Both cursors carry a wrap bit next to their slot index. When the indices
//! coincide the raw distance is zero for both an empty and a full buffer;
//! the wrap bits tell the two apart. Everything in this module is a pure
//! function of the two cursors and the capacity, recomputed every tick.

use syncfifo_common::flags;

/// Slot index plus the wrap bit toggled on every D-1 to 0 crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub index: usize,
    pub wrap: bool,
}

impl Cursor {
    /// Position after one more slot, toggling `wrap` on wraparound.
    #[inline]
    pub fn advanced(self, capacity: usize) -> Self {
        if self.index + 1 >= capacity {
            Self {
                index: 0,
                wrap: !self.wrap,
            }
        } else {
            Self {
                index: self.index + 1,
                wrap: self.wrap,
            }
        }
    }
}

/// The five occupancy flags. Bands overlap; several may be set at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FifoFlags {
    pub empty: bool,
    pub almost_empty: bool,
    pub half_full: bool,
    pub almost_full: bool,
    pub full: bool,
}

impl FifoFlags {
    /// Packs the flags using the bit layout in `syncfifo_common::flags`.
    pub fn bits(&self) -> u8 {
        let mut out = 0;
        if self.empty {
            out |= flags::EMPTY;
        }
        if self.almost_empty {
            out |= flags::ALMOST_EMPTY;
        }
        if self.half_full {
            out |= flags::HALF_FULL;
        }
        if self.almost_full {
            out |= flags::ALMOST_FULL;
        }
        if self.full {
            out |= flags::FULL;
        }
        out
    }

    /// Inverse of `bits`; bits outside the mask are ignored.
    pub fn from_bits(bits: u8) -> Self {
        Self {
            empty: bits & flags::EMPTY != 0,
            almost_empty: bits & flags::ALMOST_EMPTY != 0,
            half_full: bits & flags::HALF_FULL != 0,
            almost_full: bits & flags::ALMOST_FULL != 0,
            full: bits & flags::FULL != 0,
        }
    }
}

/// Result of one occupancy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Occupancy {
    /// Number of live elements, in `0..=capacity`.
    pub depth: usize,
    pub flags: FifoFlags,
}

/// Stateless evaluator of depth and flags.
pub struct OccupancyTracker;

impl OccupancyTracker {
    /// Distance from `read` to `write` ignoring wrap bits, in `0..capacity`.
    #[inline]
    pub fn raw_depth(write: Cursor, read: Cursor, capacity: usize) -> usize {
        if write.index >= read.index {
            write.index - read.index
        } else {
            capacity - read.index + write.index
        }
    }

    /// Computes depth and flags for the given cursors.
    ///
    /// A raw distance of zero is Empty when the wrap bits agree and Full when
    /// they differ. The banded flags are evaluated on the disambiguated depth,
    /// which is `capacity` for a full buffer:
    ///
    /// * AlmostEmpty: depth <= 1
    /// * HalfFull: depth >= ceil(capacity / 2)
    /// * AlmostFull: depth >= capacity - 1
    pub fn evaluate(write: Cursor, read: Cursor, capacity: usize) -> Occupancy {
        let raw = Self::raw_depth(write, read, capacity);
        let empty = raw == 0 && write.wrap == read.wrap;
        let full = raw == 0 && write.wrap != read.wrap;
        let depth = if full { capacity } else { raw };

        Occupancy {
            depth,
            flags: FifoFlags {
                empty,
                almost_empty: depth <= 1,
                half_full: depth >= capacity.div_ceil(2),
                almost_full: depth >= capacity - 1,
                full,
            },
        }
    }
}
