//! Packed per-tick status captures.
//!
//! A capture stores one byte per tick: the five occupancy flags, the
//! read-side valid and the write-side acknowledge. Files are the raw bytes
//! with no header, so a capture of N ticks is exactly N bytes long.

use anyhow::{Context, Result, bail};
use bitvec::prelude::*;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use syncfifo_common::flags;
use syncfifo_core::{FifoFlags, FifoOutputs};

/// Bits per recorded tick. One byte keeps the file byte-aligned.
pub const BITS_PER_TICK: usize = 8;

const VALID_BIT: usize = flags::COUNT;
const ACK_BIT: usize = flags::COUNT + 1;

/// Status of the buffer at one tick, as stored in a capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickRecord {
    pub flags: FifoFlags,
    pub valid: bool,
    pub ack: bool,
}

impl<T> From<&FifoOutputs<T>> for TickRecord {
    fn from(out: &FifoOutputs<T>) -> Self {
        Self {
            flags: out.flags,
            valid: out.valid,
            ack: out.ack,
        }
    }
}

/// Packs a record into its capture byte.
///
/// Bits 0-4 hold the flags in `syncfifo_common::flags` order, bit 5 the
/// read-side valid and bit 6 the write-side acknowledge.
pub fn pack_tick(record: &TickRecord) -> u8 {
    let mut byte = record.flags.bits();
    byte |= (record.valid as u8) << VALID_BIT;
    byte |= (record.ack as u8) << ACK_BIT;
    byte
}

/// Bit-packed status trace, one byte per tick, little-endian bit order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capture {
    bits: BitVec<u8, Lsb0>,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: &TickRecord) {
        let byte = pack_tick(record);
        self.bits.extend_from_bitslice(byte.view_bits::<Lsb0>());
    }

    pub fn len(&self) -> usize {
        self.bits.len() / BITS_PER_TICK
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Record for tick `i`, if recorded.
    pub fn tick(&self, i: usize) -> Option<TickRecord> {
        let start = i.checked_mul(BITS_PER_TICK)?;
        let slot = self.bits.get(start..start + BITS_PER_TICK)?;
        let byte: u8 = slot.load_le();
        Some(TickRecord {
            flags: FifoFlags::from_bits(byte),
            valid: slot[VALID_BIT],
            ack: slot[ACK_BIT],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = TickRecord> + '_ {
        (0..self.len()).filter_map(move |i| self.tick(i))
    }

    /// Number of ticks on which `flag` (a `syncfifo_common::flags` bit) was set.
    pub fn count_flag(&self, flag: u8) -> usize {
        self.bits
            .chunks_exact(BITS_PER_TICK)
            .filter(|slot| slot.load_le::<u8>() & flag != 0)
            .count()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create capture {}", path.display()))?;
        file.write_all(self.bits.as_raw_slice())?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .with_context(|| format!("Failed to open capture {}", path.display()))?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;

        // bit 7 is never written
        if let Some(pos) = buffer.iter().position(|b| b & 0x80 != 0) {
            bail!("{}: byte {} is not a tick record", path.display(), pos);
        }
        Ok(Self {
            bits: BitVec::from_vec(buffer),
        })
    }
}
