//! Value Change Dump output for waveform viewers.
//!
//! Dumps the buffer's raw inputs, registered outputs and the five flags,
//! one timestamp per tick, in a single `module` scope.

use anyhow::Result;
use std::io::Write;
use syncfifo_common::flags;
use syncfifo_core::{FifoInputs, FifoOutputs};

/// Signals dumped per tick, with their VCD identifier and width.
const SIGNALS: [(&str, char, u32); 12] = [
    ("in_valid", '!', 1),
    ("in_ack", '"', 1),
    ("in_clear", '#', 1),
    ("in_data", '$', 32),
    ("out_valid", '%', 1),
    ("out_ack", '&', 1),
    ("out_data", '\'', 32),
    ("empty", '(', 1),
    ("almost_empty", ')', 1),
    ("half_full", '*', 1),
    ("almost_full", '+', 1),
    ("full", ',', 1),
];

/// Streams a tick trace in Value Change Dump format.
///
/// Only changed values are written after the first sample. One tick maps to
/// one timescale unit.
pub struct VcdWriter<W: Write> {
    out: W,
    last: Option<[u64; SIGNALS.len()]>,
}

impl<W: Write> VcdWriter<W> {
    /// Writes the header and returns a writer ready for samples.
    pub fn new(mut out: W, scope: &str) -> Result<Self> {
        writeln!(out, "$timescale 1ns $end")?;
        writeln!(out, "$scope module {} $end", scope)?;
        for (name, id, width) in SIGNALS {
            writeln!(out, "$var wire {} {} {} $end", width, id, name)?;
        }
        writeln!(out, "$upscope $end")?;
        writeln!(out, "$enddefinitions $end")?;
        Ok(Self { out, last: None })
    }

    /// Records the inputs applied and outputs produced at `tick`.
    pub fn sample(
        &mut self,
        tick: u64,
        inputs: &FifoInputs<u32>,
        outputs: &FifoOutputs<u32>,
    ) -> Result<()> {
        let bits = outputs.flags.bits();
        let values = [
            inputs.valid as u64,
            inputs.ack as u64,
            inputs.clear as u64,
            inputs.data as u64,
            outputs.valid as u64,
            outputs.ack as u64,
            outputs.data as u64,
            (bits & flags::EMPTY != 0) as u64,
            (bits & flags::ALMOST_EMPTY != 0) as u64,
            (bits & flags::HALF_FULL != 0) as u64,
            (bits & flags::ALMOST_FULL != 0) as u64,
            (bits & flags::FULL != 0) as u64,
        ];

        let mut stamped = false;
        for (i, &(_, id, width)) in SIGNALS.iter().enumerate() {
            if self.last.is_some_and(|prev| prev[i] == values[i]) {
                continue;
            }
            if !stamped {
                writeln!(self.out, "#{}", tick)?;
                stamped = true;
            }
            if width == 1 {
                writeln!(self.out, "{}{}", values[i], id)?;
            } else {
                writeln!(self.out, "b{:b} {}", values[i], id)?;
            }
        }
        self.last = Some(values);
        Ok(())
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
