//! Replays a stimulus script against the buffer model.
//!
//! Every tick's outputs can be kept as a packed capture and as a VCD trace.
//! The report lists the values that left the buffer and how long each flag
//! was raised.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use syncfifo_common::flags;
use syncfifo_core::{FifoConfig, FifoCounters, RingBuffer};
use syncfifo_io::{Capture, Script, TickRecord, VcdWriter, load_script};
use tracing::{debug, info};

/// What a replay observed.
#[derive(Debug, Clone, Default)]
pub struct ReplayReport {
    pub ticks: u64,
    pub depth: usize,
    pub counters: FifoCounters,
    pub popped: Vec<u32>,
    pub capture: Capture,
}

/// Runs `script` to completion plus enough idle ticks for in-flight
/// handshakes to settle.
pub fn replay(
    script: &Script,
    config: FifoConfig,
    mut vcd: Option<&mut VcdWriter<BufWriter<File>>>,
) -> Result<ReplayReport> {
    let mut fifo = RingBuffer::<u32>::new(config);
    let tail = 4 * config.sync_stages() as u64 + 16;

    let mut report = ReplayReport::default();
    let mut presented = None;

    for (tick, inputs) in script.stimulus(tail)?.iter().enumerate() {
        let before = fifo.counters().completed;
        let out = fifo.tick(inputs);

        if fifo.counters().completed > before {
            if let Some(value) = presented.take() {
                debug!(tick, value, "element dequeued");
                report.popped.push(value);
            }
        }
        if out.valid {
            presented = Some(out.data);
        }

        report.capture.push(&TickRecord::from(&out));
        if let Some(vcd) = vcd.as_deref_mut() {
            vcd.sample(tick as u64, inputs, &out)?;
        }
        report.ticks += 1;
    }

    report.depth = fifo.occupancy().depth;
    report.counters = fifo.counters();
    Ok(report)
}

/// Implements the `run` subcommand.
pub fn run_script(
    path: &str,
    fallback: FifoConfig,
    capture_path: Option<String>,
    vcd_path: Option<String>,
) -> Result<()> {
    let script = load_script(path)?;
    let config = script.config(fallback)?;
    info!(
        path,
        depth = config.capacity(),
        stages = config.sync_stages(),
        events = script.events.len(),
        "script loaded"
    );

    let mut vcd = match &vcd_path {
        Some(p) => {
            let file = File::create(p).with_context(|| format!("Failed to create trace {}", p))?;
            Some(VcdWriter::new(BufWriter::new(file), "syncfifo")?)
        }
        None => None,
    };

    let report = replay(&script, config, vcd.as_mut())?;

    if let Some(vcd) = vcd {
        vcd.finish()?;
    }
    if let Some(p) = &capture_path {
        report.capture.save(p)?;
    }

    println!("Replay of {}", path);
    println!("Depth: {}  Stages: {}", config.capacity(), config.sync_stages());
    println!("Ticks: {}", report.ticks);
    println!("Writes accepted: {}", report.counters.accepted);
    println!("Reads completed: {}", report.counters.completed);
    println!("Ticks refused while full: {}", report.counters.refused_ticks);
    println!("Final depth: {}", report.depth);
    print_flag_summary(&report.capture);
    let popped: Vec<String> = report.popped.iter().map(|v| format!("{:#x}", v)).collect();
    println!("Dequeued: [{}]", popped.join(", "));
    Ok(())
}

/// Prints how many ticks each flag was raised.
pub fn print_flag_summary(capture: &Capture) {
    println!("Flag time ({} ticks):", capture.len());
    for (i, label) in flags::LABELS.iter().enumerate() {
        println!("  {:>2}: {}", label, capture.count_flag(1 << i));
    }
}

/// Implements the `inspect` subcommand.
pub fn inspect_capture(path: &str) -> Result<()> {
    let capture = Capture::load(path)?;
    println!("Capture {}", path);

    // print only the ticks where something changed
    let mut last = None;
    for (tick, record) in capture.iter().enumerate() {
        if last == Some(record) {
            continue;
        }
        let mut labels = Vec::new();
        for (i, label) in flags::LABELS.iter().enumerate() {
            if record.flags.bits() & (1 << i) != 0 {
                labels.push(*label);
            }
        }
        println!(
            "{:8} | valid {} | ack {} | {}",
            tick,
            record.valid as u8,
            record.ack as u8,
            labels.join(" ")
        );
        last = Some(record);
    }
    print_flag_summary(&capture);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syncfifo_io::parse_script;

    const PUSH_TWO_POP_ONE: &str = "\
depth 4
stages 2
@0 reset 1
@1 reset 0
@4 data 0x11 valid 1
@24 valid 0
@44 data 0x22 valid 1
@64 valid 0
@84 ack 1
@104 ack 0
";

    #[test]
    fn replay_reports_dequeued_values() {
        let script = parse_script(PUSH_TWO_POP_ONE).unwrap();
        let config = script.config(FifoConfig::default()).unwrap();
        let report = replay(&script, config, None).unwrap();

        assert_eq!(report.counters.accepted, 2);
        assert_eq!(report.counters.completed, 1);
        assert_eq!(report.popped, [0x11]);
        assert_eq!(report.depth, 1);
        assert_eq!(report.capture.len() as u64, report.ticks);
        assert_eq!(report.ticks, 104 + 4 * 2 + 16 + 1);
    }

    #[test]
    fn capture_shows_data_presented() {
        let script = parse_script(PUSH_TWO_POP_ONE).unwrap();
        let config = script.config(FifoConfig::default()).unwrap();
        let report = replay(&script, config, None).unwrap();

        let first = report.capture.tick(2).unwrap();
        assert!(first.flags.empty);
        let later = report.capture.tick(80).unwrap();
        assert!(later.valid);
        assert!(!later.flags.empty);
        assert!(report.capture.count_flag(flags::HALF_FULL) > 0);
    }
}
