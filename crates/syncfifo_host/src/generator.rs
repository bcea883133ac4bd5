//! Open-loop stimulus script generator.
//!
//! Writes a script that pushes random bytes and pops them again with fixed
//! hold times instead of reacting to the buffer. Hold times are derived
//! from the synchronizer depth so every level outlasts the handshake
//! latency; random pauses between transfers make the buffer fill and
//! drain.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use syncfifo_io::{Event, Script, ScriptHeader, Signal};
use tracing::info;

/// Shape of a generated script.
#[derive(Debug, Clone, Copy)]
pub struct GenParams {
    pub depth: usize,
    pub stages: u8,
    pub width: u32,
    pub items: usize,
    pub max_gap: u64,
    pub seed: u64,
}

/// Ticks each level is held for, comfortably longer than one direction of
/// the handshake.
pub fn hold_ticks(stages: u8) -> u64 {
    2 * (stages as u64 + 4)
}

/// Builds the script without touching the filesystem.
pub fn build_script(params: &GenParams) -> Script {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let hold = hold_ticks(params.stages);
    let data_mask = if params.width >= 64 {
        u64::MAX
    } else {
        (1u64 << params.width) - 1
    };

    let mut timeline: BTreeMap<u64, Vec<(Signal, u64)>> = BTreeMap::new();
    timeline.entry(0).or_default().push((Signal::Reset, 1));
    timeline.entry(1).or_default().push((Signal::Reset, 0));

    let mut t = 2 + hold;
    for _ in 0..params.items {
        let data = rng.r#gen::<u64>() & data_mask;
        let slot = timeline.entry(t).or_default();
        slot.push((Signal::Data, data));
        slot.push((Signal::Valid, 1));
        timeline.entry(t + hold).or_default().push((Signal::Valid, 0));
        t += 2 * hold + rng.gen_range(0..=params.max_gap);
    }

    // the consumer starts later and pauses differently, so occupancy moves
    let mut t = 2 + 3 * hold;
    for _ in 0..params.items {
        timeline.entry(t).or_default().push((Signal::Ack, 1));
        timeline.entry(t + hold).or_default().push((Signal::Ack, 0));
        t += 2 * hold + rng.gen_range(0..=params.max_gap);
    }

    let events = timeline
        .into_iter()
        .map(|(tick, changes)| Event { tick, changes })
        .collect();

    Script {
        header: ScriptHeader {
            depth: Some(params.depth),
            stages: Some(params.stages),
            width: Some(params.width),
        },
        events,
    }
}

/// Generates a script and writes it to `path`.
pub fn generate_script(path: &str, params: &GenParams) -> Result<()> {
    let script = build_script(params);
    script.save(path)?;
    info!(
        path,
        items = params.items,
        events = script.events.len(),
        last_tick = script.last_tick(),
        "script written"
    );
    println!(
        "Wrote {} items over {} ticks to {}",
        params.items,
        script.last_tick(),
        path
    );
    Ok(())
}
