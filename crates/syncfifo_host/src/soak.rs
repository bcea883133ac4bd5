//! Randomized soak test across many independent buffers.
//!
//! Each run builds its own buffer and a seeded producer/consumer pair and
//! checks the occupancy invariants after every tick. Runs are spread over
//! the rayon pool; a failing run reports its seed so it can be replayed.

use crate::agents::{Consumer, Producer};
use crate::stats::LatencyStats;
use anyhow::{Result, bail, ensure};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;
use syncfifo_core::{FifoConfig, FifoInputs, RingBuffer};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy)]
pub struct SoakParams {
    pub runs: usize,
    pub ticks: u64,
    pub depth: usize,
    pub stages: u8,
    pub seed: u64,
}

/// Result of one successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub transferred: usize,
    pub full_ticks: u64,
    pub latency: LatencyStats,
}

/// Runs one seeded scenario and verifies ordering and occupancy.
pub fn soak_once(config: FifoConfig, ticks: u64, seed: u64) -> Result<RunReport> {
    let mut rng = StdRng::seed_from_u64(seed);
    let capacity = config.capacity();

    let count = rng.gen_range(1..=4 * capacity + 8);
    let items: Vec<u32> = (0..count).map(|_| rng.r#gen()).collect();
    // uneven pacing so that both Full and Empty are reached
    let mut producer = Producer::new(items.clone(), rng.gen_range(0..16));
    let mut consumer = Consumer::new(rng.gen_range(0..24));

    let mut fifo = RingBuffer::<u32>::new(config);
    let mut last = fifo.tick(&FifoInputs::default());
    let mut inputs = FifoInputs::default();
    let mut full_ticks = 0;

    for tick in 0..ticks {
        producer.drive(&mut rng, &last, &mut inputs);
        consumer.drive(&mut rng, &last, &mut inputs);
        last = fifo.tick(&inputs);

        let occ = fifo.occupancy();
        let c = fifo.counters();
        ensure!(
            !(last.flags.empty && last.flags.full),
            "seed {seed}: empty and full together at tick {tick}"
        );
        ensure!(
            occ.depth <= capacity,
            "seed {seed}: depth {} exceeds capacity at tick {tick}",
            occ.depth
        );
        ensure!(
            occ.depth as u64 == c.accepted - c.completed,
            "seed {seed}: depth {} disagrees with {} writes and {} reads at tick {tick}",
            occ.depth,
            c.accepted,
            c.completed
        );
        if last.flags.full {
            full_ticks += 1;
        }
        if producer.is_done() && consumer.received.len() == items.len() && consumer.is_idle() {
            break;
        }
    }

    if consumer.received.len() < items.len() {
        bail!(
            "seed {seed}: only {} of {} items arrived within {ticks} ticks",
            consumer.received.len(),
            items.len()
        );
    }
    ensure!(
        producer.accepted == items,
        "seed {seed}: producer acknowledgements out of order"
    );
    ensure!(
        consumer.received == items,
        "seed {seed}: dequeued values out of order"
    );

    Ok(RunReport {
        transferred: items.len(),
        full_ticks,
        latency: producer.latency,
    })
}

/// Implements the `soak` subcommand.
pub fn run_soak(params: &SoakParams) -> Result<()> {
    let config = FifoConfig::new(params.depth, params.stages)?;
    info!(
        runs = params.runs,
        depth = params.depth,
        stages = params.stages,
        "starting soak"
    );

    println!("Starting Soak (Parallel - Rayon)...");
    let start = Instant::now();

    let results: Vec<Result<RunReport>> = (0..params.runs)
        .into_par_iter()
        .map(|i| soak_once(config, params.ticks, params.seed.wrapping_add(i as u64)))
        .collect();

    let mut latency = LatencyStats::new();
    let mut transferred = 0;
    let mut full_ticks = 0;
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(run) => {
                transferred += run.transferred;
                full_ticks += run.full_ticks;
                latency.merge(&run.latency);
            }
            Err(e) => {
                warn!(error = %e, "run failed");
                failures.push(e);
            }
        }
    }

    let seconds = start.elapsed().as_secs_f64();
    println!("Results");
    println!("Time: {:.4} s", seconds);
    println!("Runs: {} ({} failed)", params.runs, failures.len());
    println!("Elements transferred: {}", transferred);
    println!("Ticks spent full: {}", full_ticks);
    latency.print_report("Write Handshake Latency");

    if let Some(first) = failures.into_iter().next() {
        return Err(first.context("soak found an invariant violation"));
    }
    Ok(())
}
