//! Randomized producer and consumer that speak the 4-phase handshake.
//!
//! Both agents react only to the registered outputs of the previous tick,
//! like logic clocked by an unrelated source would. Pauses between
//! transfers are drawn from a seeded RNG so runs are reproducible.

use crate::stats::LatencyStats;
use rand::Rng;
use rand::rngs::StdRng;
use std::collections::VecDeque;
use syncfifo_core::{FifoInputs, FifoOutputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Requesting,
    Releasing,
}

pub struct Producer {
    pending: VecDeque<u32>,
    phase: Phase,
    data: u32,
    wait: u32,
    waited: u64,
    max_gap: u32,
    pub accepted: Vec<u32>,
    pub latency: LatencyStats,
}

impl Producer {
    pub fn new(items: Vec<u32>, max_gap: u32) -> Self {
        Self {
            pending: items.into(),
            phase: Phase::Idle,
            data: 0,
            wait: 0,
            waited: 0,
            max_gap,
            accepted: Vec::new(),
            latency: LatencyStats::new(),
        }
    }

    /// Drives `valid` and `data` for the next tick.
    pub fn drive(&mut self, rng: &mut StdRng, last: &FifoOutputs<u32>, inputs: &mut FifoInputs<u32>) {
        match self.phase {
            Phase::Idle => {
                if self.wait > 0 {
                    self.wait -= 1;
                } else if let Some(item) = self.pending.pop_front() {
                    self.data = item;
                    self.waited = 0;
                    self.phase = Phase::Requesting;
                }
            }
            Phase::Requesting => {
                self.waited += 1;
                if last.ack {
                    self.accepted.push(self.data);
                    self.latency.update(self.waited);
                    self.phase = Phase::Releasing;
                }
            }
            Phase::Releasing => {
                if !last.ack {
                    self.wait = rng.gen_range(0..=self.max_gap);
                    self.phase = Phase::Idle;
                }
            }
        }
        inputs.valid = self.phase == Phase::Requesting;
        inputs.data = self.data;
    }

    pub fn is_done(&self) -> bool {
        self.pending.is_empty() && self.phase == Phase::Idle
    }
}

pub struct Consumer {
    acking: bool,
    wait: u32,
    max_gap: u32,
    pub received: Vec<u32>,
}

impl Consumer {
    pub fn new(max_gap: u32) -> Self {
        Self {
            acking: false,
            wait: 0,
            max_gap,
            received: Vec::new(),
        }
    }

    /// Drives `ack` for the next tick.
    pub fn drive(&mut self, rng: &mut StdRng, last: &FifoOutputs<u32>, inputs: &mut FifoInputs<u32>) {
        if self.acking {
            if !last.valid {
                self.acking = false;
                self.wait = rng.gen_range(0..=self.max_gap);
            }
        } else if self.wait > 0 {
            self.wait -= 1;
        } else if last.valid {
            self.received.push(last.data);
            self.acking = true;
        }
        inputs.ack = self.acking;
    }

    pub fn is_idle(&self) -> bool {
        !self.acking
    }
}
