//! Reactive producer/consumer agents that speak the 4-phase handshake.
//!
//! Agents only look at the registered outputs of the previous tick, as an
//! external party on the far side of the synchronizers would.

#![allow(dead_code)]

use std::collections::VecDeque;
use syncfifo_core::{FifoInputs, FifoOutputs, RingBuffer};

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
    pub accepted: Vec<u32>,
    delays: VecDeque<u32>,
    wait: u32,
}

impl Producer {
    pub fn new(items: impl IntoIterator<Item = u32>) -> Self {
        Self::with_delays(items, std::iter::empty())
    }

    pub fn with_delays(
        items: impl IntoIterator<Item = u32>,
        delays: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            pending: items.into_iter().collect(),
            phase: Phase::Idle,
            data: 0,
            accepted: Vec::new(),
            delays: delays.into_iter().collect(),
            wait: 0,
        }
    }

    /// Drives `valid`/`data` for the next tick from the last outputs.
    pub fn drive(&mut self, last: &FifoOutputs<u32>, inputs: &mut FifoInputs<u32>) {
        match self.phase {
            Phase::Idle => {
                if self.wait > 0 {
                    self.wait -= 1;
                } else if let Some(item) = self.pending.pop_front() {
                    self.data = item;
                    self.phase = Phase::Requesting;
                }
            }
            Phase::Requesting => {
                if last.ack {
                    self.accepted.push(self.data);
                    self.phase = Phase::Releasing;
                }
            }
            Phase::Releasing => {
                if !last.ack {
                    self.wait = self.delays.pop_front().unwrap_or(0);
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
    pub received: Vec<u32>,
    budget: Option<usize>,
    delays: VecDeque<u32>,
    wait: u32,
}

impl Consumer {
    pub fn new() -> Self {
        Self::with_delays(std::iter::empty())
    }

    pub fn with_delays(delays: impl IntoIterator<Item = u32>) -> Self {
        Self {
            acking: false,
            received: Vec::new(),
            budget: None,
            delays: delays.into_iter().collect(),
            wait: 0,
        }
    }

    /// Consumer that stops after `n` elements.
    pub fn limited(n: usize) -> Self {
        Self {
            budget: Some(n),
            ..Self::new()
        }
    }

    pub fn drive(&mut self, last: &FifoOutputs<u32>, inputs: &mut FifoInputs<u32>) {
        if self.acking {
            if !last.valid {
                self.acking = false;
                self.wait = self.delays.pop_front().unwrap_or(0);
            }
        } else if self.wait > 0 {
            self.wait -= 1;
        } else if last.valid && self.budget.is_none_or(|b| self.received.len() < b) {
            self.received.push(last.data);
            self.acking = true;
        }
        inputs.ack = self.acking;
    }
}

/// Builds a buffer and runs one tick so both controllers leave reset.
pub fn fresh(capacity: usize, stages: u8) -> (RingBuffer<u32>, FifoOutputs<u32>) {
    let mut fifo = RingBuffer::with_capacity(capacity, stages).unwrap();
    let out = fifo.tick(&FifoInputs::default());
    (fifo, out)
}

/// Runs producer and consumer against the buffer for at most `ticks` ticks,
/// calling `check` after every tick. Stops early once the producer is done
/// and the consumer has drained `expect` elements.
pub fn run(
    fifo: &mut RingBuffer<u32>,
    last: &mut FifoOutputs<u32>,
    producer: &mut Producer,
    consumer: &mut Consumer,
    ticks: usize,
    expect: usize,
    mut check: impl FnMut(&RingBuffer<u32>, &FifoOutputs<u32>),
) {
    let mut inputs = FifoInputs::default();
    for _ in 0..ticks {
        producer.drive(last, &mut inputs);
        consumer.drive(last, &mut inputs);
        *last = fifo.tick(&inputs);
        check(fifo, last);
        if producer.is_done() && consumer.received.len() >= expect && !consumer.acking {
            break;
        }
    }
}

/// Ticks with every input low so in-flight handshakes settle.
pub fn settle(fifo: &mut RingBuffer<u32>, last: &mut FifoOutputs<u32>, ticks: usize) {
    for _ in 0..ticks {
        *last = fifo.tick(&FifoInputs::default());
    }
}
