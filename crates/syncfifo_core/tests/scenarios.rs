//! End-to-end handshake scenarios against the ring buffer.

mod common;

use common::{Consumer, Producer, fresh, run, settle};
use syncfifo_core::read_ctrl::ReadState;
use syncfifo_core::write_ctrl::WriteState;
use syncfifo_core::{Cursor, FifoInputs};

const A: u32 = 0xA;
const B: u32 = 0xB;
const C: u32 = 0xC;
const D: u32 = 0xD;

#[test]
fn four_writes_fill_a_four_slot_buffer() {
    let (mut fifo, mut last) = fresh(4, 2);
    let mut producer = Producer::new([A, B, C, D]);
    let mut consumer = Consumer::limited(0);
    run(&mut fifo, &mut last, &mut producer, &mut consumer, 400, 0, |_, _| {});

    assert_eq!(producer.accepted, [A, B, C, D]);
    assert!(last.flags.full);
    assert!(last.flags.almost_full);
    assert!(last.flags.half_full);
    assert!(!last.flags.empty);
    assert!(!last.flags.almost_empty);
    assert_eq!(fifo.occupancy().depth, 4);

    // the write cursor lapped once: index back at 0, wrap bit flipped
    assert_eq!(fifo.writer().cursor(), Cursor { index: 0, wrap: true });
    assert_eq!(fifo.reader().cursor(), Cursor { index: 0, wrap: false });

    // a fifth request held high is never acknowledged
    let fifth = FifoInputs {
        data: 0xE,
        valid: true,
        ..FifoInputs::default()
    };
    for _ in 0..64 {
        let out = fifo.tick(&fifth);
        assert!(!out.ack);
        assert!(out.flags.full);
        assert_eq!(fifo.write_state(), WriteState::WaitValid);
    }
    assert_eq!(fifo.counters().accepted, 4);
    assert!(fifo.counters().refused_ticks > 0);
    settle(&mut fifo, &mut last, 4);

    // head of the queue is presented
    assert!(last.valid);
    assert_eq!(last.data, A);

    let mut idle = Producer::new(std::iter::empty());
    let mut reader = Consumer::limited(1);
    run(&mut fifo, &mut last, &mut idle, &mut reader, 100, 1, |_, _| {});
    settle(&mut fifo, &mut last, 8);

    assert_eq!(reader.received, [A]);
    assert!(!last.flags.full);
    assert_eq!(fifo.occupancy().depth, 3);
    assert!(last.flags.almost_full);
    assert!(last.valid);
    assert_eq!(last.data, B);
}

#[test]
fn clear_takes_effect_after_synchronizer_latency() {
    let (mut fifo, mut last) = fresh(2, 2);
    let mut producer = Producer::new([7]);
    let mut consumer = Consumer::limited(0);
    run(&mut fifo, &mut last, &mut producer, &mut consumer, 100, 0, |_, _| {});
    assert_eq!(fifo.occupancy().depth, 1);

    let clear = FifoInputs {
        clear: true,
        ..FifoInputs::default()
    };
    fifo.tick(&clear);
    assert_eq!(fifo.write_state(), WriteState::WaitValid);
    assert_eq!(fifo.read_state(), ReadState::WaitConsumerAck);

    fifo.tick(&FifoInputs::default());
    assert_eq!(fifo.write_state(), WriteState::WaitValid);
    assert_eq!(fifo.read_state(), ReadState::WaitConsumerAck);

    // second tick after assertion: both controllers are forced to reset
    fifo.tick(&FifoInputs::default());
    assert_eq!(fifo.write_state(), WriteState::ResetWrite);
    assert_eq!(fifo.read_state(), ReadState::ResetRead);

    let out = fifo.tick(&FifoInputs::default());
    assert!(out.flags.empty);
    assert!(!out.valid);
    assert_eq!(fifo.write_state(), WriteState::WaitValid);
    assert_eq!(fifo.read_state(), ReadState::WaitConsumerAck);
}

#[test]
fn domain_reset_needs_no_synchronizer() {
    let (mut fifo, mut last) = fresh(4, 3);
    let mut producer = Producer::new([1, 2]);
    let mut consumer = Consumer::limited(0);
    run(&mut fifo, &mut last, &mut producer, &mut consumer, 200, 0, |_, _| {});
    assert_eq!(fifo.occupancy().depth, 2);

    let out = fifo.tick(&FifoInputs {
        reset: true,
        ..FifoInputs::default()
    });
    assert!(out.flags.empty);
    assert!(!out.valid && !out.ack);
    assert_eq!(fifo.occupancy().depth, 0);
}

#[test]
fn writes_then_reads_preserve_order() {
    for capacity in 2..=6usize {
        for n in 1..=capacity {
            let (mut fifo, mut last) = fresh(capacity, 2);
            let items: Vec<u32> = (0..n as u32).map(|i| 100 + i).collect();

            let mut producer = Producer::new(items.clone());
            let mut hold = Consumer::limited(0);
            run(&mut fifo, &mut last, &mut producer, &mut hold, 2000, 0, |_, _| {});
            assert_eq!(fifo.occupancy().depth, n);

            let mut idle = Producer::new(std::iter::empty());
            let mut consumer = Consumer::new();
            run(&mut fifo, &mut last, &mut idle, &mut consumer, 2000, n, |_, _| {});
            settle(&mut fifo, &mut last, 8);

            assert_eq!(consumer.received, items, "capacity {capacity}, n {n}");
            assert!(last.flags.empty);
        }
    }
}

#[test]
fn streaming_across_many_wraparounds() {
    let (mut fifo, mut last) = fresh(3, 2);
    let items: Vec<u32> = (0..40).collect();
    let mut producer = Producer::new(items.clone());
    let mut consumer = Consumer::new();
    run(
        &mut fifo,
        &mut last,
        &mut producer,
        &mut consumer,
        10_000,
        items.len(),
        |f, out| {
            assert!(!(out.flags.empty && out.flags.full));
            assert!(f.occupancy().depth <= 3);
        },
    );
    assert_eq!(consumer.received, items);
}

#[test]
fn ack_held_while_empty_never_dequeues() {
    let (mut fifo, _) = fresh(4, 2);
    let hold = FifoInputs {
        ack: true,
        ..FifoInputs::default()
    };
    for _ in 0..100 {
        let out = fifo.tick(&hold);
        assert!(!out.valid);
        assert!(out.flags.empty);
        assert_eq!(fifo.reader().cursor(), Cursor::default());
        assert_eq!(fifo.read_state(), ReadState::WaitConsumerAck);
    }
    assert_eq!(fifo.counters().completed, 0);
}

#[test]
fn valid_held_high_is_a_single_write() {
    let (mut fifo, _) = fresh(4, 2);
    let hold = FifoInputs {
        data: 9,
        valid: true,
        ..FifoInputs::default()
    };
    for _ in 0..100 {
        fifo.tick(&hold);
    }
    assert_eq!(fifo.counters().accepted, 1);
    assert_eq!(fifo.occupancy().depth, 1);
    assert_eq!(fifo.write_state(), WriteState::WaitInvalid);
    assert!(fifo.outputs().ack);
}
