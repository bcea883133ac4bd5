//! Consumer-side handshake state machine.
//!
//! Mirrors the write side: the element under the read cursor is presented
//! with `valid`, the consumer raises `ack`, the controller drops `valid`
//! and waits for `ack` to fall before moving the cursor. An `ack` held high
//! dequeues exactly one element.

use crate::occupancy::Cursor;

/// States of the read controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    /// Zero the read cursor, drop `valid`, clear the output register.
    ResetRead,
    /// Present the head element; wait for `ack` while not empty.
    WaitConsumerAck,
    /// `valid` dropped; wait for the consumer to release `ack`.
    WaitConsumerNack,
    /// Move the read cursor one slot forward.
    AdvanceReadPointer,
}

/// Snapshot values the read controller reads in one tick.
#[derive(Debug, Clone, Copy)]
pub struct ReadInputs {
    /// Consumer ack, after synchronization.
    pub ack: bool,
    /// Empty flag computed from the cursors at the start of the tick.
    pub empty: bool,
}

/// Next-state bundle produced by `ReadController::step`.
#[derive(Debug, Clone, Copy)]
pub struct ReadStep<T> {
    pub next: ReadController<T>,
    /// True on the tick the read cursor advances.
    pub completed: bool,
}

/// Read-side controller: owns the read cursor and the output registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadController<T> {
    state: ReadState,
    cursor: Cursor,
    valid: bool,
    data: T,
}

impl<T: Copy + Default> Default for ReadController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default> ReadController<T> {
    pub fn new() -> Self {
        Self {
            state: ReadState::ResetRead,
            cursor: Cursor::default(),
            valid: false,
            data: T::default(),
        }
    }

    /// Computes the next state from a snapshot without mutating `self`.
    ///
    /// `storage` is the store as it stood at the start of the tick; a slot
    /// written in the same tick is not visible here.
    pub fn step(&self, inputs: ReadInputs, storage: &[T]) -> ReadStep<T> {
        let mut next = *self;
        let mut completed = false;

        match self.state {
            ReadState::ResetRead => {
                next.cursor = Cursor::default();
                next.valid = false;
                next.data = T::default();
                next.state = ReadState::WaitConsumerAck;
            }
            ReadState::WaitConsumerAck => {
                if let Some(&head) = storage.get(self.cursor.index) {
                    next.data = head;
                }
                next.valid = !inputs.empty;
                if inputs.ack && !inputs.empty {
                    next.state = ReadState::WaitConsumerNack;
                }
            }
            ReadState::WaitConsumerNack => {
                next.valid = false;
                if !inputs.ack {
                    next.state = ReadState::AdvanceReadPointer;
                }
            }
            ReadState::AdvanceReadPointer => {
                next.cursor = self.cursor.advanced(storage.len());
                completed = true;
                next.state = ReadState::WaitConsumerAck;
            }
        }

        ReadStep { next, completed }
    }

    /// Forces the controller into `ResetRead`; cursor and outputs are cleared
    /// when that state executes on the following tick.
    #[inline]
    pub fn force_reset(&mut self) {
        self.state = ReadState::ResetRead;
    }

    /// Domain reset: state, cursor and outputs cleared immediately.
    #[inline]
    pub fn hard_reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn state(&self) -> ReadState {
        self.state
    }

    #[inline]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[inline]
    pub fn valid(&self) -> bool {
        self.valid
    }

    #[inline]
    pub fn data(&self) -> T {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORE: [u8; 3] = [10, 20, 30];

    fn run(ctl: ReadController<u8>, ack: bool, empty: bool) -> ReadStep<u8> {
        ctl.step(ReadInputs { ack, empty }, &STORE)
    }

    #[test]
    fn presents_then_dequeues_once() {
        let mut ctl = run(ReadController::new(), false, true).next;
        assert_eq!(ctl.state(), ReadState::WaitConsumerAck);

        ctl = run(ctl, false, false).next;
        assert!(ctl.valid());
        assert_eq!(ctl.data(), 10);

        ctl = run(ctl, true, false).next;
        assert_eq!(ctl.state(), ReadState::WaitConsumerNack);

        // ack held high: stays put, valid dropped
        for _ in 0..5 {
            let s = run(ctl, true, false);
            assert!(!s.completed);
            ctl = s.next;
            assert!(!ctl.valid());
            assert_eq!(ctl.state(), ReadState::WaitConsumerNack);
        }

        ctl = run(ctl, false, false).next;
        let s = run(ctl, false, false);
        assert!(s.completed);
        assert_eq!(s.next.cursor().index, 1);

        ctl = run(s.next, false, false).next;
        assert_eq!(ctl.data(), 20);
    }

    #[test]
    fn ack_while_empty_is_ignored() {
        let mut ctl = run(ReadController::new(), false, true).next;
        for _ in 0..8 {
            let s = run(ctl, true, true);
            assert!(!s.completed);
            ctl = s.next;
            assert!(!ctl.valid());
            assert_eq!(ctl.state(), ReadState::WaitConsumerAck);
            assert_eq!(ctl.cursor().index, 0);
        }
    }

    #[test]
    fn wraps_over_capacity() {
        let mut ctl = run(ReadController::new(), false, true).next;
        for _ in 0..STORE.len() {
            ctl = run(ctl, true, false).next;
            ctl = run(ctl, false, false).next;
            ctl = run(ctl, false, false).next;
        }
        assert_eq!(ctl.cursor(), Cursor { index: 0, wrap: true });
    }
}
