//! Producer-side handshake state machine.
//!
//! The producer raises `valid` with a payload, the controller stores it and
//! raises `ack`, the producer drops `valid`, the controller drops `ack`.
//! Only after that full 4-phase exchange is another payload accepted, so a
//! `valid` held high is one write, never several.

use crate::occupancy::Cursor;

/// States of the write controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    /// Zero the write cursor and drop `ack`.
    ResetWrite,
    /// Idle until the buffer has room and `valid` is seen.
    WaitValid,
    /// Latch the payload into the slot under the write cursor.
    WriteSlot,
    /// Move the write cursor one slot forward.
    AdvancePointer,
    /// Hold `ack` high until the producer releases `valid`.
    WaitInvalid,
}

/// Snapshot values the write controller reads in one tick.
#[derive(Debug, Clone, Copy)]
pub struct WriteInputs<T> {
    /// Producer valid, after synchronization.
    pub valid: bool,
    /// Full flag computed from the cursors at the start of the tick.
    pub full: bool,
    /// Payload presented by the producer this tick.
    pub payload: T,
}

/// Next-state bundle produced by `WriteController::step`.
#[derive(Debug, Clone, Copy)]
pub struct WriteStep<T> {
    pub next: WriteController,
    /// Slot write to commit at the tick boundary.
    pub store: Option<(usize, T)>,
    /// True on the tick the write cursor advances.
    pub accepted: bool,
    /// True when `valid` was seen but refused because the buffer is full.
    pub refused: bool,
}

/// Write-side controller: owns the write cursor and the `ack` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteController {
    state: WriteState,
    cursor: Cursor,
    ack: bool,
}

impl Default for WriteController {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteController {
    pub const fn new() -> Self {
        Self {
            state: WriteState::ResetWrite,
            cursor: Cursor {
                index: 0,
                wrap: false,
            },
            ack: false,
        }
    }

    /// Computes the next state from a snapshot without mutating `self`.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Synchronized valid, current Full flag and the payload
    /// * `capacity` - Number of storage slots, used for cursor wraparound
    pub fn step<T: Copy>(&self, inputs: WriteInputs<T>, capacity: usize) -> WriteStep<T> {
        let mut next = *self;
        let mut store = None;
        let mut accepted = false;
        let mut refused = false;

        match self.state {
            WriteState::ResetWrite => {
                next.cursor = Cursor::default();
                next.ack = false;
                next.state = WriteState::WaitValid;
            }
            WriteState::WaitValid => {
                next.ack = false;
                if inputs.valid && !inputs.full {
                    next.state = WriteState::WriteSlot;
                } else if inputs.valid {
                    refused = true;
                }
            }
            WriteState::WriteSlot => {
                store = Some((self.cursor.index, inputs.payload));
                next.state = WriteState::AdvancePointer;
            }
            WriteState::AdvancePointer => {
                next.cursor = self.cursor.advanced(capacity);
                accepted = true;
                next.state = WriteState::WaitInvalid;
            }
            WriteState::WaitInvalid => {
                next.ack = true;
                if !inputs.valid {
                    next.state = WriteState::WaitValid;
                }
            }
        }

        WriteStep {
            next,
            store,
            accepted,
            refused,
        }
    }

    /// Forces the controller into `ResetWrite`; the cursor is zeroed when
    /// that state executes on the following tick.
    #[inline]
    pub fn force_reset(&mut self) {
        self.state = WriteState::ResetWrite;
    }

    /// Domain reset: state, cursor and `ack` cleared immediately.
    #[inline]
    pub fn hard_reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn state(&self) -> WriteState {
        self.state
    }

    #[inline]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[inline]
    pub fn ack(&self) -> bool {
        self.ack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(valid: bool, full: bool) -> WriteInputs<u8> {
        WriteInputs {
            valid,
            full,
            payload: 0xA5,
        }
    }

    #[test]
    fn walks_the_handshake() {
        let mut ctl = WriteController::new();
        ctl = ctl.step(inputs(false, false), 4).next;
        assert_eq!(ctl.state(), WriteState::WaitValid);

        ctl = ctl.step(inputs(true, false), 4).next;
        assert_eq!(ctl.state(), WriteState::WriteSlot);

        let s = ctl.step(inputs(true, false), 4);
        assert_eq!(s.store, Some((0, 0xA5)));
        ctl = s.next;

        let s = ctl.step(inputs(true, false), 4);
        assert!(s.accepted);
        assert_eq!(s.next.cursor().index, 1);
        ctl = s.next;
        assert_eq!(ctl.state(), WriteState::WaitInvalid);

        // valid still high: ack rises, state held
        ctl = ctl.step(inputs(true, false), 4).next;
        assert!(ctl.ack());
        assert_eq!(ctl.state(), WriteState::WaitInvalid);

        ctl = ctl.step(inputs(false, false), 4).next;
        assert_eq!(ctl.state(), WriteState::WaitValid);
        ctl = ctl.step(inputs(false, false), 4).next;
        assert!(!ctl.ack());
    }

    #[test]
    fn full_blocks_write() {
        let mut ctl = WriteController::new();
        ctl = ctl.step(inputs(false, false), 4).next;
        for _ in 0..10 {
            let s = ctl.step(inputs(true, true), 4);
            assert!(s.refused);
            assert!(s.store.is_none());
            ctl = s.next;
            assert_eq!(ctl.state(), WriteState::WaitValid);
            assert!(!ctl.ack());
        }
    }

    #[test]
    fn force_reset_defers_cursor_clear() {
        let mut ctl = WriteController::new();
        ctl = ctl.step(inputs(false, false), 4).next;
        ctl = ctl.step(inputs(true, false), 4).next;
        ctl = ctl.step(inputs(true, false), 4).next;
        ctl = ctl.step(inputs(true, false), 4).next;
        assert_eq!(ctl.cursor().index, 1);

        ctl.force_reset();
        assert_eq!(ctl.state(), WriteState::ResetWrite);
        assert_eq!(ctl.cursor().index, 1);
        ctl = ctl.step(inputs(false, false), 4).next;
        assert_eq!(ctl.cursor(), Cursor::default());
    }
}
