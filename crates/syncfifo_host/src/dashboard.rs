//! Live LED dashboard for the demonstration board.
//!
//! A simulated user flips the data switches and presses the buttons with
//! random, bouncy timing; the board's LED bank is redrawn after every
//! batch of ticks.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread;
use std::time::Duration;
use syncfifo_common::{board as pins, flags};
use syncfifo_core::board::{Board, BoardConfig, BoardInputs};
use tracing::info;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";
const CLEAR: &str = "\x1b[2J\x1b[1;1H";

/// Ticks a fresh button press chatters for.
const BOUNCE_TICKS: u32 = 5;

/// Ticks simulated between redraws.
const TICKS_PER_FRAME: u64 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Button {
    Push,
    Pop,
    Clear,
}

/// Presses one button at a time, holding it for a random number of ticks
/// and chattering on the leading edge.
struct SimulatedUser {
    switches: u16,
    held: Option<(Button, u32)>,
    pressed_for: u32,
    rest: u32,
}

impl SimulatedUser {
    fn new(switches: u16) -> Self {
        Self {
            switches,
            held: None,
            pressed_for: 0,
            rest: 0,
        }
    }

    fn next(&mut self, rng: &mut StdRng) -> (BoardInputs, Option<Button>) {
        let mut inputs = BoardInputs {
            switches: self.switches,
            ..BoardInputs::default()
        };
        let mut pressed = None;

        match self.held {
            Some((button, remaining)) => {
                // contact bounce for the first few ticks
                let level = self.pressed_for >= BOUNCE_TICKS || rng.gen_bool(0.5);
                self.pressed_for += 1;
                match button {
                    Button::Push => inputs.btn_push = level,
                    Button::Pop => inputs.btn_pop = level,
                    Button::Clear => inputs.btn_clear = level,
                }
                self.held = remaining.checked_sub(1).map(|r| (button, r));
                if self.held.is_none() {
                    self.rest = rng.gen_range(20..80);
                }
            }
            None if self.rest > 0 => self.rest -= 1,
            None => {
                let button = match rng.gen_range(0..100) {
                    0..=54 => Button::Push,
                    55..=96 => Button::Pop,
                    _ => Button::Clear,
                };
                if button == Button::Push {
                    let data = rng.r#gen::<u8>() as u16;
                    self.switches = (self.switches & !pins::SW_DATA_MASK) | data;
                    inputs.switches = self.switches;
                }
                self.held = Some((button, rng.gen_range(45..90)));
                self.pressed_for = 0;
                pressed = Some(button);
            }
        }
        (inputs, pressed)
    }
}

fn lamp(on: bool, color: &str) -> String {
    if on {
        format!("{}●{}", color, RESET)
    } else {
        "○".to_string()
    }
}

/// Renders the LED bank as one labelled row per group.
pub fn render_leds(leds: u16) -> String {
    let bit = |mask: u16| leds & mask != 0;
    let mut out = String::new();

    out.push_str("   Data  ");
    for i in (0..8).rev() {
        out.push_str(&lamp(bit(1 << i), GREEN));
        out.push(' ');
    }
    out.push_str(&format!(" = {:#04x}\n", leds & pins::LED_DATA_MASK));

    out.push_str(&format!(
        "   Valid {}   Ack {}   Heartbeat {}\n",
        lamp(bit(pins::LED_VALID), YELLOW),
        lamp(bit(pins::LED_ACK), YELLOW),
        lamp(bit(pins::LED_HEARTBEAT), RED)
    ));

    out.push_str("   Flags ");
    for (i, label) in flags::LABELS.iter().enumerate() {
        let on = bit(1 << (pins::LED_FLAGS_SHIFT + i as u32));
        let color = if i == 0 || i == flags::COUNT - 1 { RED } else { GREEN };
        out.push_str(&format!("{} {}  ", lamp(on, color), label));
    }
    out.push('\n');
    out
}

/// Implements the `board` subcommand.
pub fn run_board(ticks: u64, seed: u64, frame_ms: u64) -> Result<()> {
    let mut board = Board::new(BoardConfig::default())?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut user = SimulatedUser::new(pins::SW_HEARTBEAT);
    let mut history: Vec<String> = Vec::new();
    info!(ticks, seed, "board demo starting");

    // hold reset for one tick so the board starts from a known state
    let mut leds = board.tick(BoardInputs {
        reset: true,
        switches: pins::SW_HEARTBEAT,
        ..BoardInputs::default()
    });

    let mut tick = 1;
    while tick < ticks {
        let frame_end = (tick + TICKS_PER_FRAME).min(ticks);
        while tick < frame_end {
            let (inputs, pressed) = user.next(&mut rng);
            leds = board.tick(inputs);
            if let Some(button) = pressed {
                let entry = match button {
                    Button::Push => format!(
                        "Tick {:8} | {}PUSH {:#04x}{}",
                        tick,
                        GREEN,
                        inputs.switches & pins::SW_DATA_MASK,
                        RESET
                    ),
                    Button::Pop => format!("Tick {:8} | {}POP{}", tick, YELLOW, RESET),
                    Button::Clear => format!("Tick {:8} | {}CLEAR{}", tick, RED, RESET),
                };
                history.push(entry);
                if history.len() > 10 {
                    history.remove(0);
                }
            }
            tick += 1;
        }

        let counters = board.fifo().counters();
        print!("{}", CLEAR);
        println!("========================================");
        println!("      HANDSHAKE FIFO - BOARD STATUS     ");
        println!("========================================");
        println!(
            "Tick: {}   Depth: {}   Beats: {}",
            tick,
            board.fifo().occupancy().depth,
            board.beats()
        );
        println!(
            "Accepted: {}   Completed: {}   Refused: {}",
            counters.accepted, counters.completed, counters.refused_ticks
        );
        println!("----------------------------------------");
        print!("{}", render_leds(leds));
        println!("----------------------------------------");
        println!("Button Log:");
        for entry in &history {
            println!("   {}", entry);
        }
        println!("========================================");

        if frame_ms > 0 {
            thread::sleep(Duration::from_millis(frame_ms));
        }
    }
    Ok(())
}
