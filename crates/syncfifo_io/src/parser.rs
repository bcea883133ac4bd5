//! Parser and writer for stimulus scripts.
//!
//! A script is a line-oriented description of the raw signals driven into a
//! buffer. Header directives fix the buffer shape, events change signal
//! levels at a given tick, and levels hold until the next change:
//!
//! ```text
//! # push one byte, then pop it
//! depth 4
//! stages 2
//! width 8
//! @0   reset 1
//! @1   reset 0
//! @4   data 0x41 valid 1
//! @20  valid 0
//! @40  ack 1
//! @60  ack 0
//! ```

use anyhow::{Context, Result, anyhow, bail};
use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{hex_digit1, space0, space1, u64 as dec_u64};
use nom::combinator::{all_consuming, map, map_res, value};
use nom::multi::many1;
use nom::sequence::{pair, preceded, terminated};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use syncfifo_common::defaults;
use syncfifo_core::{FifoConfig, FifoInputs};

/// Latest tick an event may name. Replays expand every tick into memory,
/// so the bound keeps a script from asking for an unbounded stimulus.
pub const MAX_TICK: u64 = 1 << 24;

/// Input line of the buffer that an event can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Reset,
    Clear,
    Valid,
    Ack,
    Data,
}

impl Signal {
    pub fn name(self) -> &'static str {
        match self {
            Signal::Reset => "reset",
            Signal::Clear => "clear",
            Signal::Valid => "valid",
            Signal::Ack => "ack",
            Signal::Data => "data",
        }
    }
}

/// Level changes applied at one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub tick: u64,
    pub changes: Vec<(Signal, u64)>,
}

/// Optional header directives. Absent values fall back to CLI defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptHeader {
    pub depth: Option<usize>,
    pub stages: Option<u8>,
    pub width: Option<u32>,
}

/// A parsed stimulus script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub header: ScriptHeader,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Depth(u64),
    Stages(u64),
    Width(u64),
    Event(Event),
}

fn number(input: &str) -> IResult<&str, u64> {
    alt((
        map_res(preceded(tag("0x"), hex_digit1), |s| u64::from_str_radix(s, 16)),
        map_res(
            preceded(tag("0b"), take_while1(|c: char| c == '0' || c == '1')),
            |s| u64::from_str_radix(s, 2),
        ),
        dec_u64,
    ))(input)
}

fn signal(input: &str) -> IResult<&str, Signal> {
    alt((
        value(Signal::Reset, tag("reset")),
        value(Signal::Clear, tag("clear")),
        value(Signal::Valid, tag("valid")),
        value(Signal::Ack, tag("ack")),
        value(Signal::Data, tag("data")),
    ))(input)
}

fn directive<'a>(
    keyword: &'static str,
    build: fn(u64) -> Line,
) -> impl FnMut(&'a str) -> IResult<&'a str, Line> {
    map(preceded(pair(tag(keyword), space1), number), build)
}

fn event(input: &str) -> IResult<&str, Line> {
    let (rest, tick) = preceded(tag("@"), number)(input)?;
    let (rest, changes) = many1(preceded(space1, pair(terminated(signal, space1), number)))(rest)?;
    Ok((rest, Line::Event(Event { tick, changes })))
}

fn line(input: &str) -> IResult<&str, Line> {
    all_consuming(terminated(
        alt((
            directive("depth", Line::Depth),
            directive("stages", Line::Stages),
            directive("width", Line::Width),
            event,
        )),
        space0,
    ))(input)
}

/// Parses script text.
///
/// Directives must precede the first event, event ticks must not decrease
/// or exceed `MAX_TICK`,
/// boolean signals take 0 or 1, and `data` must fit the declared width
/// (8 bits when no `width` directive is given, 32 at most).
pub fn parse_script(text: &str) -> Result<Script> {
    let mut script = Script::default();

    for (idx, raw) in text.lines().enumerate() {
        let lineno = idx + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let (_, parsed) = line(content)
            .map_err(|_| anyhow!("line {}: cannot parse `{}`", lineno, content))?;

        if !matches!(parsed, Line::Event(_)) && !script.events.is_empty() {
            bail!("line {}: header directive after the first event", lineno);
        }

        match parsed {
            Line::Depth(d) => {
                let depth = usize::try_from(d)
                    .with_context(|| format!("line {}: depth {} too large", lineno, d))?;
                script.header.depth = Some(depth);
            }
            Line::Stages(s) => {
                let stages = u8::try_from(s)
                    .with_context(|| format!("line {}: stage count {} too large", lineno, s))?;
                script.header.stages = Some(stages);
            }
            Line::Width(w) => {
                if !(1..=32).contains(&w) {
                    bail!("line {}: width {} is outside 1..=32", lineno, w);
                }
                script.header.width = Some(w as u32);
            }
            Line::Event(ev) => {
                if ev.tick > MAX_TICK {
                    bail!(
                        "line {}: tick {} is beyond the last allowed tick {}",
                        lineno,
                        ev.tick,
                        MAX_TICK
                    );
                }
                if let Some(prev) = script.events.last() {
                    if ev.tick < prev.tick {
                        bail!(
                            "line {}: tick {} goes backwards (previous event at {})",
                            lineno,
                            ev.tick,
                            prev.tick
                        );
                    }
                }
                let width = script.header.width.unwrap_or(defaults::PAYLOAD_WIDTH);
                for &(sig, val) in &ev.changes {
                    check_value(sig, val, width).map_err(|e| anyhow!("line {}: {}", lineno, e))?;
                }
                script.events.push(ev);
            }
        }
    }

    Ok(script)
}

fn check_value(sig: Signal, val: u64, width: u32) -> Result<()> {
    match sig {
        Signal::Data => {
            if val >> width != 0 {
                bail!("data {:#x} does not fit in {} bits", val, width);
            }
        }
        _ => {
            if val > 1 {
                bail!("{} takes 0 or 1, got {}", sig.name(), val);
            }
        }
    }
    Ok(())
}

/// Reads and parses a script file.
pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Script> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open script {}", path.display()))?;
    parse_script(&text).with_context(|| format!("Invalid script {}", path.display()))
}

impl Script {
    /// Buffer configuration from the header, falling back to `fallback`.
    pub fn config(&self, fallback: FifoConfig) -> Result<FifoConfig> {
        let depth = self.header.depth.unwrap_or(fallback.capacity());
        let stages = self.header.stages.unwrap_or(fallback.sync_stages());
        Ok(FifoConfig::new(depth, stages)?)
    }

    /// Tick of the last event, or 0 for an empty script.
    pub fn last_tick(&self) -> u64 {
        self.events.last().map_or(0, |e| e.tick)
    }

    /// Expands the events into one input record per tick.
    ///
    /// Runs from tick 0 to `last_tick() + tail` inclusive. Levels hold
    /// between events. Fails when the run would end past `MAX_TICK` plus
    /// `tail`, which only happens for scripts not built by `parse_script`.
    pub fn stimulus(&self, tail: u64) -> Result<Vec<FifoInputs<u32>>> {
        let last = self.last_tick();
        if last > MAX_TICK {
            bail!("last event at tick {} is beyond tick {}", last, MAX_TICK);
        }
        let total = last
            .checked_add(tail)
            .and_then(|t| t.checked_add(1))
            .ok_or_else(|| anyhow!("a tail of {} ticks is too long", tail))?;
        let len = usize::try_from(total)
            .with_context(|| format!("{} ticks do not fit in memory", total))?;
        let mut out = Vec::with_capacity(len);
        let mut level = FifoInputs::<u32>::default();
        let mut events = self.events.iter().peekable();

        for tick in 0..total {
            while let Some(ev) = events.next_if(|e| e.tick == tick) {
                for &(sig, val) in &ev.changes {
                    match sig {
                        Signal::Reset => level.reset = val != 0,
                        Signal::Clear => level.clear = val != 0,
                        Signal::Valid => level.valid = val != 0,
                        Signal::Ack => level.ack = val != 0,
                        Signal::Data => level.data = val as u32,
                    }
                }
            }
            out.push(level);
        }
        Ok(out)
    }

    /// Renders the script in the text format accepted by `parse_script`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(d) = self.header.depth {
            let _ = writeln!(out, "depth {}", d);
        }
        if let Some(s) = self.header.stages {
            let _ = writeln!(out, "stages {}", s);
        }
        if let Some(w) = self.header.width {
            let _ = writeln!(out, "width {}", w);
        }
        for ev in &self.events {
            let _ = write!(out, "@{}", ev.tick);
            for &(sig, val) in &ev.changes {
                match sig {
                    Signal::Data => {
                        let _ = write!(out, " data {:#x}", val);
                    }
                    _ => {
                        let _ = write!(out, " {} {}", sig.name(), val);
                    }
                }
            }
            out.push('\n');
        }
        out
    }

    /// Writes the rendered script to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.render())
            .with_context(|| format!("Failed to write script {}", path.display()))
    }
}
