//! File formats around the handshake FIFO model.
//!
//! Reads and writes stimulus scripts, stores compact per-tick status
//! captures, and dumps waveform traces for external viewers.

/// Packed per-tick status captures.
///
/// Stores the five flags plus both handshake outputs in one byte per tick
/// and reads them back for inspection.
pub mod capture;

/// Stimulus script parser and writer.
///
/// Parses the line-oriented script format with header directives and
/// timed signal events, and expands it into per-tick inputs.
pub mod parser;

/// Value Change Dump trace writer.
pub mod trace;

pub use capture::{Capture, TickRecord};
pub use parser::{Event, Script, ScriptHeader, Signal, load_script, parse_script};
pub use trace::VcdWriter;
