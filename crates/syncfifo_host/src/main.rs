mod agents;
mod dashboard;
mod generator;
mod replay;
mod soak;
mod stats;

use anyhow::Result;
use clap::{Parser, Subcommand};
use syncfifo_common::defaults;
use syncfifo_core::FifoConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Cycle-level handshake FIFO model")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a stimulus script.
    Run {
        #[arg(short, long)]
        script: String,
        /// Write a packed per-tick status capture.
        #[arg(short, long)]
        capture: Option<String>,
        /// Write a VCD waveform trace.
        #[arg(long)]
        vcd: Option<String>,
        /// Depth used when the script has no `depth` directive.
        #[arg(long, default_value_t = defaults::CAPACITY)]
        depth: usize,
        /// Stages used when the script has no `stages` directive.
        #[arg(long, default_value_t = defaults::SYNC_STAGES)]
        stages: u8,
    },
    /// Generate an open-loop stimulus script.
    Gen {
        #[arg(short, long, default_value = "stimulus.fifo")]
        out: String,
        #[arg(long, default_value_t = 32)]
        items: usize,
        #[arg(long, default_value_t = defaults::CAPACITY)]
        depth: usize,
        #[arg(long, default_value_t = defaults::SYNC_STAGES)]
        stages: u8,
        #[arg(long, default_value_t = defaults::PAYLOAD_WIDTH)]
        width: u32,
        /// Longest random pause between transfers, in ticks.
        #[arg(long, default_value_t = 40)]
        max_gap: u64,
        #[arg(long, default_value_t = 12345)]
        seed: u64,
    },
    /// Run randomized reactive producer/consumer pairs in parallel.
    Soak {
        #[arg(long, default_value_t = 1_000)]
        runs: usize,
        #[arg(long, default_value_t = 100_000)]
        ticks: u64,
        #[arg(long, default_value_t = defaults::CAPACITY)]
        depth: usize,
        #[arg(long, default_value_t = defaults::SYNC_STAGES)]
        stages: u8,
        #[arg(long, default_value_t = 12345)]
        seed: u64,
    },
    /// Drive the demonstration board with a simulated user.
    Board {
        #[arg(long, default_value_t = 5_000)]
        ticks: u64,
        #[arg(long, default_value_t = 12345)]
        seed: u64,
        /// Delay between dashboard redraws.
        #[arg(long, default_value_t = 30)]
        frame_ms: u64,
    },
    /// Print the flag timeline of a capture file.
    Inspect {
        #[arg(short, long)]
        capture: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            script,
            capture,
            vcd,
            depth,
            stages,
        } => {
            let fallback = FifoConfig::new(depth, stages)?;
            replay::run_script(&script, fallback, capture, vcd)?;
        }
        Commands::Gen {
            out,
            items,
            depth,
            stages,
            width,
            max_gap,
            seed,
        } => {
            FifoConfig::new(depth, stages)?;
            anyhow::ensure!(
                (1..=32).contains(&width),
                "width {} is outside 1..=32",
                width
            );
            let params = generator::GenParams {
                depth,
                stages,
                width,
                items,
                max_gap,
                seed,
            };
            generator::generate_script(&out, &params)?;
        }
        Commands::Soak {
            runs,
            ticks,
            depth,
            stages,
            seed,
        } => {
            soak::run_soak(&soak::SoakParams {
                runs,
                ticks,
                depth,
                stages,
                seed,
            })?;
        }
        Commands::Board {
            ticks,
            seed,
            frame_ms,
        } => {
            dashboard::run_board(ticks, seed, frame_ms)?;
        }
        Commands::Inspect { capture } => {
            replay::inspect_capture(&capture)?;
        }
    }
    Ok(())
}
