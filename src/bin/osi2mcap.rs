// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # osi2mcap
//!
//! Convert an OSI trace (`.osi`, `.txth` or `.mcap`) into an MCAP file.
//!
//! ## Usage
//!
//! ```sh
//! # Message type inferred from the path (`_gt_` -> GroundTruth)
//! osi2mcap drive_gt_.osi drive.mcap
//!
//! # Message type given explicitly
//! osi2mcap recording.osi recording.mcap --input-type SensorView
//! ```
//!
//! Set `RUST_LOG` to change the log filter (default `warn`).

use std::io::IsTerminal as _;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::Context as _;
use clap::error::ErrorKind;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use osi_tracefile::convert::{convert_with_progress, ConvertOptions};
use osi_tracefile::io::TraceFormat;
use osi_tracefile::MessageKind;

/// Message types accepted by `--input-type`.
const INPUT_TYPES: [&str; 9] = [
    "GroundTruth",
    "SensorData",
    "SensorView",
    "HostVehicleData",
    "TrafficCommand",
    "TrafficCommandUpdate",
    "TrafficUpdate",
    "MotionRequest",
    "StreamingUpdate",
];

/// Convert OSI trace files to MCAP.
#[derive(Parser, Debug)]
#[command(name = "osi2mcap")]
#[command(about = "Convert OSI trace files to MCAP", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Input trace (.osi, .txth or .mcap)
    input_path: PathBuf,

    /// Output MCAP file
    output_path: PathBuf,

    /// OSI message type of the input; inferred from the path if omitted
    #[arg(long = "input-type", value_name = "TYPE", value_parser = INPUT_TYPES)]
    input_type: Option<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn spinner() -> Option<ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} messages {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut options = ConvertOptions::new().with_output_format(TraceFormat::Mcap);
    if let Some(name) = cli.input_type.as_deref() {
        let kind: MessageKind = name.parse()?;
        options = options.with_input_kind(kind);
    }

    let progress = spinner();
    let result = convert_with_progress(&cli.input_path, &cli.output_path, &options, |_| {
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    });
    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let stats = result.with_context(|| {
        format!(
            "failed to convert '{}' to '{}'",
            cli.input_path.display(),
            cli.output_path.display()
        )
    })?;
    eprintln!(
        "Converted {} {} messages to {}",
        stats.messages,
        stats.kind,
        cli.output_path.display()
    );
    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            process::exit(code);
        }
    };
    init_logging();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
