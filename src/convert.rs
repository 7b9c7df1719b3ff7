// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Trace conversion.
//!
//! Copies every record of a trace into a new trace, possibly in another
//! format. Payloads are re-emitted as read; nothing is filtered or
//! reordered. For MCAP output all records go to a single channel.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use osi_tracefile::convert::{convert, ConvertOptions};
//!
//! let stats = convert(
//!     Path::new("drive_gt_.osi"),
//!     Path::new("drive.mcap"),
//!     &ConvertOptions::default(),
//! )?;
//! println!("converted {} {} records", stats.messages, stats.kind);
//! # Ok::<(), osi_tracefile::TraceError>(())
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{MessageKind, Result, TraceError};
use crate::io::detection::TraceFormat;
use crate::io::factory::{open_reader, writer_for};
use crate::io::message::ReadResult;

/// Topic used for MCAP output when none is configured.
pub const DEFAULT_TOPIC: &str = "ConvertedTrace";

/// Conversion settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Message kind of the input; inferred from the path when `None`.
    pub input_kind: Option<MessageKind>,
    /// Output format; taken from the output extension when `None`.
    pub output_format: Option<TraceFormat>,
    /// Channel topic for MCAP output.
    pub topic: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            input_kind: None,
            output_format: None,
            topic: DEFAULT_TOPIC.to_string(),
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_kind(mut self, kind: MessageKind) -> Self {
        self.input_kind = Some(kind);
        self
    }

    pub fn with_output_format(mut self, format: TraceFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }
}

/// Summary of a finished conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConvertStats {
    /// Kind reported by the input reader.
    pub kind: MessageKind,
    /// Records copied.
    pub messages: u64,
    pub input_format: TraceFormat,
    pub output_format: TraceFormat,
}

/// Convert `input` into `output`.
pub fn convert(input: &Path, output: &Path, options: &ConvertOptions) -> Result<ConvertStats> {
    convert_with_progress(input, output, options, |_| {})
}

/// Convert `input` into `output`, calling `on_message` for every record
/// before it is written.
pub fn convert_with_progress<F>(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
    mut on_message: F,
) -> Result<ConvertStats>
where
    F: FnMut(&ReadResult),
{
    let input_format = TraceFormat::detect(input).ok_or_else(|| {
        TraceError::InvalidArgument(format!(
            "cannot determine the trace format of '{}'",
            input.display()
        ))
    })?;
    let output_format = options
        .output_format
        .or_else(|| TraceFormat::from_extension(output))
        .ok_or_else(|| {
            TraceError::InvalidArgument(format!(
                "cannot determine the output format of '{}'",
                output.display()
            ))
        })?;

    let mut reader = open_reader(input, options.input_kind)?;
    let kind = reader.message_kind();
    if !kind.is_known() {
        return Err(TraceError::InvalidArgument(format!(
            "no OSI message type could be determined for '{}'",
            input.display()
        )));
    }

    let mut writer = writer_for(output_format);
    writer.open(output)?;
    if output_format == TraceFormat::Mcap {
        writer.add_channel(&options.topic, &kind.descriptor()?, BTreeMap::new())?;
    }

    while reader.has_next() {
        let Some(result) = reader.read_message()? else {
            break;
        };
        on_message(&result);
        writer.write_message(&result.message, &options.topic)?;
    }
    reader.close();
    writer.close()?;

    let stats = ConvertStats {
        kind,
        messages: writer.messages_written(),
        input_format,
        output_format,
    };
    info!(
        context = "convert",
        input = %input.display(),
        output = %output.display(),
        kind = %stats.kind,
        messages = stats.messages,
        "Conversion finished"
    );
    Ok(stats)
}
