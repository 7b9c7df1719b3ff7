// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Reader and writer factories.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use osi_tracefile::io::factory::{create_writer, open_reader};
//! use osi_tracefile::schema::osi3::{GroundTruth, Timestamp};
//!
//! let mut writer = create_writer("osi")?;
//! writer.open(Path::new("drive_gt_.osi"))?;
//! let gt = GroundTruth {
//!     timestamp: Some(Timestamp::new(1, 0)),
//!     ..Default::default()
//! };
//! writer.write_message(&gt, "")?;
//! writer.close()?;
//!
//! let mut reader = open_reader(Path::new("drive_gt_.osi"), None)?;
//! while let Some(result) = reader.read_message()? {
//!     println!("{} at {:?}", result.kind, result.timestamp());
//! }
//! # Ok::<(), osi_tracefile::TraceError>(())
//! ```

use std::path::Path;

use crate::core::{MessageKind, Result, TraceError};

use super::detection::TraceFormat;
use super::formats::binary::{BinaryTraceReader, BinaryTraceWriter};
use super::formats::mcap::{McapTraceReader, McapTraceWriter};
use super::formats::text::{TextTraceReader, TextTraceWriter};
use super::traits::{TraceReader, TraceWriter};

/// Create an unopened reader for a format tag (`osi`, `txth` or `mcap`).
pub fn create_reader(tag: &str) -> Result<Box<dyn TraceReader>> {
    Ok(reader_for(TraceFormat::from_tag(tag)?))
}

/// Create an unopened writer for a format tag (`osi`, `txth` or `mcap`).
pub fn create_writer(tag: &str) -> Result<Box<dyn TraceWriter>> {
    Ok(writer_for(TraceFormat::from_tag(tag)?))
}

/// Create an unopened reader for a format.
pub fn reader_for(format: TraceFormat) -> Box<dyn TraceReader> {
    match format {
        TraceFormat::Osi => Box::new(BinaryTraceReader::new()),
        TraceFormat::Txth => Box::new(TextTraceReader::new()),
        TraceFormat::Mcap => Box::new(McapTraceReader::new()),
    }
}

/// Create an unopened writer for a format.
pub fn writer_for(format: TraceFormat) -> Box<dyn TraceWriter> {
    match format {
        TraceFormat::Osi => Box::new(BinaryTraceWriter::new()),
        TraceFormat::Txth => Box::new(TextTraceWriter::new()),
        TraceFormat::Mcap => Box::new(McapTraceWriter::new()),
    }
}

/// Detect the format of `path` and open a reader on it.
///
/// `kind` pins the message kind; `None` infers it from the path.
pub fn open_reader(path: &Path, kind: Option<MessageKind>) -> Result<Box<dyn TraceReader>> {
    let format = TraceFormat::detect(path).ok_or_else(|| {
        TraceError::InvalidArgument(format!(
            "cannot determine the trace format of '{}'",
            path.display()
        ))
    })?;

    let mut reader = reader_for(format);
    match kind {
        Some(kind) => reader.open_as(path, kind)?,
        None => reader.open(path)?,
    }
    Ok(reader)
}
