// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Reader and writer contracts shared by all trace formats.
//!
//! Every codec implements [`TraceReader`] and [`TraceWriter`], so callers
//! can drive a `.osi`, `.txth` or `.mcap` trace through the same API.

use std::any::Any;
use std::collections::BTreeMap;
use std::path::Path;

use prost_reflect::MessageDescriptor;

use crate::core::{MessageKind, Result, TraceError};

use super::message::{ReadResult, TopLevelMessage};

/// Trait for reading OSI trace files.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use osi_tracefile::io::factory::create_reader;
///
/// let mut reader = create_reader("osi").unwrap();
/// reader.open(Path::new("trace_gt_.osi")).unwrap();
/// while reader.has_next() {
///     if let Some(result) = reader.read_message().unwrap() {
///         println!("{:?}", result.kind);
///     }
/// }
/// reader.close();
/// ```
pub trait TraceReader {
    /// Open a trace, inferring the message kind from the path if the
    /// format needs one.
    ///
    /// A failed open leaves the reader as it was.
    fn open(&mut self, path: &Path) -> Result<()>;

    /// Open a trace with an explicit message kind.
    ///
    /// Passing [`MessageKind::Unknown`] behaves like [`TraceReader::open`].
    fn open_as(&mut self, path: &Path, kind: MessageKind) -> Result<()>;

    /// Check whether another record is likely available.
    fn has_next(&mut self) -> bool;

    /// Read the next record.
    ///
    /// Returns `Ok(None)` when the reader is closed or exhausted, and an
    /// error when the next bytes cannot be parsed.
    fn read_message(&mut self) -> Result<Option<ReadResult>>;

    /// Release the source. Idempotent.
    fn close(&mut self);

    /// Kind the reader was opened with, `Unknown` before the first open.
    fn message_kind(&self) -> MessageKind;

    /// Downcast to `Any` for accessing format-specific functionality.
    fn as_any(&self) -> &dyn Any;

    /// Downcast mutably to `Any` for accessing format-specific functionality.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Trait for writing OSI trace files.
pub trait TraceWriter {
    /// Create (or truncate) the trace file.
    fn open(&mut self, path: &Path) -> Result<()>;

    /// Append a record.
    ///
    /// `topic` selects the channel for MCAP traces and is ignored by the
    /// other formats.
    fn write_message(&mut self, message: &dyn TopLevelMessage, topic: &str) -> Result<()>;

    /// Register a channel for `topic` carrying records of `descriptor`.
    ///
    /// Returns the channel ID. Only MCAP traces have channels.
    fn add_channel(
        &mut self,
        topic: &str,
        descriptor: &MessageDescriptor,
        metadata: BTreeMap<String, String>,
    ) -> Result<u16> {
        let _ = (topic, descriptor, metadata);
        Err(TraceError::unsupported("channels"))
    }

    /// Append a named metadata block. Only MCAP traces carry metadata.
    fn set_metadata(&mut self, name: &str, metadata: &BTreeMap<String, String>) -> Result<()> {
        let _ = (name, metadata);
        Err(TraceError::unsupported("metadata"))
    }

    /// Finalize and release the sink. Idempotent.
    fn close(&mut self) -> Result<()>;

    /// Number of records written since the last open.
    fn messages_written(&self) -> u64;

    /// Downcast to `Any` for accessing format-specific functionality.
    fn as_any(&self) -> &dyn Any;

    /// Downcast mutably to `Any` for accessing format-specific functionality.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
