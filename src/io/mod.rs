// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer for OSI trace files.
//!
//! This module provides the reader/writer contracts, the typed records
//! they exchange, format detection, and the per-format codecs.

pub mod detection;
pub mod factory;
pub mod formats;
pub mod message;
pub mod traits;

// Re-exports
pub use detection::{is_mcap_file, TraceFormat};
pub use factory::{create_reader, create_writer, open_reader, reader_for, writer_for};
pub use formats::binary::{BinaryTraceReader, BinaryTraceWriter};
pub use formats::mcap::{McapMetadata, McapReaderOptions, McapTraceReader, McapTraceWriter};
pub use formats::text::{TextTraceReader, TextTraceWriter};
pub use message::{KindedMessage, OsiMessage, ReadResult, TopLevelMessage};
pub use traits::{TraceReader, TraceWriter};
