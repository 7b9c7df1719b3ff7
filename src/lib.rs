// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # osi-tracefile
//!
//! Reader and writer library for OSI (Open Simulation Interface) trace files.
//!
//! Three on-disk formats are supported, organized by format:
//! - **Binary** (`.osi`) in [`io::formats::binary`](crate::io::formats::binary)
//! - **Text** (`.txth`) in [`io::formats::text`](crate::io::formats::text)
//! - **MCAP** (`.mcap`) in [`io::formats::mcap`](crate::io::formats::mcap)
//!
//! ## Architecture
//!
//! - `core/` - Error type and the closed set of OSI message kinds
//! - `schema/` - Typed `osi3` records, descriptor pool and text form
//! - `io/` - Reader/writer traits, format detection, factories and codecs
//! - `convert` - Trace-to-trace conversion used by the `osi2mcap` tool
//!
//! ## Example: Reading a trace
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use osi_tracefile::schema::osi3::GroundTruth;
//! use osi_tracefile::open_reader;
//!
//! let mut reader = open_reader(Path::new("drive_gt_.osi"), None)?;
//! while let Some(result) = reader.read_message()? {
//!     if let Some(gt) = result.get::<GroundTruth>() {
//!         println!("GroundTruth at {:?}", gt.timestamp);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Writing MCAP
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::collections::BTreeMap;
//! use std::path::Path;
//! use osi_tracefile::io::McapTraceWriter;
//! use osi_tracefile::schema::osi3::{SensorView, Timestamp};
//! use osi_tracefile::{KindedMessage, TraceWriter};
//!
//! let mut writer = McapTraceWriter::new();
//! writer.open(Path::new("views.mcap"))?;
//! writer.add_channel("/sv", &SensorView::descriptor()?, BTreeMap::new())?;
//! let sv = SensorView {
//!     timestamp: Some(Timestamp::new(0, 100)),
//!     ..Default::default()
//! };
//! writer.write_message(&sv, "/sv")?;
//! writer.close()?;
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

pub use core::{MessageKind, Result, TraceError};

// OSI schema: typed records, descriptors, text form
pub mod schema;

// I/O: traits, detection, factories, codecs
pub mod io;

pub use io::{
    create_reader, create_writer, open_reader, KindedMessage, OsiMessage, ReadResult,
    TopLevelMessage, TraceFormat, TraceReader, TraceWriter,
};

// Conversion driver
pub mod convert;

pub use convert::{convert, ConvertOptions, ConvertStats};
