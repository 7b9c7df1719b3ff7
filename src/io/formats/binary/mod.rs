// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Length-prefixed binary trace format (`.osi`).
//!
//! A trace is a bare sequence of frames:
//!
//! ```text
//! [u32 little-endian N][N bytes of compact protobuf] ...
//! ```
//!
//! There is no file header, per-record type tag or trailer; the record
//! kind comes from the path or the caller.

pub mod reader;
pub mod writer;

pub use reader::BinaryTraceReader;
pub use writer::BinaryTraceWriter;

/// Required file extension.
pub const EXTENSION: &str = ".osi";

/// Size of the frame length prefix.
pub const FRAME_HEADER_LEN: usize = 4;
