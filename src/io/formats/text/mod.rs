// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Text trace format (`.txth`).
//!
//! Records are protobuf text dumps concatenated without separators. The
//! reader recovers record boundaries from the first line of the file, so a
//! text trace holds records of a single kind only.

pub mod reader;
pub mod writer;

pub use reader::TextTraceReader;
pub use writer::TextTraceWriter;

/// Required file extension.
pub const EXTENSION: &str = ".txth";

/// Format tag reported in errors.
pub const FORMAT_TAG: &str = "txth";
