// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MCAP trace format (`.mcap`).
//!
//! OSI traces use the `protobuf` profile: every schema record holds the
//! serialized `FileDescriptorSet` of an `osi3.*` type, every channel is
//! bound to one such schema, and message payloads are compact protobuf.
//! Reading and writing go through the mcap crate.

pub mod constants;
pub mod reader;
pub mod writer;

pub use constants::MCAP_MAGIC;
pub use reader::{McapMetadata, McapReaderOptions, McapTraceReader};
pub use writer::McapTraceWriter;
