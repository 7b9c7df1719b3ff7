// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout osi-tracefile.
//!
//! This module provides the foundational types for the library:
//! - [`TraceError`] - Error taxonomy shared by all codecs
//! - [`MessageKind`] - The closed set of OSI top-level message kinds

pub mod error;
pub mod kind;

pub use error::{Result, TraceError};
pub use kind::{accepted_fragments, MessageKind, FILENAME_TAGS, SCHEMA_PREFIX};
