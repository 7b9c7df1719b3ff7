// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! OSI schema layer.
//!
//! - [`osi3`] - Typed `prost` records for the top-level messages
//! - [`descriptor`] - Reflection pool and dependency closure
//! - [`text`] - Canonical text form

pub mod descriptor;
pub mod osi3;
pub mod text;

pub use descriptor::{descriptor_for, file_descriptor_set, osi_version_string, OSI_VERSION};
pub use prost_reflect::MessageDescriptor;
