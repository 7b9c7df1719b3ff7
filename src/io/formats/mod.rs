// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Trace format implementations.
//!
//! - [`binary`]: length-prefixed binary frames (`.osi`)
//! - [`text`]: canonical text records (`.txth`)
//! - [`mcap`]: MCAP container (`.mcap`)

pub mod binary;
pub mod mcap;
pub mod text;
