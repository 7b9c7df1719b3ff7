// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Trace format tags and detection.
//!
//! Formats are selected by tag (`osi`, `txth`, `mcap`) or detected from a
//! path. Detection checks the MCAP magic first and falls back to the file
//! extension, since binary and text traces carry no signature.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use osi_tracefile::io::detection::TraceFormat;
//!
//! let format = TraceFormat::detect(Path::new("drive_gt_.osi"));
//! assert_eq!(format, Some(TraceFormat::Osi));
//! ```

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{Result, TraceError};

use super::formats::mcap::constants::MCAP_MAGIC;

/// Tag of the legacy plain-text trace format, recognised but not supported.
pub const LEGACY_TEXT_TAG: &str = "txt";

/// On-disk trace representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceFormat {
    /// Length-prefixed binary frames.
    Osi,
    /// Canonical text records.
    Txth,
    /// MCAP container.
    Mcap,
}

impl TraceFormat {
    /// Format tag as used by the factories.
    pub fn tag(&self) -> &'static str {
        match self {
            TraceFormat::Osi => "osi",
            TraceFormat::Txth => "txth",
            TraceFormat::Mcap => "mcap",
        }
    }

    /// File extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            TraceFormat::Osi => ".osi",
            TraceFormat::Txth => ".txth",
            TraceFormat::Mcap => ".mcap",
        }
    }

    /// Parse a format tag.
    ///
    /// The legacy `txt` tag yields [`TraceError::Unimplemented`], anything
    /// else unknown yields [`TraceError::InvalidArgument`].
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "osi" => Ok(TraceFormat::Osi),
            "txth" => Ok(TraceFormat::Txth),
            "mcap" => Ok(TraceFormat::Mcap),
            LEGACY_TEXT_TAG => Err(TraceError::Unimplemented {
                tag: tag.to_string(),
            }),
            other => Err(TraceError::InvalidArgument(format!(
                "unsupported trace format '{other}', expected one of 'osi', 'txth', 'mcap'"
            ))),
        }
    }

    /// Detect the format of `path`.
    ///
    /// Reads the file header when the file exists; otherwise (or when no
    /// magic matches) falls back to the extension.
    pub fn detect(path: &Path) -> Option<Self> {
        match detect_from_magic(path) {
            Ok(Some(format)) => Some(format),
            Ok(None) | Err(_) => detect_from_extension(path),
        }
    }

    /// Format implied by the extension of `path` alone.
    ///
    /// Used for output paths, whose current content is irrelevant.
    pub fn from_extension(path: &Path) -> Option<Self> {
        detect_from_extension(path)
    }
}

impl fmt::Display for TraceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for TraceFormat {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s)
    }
}

/// Detect format by reading the file magic.
fn detect_from_magic(path: &Path) -> Result<Option<TraceFormat>> {
    let mut file = File::open(path).map_err(|e| TraceError::io("FormatDetection", e))?;

    let mut header = [0u8; 8];
    let mut filled = 0;
    while filled < header.len() {
        let n = file
            .read(&mut header[filled..])
            .map_err(|e| TraceError::io("FormatDetection", e))?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    if filled == header.len() && header == MCAP_MAGIC {
        return Ok(Some(TraceFormat::Mcap));
    }
    Ok(None)
}

/// Detect format from file extension (fallback).
fn detect_from_extension(path: &Path) -> Option<TraceFormat> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|ext| match ext.to_lowercase().as_str() {
            "osi" => Some(TraceFormat::Osi),
            "txth" => Some(TraceFormat::Txth),
            "mcap" => Some(TraceFormat::Mcap),
            _ => None,
        })
}

/// Check if a file starts with the MCAP magic.
pub fn is_mcap_file(path: &Path) -> bool {
    matches!(detect_from_magic(path), Ok(Some(TraceFormat::Mcap)))
}
