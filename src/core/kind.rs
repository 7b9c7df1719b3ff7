// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The closed set of OSI top-level message kinds.
//!
//! Each kind maps to a fully-qualified schema name (`osi3.<TypeName>`),
//! which is the interoperability key for MCAP traces, and to a filename
//! fragment (`_gt_`, `_sv_`, ...) used to infer the kind of a trace from
//! its path.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{Result, TraceError};

/// Package prefix shared by all OSI schema names.
pub const SCHEMA_PREFIX: &str = "osi3.";

/// Top-level OSI message kind.
///
/// `Unknown` is the state of a reader before a successful open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageKind {
    #[default]
    Unknown = 0,
    GroundTruth,
    SensorData,
    SensorView,
    SensorViewConfiguration,
    HostVehicleData,
    TrafficCommand,
    TrafficCommandUpdate,
    TrafficUpdate,
    MotionRequest,
    StreamingUpdate,
}

/// Filename fragments and the kinds they imply, in lookup order.
pub const FILENAME_TAGS: [(&str, MessageKind); 10] = [
    ("_gt_", MessageKind::GroundTruth),
    ("_sd_", MessageKind::SensorData),
    ("_sv_", MessageKind::SensorView),
    ("_svc_", MessageKind::SensorViewConfiguration),
    ("_hvd_", MessageKind::HostVehicleData),
    ("_tc_", MessageKind::TrafficCommand),
    ("_tcu_", MessageKind::TrafficCommandUpdate),
    ("_tu_", MessageKind::TrafficUpdate),
    ("_mr_", MessageKind::MotionRequest),
    ("_su_", MessageKind::StreamingUpdate),
];

impl MessageKind {
    /// All known kinds in declaration order (excludes `Unknown`).
    pub const ALL: [MessageKind; 10] = [
        MessageKind::GroundTruth,
        MessageKind::SensorData,
        MessageKind::SensorView,
        MessageKind::SensorViewConfiguration,
        MessageKind::HostVehicleData,
        MessageKind::TrafficCommand,
        MessageKind::TrafficCommandUpdate,
        MessageKind::TrafficUpdate,
        MessageKind::MotionRequest,
        MessageKind::StreamingUpdate,
    ];

    /// Unqualified OSI type name, e.g. `GroundTruth`.
    pub fn type_name(&self) -> &'static str {
        match self {
            MessageKind::Unknown => "Unknown",
            MessageKind::GroundTruth => "GroundTruth",
            MessageKind::SensorData => "SensorData",
            MessageKind::SensorView => "SensorView",
            MessageKind::SensorViewConfiguration => "SensorViewConfiguration",
            MessageKind::HostVehicleData => "HostVehicleData",
            MessageKind::TrafficCommand => "TrafficCommand",
            MessageKind::TrafficCommandUpdate => "TrafficCommandUpdate",
            MessageKind::TrafficUpdate => "TrafficUpdate",
            MessageKind::MotionRequest => "MotionRequest",
            MessageKind::StreamingUpdate => "StreamingUpdate",
        }
    }

    /// Fully-qualified schema name, e.g. `osi3.GroundTruth`.
    pub fn schema_name(&self) -> &'static str {
        match self {
            MessageKind::Unknown => "",
            MessageKind::GroundTruth => "osi3.GroundTruth",
            MessageKind::SensorData => "osi3.SensorData",
            MessageKind::SensorView => "osi3.SensorView",
            MessageKind::SensorViewConfiguration => "osi3.SensorViewConfiguration",
            MessageKind::HostVehicleData => "osi3.HostVehicleData",
            MessageKind::TrafficCommand => "osi3.TrafficCommand",
            MessageKind::TrafficCommandUpdate => "osi3.TrafficCommandUpdate",
            MessageKind::TrafficUpdate => "osi3.TrafficUpdate",
            MessageKind::MotionRequest => "osi3.MotionRequest",
            MessageKind::StreamingUpdate => "osi3.StreamingUpdate",
        }
    }

    /// Filename fragment for this kind, `None` for `Unknown`.
    pub fn filename_tag(&self) -> Option<&'static str> {
        FILENAME_TAGS
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(tag, _)| *tag)
    }

    /// Check whether this is one of the ten known kinds.
    pub fn is_known(&self) -> bool {
        !matches!(self, MessageKind::Unknown)
    }

    /// Reflection descriptor of this kind.
    pub fn descriptor(&self) -> Result<prost_reflect::MessageDescriptor> {
        crate::schema::descriptor_for(*self)
    }

    /// Look up a kind by its fully-qualified schema name.
    pub fn from_schema_name(name: &str) -> Option<MessageKind> {
        Self::ALL.into_iter().find(|k| k.schema_name() == name)
    }

    /// Look up a kind by its unqualified type name.
    pub fn from_type_name(name: &str) -> Option<MessageKind> {
        Self::ALL.into_iter().find(|k| k.type_name() == name)
    }

    /// Infer the kind from the fragments embedded in a path.
    ///
    /// The whole path is searched, directories included. When several
    /// fragments occur the longest one wins; equal lengths fall back to
    /// table order.
    pub fn infer_from_path(path: &Path) -> Option<MessageKind> {
        let path = path.to_string_lossy();
        let mut best: Option<(&str, MessageKind)> = None;
        for (tag, kind) in FILENAME_TAGS {
            if !path.contains(tag) {
                continue;
            }
            match best {
                Some((current, _)) if current.len() >= tag.len() => {}
                _ => best = Some((tag, kind)),
            }
        }
        best.map(|(_, kind)| kind)
    }

    /// Resolve the kind for opening `path`.
    ///
    /// A pinned known kind is used as is; otherwise the kind is inferred
    /// from the path.
    pub fn resolve(path: &Path, pinned: Option<MessageKind>) -> Result<MessageKind> {
        if let Some(kind) = pinned.filter(MessageKind::is_known) {
            return Ok(kind);
        }
        Self::infer_from_path(path).ok_or_else(|| TraceError::UnknownMessageKind {
            path: path.display().to_string(),
            accepted: accepted_fragments(),
        })
    }
}

/// Comma separated list of all filename fragments.
pub fn accepted_fragments() -> String {
    FILENAME_TAGS
        .iter()
        .map(|(tag, _)| *tag)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for MessageKind {
    type Err = TraceError;

    /// Accepts the type name (`GroundTruth`) or the schema name
    /// (`osi3.GroundTruth`).
    fn from_str(s: &str) -> Result<Self> {
        let name = s.strip_prefix(SCHEMA_PREFIX).unwrap_or(s);
        Self::from_type_name(name)
            .ok_or_else(|| TraceError::InvalidArgument(format!("unknown OSI message type '{s}'")))
    }
}
