// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::path::Path;

use osi_tracefile::io::{BinaryTraceWriter, KindedMessage, OsiMessage};
use osi_tracefile::schema::osi3::{
    GroundTruth, HostVehicleData, Identifier, MotionRequest, SensorData, SensorView,
    SensorViewConfiguration, StreamingUpdate, Timestamp, TrafficCommand, TrafficCommandUpdate,
    TrafficUpdate,
};
use osi_tracefile::{MessageKind, TraceWriter};

/// GroundTruth carrying only a timestamp.
pub fn ground_truth(seconds: i64, nanos: u32) -> GroundTruth {
    GroundTruth {
        timestamp: Some(Timestamp::new(seconds, nanos)),
        ..Default::default()
    }
}

/// SensorView carrying a timestamp and a sensor id.
pub fn sensor_view(seconds: i64, nanos: u32) -> SensorView {
    SensorView {
        timestamp: Some(Timestamp::new(seconds, nanos)),
        sensor_id: Some(Identifier::new(7)),
        ..Default::default()
    }
}

/// A record of `kind` stamped at `seconds`.500s.
///
/// SensorViewConfiguration has no timestamp and carries `seconds` as its
/// sensor id instead.
pub fn sample_record(kind: MessageKind, seconds: i64) -> OsiMessage {
    let timestamp = Some(Timestamp::new(seconds, 500));
    match kind {
        MessageKind::GroundTruth => GroundTruth {
            timestamp,
            ..Default::default()
        }
        .into(),
        MessageKind::SensorData => SensorData {
            timestamp,
            ..Default::default()
        }
        .into(),
        MessageKind::SensorView => SensorView {
            timestamp,
            ..Default::default()
        }
        .into(),
        MessageKind::SensorViewConfiguration => SensorViewConfiguration {
            sensor_id: Some(Identifier::new(seconds as u64)),
            ..Default::default()
        }
        .into(),
        MessageKind::HostVehicleData => HostVehicleData {
            timestamp,
            ..Default::default()
        }
        .into(),
        MessageKind::TrafficCommand => TrafficCommand {
            timestamp,
            ..Default::default()
        }
        .into(),
        MessageKind::TrafficCommandUpdate => TrafficCommandUpdate {
            timestamp,
            ..Default::default()
        }
        .into(),
        MessageKind::TrafficUpdate => TrafficUpdate {
            timestamp,
            ..Default::default()
        }
        .into(),
        MessageKind::MotionRequest => MotionRequest {
            timestamp,
            ..Default::default()
        }
        .into(),
        MessageKind::StreamingUpdate => StreamingUpdate {
            timestamp,
            ..Default::default()
        }
        .into(),
        MessageKind::Unknown => panic!("no sample record for an unknown kind"),
    }
}

/// Write `messages` to a fresh binary trace at `path`.
pub fn write_binary_trace<M: KindedMessage>(path: &Path, messages: &[M]) {
    let mut writer = BinaryTraceWriter::new();
    writer.open(path).unwrap();
    for message in messages {
        writer.write_message(message, "").unwrap();
    }
    writer.close().unwrap();
}

/// Timestamp of a record as a `(seconds, nanos)` pair.
pub fn seconds_nanos(timestamp: Option<&Timestamp>) -> Option<(i64, u32)> {
    timestamp.map(|t| (t.seconds, t.nanos))
}
