// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Reflection descriptors for the OSI record types.
//!
//! The descriptor pool is assembled once from hand-built
//! `FileDescriptorProto`s that mirror the layout of the OSI `.proto`
//! files, and is shared process wide. MCAP traces embed the transitive
//! file descriptor set of every schema they carry; [`file_descriptor_set`]
//! produces it.

use std::collections::HashSet;
use std::sync::OnceLock;

use prost::Message;
use prost_reflect::{DescriptorPool, FileDescriptor, MessageDescriptor};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet,
};

use crate::core::{MessageKind, Result, TraceError};

use super::osi3::InterfaceVersion;

/// OSI interface version the bundled schema corresponds to.
pub const OSI_VERSION: InterfaceVersion = InterfaceVersion {
    version_major: 3,
    version_minor: 7,
    version_patch: 0,
};

const PACKAGE: &str = "osi3";

static POOL: OnceLock<std::result::Result<DescriptorPool, String>> = OnceLock::new();

/// `major.minor.patch` of the bundled OSI schema.
pub fn osi_version_string() -> String {
    format!(
        "{}.{}.{}",
        OSI_VERSION.version_major, OSI_VERSION.version_minor, OSI_VERSION.version_patch
    )
}

/// Get the shared OSI descriptor pool.
pub fn pool() -> Result<&'static DescriptorPool> {
    POOL.get_or_init(|| {
        DescriptorPool::from_file_descriptor_set(osi_file_descriptor_set())
            .map_err(|e| format!("failed to build OSI descriptor pool: {e}"))
    })
    .as_ref()
    .map_err(|e| TraceError::Schema(e.clone()))
}

/// Get the message descriptor for a known kind.
pub fn descriptor_for(kind: MessageKind) -> Result<MessageDescriptor> {
    pool()?
        .get_message_by_name(kind.schema_name())
        .ok_or_else(|| TraceError::Schema(format!("no descriptor for message kind '{kind}'")))
}

/// Collect the transitive file dependency closure of a message type.
///
/// Files are visited depth first and recorded once, keyed by file name,
/// with every dependency preceding the files that import it.
pub fn file_descriptor_set(descriptor: &MessageDescriptor) -> FileDescriptorSet {
    let mut visited = HashSet::new();
    let mut files = Vec::new();
    collect_files(&descriptor.parent_file(), &mut visited, &mut files);
    FileDescriptorSet { file: files }
}

/// Serialized form of [`file_descriptor_set`], as stored in MCAP schema records.
pub fn encoded_file_descriptor_set(descriptor: &MessageDescriptor) -> Vec<u8> {
    file_descriptor_set(descriptor).encode_to_vec()
}

fn collect_files(
    file: &FileDescriptor,
    visited: &mut HashSet<String>,
    files: &mut Vec<FileDescriptorProto>,
) {
    if !visited.insert(file.name().to_string()) {
        return;
    }
    for dependency in file.dependencies() {
        collect_files(&dependency, visited, files);
    }
    files.push(file.file_descriptor_proto().clone());
}

fn scalar(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

fn message(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(format!(".{PACKAGE}.{type_name}")),
        ..scalar(name, number, Type::Message)
    }
}

fn repeated(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        label: Some(Label::Repeated as i32),
        ..message(name, number, type_name)
    }
}

fn message_type(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

fn proto_file(name: &str, dependencies: &[&str], messages: Vec<DescriptorProto>) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(PACKAGE.to_string()),
        dependency: dependencies.iter().map(|d| d.to_string()).collect(),
        message_type: messages,
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

/// Version and timestamp header shared by most top-level messages.
fn header_fields() -> Vec<FieldDescriptorProto> {
    vec![
        message("version", 1, "InterfaceVersion"),
        message("timestamp", 2, "Timestamp"),
    ]
}

fn osi_file_descriptor_set() -> FileDescriptorSet {
    const VERSION: &str = "osi_version.proto";
    const COMMON: &str = "osi_common.proto";
    const GROUND_TRUTH: &str = "osi_groundtruth.proto";
    const SENSOR_VIEW: &str = "osi_sensorview.proto";

    let files = vec![
        proto_file(
            VERSION,
            &[],
            vec![message_type(
                "InterfaceVersion",
                vec![
                    scalar("version_major", 1, Type::Uint32),
                    scalar("version_minor", 2, Type::Uint32),
                    scalar("version_patch", 3, Type::Uint32),
                ],
            )],
        ),
        proto_file(
            COMMON,
            &[],
            vec![
                message_type(
                    "Timestamp",
                    vec![
                        scalar("seconds", 1, Type::Int64),
                        scalar("nanos", 2, Type::Uint32),
                    ],
                ),
                message_type("Identifier", vec![scalar("value", 1, Type::Uint64)]),
            ],
        ),
        proto_file(
            GROUND_TRUTH,
            &[VERSION, COMMON],
            vec![message_type("GroundTruth", {
                let mut fields = header_fields();
                fields.extend([
                    message("host_vehicle_id", 3, "Identifier"),
                    scalar("country_code", 13, Type::Uint32),
                    scalar("proj_string", 14, Type::String),
                    scalar("map_reference", 15, Type::String),
                ]);
                fields
            })],
        ),
        proto_file(
            SENSOR_VIEW,
            &[VERSION, COMMON, GROUND_TRUTH],
            vec![message_type("SensorView", {
                let mut fields = header_fields();
                fields.extend([
                    message("sensor_id", 3, "Identifier"),
                    message("global_ground_truth", 7, "GroundTruth"),
                    message("host_vehicle_id", 8, "Identifier"),
                ]);
                fields
            })],
        ),
        proto_file(
            "osi_sensorviewconfiguration.proto",
            &[VERSION, COMMON],
            vec![message_type(
                "SensorViewConfiguration",
                vec![
                    message("version", 1, "InterfaceVersion"),
                    message("sensor_id", 2, "Identifier"),
                    scalar("field_of_view_horizontal", 4, Type::Double),
                    scalar("field_of_view_vertical", 5, Type::Double),
                    scalar("range", 6, Type::Double),
                    message("update_cycle_time", 7, "Timestamp"),
                ],
            )],
        ),
        proto_file(
            "osi_sensordata.proto",
            &[VERSION, COMMON, SENSOR_VIEW],
            vec![message_type("SensorData", {
                let mut fields = header_fields();
                fields.extend([
                    message("sensor_id", 5, "Identifier"),
                    repeated("sensor_view", 8, "SensorView"),
                    message("last_measurement_time", 9, "Timestamp"),
                ]);
                fields
            })],
        ),
        proto_file(
            "osi_hostvehicledata.proto",
            &[VERSION, COMMON],
            vec![message_type(
                "HostVehicleData",
                vec![
                    message("version", 3, "InterfaceVersion"),
                    message("timestamp", 4, "Timestamp"),
                    message("host_vehicle_id", 5, "Identifier"),
                ],
            )],
        ),
        proto_file(
            "osi_trafficcommand.proto",
            &[VERSION, COMMON],
            vec![message_type("TrafficCommand", {
                let mut fields = header_fields();
                fields.push(message("traffic_participant_id", 3, "Identifier"));
                fields
            })],
        ),
        proto_file(
            "osi_trafficcommandupdate.proto",
            &[VERSION, COMMON],
            vec![message_type("TrafficCommandUpdate", {
                let mut fields = header_fields();
                fields.push(message("traffic_participant_id", 3, "Identifier"));
                fields
            })],
        ),
        proto_file(
            "osi_trafficupdate.proto",
            &[VERSION, COMMON],
            vec![message_type("TrafficUpdate", header_fields())],
        ),
        proto_file(
            "osi_motionrequest.proto",
            &[VERSION, COMMON],
            vec![message_type("MotionRequest", header_fields())],
        ),
        proto_file(
            "osi_streamingupdate.proto",
            &[VERSION, COMMON],
            vec![message_type("StreamingUpdate", header_fields())],
        ),
    ];

    FileDescriptorSet { file: files }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_has_every_kind() {
        for kind in MessageKind::ALL {
            let descriptor = descriptor_for(kind).unwrap();
            assert_eq!(descriptor.full_name(), kind.schema_name());
        }
    }

    #[test]
    fn test_osi_version_string() {
        assert_eq!(osi_version_string(), "3.7.0");
    }

    #[test]
    fn test_unknown_kind_has_no_descriptor() {
        assert!(matches!(
            descriptor_for(MessageKind::Unknown),
            Err(TraceError::Schema(_))
        ));
    }

    #[test]
    fn test_dependency_closure_ground_truth() {
        let descriptor = descriptor_for(MessageKind::GroundTruth).unwrap();
        let names: Vec<_> = file_descriptor_set(&descriptor)
            .file
            .into_iter()
            .map(|f| f.name.unwrap_or_default())
            .collect();
        assert_eq!(
            names,
            vec!["osi_version.proto", "osi_common.proto", "osi_groundtruth.proto"]
        );
    }

    #[test]
    fn test_dependency_closure_visits_each_file_once() {
        // SensorData reaches osi_common.proto along several import paths.
        let descriptor = descriptor_for(MessageKind::SensorData).unwrap();
        let names: Vec<_> = file_descriptor_set(&descriptor)
            .file
            .into_iter()
            .map(|f| f.name.unwrap_or_default())
            .collect();
        assert_eq!(names.len(), 5);
        assert_eq!(names.last().map(String::as_str), Some("osi_sensordata.proto"));
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());

        let position = |n: &str| names.iter().position(|x| x == n).unwrap();
        assert!(position("osi_groundtruth.proto") < position("osi_sensorview.proto"));
        assert!(position("osi_common.proto") < position("osi_groundtruth.proto"));
    }

    #[test]
    fn test_encoded_set_rebuilds_pool() {
        let descriptor = descriptor_for(MessageKind::SensorView).unwrap();
        let bytes = encoded_file_descriptor_set(&descriptor);
        let decoded = FileDescriptorSet::decode(bytes.as_slice()).unwrap();
        let rebuilt = DescriptorPool::from_file_descriptor_set(decoded).unwrap();
        assert!(rebuilt.get_message_by_name("osi3.SensorView").is_some());
        assert!(rebuilt.get_message_by_name("osi3.GroundTruth").is_some());
        assert!(rebuilt.get_message_by_name("osi3.SensorData").is_none());
    }
}
