// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! OSI 3 record types.
//!
//! A trimmed subset of the OSI interface: the version, timestamp and
//! identifying fields of every top-level message. Field names, numbers and
//! types match the descriptors in [`super::descriptor`], so the typed
//! records and the reflection layer agree on the wire form.

/// Interface version of the OSI schema a record was produced with.
#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct InterfaceVersion {
    #[prost(uint32, tag = "1")]
    pub version_major: u32,
    #[prost(uint32, tag = "2")]
    pub version_minor: u32,
    #[prost(uint32, tag = "3")]
    pub version_patch: u32,
}

/// Simulation time as seconds and nanoseconds.
#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct Timestamp {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(uint32, tag = "2")]
    pub nanos: u32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Total nanoseconds, saturating at `u64::MAX` and clamped to zero
    /// for negative times.
    pub fn as_nanos(&self) -> u64 {
        if self.seconds < 0 {
            return 0;
        }
        (self.seconds as u64)
            .saturating_mul(1_000_000_000)
            .saturating_add(u64::from(self.nanos))
    }
}

/// Unique object identifier.
#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct Identifier {
    #[prost(uint64, tag = "1")]
    pub value: u64,
}

impl Identifier {
    pub fn new(value: u64) -> Self {
        Self { value }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GroundTruth {
    #[prost(message, optional, tag = "1")]
    pub version: Option<InterfaceVersion>,
    #[prost(message, optional, tag = "2")]
    pub timestamp: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    pub host_vehicle_id: Option<Identifier>,
    /// ISO 3166-1 numeric country code.
    #[prost(uint32, tag = "13")]
    pub country_code: u32,
    #[prost(string, tag = "14")]
    pub proj_string: String,
    #[prost(string, tag = "15")]
    pub map_reference: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SensorView {
    #[prost(message, optional, tag = "1")]
    pub version: Option<InterfaceVersion>,
    #[prost(message, optional, tag = "2")]
    pub timestamp: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    pub sensor_id: Option<Identifier>,
    #[prost(message, optional, tag = "7")]
    pub global_ground_truth: Option<GroundTruth>,
    #[prost(message, optional, tag = "8")]
    pub host_vehicle_id: Option<Identifier>,
}

/// Static sensor setup. Carries no timestamp.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SensorViewConfiguration {
    #[prost(message, optional, tag = "1")]
    pub version: Option<InterfaceVersion>,
    #[prost(message, optional, tag = "2")]
    pub sensor_id: Option<Identifier>,
    #[prost(double, tag = "4")]
    pub field_of_view_horizontal: f64,
    #[prost(double, tag = "5")]
    pub field_of_view_vertical: f64,
    #[prost(double, tag = "6")]
    pub range: f64,
    #[prost(message, optional, tag = "7")]
    pub update_cycle_time: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SensorData {
    #[prost(message, optional, tag = "1")]
    pub version: Option<InterfaceVersion>,
    #[prost(message, optional, tag = "2")]
    pub timestamp: Option<Timestamp>,
    #[prost(message, optional, tag = "5")]
    pub sensor_id: Option<Identifier>,
    #[prost(message, repeated, tag = "8")]
    pub sensor_view: Vec<SensorView>,
    #[prost(message, optional, tag = "9")]
    pub last_measurement_time: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HostVehicleData {
    #[prost(message, optional, tag = "3")]
    pub version: Option<InterfaceVersion>,
    #[prost(message, optional, tag = "4")]
    pub timestamp: Option<Timestamp>,
    #[prost(message, optional, tag = "5")]
    pub host_vehicle_id: Option<Identifier>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TrafficCommand {
    #[prost(message, optional, tag = "1")]
    pub version: Option<InterfaceVersion>,
    #[prost(message, optional, tag = "2")]
    pub timestamp: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    pub traffic_participant_id: Option<Identifier>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TrafficCommandUpdate {
    #[prost(message, optional, tag = "1")]
    pub version: Option<InterfaceVersion>,
    #[prost(message, optional, tag = "2")]
    pub timestamp: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    pub traffic_participant_id: Option<Identifier>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TrafficUpdate {
    #[prost(message, optional, tag = "1")]
    pub version: Option<InterfaceVersion>,
    #[prost(message, optional, tag = "2")]
    pub timestamp: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MotionRequest {
    #[prost(message, optional, tag = "1")]
    pub version: Option<InterfaceVersion>,
    #[prost(message, optional, tag = "2")]
    pub timestamp: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StreamingUpdate {
    #[prost(message, optional, tag = "1")]
    pub version: Option<InterfaceVersion>,
    #[prost(message, optional, tag = "2")]
    pub timestamp: Option<Timestamp>,
}
