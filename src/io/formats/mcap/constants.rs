// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MCAP constants for OSI traces.
//!
//! Magic bytes as defined by the [MCAP specification](https://mcap.dev/spec),
//! plus the profile, encodings and metadata keys every OSI trace uses.

/// MCAP file magic bytes (at start and end of file).
pub const MCAP_MAGIC: [u8; 8] = [0x89, 0x4D, 0x43, 0x41, 0x50, 0x30, 0x0D, 0x0A];

/// Writer profile.
pub const PROFILE: &str = "protobuf";

/// Encoding of schema records (serialized `FileDescriptorSet`).
pub const SCHEMA_ENCODING: &str = "protobuf";

/// Encoding of message records.
pub const MESSAGE_ENCODING: &str = "protobuf";

/// Version of the protobuf runtime recorded in channel metadata.
pub const PROTOBUF_VERSION: &str = "0.13";

/// Library-level metadata block holding the OSI version.
pub const METADATA_VERSIONS: &str = "versions";
/// Key of the OSI version in the `versions` block.
pub const METADATA_KEY_OSI: &str = "osi";

/// Library-level metadata block holding the creation time.
pub const METADATA_CREATION_DATE: &str = "creation_date";
/// Key of the creation time in the `creation_date` block.
pub const METADATA_KEY_TIMESTAMP: &str = "timestamp";

/// Channel metadata key for the OSI version.
pub const CHANNEL_KEY_OSI_VERSION: &str = "osi_version";
/// Channel metadata key for the protobuf runtime version.
pub const CHANNEL_KEY_PROTOBUF_VERSION: &str = "protobuf_version";

/// `strftime` pattern of the `creation_date` timestamp.
pub const CREATION_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
