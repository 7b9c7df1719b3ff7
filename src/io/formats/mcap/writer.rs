// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MCAP writer for OSI traces.
//!
//! Wraps `mcap::Writer` with the bookkeeping OSI traces need:
//!
//! - One schema record per OSI type, holding the serialized transitive
//!   `FileDescriptorSet` of that type
//! - One channel per topic, bound to exactly one schema
//! - `versions` and `creation_date` metadata blocks written on open
//! - Per-message log and publish time taken from the record timestamp

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use prost_reflect::MessageDescriptor;
use tracing::{debug, error, warn};

use crate::core::{Result, TraceError};
use crate::io::formats::mcap::constants::{
    CHANNEL_KEY_OSI_VERSION, CHANNEL_KEY_PROTOBUF_VERSION, CREATION_DATE_FORMAT,
    MESSAGE_ENCODING, METADATA_CREATION_DATE, METADATA_KEY_OSI, METADATA_KEY_TIMESTAMP,
    METADATA_VERSIONS, PROFILE, PROTOBUF_VERSION, SCHEMA_ENCODING,
};
use crate::io::message::TopLevelMessage;
use crate::io::traits::TraceWriter;
use crate::schema::descriptor::{encoded_file_descriptor_set, osi_version_string};

/// Registered schema.
#[derive(Debug, Clone)]
struct SchemaRecord {
    id: u16,
    name: String,
}

/// Registered channel.
#[derive(Debug, Clone)]
struct ChannelRecord {
    id: u16,
    schema_name: String,
    /// Sequence number of the next message on this channel
    sequence: u32,
}

/// Writer for `.mcap` traces.
///
/// Channels must be registered with [`TraceWriter::add_channel`] before
/// records are written to their topic.
#[derive(Default)]
pub struct McapTraceWriter {
    path: String,
    writer: Option<mcap::Writer<BufWriter<File>>>,
    schemas: Vec<SchemaRecord>,
    channels: HashMap<String, ChannelRecord>,
    messages_written: u64,
}

impl McapTraceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the writer is open.
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Channel ID registered for `topic`.
    pub fn channel_id(&self, topic: &str) -> Option<u16> {
        self.channels.get(topic).map(|c| c.id)
    }

    /// Number of registered channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of registered schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    fn writer_mut(&mut self, operation: &'static str) -> Result<&mut mcap::Writer<BufWriter<File>>> {
        self.writer.as_mut().ok_or(TraceError::NotOpen { operation })
    }

    fn create(path: &Path) -> Result<mcap::Writer<BufWriter<File>>> {
        let file = File::create(path).map_err(|e| TraceError::io("McapTraceWriter", e))?;
        let mut writer = mcap::WriteOptions::new()
            .profile(PROFILE)
            .create(BufWriter::new(file))
            .map_err(|e| TraceError::container("McapTraceWriter::open", e))?;

        let versions = BTreeMap::from([(METADATA_KEY_OSI.to_string(), osi_version_string())]);
        let creation_date = BTreeMap::from([(
            METADATA_KEY_TIMESTAMP.to_string(),
            current_time_string(),
        )]);
        for (name, metadata) in [
            (METADATA_VERSIONS, versions),
            (METADATA_CREATION_DATE, creation_date),
        ] {
            writer
                .write_metadata(&mcap::records::Metadata {
                    name: name.to_string(),
                    metadata,
                })
                .map_err(|e| TraceError::container("McapTraceWriter::open", e))?;
        }
        Ok(writer)
    }

    /// Find or register the schema for `descriptor`.
    fn schema_id(&mut self, descriptor: &MessageDescriptor) -> Result<u16> {
        let name = descriptor.full_name();
        if let Some(schema) = self.schemas.iter().find(|s| s.name == name) {
            return Ok(schema.id);
        }

        let data = encoded_file_descriptor_set(descriptor);
        let id = self
            .writer_mut("add schema")?
            .add_schema(name, SCHEMA_ENCODING, &data)
            .map_err(|e| TraceError::container("McapTraceWriter::add_schema", e))?;
        debug!(
            context = "McapTraceWriter",
            schema = name,
            id,
            bytes = data.len(),
            "Registered schema"
        );
        self.schemas.push(SchemaRecord {
            id,
            name: name.to_string(),
        });
        Ok(id)
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn current_time_string() -> String {
    chrono::Utc::now().format(CREATION_DATE_FORMAT).to_string()
}

impl TraceWriter for McapTraceWriter {
    fn open(&mut self, path: &Path) -> Result<()> {
        self.close()?;
        let path_str = path.to_string_lossy().to_string();

        let writer = Self::create(path).map_err(|e| {
            error!(context = "McapTraceWriter", path = %path_str, error = %e, "Failed to open MCAP trace");
            e
        })?;
        debug!(context = "McapTraceWriter", path = %path_str, "Opened MCAP trace");

        self.writer = Some(writer);
        self.path = path_str;
        self.schemas.clear();
        self.channels.clear();
        self.messages_written = 0;
        Ok(())
    }

    fn write_message(&mut self, message: &dyn TopLevelMessage, topic: &str) -> Result<()> {
        if topic.is_empty() {
            warn!(context = "McapTraceWriter", "Cannot write message: topic is empty");
            return Err(TraceError::EmptyTopic);
        }
        if self.writer.is_none() {
            return Err(TraceError::NotOpen {
                operation: "write message",
            });
        }

        let channel = self
            .channels
            .get_mut(topic)
            .ok_or_else(|| TraceError::TopicNotRegistered {
                topic: topic.to_string(),
            })?;
        let kind = message.kind();
        if channel.schema_name != kind.schema_name() {
            return Err(TraceError::KindMismatch {
                topic: topic.to_string(),
                expected: channel.schema_name.clone(),
                actual: kind.schema_name().to_string(),
            });
        }

        let time = message.timestamp().map(|t| t.as_nanos()).unwrap_or(0);
        let header = mcap::records::MessageHeader {
            channel_id: channel.id,
            sequence: channel.sequence,
            log_time: time,
            publish_time: time,
        };
        channel.sequence = channel.sequence.wrapping_add(1);

        let payload = message.encode_payload();
        self.writer_mut("write message")?
            .write_to_known_channel(&header, &payload)
            .map_err(|e| {
                warn!(context = "McapTraceWriter", topic, error = %e, "Failed to write message");
                TraceError::container("McapTraceWriter::write_message", e)
            })?;

        self.messages_written += 1;
        Ok(())
    }

    fn add_channel(
        &mut self,
        topic: &str,
        descriptor: &MessageDescriptor,
        mut metadata: BTreeMap<String, String>,
    ) -> Result<u16> {
        if topic.is_empty() {
            return Err(TraceError::EmptyTopic);
        }
        self.writer_mut("add channel")?;

        if let Some(existing) = self.channels.get(topic) {
            if existing.schema_name == descriptor.full_name() {
                warn!(
                    context = "McapTraceWriter",
                    topic,
                    schema = descriptor.full_name(),
                    "Topic already registered with this message type, reusing channel"
                );
                return Ok(existing.id);
            }
            return Err(TraceError::ChannelConflict {
                topic: topic.to_string(),
                existing: existing.schema_name.clone(),
                requested: descriptor.full_name().to_string(),
            });
        }

        let schema_id = self.schema_id(descriptor)?;
        metadata.insert(CHANNEL_KEY_OSI_VERSION.to_string(), osi_version_string());
        metadata.insert(
            CHANNEL_KEY_PROTOBUF_VERSION.to_string(),
            PROTOBUF_VERSION.to_string(),
        );

        let id = self
            .writer_mut("add channel")?
            .add_channel(schema_id, topic, MESSAGE_ENCODING, &metadata)
            .map_err(|e| TraceError::container("McapTraceWriter::add_channel", e))?;
        debug!(
            context = "McapTraceWriter",
            topic,
            schema = descriptor.full_name(),
            id,
            "Registered channel"
        );

        self.channels.insert(
            topic.to_string(),
            ChannelRecord {
                id,
                schema_name: descriptor.full_name().to_string(),
                sequence: 0,
            },
        );
        Ok(id)
    }

    fn set_metadata(&mut self, name: &str, metadata: &BTreeMap<String, String>) -> Result<()> {
        self.writer_mut("write metadata")?
            .write_metadata(&mcap::records::Metadata {
                name: name.to_string(),
                metadata: metadata.clone(),
            })
            .map_err(|e| TraceError::container("McapTraceWriter::set_metadata", e))
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .finish()
                .map(|_| ())
                .map_err(|e| TraceError::container("McapTraceWriter::close", e))?;
            debug!(
                context = "McapTraceWriter",
                path = %self.path,
                messages = self.messages_written,
                channels = self.channels.len(),
                "Closed MCAP trace"
            );
        }
        Ok(())
    }

    fn messages_written(&self) -> u64 {
        self.messages_written
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Drop for McapTraceWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(context = "McapTraceWriter", error = %e, "Failed to close MCAP trace on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MessageKind;
    use crate::schema::osi3::{GroundTruth, SensorView, Timestamp};

    fn open_writer(dir: &tempfile::TempDir) -> McapTraceWriter {
        let mut writer = McapTraceWriter::new();
        writer.open(&dir.path().join("test.mcap")).unwrap();
        writer
    }

    #[test]
    fn test_current_time_string_format() {
        let s = current_time_string();
        // 2026-01-01T12:34:56.789Z
        assert_eq!(s.len(), 24);
        assert_eq!(&s[4..5], "-");
        assert_eq!(&s[10..11], "T");
        assert_eq!(&s[19..20], ".");
        assert!(s.ends_with('Z'));
    }

    #[test]
    fn test_add_channel_same_schema_returns_existing_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = open_writer(&dir);
        let descriptor = MessageKind::GroundTruth.descriptor().unwrap();

        let first = writer
            .add_channel("/gt", &descriptor, BTreeMap::new())
            .unwrap();
        let second = writer
            .add_channel("/gt", &descriptor, BTreeMap::new())
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(writer.channel_count(), 1);
        assert_eq!(writer.schema_count(), 1);
    }

    #[test]
    fn test_add_channel_conflicting_schema_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = open_writer(&dir);
        let gt = MessageKind::GroundTruth.descriptor().unwrap();
        let sv = MessageKind::SensorView.descriptor().unwrap();

        writer.add_channel("/gt", &gt, BTreeMap::new()).unwrap();
        let err = writer.add_channel("/gt", &sv, BTreeMap::new()).unwrap_err();
        assert!(matches!(err, TraceError::ChannelConflict { .. }));
        assert_eq!(writer.channel_count(), 1);
    }

    #[test]
    fn test_schema_shared_between_topics() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = open_writer(&dir);
        let gt = MessageKind::GroundTruth.descriptor().unwrap();

        let a = writer.add_channel("/a", &gt, BTreeMap::new()).unwrap();
        let b = writer.add_channel("/b", &gt, BTreeMap::new()).unwrap();
        assert_ne!(a, b);
        assert_eq!(writer.schema_count(), 1);
        assert_eq!(writer.channel_id("/b"), Some(b));
    }

    #[test]
    fn test_write_requires_topic() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = open_writer(&dir);
        let gt = GroundTruth::default();

        assert!(matches!(
            writer.write_message(&gt, ""),
            Err(TraceError::EmptyTopic)
        ));
        assert!(matches!(
            writer.write_message(&gt, "/missing"),
            Err(TraceError::TopicNotRegistered { .. })
        ));
        assert_eq!(writer.messages_written(), 0);
    }

    #[test]
    fn test_write_kind_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = open_writer(&dir);
        let gt = MessageKind::GroundTruth.descriptor().unwrap();
        writer.add_channel("/gt", &gt, BTreeMap::new()).unwrap();

        let sv = SensorView {
            timestamp: Some(Timestamp::new(1, 0)),
            ..Default::default()
        };
        assert!(matches!(
            writer.write_message(&sv, "/gt"),
            Err(TraceError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_closed_writer() {
        let mut writer = McapTraceWriter::new();
        let descriptor = MessageKind::GroundTruth.descriptor().unwrap();
        assert!(matches!(
            writer.add_channel("/gt", &descriptor, BTreeMap::new()),
            Err(TraceError::NotOpen { .. })
        ));
        assert!(matches!(
            writer.write_message(&GroundTruth::default(), "/gt"),
            Err(TraceError::NotOpen { .. })
        ));
        assert!(matches!(
            writer.set_metadata("extra", &BTreeMap::new()),
            Err(TraceError::NotOpen { .. })
        ));
        writer.close().unwrap();
    }
}
