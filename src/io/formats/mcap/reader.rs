// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MCAP reader for OSI traces.
//!
//! The file is memory-mapped and fed to the mcap crate's sans-io
//! `LinearReader` on demand, so records are decoded one at a time in
//! storage order. Schema and channel records are catalogued as they pass;
//! each message is copied out as an owned entry before it is handed on.
//! Metadata records are collected in the same pass.

use std::any::Any;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use mcap::records::Record;
use mcap::sans_io::{LinearReadEvent, LinearReader};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::core::{MessageKind, Result, TraceError, SCHEMA_PREFIX};
use crate::io::formats::mcap::constants::{MCAP_MAGIC, SCHEMA_ENCODING};
use crate::io::message::{parsers, ReadResult};
use crate::io::traits::TraceReader;

/// Options for [`McapTraceReader`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct McapReaderOptions {
    /// Skip records whose schema is not an OSI protobuf schema instead of
    /// failing on them.
    pub skip_non_osi_messages: bool,
}

impl McapReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether non-OSI records are skipped.
    pub fn with_skip_non_osi_messages(mut self, skip: bool) -> Self {
        self.skip_non_osi_messages = skip;
        self
    }
}

/// Named metadata block of an MCAP file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McapMetadata {
    pub name: String,
    pub metadata: BTreeMap<String, String>,
}

/// OSI kind for a schema, `None` unless it is a protobuf `osi3.*` schema.
fn osi_kind(schema_name: &str, schema_encoding: &str) -> Option<MessageKind> {
    if schema_encoding != SCHEMA_ENCODING || !schema_name.starts_with(SCHEMA_PREFIX) {
        return None;
    }
    MessageKind::from_schema_name(schema_name)
}

/// One message record, copied out of the map.
#[derive(Debug, Clone)]
struct McapEntry {
    topic: String,
    schema_name: String,
    schema_encoding: String,
    data: Vec<u8>,
}

impl McapEntry {
    /// OSI kind of this record, `None` for non-OSI schemas.
    fn osi_kind(&self) -> Option<MessageKind> {
        osi_kind(&self.schema_name, &self.schema_encoding)
    }
}

#[derive(Debug)]
struct SchemaInfo {
    name: String,
    encoding: String,
}

#[derive(Debug)]
struct ChannelInfo {
    topic: String,
    schema_id: u16,
}

struct OpenMcapTrace {
    path: String,
    mmap: memmap2::Mmap,
    /// Bytes of `mmap` already handed to `reader`.
    offset: usize,
    reader: LinearReader,
    schemas: BTreeMap<u16, SchemaInfo>,
    channels: BTreeMap<u16, ChannelInfo>,
    metadata: Vec<McapMetadata>,
    /// One entry of look-ahead.
    pending: Option<Result<McapEntry>>,
    finished: bool,
    kind: MessageKind,
}

impl OpenMcapTrace {
    /// Decode records until the next message, `None` at the end of the
    /// file. The first error ends the stream.
    fn next_entry(&mut self) -> Option<Result<McapEntry>> {
        if self.finished {
            return None;
        }
        while let Some(event) = self.reader.next_event() {
            match event {
                Ok(LinearReadEvent::ReadRequest(need)) => {
                    let start = self.offset;
                    let end = start.saturating_add(need).min(self.mmap.len());
                    let n = end - start;
                    self.reader
                        .insert(n)
                        .copy_from_slice(&self.mmap[start..end]);
                    // Zero bytes tells the reader it is at the end of the file.
                    self.reader.notify_read(n);
                    self.offset = end;
                }
                Ok(LinearReadEvent::Record { data, opcode }) => {
                    let step = mcap::parse_record(opcode, data)
                        .map_err(|e| TraceError::container("McapTraceReader::read", e))
                        .and_then(|record| {
                            catalog(
                                &mut self.schemas,
                                &mut self.channels,
                                &mut self.metadata,
                                record,
                            )
                        });
                    match step {
                        Ok(Some(entry)) => return Some(Ok(entry)),
                        Ok(None) => {}
                        Err(e) => {
                            self.finished = true;
                            return Some(Err(e));
                        }
                    }
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(TraceError::container("McapTraceReader::read", e)));
                }
            }
        }
        self.finished = true;
        None
    }

    /// Make sure one entry is pending, dropping non-OSI entries when
    /// `skip` is set. Returns whether an entry (or error) is pending.
    fn fill(&mut self, skip: bool) -> bool {
        loop {
            let entry = match self.pending.take().or_else(|| self.next_entry()) {
                Some(Ok(entry)) => entry,
                other => {
                    let ready = other.is_some();
                    self.pending = other;
                    return ready;
                }
            };
            if skip && entry.osi_kind().is_none() {
                warn!(
                    context = "McapTraceReader",
                    topic = %entry.topic,
                    schema = %entry.schema_name,
                    encoding = %entry.schema_encoding,
                    "Skipping non-OSI message"
                );
                continue;
            }
            self.pending = Some(Ok(entry));
            return true;
        }
    }

    /// Kind of the lowest-id channel bound to an OSI schema.
    fn channel_kind(&self) -> Option<MessageKind> {
        self.channels.values().find_map(|channel| {
            let schema = self.schemas.get(&channel.schema_id)?;
            osi_kind(&schema.name, &schema.encoding)
        })
    }
}

/// Record one decoded record. Messages come back as owned entries.
fn catalog(
    schemas: &mut BTreeMap<u16, SchemaInfo>,
    channels: &mut BTreeMap<u16, ChannelInfo>,
    metadata: &mut Vec<McapMetadata>,
    record: Record<'_>,
) -> Result<Option<McapEntry>> {
    match record {
        Record::Schema { header, .. } => {
            schemas.insert(
                header.id,
                SchemaInfo {
                    name: header.name,
                    encoding: header.encoding,
                },
            );
        }
        Record::Channel(channel) => {
            channels.insert(
                channel.id,
                ChannelInfo {
                    topic: channel.topic,
                    schema_id: channel.schema_id,
                },
            );
        }
        Record::Metadata(m) => metadata.push(McapMetadata {
            name: m.name,
            metadata: m.metadata,
        }),
        Record::Message { header, data } => {
            let channel = channels.get(&header.channel_id).ok_or_else(|| {
                TraceError::container(
                    "McapTraceReader::read",
                    format!("message on unknown channel {}", header.channel_id),
                )
            })?;
            // Schema id 0 means the channel has no schema.
            let schema = schemas.get(&channel.schema_id);
            return Ok(Some(McapEntry {
                topic: channel.topic.clone(),
                schema_name: schema.map(|s| s.name.clone()).unwrap_or_default(),
                schema_encoding: schema.map(|s| s.encoding.clone()).unwrap_or_default(),
                data: data.into_owned(),
            }));
        }
        _ => {}
    }
    Ok(None)
}

/// Reader for `.mcap` traces.
///
/// Records are yielded in storage order with the channel topic attached.
/// The record kind comes from each channel's schema name.
#[derive(Default)]
pub struct McapTraceReader {
    options: McapReaderOptions,
    source: Option<OpenMcapTrace>,
}

impl McapTraceReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: McapReaderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Skip records with non-OSI schemas instead of failing on them.
    ///
    /// Records already skipped while opening stay skipped.
    pub fn set_skip_non_osi_messages(&mut self, skip: bool) {
        self.options.skip_non_osi_messages = skip;
    }

    pub fn options(&self) -> &McapReaderOptions {
        &self.options
    }

    /// Metadata blocks read so far, in storage order.
    ///
    /// Blocks written before the first message are available right after
    /// open; the rest appear as reading passes them and are complete once
    /// the reader is exhausted.
    pub fn metadata(&self) -> &[McapMetadata] {
        self.source
            .as_ref()
            .map(|s| s.metadata.as_slice())
            .unwrap_or(&[])
    }

    fn open_with(&mut self, path: &Path, pinned: MessageKind) -> Result<()> {
        match Self::open_source(path, pinned, self.options.skip_non_osi_messages) {
            Ok(source) => {
                debug!(
                    context = "McapTraceReader",
                    path = %source.path,
                    kind = %source.kind,
                    channels = source.channels.len(),
                    "Opened MCAP trace"
                );
                self.source = Some(source);
                Ok(())
            }
            Err(e) => {
                error!(
                    context = "McapTraceReader",
                    path = %path.display(),
                    error = %e,
                    "Failed to open MCAP trace"
                );
                Err(e)
            }
        }
    }

    fn open_source(path: &Path, pinned: MessageKind, skip: bool) -> Result<OpenMcapTrace> {
        let path_str = path.to_string_lossy().to_string();
        if !path.exists() {
            return Err(TraceError::not_found(path_str));
        }

        let file = File::open(path).map_err(|e| TraceError::io("McapTraceReader", e))?;
        // SAFETY: the map is read-only and the file is not modified while
        // the reader holds it.
        let mmap = unsafe { memmap2::Mmap::map(&file) }
            .map_err(|e| TraceError::io("McapTraceReader", e))?;
        if !mmap.starts_with(&MCAP_MAGIC) {
            return Err(TraceError::container(
                "McapTraceReader::open",
                "missing MCAP magic",
            ));
        }

        let mut source = OpenMcapTrace {
            path: path_str,
            mmap,
            offset: 0,
            reader: LinearReader::new(),
            schemas: BTreeMap::new(),
            channels: BTreeMap::new(),
            metadata: Vec::new(),
            pending: None,
            finished: false,
            kind: pinned,
        };

        // Look ahead to the first message so leading metadata is visible.
        source.fill(skip);
        if source.kind.is_known() {
            return Ok(source);
        }

        let first = match &source.pending {
            Some(Ok(entry)) => entry.osi_kind(),
            _ => None,
        };
        source.kind = first
            .or_else(|| source.channel_kind())
            .unwrap_or_default();
        if source.kind.is_known() {
            return Ok(source);
        }

        Err(match source.pending.take() {
            Some(Err(e)) => e,
            _ => TraceError::non_conforming(
                source.path,
                "mcap",
                "no OSI channel or message found; specify the message type explicitly",
            ),
        })
    }
}

impl TraceReader for McapTraceReader {
    fn open(&mut self, path: &Path) -> Result<()> {
        self.open_with(path, MessageKind::Unknown)
    }

    fn open_as(&mut self, path: &Path, kind: MessageKind) -> Result<()> {
        self.open_with(path, kind)
    }

    fn has_next(&mut self) -> bool {
        let skip = self.options.skip_non_osi_messages;
        self.source.as_mut().is_some_and(|source| source.fill(skip))
    }

    fn read_message(&mut self) -> Result<Option<ReadResult>> {
        let skip = self.options.skip_non_osi_messages;
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };
        if !source.fill(skip) {
            return Ok(None);
        }
        let Some(entry) = source.pending.take() else {
            return Ok(None);
        };
        let entry = entry?;

        let kind = entry.osi_kind().ok_or_else(|| {
            TraceError::unsupported_schema(&entry.schema_name, &entry.schema_encoding)
        })?;
        let parser = parsers(kind)
            .ok_or_else(|| TraceError::Schema(format!("no parser for '{kind}'")))?
            .bytes;

        let message = parser(&entry.data)?;
        Ok(Some(ReadResult::new(message, Some(entry.topic))))
    }

    fn close(&mut self) {
        if let Some(source) = self.source.take() {
            debug!(context = "McapTraceReader", path = %source.path, "Closed MCAP trace");
        }
    }

    /// The pinned kind, else the kind of the first OSI message, else the
    /// kind of the lowest-id OSI channel.
    fn message_kind(&self) -> MessageKind {
        self.source.as_ref().map(|s| s.kind).unwrap_or_default()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
