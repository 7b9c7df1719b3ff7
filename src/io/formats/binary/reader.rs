// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Reader for length-prefixed binary traces.

use std::any::Any;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::{debug, error};

use crate::core::{MessageKind, Result, TraceError};
use crate::io::message::{parsers, BytesParser, ReadResult};
use crate::io::traits::TraceReader;

use super::{EXTENSION, FRAME_HEADER_LEN};

/// Initial payload allocation cap, so a corrupt length never reserves
/// gigabytes up front.
const MAX_PREALLOCATION: usize = 64 * 1024;

struct OpenBinaryTrace {
    path: String,
    reader: BufReader<File>,
    parser: BytesParser,
}

/// Reader for `.osi` traces.
///
/// Each record is a `u32` little-endian byte count followed by that many
/// bytes of compact protobuf. The kind is fixed for the whole file.
#[derive(Default)]
pub struct BinaryTraceReader {
    source: Option<OpenBinaryTrace>,
    kind: MessageKind,
}

impl BinaryTraceReader {
    pub fn new() -> Self {
        Self::default()
    }

    fn open_with(&mut self, path: &Path, pinned: Option<MessageKind>) -> Result<()> {
        let result = Self::open_source(path, pinned);
        match result {
            Ok((source, kind)) => {
                debug!(
                    context = "BinaryTraceReader",
                    path = %source.path,
                    kind = %kind,
                    "Opened binary trace"
                );
                self.source = Some(source);
                self.kind = kind;
                Ok(())
            }
            Err(e) => {
                error!(
                    context = "BinaryTraceReader",
                    path = %path.display(),
                    error = %e,
                    "Failed to open binary trace"
                );
                Err(e)
            }
        }
    }

    fn open_source(
        path: &Path,
        pinned: Option<MessageKind>,
    ) -> Result<(OpenBinaryTrace, MessageKind)> {
        let path_str = path.to_string_lossy().to_string();
        if !path_str.contains(EXTENSION) {
            return Err(TraceError::invalid_extension(path_str, EXTENSION));
        }
        if !path.exists() {
            return Err(TraceError::not_found(path_str));
        }
        let kind = MessageKind::resolve(path, pinned)?;
        let parser = parsers(kind)
            .ok_or_else(|| TraceError::Schema(format!("no parser for '{kind}'")))?
            .bytes;
        let file = File::open(path).map_err(|e| TraceError::io("BinaryTraceReader", e))?;

        Ok((
            OpenBinaryTrace {
                path: path_str,
                reader: BufReader::new(file),
                parser,
            },
            kind,
        ))
    }
}

impl TraceReader for BinaryTraceReader {
    fn open(&mut self, path: &Path) -> Result<()> {
        self.open_with(path, None)
    }

    fn open_as(&mut self, path: &Path, kind: MessageKind) -> Result<()> {
        self.open_with(path, Some(kind))
    }

    fn has_next(&mut self) -> bool {
        match self.source.as_mut() {
            Some(source) => matches!(source.reader.fill_buf(), Ok(buf) if !buf.is_empty()),
            None => false,
        }
    }

    fn read_message(&mut self) -> Result<Option<ReadResult>> {
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };

        let at_end = source
            .reader
            .fill_buf()
            .map_err(|e| TraceError::io("BinaryTraceReader", e))?
            .is_empty();
        if at_end {
            return Ok(None);
        }

        let len = source.reader.read_u32::<LittleEndian>().map_err(|e| {
            TraceError::parse(
                "BinaryTraceReader",
                format!("failed to read {FRAME_HEADER_LEN}-byte frame length: {e}"),
            )
        })? as usize;

        let mut payload = Vec::with_capacity(len.min(MAX_PREALLOCATION));
        source
            .reader
            .by_ref()
            .take(len as u64)
            .read_to_end(&mut payload)
            .map_err(|e| TraceError::io("BinaryTraceReader", e))?;
        if payload.len() != len {
            return Err(TraceError::parse(
                "BinaryTraceReader",
                format!(
                    "frame payload is short: expected {len} bytes, found {}",
                    payload.len()
                ),
            ));
        }

        let message = (source.parser)(&payload)?;
        Ok(Some(ReadResult::new(message, None)))
    }

    fn close(&mut self) {
        if let Some(source) = self.source.take() {
            debug!(
                context = "BinaryTraceReader",
                path = %source.path,
                "Closed binary trace"
            );
        }
    }

    fn message_kind(&self) -> MessageKind {
        self.kind
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
