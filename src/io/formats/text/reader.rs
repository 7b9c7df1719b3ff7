// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Reader for text traces.

use std::any::Any;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, error};

use crate::core::{MessageKind, Result, TraceError};
use crate::io::message::{parsers, ReadResult, TextParser};
use crate::io::traits::TraceReader;
use crate::schema::text;

use super::{EXTENSION, FORMAT_TAG};

struct OpenTextTrace {
    path: String,
    reader: BufReader<File>,
    /// First line of the file; marks the start of every record.
    sentinel: String,
    /// Boundary line already consumed that starts the next record.
    pending: Option<String>,
    parser: TextParser,
}

impl OpenTextTrace {
    /// Read one line without its terminator, `None` at end of file.
    fn next_line(&mut self) -> Result<Option<String>> {
        read_line(&mut self.reader).map_err(line_error)
    }
}

fn line_error(err: std::io::Error) -> TraceError {
    if err.kind() == std::io::ErrorKind::InvalidData {
        TraceError::parse("TextTraceReader", format!("line is not valid UTF-8: {err}"))
    } else {
        TraceError::io("TextTraceReader", err)
    }
}

fn read_line(reader: &mut BufReader<File>) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}

/// Reader for `.txth` traces.
///
/// Records are canonical text dumps laid end to end. The first line of
/// the file is taken as the record delimiter: every later line equal to it
/// starts a new record. This holds as long as all records are of one kind
/// and print their fields in the same order.
#[derive(Default)]
pub struct TextTraceReader {
    source: Option<OpenTextTrace>,
    kind: MessageKind,
}

impl TextTraceReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// The record delimiter of the open trace.
    pub fn sentinel(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.sentinel.as_str())
    }

    fn open_with(&mut self, path: &Path, pinned: Option<MessageKind>) -> Result<()> {
        match Self::open_source(path, pinned) {
            Ok((source, kind)) => {
                debug!(
                    context = "TextTraceReader",
                    path = %source.path,
                    kind = %kind,
                    sentinel = %source.sentinel,
                    "Opened text trace"
                );
                self.source = Some(source);
                self.kind = kind;
                Ok(())
            }
            Err(e) => {
                error!(
                    context = "TextTraceReader",
                    path = %path.display(),
                    error = %e,
                    "Failed to open text trace"
                );
                Err(e)
            }
        }
    }

    fn open_source(path: &Path, pinned: Option<MessageKind>) -> Result<(OpenTextTrace, MessageKind)> {
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
            .text;

        let file = File::open(path).map_err(|e| TraceError::io("TextTraceReader", e))?;
        let mut reader = BufReader::new(file);
        let first = read_line(&mut reader).map_err(line_error)?;

        if let Some(line) = &first {
            if !text::starts_record(line, &kind.descriptor()?) {
                return Err(TraceError::non_conforming(
                    path_str,
                    FORMAT_TAG,
                    format!("first line '{line}' does not start a {kind} record"),
                ));
            }
        }

        Ok((
            OpenTextTrace {
                path: path_str,
                reader,
                sentinel: first.clone().unwrap_or_default(),
                pending: first,
                parser,
            },
            kind,
        ))
    }
}

impl TraceReader for TextTraceReader {
    fn open(&mut self, path: &Path) -> Result<()> {
        self.open_with(path, None)
    }

    fn open_as(&mut self, path: &Path, kind: MessageKind) -> Result<()> {
        self.open_with(path, Some(kind))
    }

    fn has_next(&mut self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|source| source.pending.is_some())
    }

    fn read_message(&mut self) -> Result<Option<ReadResult>> {
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };
        let Some(first) = source.pending.take() else {
            return Ok(None);
        };

        let mut record = first;
        record.push('\n');
        while let Some(line) = source.next_line()? {
            if line == source.sentinel {
                source.pending = Some(line);
                break;
            }
            record.push_str(&line);
            record.push('\n');
        }

        let message = (source.parser)(&record)?;
        Ok(Some(ReadResult::new(message, None)))
    }

    fn close(&mut self) {
        if let Some(source) = self.source.take() {
            debug!(context = "TextTraceReader", path = %source.path, "Closed text trace");
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
