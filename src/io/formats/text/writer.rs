// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Writer for text traces.

use std::any::Any;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, error, warn};

use crate::core::{Result, TraceError};
use crate::io::message::TopLevelMessage;
use crate::io::traits::TraceWriter;
use crate::schema::text;

use super::EXTENSION;

/// Writer for `.txth` traces.
///
/// Records are printed in canonical text form and appended without
/// separators.
#[derive(Default)]
pub struct TextTraceWriter {
    path: String,
    writer: Option<BufWriter<File>>,
    messages_written: u64,
}

impl TextTraceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the writer is open.
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }
}

impl TraceWriter for TextTraceWriter {
    fn open(&mut self, path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(EXTENSION) {
            let err = TraceError::invalid_extension(path_str, EXTENSION);
            error!(context = "TextTraceWriter", error = %err, "Failed to open text trace");
            return Err(err);
        }
        self.close()?;

        let file = File::create(path).map_err(|e| {
            let err = TraceError::io("TextTraceWriter", e);
            error!(context = "TextTraceWriter", path = %path_str, error = %err, "Failed to create file");
            err
        })?;
        debug!(context = "TextTraceWriter", path = %path_str, "Opened text trace");

        self.writer = Some(BufWriter::new(file));
        self.path = path_str;
        self.messages_written = 0;
        Ok(())
    }

    fn write_message(&mut self, message: &dyn TopLevelMessage, _topic: &str) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(TraceError::NotOpen {
            operation: "write message",
        })?;

        let printed = text::print_encoded(&message.encode_payload(), message.kind().descriptor()?)?;
        writer.write_all(printed.as_bytes()).map_err(|e| {
            warn!(context = "TextTraceWriter", path = %self.path, error = %e, "Failed to write record");
            TraceError::io("TextTraceWriter", e)
        })?;

        self.messages_written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .flush()
                .map_err(|e| TraceError::io("TextTraceWriter", e))?;
            debug!(
                context = "TextTraceWriter",
                path = %self.path,
                messages = self.messages_written,
                "Closed text trace"
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

impl Drop for TextTraceWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(context = "TextTraceWriter", error = %e, "Failed to close text trace on drop");
        }
    }
}
