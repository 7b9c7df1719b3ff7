// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Writer for length-prefixed binary traces.

use std::any::Any;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::{debug, error, warn};

use crate::core::{Result, TraceError};
use crate::io::message::TopLevelMessage;
use crate::io::traits::TraceWriter;

use super::EXTENSION;

/// Writer for `.osi` traces.
#[derive(Default)]
pub struct BinaryTraceWriter {
    path: String,
    writer: Option<BufWriter<File>>,
    messages_written: u64,
}

impl BinaryTraceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the writer is open.
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }
}

impl TraceWriter for BinaryTraceWriter {
    fn open(&mut self, path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(EXTENSION) {
            let err = TraceError::invalid_extension(path_str, EXTENSION);
            error!(context = "BinaryTraceWriter", error = %err, "Failed to open binary trace");
            return Err(err);
        }
        self.close()?;

        let file = File::create(path).map_err(|e| {
            let err = TraceError::io("BinaryTraceWriter", e);
            error!(context = "BinaryTraceWriter", path = %path_str, error = %err, "Failed to create file");
            err
        })?;
        debug!(context = "BinaryTraceWriter", path = %path_str, "Opened binary trace");

        self.writer = Some(BufWriter::new(file));
        self.path = path_str;
        self.messages_written = 0;
        Ok(())
    }

    fn write_message(&mut self, message: &dyn TopLevelMessage, _topic: &str) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(TraceError::NotOpen {
            operation: "write message",
        })?;

        let payload = message.encode_payload();
        let len = u32::try_from(payload.len()).map_err(|_| {
            TraceError::InvalidArgument(format!(
                "{} record of {} bytes exceeds the frame size limit",
                message.kind(),
                payload.len()
            ))
        })?;

        writer
            .write_u32::<LittleEndian>(len)
            .and_then(|()| writer.write_all(&payload))
            .map_err(|e| {
                warn!(context = "BinaryTraceWriter", path = %self.path, error = %e, "Failed to write frame");
                TraceError::io("BinaryTraceWriter", e)
            })?;

        self.messages_written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .flush()
                .map_err(|e| TraceError::io("BinaryTraceWriter", e))?;
            debug!(
                context = "BinaryTraceWriter",
                path = %self.path,
                messages = self.messages_written,
                "Closed binary trace"
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

impl Drop for BinaryTraceWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(context = "BinaryTraceWriter", error = %e, "Failed to close binary trace on drop");
        }
    }
}
