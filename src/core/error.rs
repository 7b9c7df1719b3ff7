// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for osi-tracefile.
//!
//! Every fallible operation in the crate reports a [`TraceError`]:
//! - Open-time problems (missing file, wrong extension, unknown message kind)
//! - Parse problems (short frames, malformed text, unknown schemas)
//! - Write-time problems (closed writer, unregistered topic)
//! - Channel registry conflicts in MCAP traces
//! - Factory problems (unknown or unimplemented format tags)

use thiserror::Error;

/// Errors that can occur while reading or writing trace files.
#[derive(Debug, Clone, Error)]
pub enum TraceError {
    /// The trace file does not exist.
    #[error("The trace file '{path}' does not exist")]
    NotFound {
        /// Path that was requested
        path: String,
    },

    /// The file name does not carry the extension required by the codec.
    #[error("The trace file '{path}' must have a '{expected}' extension")]
    InvalidExtension {
        /// Path that was requested
        path: String,
        /// Required extension, including the leading dot
        expected: &'static str,
    },

    /// No message kind was supplied and none could be inferred.
    #[error(
        "Unable to determine the message type from the filename '{path}'. \
         Name the file with one of {accepted} or specify the message type explicitly"
    )]
    UnknownMessageKind {
        /// Path that was requested
        path: String,
        /// Comma separated list of accepted filename fragments
        accepted: String,
    },

    /// The file content does not look like a trace of the requested kind.
    #[error("The trace file '{path}' is not a valid {format} trace: {reason}")]
    NonConforming {
        /// Path that was requested
        path: String,
        /// Format tag (e.g. "txth")
        format: &'static str,
        /// What was wrong
        reason: String,
    },

    /// Parse error while reading a record.
    #[error("Parse error in {context}: {message}")]
    Parse {
        /// What was being parsed
        context: String,
        /// Error message
        message: String,
    },

    /// A container record uses a schema this crate cannot decode.
    #[error("Unsupported schema '{schema_name}' (encoding '{encoding}'). Only OSI3 protobuf is supported")]
    UnsupportedSchema {
        /// Schema name found in the container
        schema_name: String,
        /// Schema encoding found in the container
        encoding: String,
    },

    /// The reader or writer has not been opened.
    #[error("Cannot {operation}: the trace file is not open")]
    NotOpen {
        /// Operation that was attempted
        operation: &'static str,
    },

    /// A container write was attempted without a topic.
    #[error("Cannot write message: topic is empty")]
    EmptyTopic,

    /// A container write referenced a topic with no registered channel.
    #[error("Cannot write message: topic '{topic}' not found")]
    TopicNotRegistered {
        /// Topic name
        topic: String,
    },

    /// A record was written to a channel bound to a different schema.
    #[error("Cannot write {actual} message to topic '{topic}' which carries {expected}")]
    KindMismatch {
        /// Topic name
        topic: String,
        /// Schema bound to the topic
        expected: String,
        /// Schema of the record
        actual: String,
    },

    /// A topic was registered again with a different schema.
    #[error("Topic '{topic}' already exists with message type '{existing}', cannot register '{requested}'")]
    ChannelConflict {
        /// Topic name
        topic: String,
        /// Schema already bound to the topic
        existing: String,
        /// Schema requested by the caller
        requested: String,
    },

    /// The operation is not supported by this codec.
    #[error("Unsupported feature: '{feature}'")]
    Unsupported {
        /// What is not supported
        feature: String,
    },

    /// Invalid argument passed to a factory or parser.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A known format tag without an implementation.
    #[error("Format '{tag}' is not implemented")]
    Unimplemented {
        /// Format tag
        tag: String,
    },

    /// Schema layer error (descriptor pool construction, reflection).
    #[error("Schema error: {0}")]
    Schema(String),

    /// Error reported by the MCAP container library.
    #[error("MCAP error in {context}: {message}")]
    Container {
        /// Operation context
        context: String,
        /// Error message
        message: String,
    },

    /// I/O error.
    #[error("I/O error in {context}: {message}")]
    Io {
        /// Operation context
        context: String,
        /// Error message
        message: String,
    },
}

impl TraceError {
    /// Create a parse error.
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        TraceError::Parse {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a "file not found" error.
    pub fn not_found(path: impl Into<String>) -> Self {
        TraceError::NotFound { path: path.into() }
    }

    /// Create an invalid extension error.
    pub fn invalid_extension(path: impl Into<String>, expected: &'static str) -> Self {
        TraceError::InvalidExtension {
            path: path.into(),
            expected,
        }
    }

    /// Create a non-conforming content error.
    pub fn non_conforming(
        path: impl Into<String>,
        format: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        TraceError::NonConforming {
            path: path.into(),
            format,
            reason: reason.into(),
        }
    }

    /// Create an unsupported schema error.
    pub fn unsupported_schema(schema_name: impl Into<String>, encoding: impl Into<String>) -> Self {
        TraceError::UnsupportedSchema {
            schema_name: schema_name.into(),
            encoding: encoding.into(),
        }
    }

    /// Create an unsupported feature error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        TraceError::Unsupported {
            feature: feature.into(),
        }
    }

    /// Create a container library error.
    pub fn container(context: impl Into<String>, message: impl std::fmt::Display) -> Self {
        TraceError::Container {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, err: std::io::Error) -> Self {
        TraceError::Io {
            context: context.into(),
            message: err.to_string(),
        }
    }

    /// Check whether this error was raised while opening a file.
    pub fn is_open_error(&self) -> bool {
        matches!(
            self,
            TraceError::NotFound { .. }
                | TraceError::InvalidExtension { .. }
                | TraceError::UnknownMessageKind { .. }
                | TraceError::NonConforming { .. }
        )
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            TraceError::NotFound { path } => vec![("path", path.clone())],
            TraceError::InvalidExtension { path, expected } => {
                vec![("path", path.clone()), ("expected", expected.to_string())]
            }
            TraceError::UnknownMessageKind { path, accepted } => {
                vec![("path", path.clone()), ("accepted", accepted.clone())]
            }
            TraceError::NonConforming {
                path,
                format,
                reason,
            } => vec![
                ("path", path.clone()),
                ("format", format.to_string()),
                ("reason", reason.clone()),
            ],
            TraceError::Parse { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            TraceError::UnsupportedSchema {
                schema_name,
                encoding,
            } => vec![("schema", schema_name.clone()), ("encoding", encoding.clone())],
            TraceError::NotOpen { operation } => vec![("operation", operation.to_string())],
            TraceError::EmptyTopic => vec![("topic", String::new())],
            TraceError::TopicNotRegistered { topic } => vec![("topic", topic.clone())],
            TraceError::KindMismatch {
                topic,
                expected,
                actual,
            } => vec![
                ("topic", topic.clone()),
                ("expected", expected.clone()),
                ("actual", actual.clone()),
            ],
            TraceError::ChannelConflict {
                topic,
                existing,
                requested,
            } => vec![
                ("topic", topic.clone()),
                ("existing", existing.clone()),
                ("requested", requested.clone()),
            ],
            TraceError::Unsupported { feature } => vec![("feature", feature.clone())],
            TraceError::InvalidArgument(msg) => vec![("message", msg.clone())],
            TraceError::Unimplemented { tag } => vec![("tag", tag.clone())],
            TraceError::Schema(msg) => vec![("message", msg.clone())],
            TraceError::Container { context, message } | TraceError::Io { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
        }
    }
}

impl From<std::io::Error> for TraceError {
    fn from(err: std::io::Error) -> Self {
        TraceError::io("IO", err)
    }
}

/// Result type for osi-tracefile operations.
pub type Result<T> = std::result::Result<T, TraceError>;
