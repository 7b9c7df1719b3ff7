// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Canonical protobuf text form.
//!
//! Records are bridged through `prost_reflect::DynamicMessage`: printing
//! decodes the compact bytes against the descriptor, parsing goes the other
//! way and re-encodes so the typed record can be decoded.

use prost::Message;
use prost_reflect::text_format::FormatOptions;
use prost_reflect::{DynamicMessage, MessageDescriptor};

use crate::core::{Result, TraceError};

/// Print an encoded record in multi-line text form.
///
/// The output always ends with a newline, so printed records can be
/// concatenated and each one begins on a fresh line.
pub fn print_encoded(payload: &[u8], descriptor: MessageDescriptor) -> Result<String> {
    let name = descriptor.full_name().to_string();
    let message = DynamicMessage::decode(descriptor, payload)
        .map_err(|e| TraceError::parse(name, e.to_string()))?;

    let mut text = message.to_text_format_with_options(&FormatOptions::new().pretty(true));
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Print a typed record in multi-line text form.
pub fn print<M: Message>(message: &M, descriptor: MessageDescriptor) -> Result<String> {
    print_encoded(&message.encode_to_vec(), descriptor)
}

/// Parse text form into a typed record.
pub fn parse<M: Message + Default>(text: &str, descriptor: MessageDescriptor) -> Result<M> {
    let name = descriptor.full_name().to_string();
    let dynamic = DynamicMessage::parse_text_format(descriptor, text)
        .map_err(|e| TraceError::parse(name.clone(), e.to_string()))?;
    M::decode(dynamic.encode_to_vec().as_slice()).map_err(|e| TraceError::parse(name, e.to_string()))
}

/// Check whether `line` could start a text record of `descriptor`.
///
/// The leading identifier must name a top-level field. Blank lines,
/// comments (`#`) and extension names (`[`) are accepted as is.
pub fn starts_record(line: &str, descriptor: &MessageDescriptor) -> bool {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
        return true;
    }
    let ident: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    !ident.is_empty() && descriptor.get_field_by_name(&ident).is_some()
}
