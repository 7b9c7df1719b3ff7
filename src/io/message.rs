// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Typed records and the tagged read result.
//!
//! Readers hand out an [`OsiMessage`], a tagged sum over the ten top-level
//! record types, wrapped in a [`ReadResult`] that also carries the kind
//! and (for MCAP traces) the channel topic. Writers accept anything that
//! implements [`TopLevelMessage`], which covers both the typed records and
//! `OsiMessage` itself.

use prost::Message;
use prost_reflect::MessageDescriptor;

use crate::core::{MessageKind, Result, TraceError};
use crate::schema::osi3::{
    GroundTruth, HostVehicleData, MotionRequest, SensorData, SensorView, SensorViewConfiguration,
    StreamingUpdate, Timestamp, TrafficCommand, TrafficCommandUpdate, TrafficUpdate,
};
use crate::schema::text;

/// A typed top-level record with a statically known kind.
pub trait KindedMessage: Message + Default + Clone + Sized + 'static {
    /// Kind of this record type.
    const KIND: MessageKind;

    /// Simulation timestamp, if the type has one and it is set.
    fn timestamp(&self) -> Option<&Timestamp>;

    /// Wrap into the tagged sum.
    fn into_osi(self) -> OsiMessage;

    /// Borrow the typed record out of the tagged sum.
    fn from_osi(message: &OsiMessage) -> Option<&Self>;

    /// Take the typed record out of the tagged sum, or give it back.
    fn try_from_osi(message: OsiMessage) -> std::result::Result<Self, OsiMessage>;

    /// Reflection descriptor of this record type.
    fn descriptor() -> Result<MessageDescriptor> {
        Self::KIND.descriptor()
    }
}

/// Object-safe view of a record for writers.
pub trait TopLevelMessage {
    fn kind(&self) -> MessageKind;

    fn timestamp(&self) -> Option<&Timestamp>;

    /// Compact protobuf encoding of the record.
    fn encode_payload(&self) -> Vec<u8>;
}

impl<M: KindedMessage> TopLevelMessage for M {
    fn kind(&self) -> MessageKind {
        M::KIND
    }

    fn timestamp(&self) -> Option<&Timestamp> {
        KindedMessage::timestamp(self)
    }

    fn encode_payload(&self) -> Vec<u8> {
        self.encode_to_vec()
    }
}

macro_rules! osi_message {
    ($($kind:ident),+ $(,)?) => {
        /// Owned record of any top-level kind.
        #[derive(Debug, Clone, PartialEq)]
        pub enum OsiMessage {
            $($kind($kind),)+
        }

        impl OsiMessage {
            /// Kind discriminant of the wrapped record.
            pub fn kind(&self) -> MessageKind {
                match self {
                    $(OsiMessage::$kind(_) => MessageKind::$kind,)+
                }
            }

            /// Simulation timestamp of the wrapped record.
            pub fn timestamp(&self) -> Option<&Timestamp> {
                match self {
                    $(OsiMessage::$kind(m) => KindedMessage::timestamp(m),)+
                }
            }

            /// Compact protobuf encoding of the wrapped record.
            pub fn encode_to_vec(&self) -> Vec<u8> {
                match self {
                    $(OsiMessage::$kind(m) => m.encode_to_vec(),)+
                }
            }
        }

        $(
            impl From<$kind> for OsiMessage {
                fn from(message: $kind) -> Self {
                    OsiMessage::$kind(message)
                }
            }
        )+

        /// Parser functions for a kind, `None` for `Unknown`.
        pub fn parsers(kind: MessageKind) -> Option<Parsers> {
            match kind {
                MessageKind::Unknown => None,
                $(MessageKind::$kind => Some(Parsers {
                    bytes: parse_bytes::<$kind>,
                    text: parse_text::<$kind>,
                }),)+
            }
        }
    };
}

macro_rules! kinded_message {
    ($kind:ident) => {
        kinded_message!($kind, |m| m.timestamp.as_ref());
    };
    ($kind:ident, no_timestamp) => {
        kinded_message!($kind, |_m| None);
    };
    ($kind:ident, |$m:ident| $timestamp:expr) => {
        impl KindedMessage for $kind {
            const KIND: MessageKind = MessageKind::$kind;

            fn timestamp(&self) -> Option<&Timestamp> {
                let $m = self;
                $timestamp
            }

            fn into_osi(self) -> OsiMessage {
                OsiMessage::$kind(self)
            }

            fn from_osi(message: &OsiMessage) -> Option<&Self> {
                match message {
                    OsiMessage::$kind(m) => Some(m),
                    _ => None,
                }
            }

            fn try_from_osi(message: OsiMessage) -> std::result::Result<Self, OsiMessage> {
                match message {
                    OsiMessage::$kind(m) => Ok(m),
                    other => Err(other),
                }
            }
        }
    };
}

osi_message!(
    GroundTruth,
    SensorData,
    SensorView,
    SensorViewConfiguration,
    HostVehicleData,
    TrafficCommand,
    TrafficCommandUpdate,
    TrafficUpdate,
    MotionRequest,
    StreamingUpdate,
);

kinded_message!(GroundTruth);
kinded_message!(SensorData);
kinded_message!(SensorView);
kinded_message!(SensorViewConfiguration, no_timestamp);
kinded_message!(HostVehicleData);
kinded_message!(TrafficCommand);
kinded_message!(TrafficCommandUpdate);
kinded_message!(TrafficUpdate);
kinded_message!(MotionRequest);
kinded_message!(StreamingUpdate);

impl TopLevelMessage for OsiMessage {
    fn kind(&self) -> MessageKind {
        OsiMessage::kind(self)
    }

    fn timestamp(&self) -> Option<&Timestamp> {
        OsiMessage::timestamp(self)
    }

    fn encode_payload(&self) -> Vec<u8> {
        self.encode_to_vec()
    }
}

/// Parses compact bytes into a record.
pub type BytesParser = fn(&[u8]) -> Result<OsiMessage>;

/// Parses canonical text into a record.
pub type TextParser = fn(&str) -> Result<OsiMessage>;

/// Per-kind parser pair, bound by readers at open time.
#[derive(Clone, Copy)]
pub struct Parsers {
    pub bytes: BytesParser,
    pub text: TextParser,
}

impl std::fmt::Debug for Parsers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parsers").finish_non_exhaustive()
    }
}

fn parse_bytes<M: KindedMessage>(bytes: &[u8]) -> Result<OsiMessage> {
    M::decode(bytes)
        .map(M::into_osi)
        .map_err(|e| TraceError::parse(M::KIND.schema_name(), e.to_string()))
}

fn parse_text<M: KindedMessage>(input: &str) -> Result<OsiMessage> {
    text::parse::<M>(input, M::descriptor()?).map(M::into_osi)
}

/// One record handed out by a reader.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadResult {
    /// The parsed record.
    pub message: OsiMessage,
    /// Kind of `message`.
    pub kind: MessageKind,
    /// Channel topic, set only for MCAP traces.
    pub channel: Option<String>,
}

impl ReadResult {
    pub fn new(message: OsiMessage, channel: Option<String>) -> Self {
        let kind = message.kind();
        Self {
            message,
            kind,
            channel,
        }
    }

    /// Typed view of the record, `None` if `M` is not the stored kind.
    pub fn get<M: KindedMessage>(&self) -> Option<&M> {
        M::from_osi(&self.message)
    }

    /// Take the typed record out, `None` if `M` is not the stored kind.
    pub fn into_inner<M: KindedMessage>(self) -> Option<M> {
        M::try_from_osi(self.message).ok()
    }

    /// Timestamp of the record.
    pub fn timestamp(&self) -> Option<&Timestamp> {
        self.message.timestamp()
    }
}
