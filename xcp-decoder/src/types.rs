//! Core types for the XCP decoder library
//!
//! This module defines the frames the dissector consumes and the messages it
//! emits. Dissection never fails: every frame produces exactly one
//! [`DecodedMessage`]. Errors only come from configuration and frame sources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used throughout the decoder
pub type Timestamp = DateTime<Utc>;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Raw CAN frame as delivered by a frame source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanFrame {
    /// Timestamp in nanoseconds since epoch (0 if the source has none)
    pub timestamp_ns: u64,
    /// Interface the frame was captured on (e.g. "can0")
    pub interface: String,
    /// CAN arbitration ID (11-bit or 29-bit, without flag bits)
    pub can_id: u32,
    /// Frame data bytes (0-8 bytes for classic CAN, up to 64 for CAN-FD)
    pub data: Vec<u8>,
    /// True if this is an extended (29-bit) CAN ID
    pub is_extended: bool,
    /// True if this is a CAN-FD frame
    pub is_fd: bool,
    /// True if this is a remote frame
    pub is_remote_frame: bool,
}

impl CanFrame {
    /// Create a classic standard-id frame without timestamp
    pub fn new(can_id: u32, data: &[u8]) -> Self {
        Self {
            can_id,
            data: data.to_vec(),
            ..Self::default()
        }
    }

    /// Convert timestamp from nanoseconds to DateTime<Utc>
    pub fn timestamp(&self) -> Timestamp {
        let secs = (self.timestamp_ns / 1_000_000_000) as i64;
        let nsecs = (self.timestamp_ns % 1_000_000_000) as u32;
        DateTime::from_timestamp(secs, nsecs).unwrap_or_default()
    }

    /// Get the data length code (DLC) - number of data bytes
    pub fn dlc(&self) -> usize {
        self.data.len()
    }
}

/// Errors that can occur while configuring the decoder or reading frames
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Failed to parse log file: {0}")]
    LogParseError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Direction/kind of an XCP message, derived from the CAN id and first byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Master to slave command (CTO)
    Request,
    /// Slave answer with PID 0xFF
    PositiveResponse,
    /// Slave answer with PID 0xFE
    ErrorResponse,
    /// Asynchronous event packet (PID 0xFD)
    Event,
    /// Service request packet (PID 0xFC)
    ServiceRequest,
    /// Data transfer object from the slave (PID below 0xFC)
    Dto,
    /// Frame from an id that belongs to no configured pair
    Unrelated,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Request => "request",
            Direction::PositiveResponse => "positive response",
            Direction::ErrorResponse => "error response",
            Direction::Event => "event",
            Direction::ServiceRequest => "service request",
            Direction::Dto => "DTO",
            Direction::Unrelated => "unrelated",
        };
        write!(f, "{}", name)
    }
}

/// One dissected frame - the primary output of the decoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedMessage {
    /// Timestamp of the source frame in nanoseconds since epoch
    pub timestamp_ns: u64,
    /// Interface the frame was captured on
    pub interface: String,
    /// CAN arbitration ID
    pub can_id: u32,
    /// True if the id is a 29-bit id
    pub is_extended: bool,
    /// True if the source frame was CAN-FD
    pub is_fd: bool,
    /// Number of payload bytes
    pub dlc: usize,
    /// Message classification
    pub direction: Direction,
    /// Command this message belongs to (decoded or remembered), if known
    pub command: Option<&'static str>,
    /// Rendered text, e.g. `-> CONNECT(mode = NORMAL)`
    pub text: String,
    /// Number of payload bytes consumed by field decoding
    pub consumed: usize,
}

impl DecodedMessage {
    pub(crate) fn from_frame(frame: &CanFrame, direction: Direction, text: String) -> Self {
        Self {
            timestamp_ns: frame.timestamp_ns,
            interface: frame.interface.clone(),
            can_id: frame.can_id,
            is_extended: frame.is_extended,
            is_fd: frame.is_fd,
            dlc: frame.dlc(),
            direction,
            command: None,
            text,
            consumed: 0,
        }
    }

    pub(crate) fn with_command(mut self, command: Option<&'static str>) -> Self {
        self.command = command;
        self
    }

    pub(crate) fn with_consumed(mut self, consumed: usize) -> Self {
        self.consumed = consumed;
        self
    }

    /// Get the timestamp of this message
    pub fn timestamp(&self) -> Timestamp {
        let secs = (self.timestamp_ns / 1_000_000_000) as i64;
        let nsecs = (self.timestamp_ns % 1_000_000_000) as u32;
        DateTime::from_timestamp(secs, nsecs).unwrap_or_default()
    }
}

impl fmt::Display for DecodedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
