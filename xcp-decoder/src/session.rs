//! Per-pair XCP session state
//!
//! A positive response does not say which command it answers. The session
//! remembers the last request its master sent and uses it to pick the layout
//! of every following positive response. Responses never clear this state:
//! XCP on CAN allows one outstanding command per pair, and a repeated or
//! late response is decoded with the layout of the last request.

use crate::config::XcpPair;
use crate::dispatch::{self, CommandEntry, RequestContext};
use crate::fields::{Fields, TRUNCATED};
use crate::payload::{hex_dump, Payload};
use crate::response;
use crate::types::{CanFrame, DecodedMessage, Direction};
use log::{debug, warn};

/// Last request seen on a session
#[derive(Debug, Clone, Copy, Default)]
pub enum PendingRequest {
    /// No request decoded yet
    #[default]
    Empty,
    /// A request was decoded; `entry` is `None` for unknown command codes
    Armed {
        code: u8,
        entry: Option<&'static CommandEntry>,
        context: RequestContext,
    },
}

impl PendingRequest {
    /// Name of the remembered command, if it is a known one
    pub fn command_name(&self) -> Option<&'static str> {
        match self {
            PendingRequest::Armed {
                entry: Some(entry), ..
            } => Some(entry.name),
            _ => None,
        }
    }

    /// Raw command code of the remembered request
    pub fn code(&self) -> Option<u8> {
        match self {
            PendingRequest::Armed { code, .. } => Some(*code),
            PendingRequest::Empty => None,
        }
    }

    /// Request fields captured for the response layout
    pub fn context(&self) -> RequestContext {
        match self {
            PendingRequest::Armed { context, .. } => *context,
            PendingRequest::Empty => RequestContext::None,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, PendingRequest::Armed { .. })
    }
}

/// One master/slave pair and its pending request
#[derive(Debug, Clone)]
pub struct Session {
    pair: XcpPair,
    pending: PendingRequest,
}

impl Session {
    pub fn new(pair: XcpPair) -> Self {
        Self {
            pair,
            pending: PendingRequest::Empty,
        }
    }

    pub fn pair(&self) -> &XcpPair {
        &self.pair
    }

    pub fn pending(&self) -> &PendingRequest {
        &self.pending
    }

    /// Forget the remembered request
    pub fn reset(&mut self) {
        self.pending = PendingRequest::Empty;
    }

    /// Decode a frame sent by the master and arm the session with it
    pub fn decode_request(&mut self, frame: &CanFrame) -> DecodedMessage {
        let payload = Payload::new(&frame.data);
        let Some(code) = payload.byte(0) else {
            warn!("Empty request frame on 0x{:X}", frame.can_id);
            return DecodedMessage::from_frame(
                frame,
                Direction::Request,
                format!("-> {}", TRUNCATED),
            );
        };

        let entry = dispatch::lookup(&payload);
        let context = entry.map(|e| e.capture(&payload)).unwrap_or_default();
        self.pending = PendingRequest::Armed {
            code,
            entry,
            context,
        };

        let Some(entry) = entry else {
            debug!("Unknown command 0x{:02X} on 0x{:X}", code, frame.can_id);
            return DecodedMessage::from_frame(
                frame,
                Direction::Request,
                format!("-> {}", hex_dump(payload.bytes(), 0)),
            );
        };

        debug!("{} armed session {}", entry.name, self.label());
        let mut fields = Fields::new();
        let consumed = (entry.request)(&payload, &mut fields);
        if consumed > payload.len() {
            warn!(
                "Truncated {} request on 0x{:X}: {} of {} bytes",
                entry.name,
                frame.can_id,
                payload.len(),
                consumed
            );
        }
        fields.trailer(None, payload.bytes(), consumed);

        DecodedMessage::from_frame(
            frame,
            Direction::Request,
            format!("-> {}", fields.call(entry.name)),
        )
        .with_command(Some(entry.name))
        .with_consumed(consumed)
    }

    /// Decode a frame sent by the slave using the remembered request
    pub fn decode_response(&self, frame: &CanFrame) -> DecodedMessage {
        response::decode(frame, &self.pending)
    }

    fn label(&self) -> String {
        match &self.pair.name {
            Some(name) => name.clone(),
            None => format!("0x{:X}/0x{:X}", self.pair.master, self.pair.slave),
        }
    }
}
