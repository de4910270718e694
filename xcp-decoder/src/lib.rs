//! XCP-on-CAN Dissector Library
//!
//! Decodes raw CAN frames carrying the ASAM MC-1 XCP protocol into
//! human-readable text.
//!
//! # Architecture
//!
//! This library is intentionally focused on dissection:
//! - Classifies frames by CAN id into requests, responses and unrelated traffic
//! - Decodes the fixed field layout of every XCP command and its response
//! - Remembers the last request per master/slave pair, because a positive
//!   response can only be decoded with the layout of the command it answers
//! - Reads frames from candump text captures
//!
//! The library does NOT:
//! - Open CAN sockets
//! - Format timestamps or colorize output
//! - Decode DAQ list contents (DTOs are dumped with their PID)
//!
//! All of that is in the application layer (xcp-cli).
//!
//! # Example Usage
//!
//! ```
//! use xcp_decoder::{CanFrame, DecoderConfig, Dissector};
//!
//! // One master/slave identifier pair
//! let config = DecoderConfig::new().add_named_pair(0x7E0, 0x7E8, "ECU");
//! let mut dissector = Dissector::new(&config).unwrap();
//!
//! let request = dissector.dissect(&CanFrame::new(0x7E0, &[0xFF, 0x00]));
//! assert_eq!(request.text, "-> CONNECT(mode = NORMAL)");
//!
//! let response = dissector.dissect(&CanFrame::new(
//!     0x7E8,
//!     &[0xFF, 0x05, 0x00, 0x08, 0x00, 0x01, 0x01, 0x00],
//! ));
//! assert!(response.text.starts_with("<- OK(resources = { CAL_PAG DAQ }"));
//! ```

// Public modules
pub mod config;
pub mod dispatch;
pub mod dissector;
pub mod fields;
pub mod formats;
pub mod formatters;
pub mod payload;
pub mod protocol;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use config::{DecoderConfig, XcpPair};
pub use dissector::{DissectingIterator, Dissector};
pub use formats::{CandumpFrameIterator, CandumpParser};
pub use session::{PendingRequest, Session};
pub use types::{CanFrame, DecodedMessage, DecoderError, Direction, Result, Timestamp};

// Internal modules (not exposed in public API)
mod event;
mod request;
mod response;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: the three basic outcomes of the classifier
        let mut dissector = Dissector::new(&DecoderConfig::new().add_pair(0x7E0, 0x7E8)).unwrap();
        assert_eq!(dissector.dissect(&CanFrame::new(0x7E0, &[0xFE])).text, "-> DISCONNECT()");
        assert_eq!(dissector.dissect(&CanFrame::new(0x7E8, &[0xFF])).text, "<- OK");
        assert_eq!(dissector.dissect(&CanFrame::new(0x7FF, &[0xAB])).text, "[ AB ]");
        assert!(!VERSION.is_empty());
    }
}
