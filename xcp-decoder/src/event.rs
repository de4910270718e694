//! Event packet decoding (PID 0xFD)

use crate::fields::Fields;
use crate::formatters;
use crate::payload::Payload;
use crate::protocol::EventCode;
use crate::types::{CanFrame, DecodedMessage, Direction};

/// Decode an event packet; byte 1 carries the event code
pub fn decode(frame: &CanFrame, payload: &Payload<'_>) -> DecodedMessage {
    let mut fields = Fields::new();
    let consumed = match payload.byte(1) {
        None => {
            fields.truncated("id");
            2
        }
        Some(id) => match EventCode::try_from(id) {
            Ok(code) => {
                fields.push(format!("id = {}", code.name()));
                decode_fields(code, payload, &mut fields)
            }
            Err(_) => {
                fields.push(format!("id = 0x{:x}", id));
                2
            }
        },
    };
    fields.trailer(None, payload.bytes(), consumed);

    DecodedMessage::from_frame(
        frame,
        Direction::Event,
        format!("<- {}", fields.call("EVENT")),
    )
    .with_consumed(consumed)
}

fn decode_fields(code: EventCode, p: &Payload<'_>, f: &mut Fields) -> usize {
    match code {
        EventCode::ResumeMode => {
            f.field("sessionConfigurationId", p.word(2));
            f.field("timestamp", p.dword(4));
            8
        }
        EventCode::TimeSync => {
            f.field("timestamp", p.dword(4));
            8
        }
        EventCode::StimTimeout => {
            f.with("eventType", p.byte(2), formatters::stim_timeout_type);
            f.field("eventChannel", p.word(4));
            6
        }
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(data: &[u8]) -> String {
        decode(&CanFrame::new(0x7E8, data), &Payload::new(data)).text
    }

    #[test]
    fn test_simple_events() {
        assert_eq!(text(&[0xFD, 0x07]), "<- EVENT(id = EV_SESSION_TERMINATED)");
        assert_eq!(text(&[0xFD, 0xFF, 0x01]), "<- EVENT(id = EV_TRANSPORT, [ 01 ])");
    }

    #[test]
    fn test_resume_mode_fields() {
        assert_eq!(
            text(&[0xFD, 0x00, 0x02, 0x00, 0x10, 0x00, 0x00, 0x00]),
            "<- EVENT(id = EV_RESUME_MODE, sessionConfigurationId = 2, timestamp = 16)"
        );
    }

    #[test]
    fn test_stim_timeout() {
        assert_eq!(
            text(&[0xFD, 0x09, 0x01, 0x00, 0x03, 0x00]),
            "<- EVENT(id = EV_STIM_TIMEOUT, eventType = DAQ LIST NUMBER, eventChannel = 3)"
        );
    }

    #[test]
    fn test_unknown_event_prints_code() {
        assert_eq!(text(&[0xFD, 0x42, 0xAA]), "<- EVENT(id = 0x42, [ AA ])");
    }

    #[test]
    fn test_truncated_time_sync() {
        let msg = decode(&CanFrame::new(0x7E8, &[0xFD, 0x08, 0x00]), &Payload::new(&[0xFD, 0x08, 0x00]));
        assert_eq!(msg.text, "<- EVENT(id = EV_TIME_SYNC, timestamp = <truncated>)");
        assert_eq!(msg.consumed, 8);
    }
}
