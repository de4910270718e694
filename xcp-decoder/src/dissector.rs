//! Frame classification and the main dissector API

use crate::config::DecoderConfig;
use crate::formats::{CandumpFrameIterator, LogFileParser};
use crate::payload::hex_dump;
use crate::session::Session;
use crate::types::{CanFrame, DecodedMessage, Direction, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// XCP-on-CAN dissector
///
/// Owns one [`Session`] per configured master/slave pair and routes every
/// frame by its CAN id and frame format: master ids go to the request
/// decoder, slave ids to the response decoder, anything else is dumped as
/// unrelated traffic.
#[derive(Debug, Clone)]
pub struct Dissector {
    sessions: Vec<Session>,
}

impl Dissector {
    /// Create a dissector for the pairs of a validated configuration
    pub fn new(config: &DecoderConfig) -> Result<Self> {
        config.validate()?;

        for pair in &config.pairs {
            log::info!(
                "Dissecting XCP pair {}master 0x{:X}{}, slave 0x{:X}{}",
                pair.name
                    .as_deref()
                    .map(|n| format!("{}: ", n))
                    .unwrap_or_default(),
                pair.master,
                if pair.master_id().1 { " (extended)" } else { "" },
                pair.slave,
                if pair.slave_id().1 { " (extended)" } else { "" }
            );
        }

        Ok(Self {
            sessions: config.pairs.iter().cloned().map(Session::new).collect(),
        })
    }

    /// Dissect a single frame
    ///
    /// Never fails: malformed or unknown traffic is rendered with one of the
    /// fallback forms.
    pub fn dissect(&mut self, frame: &CanFrame) -> DecodedMessage {
        if let Some(session) = self.sessions.iter_mut().find(|s| s.pair().is_master(frame)) {
            return session.decode_request(frame);
        }
        if let Some(session) = self.sessions.iter().find(|s| s.pair().is_slave(frame)) {
            return session.decode_response(frame);
        }

        log::trace!("Unrelated CAN ID: 0x{:X}, emitting hex dump", frame.can_id);
        DecodedMessage::from_frame(frame, Direction::Unrelated, hex_dump(&frame.data, 0))
    }

    /// Dissect a stream of frames lazily
    ///
    /// Frame source errors are passed through unchanged.
    ///
    /// # Example
    /// ```
    /// use xcp_decoder::{CanFrame, DecoderConfig, Dissector};
    ///
    /// let config = DecoderConfig::new().add_pair(0x7E0, 0x7E8);
    /// let mut dissector = Dissector::new(&config).unwrap();
    /// let frames = vec![
    ///     Ok(CanFrame::new(0x7E0, &[0xFF, 0x00])),
    ///     Ok(CanFrame::new(0x7E8, &[0xFE, 0x20])),
    /// ];
    ///
    /// let lines: Vec<String> = dissector
    ///     .dissect_frames(frames)
    ///     .map(|msg| msg.unwrap().text)
    ///     .collect();
    /// assert_eq!(lines, ["-> CONNECT(mode = NORMAL)", "<- ERROR(CMD_UNKNOWN)"]);
    /// ```
    pub fn dissect_frames<I>(&mut self, frames: I) -> DissectingIterator<'_, I::IntoIter>
    where
        I: IntoIterator<Item = Result<CanFrame>>,
    {
        DissectingIterator {
            frames: frames.into_iter(),
            dissector: self,
        }
    }

    /// Dissect a candump capture file
    pub fn dissect_file(
        &mut self,
        path: &Path,
    ) -> Result<DissectingIterator<'_, CandumpFrameIterator<BufReader<File>>>> {
        log::info!("Dissecting capture file: {:?}", path);
        let frames = <CandumpFrameIterator<BufReader<File>> as LogFileParser>::parse(path)?;
        Ok(self.dissect_frames(frames))
    }

    /// Session whose master id is `master`
    pub fn session(&self, master: u32) -> Option<&Session> {
        self.sessions.iter().find(|s| s.pair().master == master)
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Forget the pending request of every session
    pub fn reset(&mut self) {
        self.sessions.iter_mut().for_each(Session::reset);
    }
}

/// Iterator that dissects CAN frames from a frame source
pub struct DissectingIterator<'a, I>
where
    I: Iterator<Item = Result<CanFrame>>,
{
    frames: I,
    dissector: &'a mut Dissector,
}

impl<'a, I> Iterator for DissectingIterator<'a, I>
where
    I: Iterator<Item = Result<CanFrame>>,
{
    type Item = Result<DecodedMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.frames.next()? {
            Ok(frame) => Some(Ok(self.dissector.dissect(&frame))),
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DecoderError;

    fn dissector() -> Dissector {
        Dissector::new(&DecoderConfig::new().add_pair(0x7E0, 0x7E8)).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(Dissector::new(&DecoderConfig::new()).is_err());
    }

    #[test]
    fn test_unrelated_frame_is_hex_dumped() {
        let mut d = dissector();
        let msg = d.dissect(&CanFrame::new(0x123, &[0x01, 0x02]));
        assert_eq!(msg.text, "[ 01 02 ]");
        assert_eq!(msg.direction, Direction::Unrelated);
        assert_eq!(d.dissect(&CanFrame::new(0x123, &[])).text, "");
    }

    #[test]
    fn test_routing_by_id() {
        let mut d = dissector();
        assert_eq!(d.dissect(&CanFrame::new(0x7E0, &[0xFD])).direction, Direction::Request);
        let msg = d.dissect(&CanFrame::new(0x7E8, &[0xFF, 0x00, 0x00, 0x00, 0x00, 0x00]));
        assert_eq!(msg.direction, Direction::PositiveResponse);
        assert_eq!(msg.command, Some("GET_STATUS"));
    }

    #[test]
    fn test_routing_respects_frame_format() {
        let config = DecoderConfig::new()
            .add_pair(0x7E0, 0x7E8)
            .add_extended_pair(0x7E0, 0x7E8);
        let mut d = Dissector::new(&config).unwrap();
        let extended = CanFrame {
            is_extended: true,
            ..CanFrame::new(0x7E0, &[0xFF, 0x00])
        };

        d.dissect(&extended);
        d.dissect(&CanFrame::new(0x7E0, &[0xFD]));

        assert_eq!(d.sessions()[0].pending().command_name(), Some("GET_STATUS"));
        assert_eq!(d.sessions()[1].pending().command_name(), Some("CONNECT"));
    }

    #[test]
    fn test_pairs_have_independent_state() {
        let config = DecoderConfig::new()
            .add_pair(0x7E0, 0x7E8)
            .add_pair(0x7E1, 0x7E9);
        let mut d = Dissector::new(&config).unwrap();

        d.dissect(&CanFrame::new(0x7E0, &[0xFF, 0x00]));
        d.dissect(&CanFrame::new(0x7E1, &[0xDC]));

        assert_eq!(d.session(0x7E0).unwrap().pending().command_name(), Some("CONNECT"));
        assert_eq!(d.session(0x7E1).unwrap().pending().command_name(), Some("GET_DAQ_CLOCK"));

        let msg = d.dissect(&CanFrame::new(0x7E9, &[0xFF, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]));
        assert_eq!(msg.text, "<- OK(timestamp = 1)");
    }

    #[test]
    fn test_frame_errors_pass_through() {
        let mut d = dissector();
        let frames = vec![
            Ok(CanFrame::new(0x7E0, &[0xFF, 0x00])),
            Err(DecoderError::LogParseError("line 2: bad".to_string())),
        ];
        let results: Vec<_> = d.dissect_frames(frames).collect();
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_reset_clears_all_sessions() {
        let mut d = dissector();
        d.dissect(&CanFrame::new(0x7E0, &[0xFF, 0x00]));
        d.reset();
        assert!(!d.session(0x7E0).unwrap().pending().is_armed());
    }
}
