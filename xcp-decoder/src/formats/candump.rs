//! candump text capture parser
//!
//! Reads the text written by the can-utils `candump` tool, either from a
//! file or any other `BufRead` source such as stdin.
//!
//! ## Supported Line Formats
//! - Log format (`candump -l`/`-L`): `(1436509052.249713) can0 7E0#FF00`
//! - CAN FD log lines: `(1.0) can0 7E0##1FF00`, flags nibble after `##`
//! - Remote frames: `7E0#R` (optionally followed by a length digit)
//! - Screen format: `can0  7E0   [2]  FF 00`, FD lengths as `[08]`,
//!   optionally preceded by a `(timestamp)` in seconds or as a date
//!
//! Eight-digit identifiers are extended (29-bit). Blank lines and lines
//! starting with `#` are skipped. Error frames (error flag in the id) are
//! skipped with a warning.

use crate::types::{CanFrame, DecoderError, Result};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

const CAN_EFF_MASK: u32 = 0x1FFF_FFFF;
const CAN_SFF_MASK: u32 = 0x7FF;
const CAN_ERR_FLAG: u32 = 0x2000_0000;
const CAN_MAX_DLEN: usize = 8;
const CANFD_MAX_DLEN: usize = 64;

/// candump text parser
pub struct CandumpParser;

impl CandumpParser {
    /// Open a candump capture file and return an iterator over its frames
    pub fn parse(path: &Path) -> Result<CandumpFrameIterator<BufReader<File>>> {
        log::info!("Parsing candump file: {:?}", path);

        let file = File::open(path).map_err(|e| {
            DecoderError::LogParseError(format!("Failed to open candump file {:?}: {}", path, e))
        })?;

        Ok(Self::from_reader(BufReader::new(file)))
    }

    /// Iterate over the frames of any buffered text source
    pub fn from_reader<R: BufRead>(reader: R) -> CandumpFrameIterator<R> {
        CandumpFrameIterator {
            lines: reader.lines(),
            line_number: 0,
            skipped_error_frames: 0,
        }
    }

    /// Parse a single line; `Ok(None)` for lines that carry no frame
    pub fn parse_line(line: &str) -> Result<Option<CanFrame>> {
        parse_line(line).map_err(DecoderError::LogParseError)
    }
}

/// Iterator over CAN frames from candump text
pub struct CandumpFrameIterator<R> {
    lines: Lines<R>,
    line_number: usize,
    skipped_error_frames: usize,
}

impl<R> CandumpFrameIterator<R> {
    /// Number of the last line read (1-based)
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for CandumpFrameIterator<R> {
    type Item = Result<CanFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;

            match parse_line(&line) {
                Ok(Some(frame)) if frame.can_id & CAN_ERR_FLAG != 0 => {
                    if self.skipped_error_frames == 0 {
                        log::warn!(
                            "Skipping CAN error frame at line {} (further error frames are skipped silently)",
                            self.line_number
                        );
                    }
                    self.skipped_error_frames += 1;
                    continue;
                }
                Ok(Some(frame)) => return Some(Ok(frame)),
                Ok(None) => continue,
                Err(msg) => {
                    return Some(Err(DecoderError::LogParseError(format!(
                        "line {}: {}",
                        self.line_number, msg
                    ))))
                }
            }
        }
    }
}

fn parse_line(line: &str) -> std::result::Result<Option<CanFrame>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (timestamp_ns, rest) = match line.strip_prefix('(') {
        Some(stamped) => {
            let (stamp, rest) = stamped
                .split_once(')')
                .ok_or_else(|| format!("unterminated timestamp: {}", line))?;
            (parse_timestamp(stamp.trim())?, rest)
        }
        None => (0, line),
    };

    let mut tokens = rest.split_whitespace();
    let interface = tokens
        .next()
        .ok_or_else(|| "missing interface name".to_string())?;
    let frame_token = tokens
        .next()
        .ok_or_else(|| "missing CAN frame".to_string())?;

    let mut frame = if frame_token.contains('#') {
        parse_log_frame(frame_token)?
    } else {
        parse_screen_frame(frame_token, tokens)?
    };
    frame.timestamp_ns = timestamp_ns;
    frame.interface = interface.to_string();
    Ok(Some(frame))
}

/// Seconds with fraction (`1436509052.249713`) or a date (`2015-07-10 08:17:32.249713`)
fn parse_timestamp(text: &str) -> std::result::Result<u64, String> {
    if let Ok(date) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return date
            .and_utc()
            .timestamp_nanos_opt()
            .and_then(|ns| u64::try_from(ns).ok())
            .ok_or_else(|| format!("timestamp out of range: {}", text));
    }

    let (secs, frac) = text.split_once('.').unwrap_or((text, ""));
    let invalid = || format!("invalid timestamp: ({})", text);
    let secs: u64 = secs.parse().map_err(|_| invalid())?;
    if frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let frac_ns = if frac.is_empty() {
        0
    } else {
        frac.parse::<u64>().map_err(|_| invalid())? * 10u64.pow(9 - frac.len() as u32)
    };

    secs.checked_mul(1_000_000_000)
        .and_then(|ns| ns.checked_add(frac_ns))
        .ok_or_else(invalid)
}

/// CAN id in hex; 8 digits (or a value above 0x7FF) mean extended
fn parse_id(text: &str) -> std::result::Result<(u32, bool), String> {
    if text.is_empty() || text.len() > 8 {
        return Err(format!("invalid CAN ID: {:?}", text));
    }
    let id = u32::from_str_radix(text, 16).map_err(|_| format!("invalid CAN ID: {:?}", text))?;
    if id & CAN_ERR_FLAG != 0 {
        // Keep the flag so the iterator can skip the frame
        return Ok((id, true));
    }
    if id > CAN_EFF_MASK {
        return Err(format!("CAN ID out of range: {:?}", text));
    }
    Ok((id, text.len() == 8 || id > CAN_SFF_MASK))
}

/// Data bytes in hex; `.` separators between bytes are ignored
fn parse_hex_bytes(text: &str) -> std::result::Result<Vec<u8>, String> {
    let digits: String = text.chars().filter(|&c| c != '.').collect();
    hex::decode(&digits).map_err(|e| match e {
        hex::FromHexError::OddLength => format!("odd number of hex digits in {:?}", text),
        e => format!("invalid data byte in {:?}: {}", text, e),
    })
}

/// `ID#DATA`, `ID##<flags>DATA` or `ID#R`
fn parse_log_frame(token: &str) -> std::result::Result<CanFrame, String> {
    let (id, payload) = token
        .split_once('#')
        .ok_or_else(|| format!("invalid frame: {}", token))?;
    let (can_id, is_extended) = parse_id(id)?;

    let mut frame = CanFrame {
        can_id,
        is_extended,
        ..CanFrame::default()
    };

    if let Some(fd) = payload.strip_prefix('#') {
        let mut chars = fd.chars();
        let flags = chars
            .next()
            .filter(|c| c.is_ascii_hexdigit())
            .ok_or_else(|| format!("missing CAN FD flags: {}", token))?;
        log::trace!("CAN FD flags {} for 0x{:X}", flags, can_id);
        frame.is_fd = true;
        frame.data = parse_hex_bytes(chars.as_str())?;
        if frame.data.len() > CANFD_MAX_DLEN {
            return Err(format!("CAN FD frame longer than {} bytes: {}", CANFD_MAX_DLEN, token));
        }
    } else if payload.starts_with('R') || payload.starts_with('r') {
        frame.is_remote_frame = true;
    } else {
        frame.data = parse_hex_bytes(payload)?;
        if frame.data.len() > CAN_MAX_DLEN {
            return Err(format!("CAN frame longer than {} bytes: {}", CAN_MAX_DLEN, token));
        }
    }

    Ok(frame)
}

/// `ID [len] XX XX ..` as printed by candump without `-l`
fn parse_screen_frame<'a>(
    id: &str,
    mut tokens: impl Iterator<Item = &'a str>,
) -> std::result::Result<CanFrame, String> {
    let (can_id, is_extended) = parse_id(id)?;

    let len_token = tokens
        .next()
        .ok_or_else(|| format!("missing length for 0x{:X}", can_id))?;
    let len_digits = len_token
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| format!("invalid length: {}", len_token))?;
    let len: usize = len_digits
        .parse()
        .map_err(|_| format!("invalid length: {}", len_token))?;
    let is_fd = len_digits.len() == 2;

    let mut frame = CanFrame {
        can_id,
        is_extended,
        is_fd,
        ..CanFrame::default()
    };

    let rest: Vec<&str> = tokens.collect();
    if rest.first() == Some(&"remote") {
        frame.is_remote_frame = true;
        return Ok(frame);
    }

    frame.data = rest
        .iter()
        .take(len)
        .map(|b| parse_hex_bytes(b).and_then(|v| match v.as_slice() {
            [byte] => Ok(*byte),
            _ => Err(format!("invalid data byte: {}", b)),
        }))
        .collect::<std::result::Result<_, _>>()?;
    if frame.data.len() != len {
        return Err(format!("expected {} data bytes, found {}", len, frame.data.len()));
    }

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frame(line: &str) -> CanFrame {
        CandumpParser::parse_line(line)
            .expect("line should parse")
            .expect("line should carry a frame")
    }

    #[test]
    fn test_log_format() {
        let f = frame("(1436509052.249713) can0 7E0#FF00");
        assert_eq!(f.timestamp_ns, 1_436_509_052_249_713_000);
        assert_eq!(f.interface, "can0");
        assert_eq!(f.can_id, 0x7E0);
        assert_eq!(f.data, vec![0xFF, 0x00]);
        assert!(!f.is_extended);
        assert!(!f.is_fd);
    }

    #[test]
    fn test_extended_id_and_dot_separators() {
        let f = frame("(0.5) vcan1 18DAF110#FE.20");
        assert_eq!(f.can_id, 0x18DA_F110);
        assert!(f.is_extended);
        assert_eq!(f.data, vec![0xFE, 0x20]);
        assert_eq!(f.timestamp_ns, 500_000_000);

        assert!(frame("can0 00000123#01").is_extended);
    }

    #[test]
    fn test_fd_and_remote_frames() {
        let f = frame("(1.0) can0 7E8##1FF0102030405060708");
        assert!(f.is_fd);
        assert_eq!(f.data.len(), 9);

        let r = frame("can0 7E0#R");
        assert!(r.is_remote_frame);
        assert!(r.data.is_empty());
    }

    #[test]
    fn test_screen_format() {
        let f = frame("  can0  7E8   [8]  FF 05 00 08 00 01 01 00");
        assert_eq!(f.can_id, 0x7E8);
        assert_eq!(f.data, vec![0xFF, 0x05, 0x00, 0x08, 0x00, 0x01, 0x01, 0x00]);
        assert_eq!(f.timestamp_ns, 0);

        let fd = frame("(2015-07-10 08:17:32.249713)  can0  7E8  [02]  FF 00");
        assert!(fd.is_fd);
        assert_eq!(fd.timestamp_ns, 1_436_516_252_249_713_000);

        let remote = frame("can0  123   [2]  remote request");
        assert!(remote.is_remote_frame);
    }

    #[test]
    fn test_skipped_lines() {
        assert!(CandumpParser::parse_line("").unwrap().is_none());
        assert!(CandumpParser::parse_line("   ").unwrap().is_none());
        assert!(CandumpParser::parse_line("# comment").unwrap().is_none());
    }

    #[test]
    fn test_hex_data_errors() {
        assert_eq!(parse_hex_bytes("fe.20"), Ok(vec![0xFE, 0x20]));
        assert_eq!(parse_hex_bytes(""), Ok(vec![]));
        assert!(parse_hex_bytes("FE2")
            .unwrap_err()
            .starts_with("odd number of hex digits"));
        assert!(parse_hex_bytes("FG")
            .unwrap_err()
            .starts_with("invalid data byte"));
    }

    #[test]
    fn test_malformed_lines() {
        assert!(CandumpParser::parse_line("can0").is_err());
        assert!(CandumpParser::parse_line("can0 7E0#F").is_err());
        assert!(CandumpParser::parse_line("can0 XYZ#00").is_err());
        assert!(CandumpParser::parse_line("can0 7E0#000102030405060708").is_err());
        assert!(CandumpParser::parse_line("can0 7E0 [3] 01 02").is_err());
        assert!(CandumpParser::parse_line("(abc) can0 7E0#00").is_err());
    }

    #[test]
    fn test_iterator_reports_line_numbers() {
        let text = "# capture\n(1.0) can0 7E0#FF00\n\ncan0 7E0#ZZ\n";
        let mut frames = CandumpParser::from_reader(Cursor::new(text));

        let first = frames.next().unwrap().unwrap();
        assert_eq!(first.data, vec![0xFF, 0x00]);
        assert_eq!(frames.line_number(), 2);

        match frames.next() {
            Some(Err(DecoderError::LogParseError(msg))) => assert!(msg.starts_with("line 4:")),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(frames.next().is_none());
    }

    #[test]
    fn test_error_frames_are_skipped() {
        let text = "can0 20000080#0000000000000000\ncan0 7E8#FE20\n";
        let frames: Vec<_> = CandumpParser::from_reader(Cursor::new(text))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].can_id, 0x7E8);
    }

    #[test]
    fn test_file_not_found() {
        assert!(CandumpParser::parse(Path::new("nonexistent.log")).is_err());
    }
}
