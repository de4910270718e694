//! Frame sources
//!
//! The dissector itself only consumes [`CanFrame`]s. This module turns
//! captured CAN traffic into frames. Each parser implements an iterator
//! pattern over `Result<CanFrame>`.

use crate::types::{CanFrame, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub mod candump;

// Re-export parser types
pub use candump::{CandumpFrameIterator, CandumpParser};

/// Common trait for all log file parsers
///
/// This trait provides a unified interface for parsing different capture
/// formats. Each parser returns an iterator over CanFrame objects.
pub trait LogFileParser: Iterator<Item = Result<CanFrame>> + Sized {
    /// Parse a log file and return an iterator over CAN frames
    fn parse(path: &Path) -> Result<Self>;
}

impl LogFileParser for CandumpFrameIterator<BufReader<File>> {
    fn parse(path: &Path) -> Result<Self> {
        CandumpParser::parse(path)
    }
}
