//! Output line rendering
//!
//! Text lines follow the candump screen layout with the dissected message in
//! place of the data bytes:
//!
//! ```text
//! (0.000200)  can0  7E8  [8]  <- OK(resources = { CAL_PAG DAQ }, ...)
//! ```

use crate::config::{OutputFormat, TimestampMode};
use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use std::io::Write;
use xcp_decoder::{DecodedMessage, Direction};

/// Interface column for frames from sources without interface names
const DEFAULT_INTERFACE: &str = "-";

/// Settings that shape every output line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub timestamp: Option<TimestampMode>,
    pub color: bool,
    pub format: OutputFormat,
}

/// Renders dissected frames, keeping the reference time for relative timestamps
#[derive(Debug)]
pub struct Printer {
    options: OutputOptions,
    reference_ns: Option<u64>,
}

impl Printer {
    pub fn new(options: OutputOptions) -> Self {
        Self {
            options,
            reference_ns: None,
        }
    }

    /// Write one frame as one line
    pub fn write<W: Write>(&mut self, out: &mut W, msg: &DecodedMessage) -> Result<()> {
        let line = self.render(msg)?;
        writeln!(out, "{}", line).context("Failed to write output")
    }

    /// Render one frame without the line terminator
    pub fn render(&mut self, msg: &DecodedMessage) -> Result<String> {
        match self.options.format {
            OutputFormat::Json => {
                serde_json::to_string(msg).context("Failed to serialize dissected frame")
            }
            OutputFormat::Text => Ok(self.render_text(msg)),
        }
    }

    fn render_text(&mut self, msg: &DecodedMessage) -> String {
        let mut line = String::new();

        if let Some(mode) = self.options.timestamp {
            line.push_str(&self.timestamp(mode, msg));
            line.push(' ');
        }

        let interface = if msg.interface.is_empty() {
            DEFAULT_INTERFACE
        } else {
            &msg.interface
        };
        if msg.is_extended {
            line.push_str(&format!(" {}  {:8X}", interface, msg.can_id));
        } else {
            line.push_str(&format!(" {}  {:3X}", interface, msg.can_id));
        }

        if msg.is_fd {
            line.push_str(&format!(" [{:02}]  ", msg.dlc));
        } else {
            line.push_str(&format!("  [{}]  ", msg.dlc));
        }
        line.push_str(&msg.text);

        if !self.options.color {
            return line;
        }
        match msg.direction {
            Direction::Request => line.red().to_string(),
            _ => line.blue().to_string(),
        }
    }

    /// `(secs.micros)`, or a local date for [`TimestampMode::AbsoluteDate`]
    fn timestamp(&mut self, mode: TimestampMode, msg: &DecodedMessage) -> String {
        let now = msg.timestamp_ns;
        let ns = match mode {
            TimestampMode::Absolute => now,
            TimestampMode::AbsoluteDate => {
                let local = msg.timestamp().with_timezone(&Local);
                return format!(
                    "({}.{:06})",
                    local.format("%Y-%m-%d %H:%M:%S"),
                    (now % 1_000_000_000) / 1_000
                );
            }
            TimestampMode::Delta => {
                let reference = self.reference_ns.unwrap_or(now);
                self.reference_ns = Some(now);
                now.saturating_sub(reference)
            }
            TimestampMode::Zero => {
                let reference = *self.reference_ns.get_or_insert(now);
                now.saturating_sub(reference)
            }
        };
        format!("({}.{:06})", ns / 1_000_000_000, (ns % 1_000_000_000) / 1_000)
    }
}
