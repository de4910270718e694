//! Text assembly for dissected messages
//!
//! A message renders as a name followed by a parenthesised, comma separated
//! list of items. Fields that fall outside the frame render with the
//! [`TRUNCATED`] marker instead of a value.

use crate::payload::hex_dump;
use std::fmt::Display;

/// Marker printed in place of a field the frame is too short to carry
pub const TRUNCATED: &str = "<truncated>";

/// Ordered list of rendered items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    items: Vec<String>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a pre-rendered item
    pub fn push(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
    }

    /// `name = value` in decimal (or whatever `Display` gives)
    pub fn field<T: Display>(&mut self, name: &str, value: Option<T>) {
        match value {
            Some(v) => self.items.push(format!("{} = {}", name, v)),
            None => self.truncated(name),
        }
    }

    /// `name = 0xXX`
    pub fn hex8(&mut self, name: &str, value: Option<u8>) {
        self.field(name, value.map(|v| format!("0x{:02x}", v)));
    }

    /// `name = 0xXXXX`
    pub fn hex16(&mut self, name: &str, value: Option<u16>) {
        self.field(name, value.map(|v| format!("0x{:04x}", v)));
    }

    /// `name = 0xXXXXXXXX`
    pub fn hex32(&mut self, name: &str, value: Option<u32>) {
        self.field(name, value.map(|v| format!("0x{:08x}", v)));
    }

    /// `name = <formatted>` using one of the field formatters
    pub fn with<T, F>(&mut self, name: &str, value: Option<T>, format: F)
    where
        F: FnOnce(T) -> String,
    {
        self.field(name, value.map(format));
    }

    /// `name = <truncated>`
    pub fn truncated(&mut self, name: &str) {
        self.items.push(format!("{} = {}", name, TRUNCATED));
    }

    /// Hex dump of `data[offset..]`, optionally prefixed with `label: `
    ///
    /// Nothing is added when no bytes remain.
    pub fn trailer(&mut self, label: Option<&str>, data: &[u8], offset: usize) {
        let dump = hex_dump(data, offset);
        if dump.is_empty() {
            return;
        }
        match label {
            Some(label) => self.items.push(format!("{}: {}", label, dump)),
            None => self.items.push(dump),
        }
    }

    /// Items joined with `", "`
    pub fn join(&self) -> String {
        self.items.join(", ")
    }

    /// `name(items)`
    pub fn call(&self, name: &str) -> String {
        format!("{}({})", name, self.join())
    }
}
