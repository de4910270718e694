//! Bounds-checked access to frame payloads
//!
//! XCP packs BYTE/WORD/DWORD fields at fixed offsets. Frames on the bus are
//! untrusted and may be shorter than the layout requires, so every accessor
//! returns `None` instead of reading past the end.

use byteorder::{ByteOrder, LittleEndian};
use std::fmt::Write;

/// Read-only view over the data bytes of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload<'a> {
    data: &'a [u8],
}

impl<'a> Payload<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.data
    }

    /// BYTE at `offset`
    pub fn byte(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    /// Little-endian WORD starting at `offset`
    pub fn word(&self, offset: usize) -> Option<u16> {
        self.data
            .get(offset..offset.checked_add(2)?)
            .map(LittleEndian::read_u16)
    }

    /// Little-endian DWORD starting at `offset`
    pub fn dword(&self, offset: usize) -> Option<u32> {
        self.data
            .get(offset..offset.checked_add(4)?)
            .map(LittleEndian::read_u32)
    }

    /// Bytes from `offset` to the end (empty past the end)
    pub fn tail(&self, offset: usize) -> &'a [u8] {
        self.data.get(offset..).unwrap_or(&[])
    }
}

/// Render `data[offset..]` as `[ XX XX ... ]`
///
/// Returns an empty string when nothing remains, so callers can skip the
/// item entirely.
pub fn hex_dump(data: &[u8], offset: usize) -> String {
    let rest = data.get(offset..).unwrap_or(&[]);
    if rest.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(4 + rest.len() * 3);
    out.push_str("[ ");
    for byte in rest {
        let _ = write!(out, "{:02X} ", byte);
    }
    out.push(']');
    out
}
