//! Decoder configuration types
//!
//! The decoder only needs to know which CAN identifiers carry XCP traffic.
//! Every master/slave pair gets its own session, so several XCP slaves on the
//! same bus can be dissected side by side.

use crate::types::{CanFrame, DecoderError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Highest identifier a standard (11-bit) frame can carry
const CAN_SFF_MASK: u32 = 0x7FF;

/// Configuration for the decoder library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// XCP master/slave identifier pairs to dissect
    #[serde(default)]
    pub pairs: Vec<XcpPair>,
}

/// XCP identifier pair configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct XcpPair {
    /// CAN id used by the master (requests)
    pub master: u32,
    /// CAN id used by the slave (responses, events, DTOs)
    pub slave: u32,
    /// Master id is a 29-bit identifier even when it fits in 11 bits
    #[serde(default)]
    pub master_extended: bool,
    /// Slave id is a 29-bit identifier even when it fits in 11 bits
    #[serde(default)]
    pub slave_extended: bool,
    /// Optional name for documentation
    #[serde(default)]
    pub name: Option<String>,
}

impl XcpPair {
    /// Create a new XCP pair
    pub fn new(master: u32, slave: u32) -> Self {
        Self {
            master,
            slave,
            master_extended: false,
            slave_extended: false,
            name: None,
        }
    }

    /// Create a new XCP pair with a name
    pub fn with_name(master: u32, slave: u32, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(master, slave)
        }
    }

    /// Builder method: mark which ids are extended
    pub fn with_extended(mut self, master: bool, slave: bool) -> Self {
        self.master_extended = master;
        self.slave_extended = slave;
        self
    }

    /// Master id with its frame format
    pub fn master_id(&self) -> (u32, bool) {
        (self.master, self.master_extended || self.master > CAN_SFF_MASK)
    }

    /// Slave id with its frame format
    pub fn slave_id(&self) -> (u32, bool) {
        (self.slave, self.slave_extended || self.slave > CAN_SFF_MASK)
    }

    /// Frame was sent by the master of this pair
    pub fn is_master(&self, frame: &CanFrame) -> bool {
        self.master_id() == (frame.can_id, frame.is_extended)
    }

    /// Frame was sent by the slave of this pair
    pub fn is_slave(&self, frame: &CanFrame) -> bool {
        self.slave_id() == (frame.can_id, frame.is_extended)
    }
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: add an XCP pair
    pub fn add_pair(mut self, master: u32, slave: u32) -> Self {
        self.pairs.push(XcpPair::new(master, slave));
        self
    }

    /// Builder method: add an XCP pair of extended (29-bit) ids
    pub fn add_extended_pair(mut self, master: u32, slave: u32) -> Self {
        self.pairs
            .push(XcpPair::new(master, slave).with_extended(true, true));
        self
    }

    /// Builder method: add an XCP pair with a name
    pub fn add_named_pair(mut self, master: u32, slave: u32, name: impl Into<String>) -> Self {
        self.pairs.push(XcpPair::with_name(master, slave, name));
        self
    }

    /// Check that the pairs can be routed unambiguously
    ///
    /// Each identifier may appear only once across all pairs, otherwise a
    /// frame could belong to two sessions. A standard and an extended frame
    /// with the same number are different identifiers.
    pub fn validate(&self) -> Result<()> {
        if self.pairs.is_empty() {
            return Err(DecoderError::InvalidConfig(
                "at least one master/slave pair is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for pair in &self.pairs {
            for (id, extended) in [pair.master_id(), pair.slave_id()] {
                if id > 0x1FFF_FFFF {
                    return Err(DecoderError::InvalidConfig(format!(
                        "CAN ID 0x{:X} exceeds 29 bits",
                        id
                    )));
                }
                if !seen.insert((id, extended)) {
                    return Err(DecoderError::InvalidConfig(format!(
                        "CAN ID 0x{:X} is used more than once",
                        id
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_config_builder() {
        let config = DecoderConfig::new()
            .add_pair(0x7E0, 0x7E8)
            .add_named_pair(0x7E1, 0x7E9, "TCU");

        assert_eq!(config.pairs.len(), 2);
        assert_eq!(config.pairs[0], XcpPair::new(0x7E0, 0x7E8));
        assert_eq!(config.pairs[1].name.as_deref(), Some("TCU"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_rejected() {
        assert!(DecoderConfig::new().validate().is_err());
    }

    #[test]
    fn test_reused_id_is_rejected() {
        let same_ids = DecoderConfig::new().add_pair(0x7E0, 0x7E0);
        assert!(same_ids.validate().is_err());

        let shared = DecoderConfig::new()
            .add_pair(0x7E0, 0x7E8)
            .add_pair(0x7E8, 0x7F0);
        assert!(shared.validate().is_err());
    }

    #[test]
    fn test_extended_ids() {
        let pair = XcpPair::new(0x7E0, 0x18DA_F100);
        assert_eq!(pair.master_id(), (0x7E0, false));
        assert_eq!(pair.slave_id(), (0x18DA_F100, true));

        let pair = XcpPair::new(0x7E0, 0x7E8).with_extended(true, false);
        assert!(pair.is_master(&CanFrame {
            is_extended: true,
            ..CanFrame::new(0x7E0, &[])
        }));
        assert!(!pair.is_master(&CanFrame::new(0x7E0, &[])));
        assert!(pair.is_slave(&CanFrame::new(0x7E8, &[])));
    }

    #[test]
    fn test_same_number_in_both_formats_is_allowed() {
        let config = DecoderConfig::new()
            .add_pair(0x7E0, 0x7E8)
            .add_extended_pair(0x7E0, 0x7E8);
        assert!(config.validate().is_ok());

        let too_wide = DecoderConfig::new().add_pair(0x2000_0000, 0x7E8);
        assert!(too_wide.validate().is_err());
    }
}
