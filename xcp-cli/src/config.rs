//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use xcp_decoder::{DecoderConfig, XcpPair};

/// Main application configuration (loaded from a TOML file)
///
/// ```toml
/// [[pairs]]
/// master = 0x7E0
/// slave = 0x7E8
/// name = "engine"
///
/// [[pairs]]
/// master = 0x100
/// slave = 0x101
/// master_extended = true
/// slave_extended = true
///
/// [output]
/// timestamp = "z"
/// color = true
/// dtos = false
/// format = "text"
/// skip_unrelated = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pairs: Vec<XcpPair>,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    pub timestamp: Option<TimestampMode>,
    #[serde(default)]
    pub color: bool,
    #[serde(default)]
    pub dtos: bool,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub skip_unrelated: bool,
}

/// Timestamp column, same letters as candump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
pub enum TimestampMode {
    /// Absolute seconds since the epoch
    #[serde(rename = "a", alias = "absolute")]
    #[value(name = "a")]
    Absolute,
    /// Absolute local date and time
    #[serde(rename = "A", alias = "date")]
    #[value(name = "A")]
    AbsoluteDate,
    /// Time since the previous printed frame
    #[serde(rename = "d", alias = "delta")]
    #[value(name = "d")]
    Delta,
    /// Time since the first printed frame
    #[serde(rename = "z", alias = "zero")]
    #[value(name = "z")]
    Zero,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per frame
    Json,
}

impl AppConfig {
    /// Decoder configuration for the configured pairs plus an optional
    /// pair given on the command line
    pub fn decoder_config(
        &self,
        master: Option<CanIdArg>,
        slave: Option<CanIdArg>,
    ) -> Result<DecoderConfig> {
        let mut config = DecoderConfig {
            pairs: self.pairs.clone(),
        };

        match (master, slave) {
            (Some(master), Some(slave)) => config.pairs.push(
                XcpPair::new(master.id, slave.id).with_extended(master.extended, slave.extended),
            ),
            (None, None) => {}
            (Some(_), None) => bail!("a master CAN ID needs a slave CAN ID (-s)"),
            (None, Some(_)) => bail!("a slave CAN ID needs a master CAN ID (-m)"),
        }

        if config.pairs.is_empty() {
            bail!("no XCP master/slave pair given; use -m/-s or a [[pairs]] table in --config");
        }
        config
            .validate()
            .context("Invalid XCP pair configuration")?;

        Ok(config)
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    log::debug!(
        "Loaded {} XCP pair(s) from {:?}",
        config.pairs.len(),
        path
    );

    Ok(config)
}

/// CAN id given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanIdArg {
    pub id: u32,
    pub extended: bool,
}

/// Hexadecimal CAN id as given to `-m`/`-s`; an optional `0x` prefix is accepted
///
/// More than seven digits select an extended id, so `000007E0` is the
/// 29-bit identifier 0x7E0.
pub fn parse_can_id(text: &str) -> std::result::Result<CanIdArg, String> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let id = u32::from_str_radix(digits, 16)
        .map_err(|_| format!("'{}' is not a hexadecimal CAN ID", text))?;
    if id > 0x1FFF_FFFF {
        return Err(format!("CAN ID '{}' exceeds 29 bits", text));
    }
    Ok(CanIdArg {
        id,
        extended: digits.len() > 7,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [[pairs]]
            master = 0x7E0
            slave = 0x7E8
            name = "engine"

            [[pairs]]
            master = 0x18DA00F1
            slave = 0x18DAF100

            [output]
            timestamp = "z"
            color = true
            format = "json"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.pairs.len(), 2);
        assert_eq!(config.pairs[0].name.as_deref(), Some("engine"));
        assert_eq!(config.pairs[1].slave, 0x18DA_F100);
        assert_eq!(config.output.timestamp, Some(TimestampMode::Zero));
        assert!(config.output.color);
        assert!(!config.output.dtos);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.pairs.is_empty());
        assert_eq!(config.output, OutputConfig::default());
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_timestamp_aliases() {
        let output: OutputConfig = toml::from_str(r#"timestamp = "delta""#).unwrap();
        assert_eq!(output.timestamp, Some(TimestampMode::Delta));
        let output: OutputConfig = toml::from_str(r#"timestamp = "A""#).unwrap();
        assert_eq!(output.timestamp, Some(TimestampMode::AbsoluteDate));
    }

    fn standard(id: u32) -> Option<CanIdArg> {
        Some(CanIdArg { id, extended: false })
    }

    #[test]
    fn test_command_line_pair_is_added() {
        let config: AppConfig = toml::from_str(
            r#"
            [[pairs]]
            master = 0x7E1
            slave = 0x7E9
            "#,
        )
        .unwrap();

        let decoder = config.decoder_config(standard(0x7E0), standard(0x7E8)).unwrap();
        assert_eq!(decoder.pairs.len(), 2);
        assert_eq!(decoder.pairs[1], XcpPair::new(0x7E0, 0x7E8));
    }

    #[test]
    fn test_command_line_extended_ids() {
        let master = parse_can_id("000007E0").unwrap();
        let slave = parse_can_id("7E8").unwrap();
        let decoder = AppConfig::default()
            .decoder_config(Some(master), Some(slave))
            .unwrap();
        assert_eq!(decoder.pairs[0].master_id(), (0x7E0, true));
        assert_eq!(decoder.pairs[0].slave_id(), (0x7E8, false));
    }

    #[test]
    fn test_extended_flags_in_config_file() {
        let config: AppConfig = toml::from_str(
            r#"
            [[pairs]]
            master = 0x7E0
            slave = 0x7E8
            master_extended = true
            slave_extended = true
            "#,
        )
        .unwrap();
        assert_eq!(config.pairs[0].master_id(), (0x7E0, true));
        assert_eq!(config.pairs[0].slave_id(), (0x7E8, true));
    }

    #[test]
    fn test_incomplete_or_conflicting_pairs_are_rejected() {
        let config = AppConfig::default();
        assert!(config.decoder_config(None, None).is_err());
        assert!(config.decoder_config(standard(0x7E0), None).is_err());
        assert!(config.decoder_config(None, standard(0x7E8)).is_err());
        assert!(config.decoder_config(standard(0x7E0), standard(0x7E0)).is_err());
    }

    #[test]
    fn test_parse_can_id() {
        assert_eq!(parse_can_id("7E0"), Ok(CanIdArg { id: 0x7E0, extended: false }));
        assert_eq!(parse_can_id("0x7e8"), Ok(CanIdArg { id: 0x7E8, extended: false }));
        assert_eq!(parse_can_id("18DAF110"), Ok(CanIdArg { id: 0x18DA_F110, extended: true }));
        assert_eq!(parse_can_id("0x000007E0"), Ok(CanIdArg { id: 0x7E0, extended: true }));
        assert_eq!(parse_can_id("00007E0"), Ok(CanIdArg { id: 0x7E0, extended: false }));
        assert!(parse_can_id("XYZ").is_err());
        assert!(parse_can_id("FFFFFFFF").is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[[pairs]]\nmaster = 2016\nslave = 2024").unwrap();
        file.flush().unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.pairs, vec![XcpPair::new(0x7E0, 0x7E8)]);
    }

    #[test]
    fn test_load_config_errors_name_the_file() {
        let err = load_config(Path::new("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[[pairs]]\nmaster = \"not a number\"").unwrap();
        file.flush().unwrap();
        assert!(load_config(file.path())
            .unwrap_err()
            .to_string()
            .contains("Failed to parse"));
    }
}
