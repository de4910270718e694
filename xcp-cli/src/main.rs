//! XCP-on-CAN dump CLI Application
//!
//! This is the command-line interface for the XCP dissector.
//! It uses the xcp-decoder library and adds:
//! - Frame input from candump captures or stdin
//! - Timestamp columns (absolute, date, delta, zero-based)
//! - Colored or JSON output
//! - DTO and unrelated-traffic filtering

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use xcp_decoder::{CanFrame, CandumpParser, Direction, Dissector};

mod config;
mod output;

use config::{AppConfig, CanIdArg, OutputFormat, TimestampMode};
use output::{OutputOptions, Printer};

/// xcpdump - Dissect XCP-on-CAN traffic from candump captures
#[derive(Parser, Debug)]
#[command(name = "xcpdump")]
#[command(
    about = "Dissect XCP-on-CAN traffic from candump captures",
    long_about = "Dissect XCP-on-CAN traffic from candump captures.\n\nCAN IDs are given as hexadecimal values. Use 8 digits for extended IDs."
)]
#[command(version)]
struct Args {
    /// candump capture to read ("-" or absent: stdin)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// XCP master CAN ID (hex)
    #[arg(short, long, value_name = "CAN_ID", value_parser = config::parse_can_id)]
    master: Option<CanIdArg>,

    /// XCP slave CAN ID (hex)
    #[arg(short, long, value_name = "CAN_ID", value_parser = config::parse_can_id)]
    slave: Option<CanIdArg>,

    /// Include DTOs
    #[arg(short, long)]
    dtos: bool,

    /// Color mode (master red, everything else blue)
    #[arg(short, long)]
    color: bool,

    /// Timestamp: (a)bsolute/(A)bsolute with date/(d)elta/(z)ero
    #[arg(short, long, value_name = "TYPE")]
    timestamp: Option<TimestampMode>,

    /// Path to configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Do not print frames of IDs outside the XCP pairs
    #[arg(long)]
    skip_unrelated: bool,

    /// Maximum number of frames to read
    #[arg(long, value_name = "COUNT")]
    max_frames: Option<usize>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    quiet: bool,
}

/// Which dissected frames get printed
#[derive(Debug, Clone, Copy)]
struct Filter {
    dtos: bool,
    skip_unrelated: bool,
}

impl Filter {
    fn accepts(&self, direction: Direction) -> bool {
        match direction {
            Direction::Dto => self.dtos,
            Direction::Unrelated => !self.skip_unrelated,
            _ => true,
        }
    }
}

/// Counters reported at the end of a run
#[derive(Debug, Default)]
struct RunStats {
    frames: usize,
    printed: usize,
    bad_lines: usize,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("xcpdump v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using decoder library v{}", xcp_decoder::VERSION);

    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    // Command-line flags extend the configuration file
    let decoder_config = app_config.decoder_config(args.master, args.slave)?;
    let filter = Filter {
        dtos: args.dtos || app_config.output.dtos,
        skip_unrelated: args.skip_unrelated || app_config.output.skip_unrelated,
    };
    let options = OutputOptions {
        timestamp: args.timestamp.or(app_config.output.timestamp),
        color: args.color || app_config.output.color,
        format: args.format.unwrap_or(app_config.output.format),
    };
    if options.color {
        // Escape codes are wanted even when stdout is piped
        colored::control::set_override(true);
    }

    let mut dissector = Dissector::new(&decoder_config).context("Failed to set up dissector")?;
    let mut printer = Printer::new(options);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let stats = match args.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => {
            let frames = CandumpParser::parse(path)
                .with_context(|| format!("Failed to open capture: {:?}", path))?;
            run(frames, &mut dissector, &mut printer, filter, args.max_frames, &mut out)?
        }
        _ => {
            log::info!("Reading candump text from stdin");
            let frames = CandumpParser::from_reader(io::stdin().lock());
            run(frames, &mut dissector, &mut printer, filter, args.max_frames, &mut out)?
        }
    };
    out.flush().context("Failed to flush output")?;

    log::info!(
        "Dissected {} frames, printed {}, skipped {} unreadable lines",
        stats.frames,
        stats.printed,
        stats.bad_lines
    );

    Ok(())
}

/// Dissect every frame of a source and print the accepted ones
fn run<I, W>(
    frames: I,
    dissector: &mut Dissector,
    printer: &mut Printer,
    filter: Filter,
    max_frames: Option<usize>,
    out: &mut W,
) -> Result<RunStats>
where
    I: Iterator<Item = xcp_decoder::Result<CanFrame>>,
    W: Write,
{
    let mut stats = RunStats::default();

    for result in dissector.dissect_frames(frames.take(max_frames.unwrap_or(usize::MAX))) {
        match result {
            Ok(msg) => {
                stats.frames += 1;
                if filter.accepts(msg.direction) {
                    printer.write(out, &msg)?;
                    stats.printed += 1;
                }
            }
            Err(e) => {
                // A bad line does not end the capture
                log::warn!("{}", e);
                stats.bad_lines += 1;
            }
        }
    }

    Ok(stats)
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use xcp_decoder::DecoderConfig;

    fn dissector() -> Dissector {
        Dissector::new(&DecoderConfig::new().add_pair(0x7E0, 0x7E8)).unwrap()
    }

    const CAPTURE: &str = "\
(1.000000) can0 7E0#FF00
(1.000100) can0 7E8#FF05000800010100
(1.000200) can0 123#0102
(1.000300) can0 7E8#001122
not a frame
(1.000400) can0 7E0#FD
";

    fn dump(filter: Filter, max_frames: Option<usize>) -> (String, RunStats) {
        let mut out = Vec::new();
        let mut printer = Printer::new(OutputOptions::default());
        let stats = run(
            CandumpParser::from_reader(Cursor::new(CAPTURE)),
            &mut dissector(),
            &mut printer,
            filter,
            max_frames,
            &mut out,
        )
        .unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    #[test]
    fn test_default_filter_hides_dtos() {
        let (text, stats) = dump(Filter { dtos: false, skip_unrelated: false }, None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], " can0  7E0  [2]  -> CONNECT(mode = NORMAL)");
        assert!(lines[1].starts_with(" can0  7E8  [8]  <- OK(resources = { CAL_PAG DAQ }"));
        assert_eq!(lines[2], " can0  123  [2]  [ 01 02 ]");
        assert_eq!(lines[3], " can0  7E0  [1]  -> GET_STATUS()");
        assert_eq!(stats.frames, 5);
        assert_eq!(stats.printed, 4);
        assert_eq!(stats.bad_lines, 1);
    }

    #[test]
    fn test_dtos_and_skip_unrelated() {
        let (text, _) = dump(Filter { dtos: true, skip_unrelated: true }, None);
        assert!(text.contains("<- DTO(pid = 0, [ 11 22 ])"));
        assert!(!text.contains("[ 01 02 ]"));
    }

    #[test]
    fn test_max_frames() {
        let (text, stats) = dump(Filter { dtos: true, skip_unrelated: false }, Some(2));
        assert_eq!(text.lines().count(), 2);
        assert_eq!(stats.frames, 2);
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "xcpdump", "-m", "7E0", "-s", "7E8", "-d", "-c", "-t", "A", "capture.log",
        ])
        .unwrap();
        assert_eq!(args.master.map(|m| m.id), Some(0x7E0));
        assert_eq!(args.slave.map(|s| s.id), Some(0x7E8));
        assert!(args.dtos && args.color);
        assert_eq!(args.timestamp, Some(TimestampMode::AbsoluteDate));
        assert_eq!(args.input, Some(PathBuf::from("capture.log")));

        let args = Args::try_parse_from(["xcpdump", "-t", "z", "--format", "json"]).unwrap();
        assert_eq!(args.timestamp, Some(TimestampMode::Zero));
        assert_eq!(args.format, Some(OutputFormat::Json));

        let args = Args::try_parse_from(["xcpdump", "-m", "000007E0", "-s", "7E8"]).unwrap();
        assert_eq!(args.master, Some(CanIdArg { id: 0x7E0, extended: true }));
        assert_eq!(args.slave, Some(CanIdArg { id: 0x7E8, extended: false }));

        assert!(Args::try_parse_from(["xcpdump", "-t", "x"]).is_err());
        assert!(Args::try_parse_from(["xcpdump", "-m", "nothex"]).is_err());
    }
}
