//! Standalone XCP capture decoder
//!
//! Dissects a candump log file for one master/slave pair and prints every
//! frame followed by a summary of the XCP traffic.
//!
//! Usage:
//!   decode_candump <capture.log> [--master <hex id>] [--slave <hex id>] [--limit <count>] [--verbose]
//!
//! Example:
//!   decode_candump session.log --master 7E0 --slave 7E8 --limit 100

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use xcp_decoder::{DecodedMessage, DecoderConfig, Direction, Dissector, XcpPair};

struct DissectStats {
    total_frames: usize,
    requests: usize,
    positive_responses: usize,
    error_responses: usize,
    events: usize,
    dtos: usize,
    unrelated: usize,
    parse_errors: usize,
    commands: HashMap<&'static str, usize>,
}

impl DissectStats {
    fn new() -> Self {
        Self {
            total_frames: 0,
            requests: 0,
            positive_responses: 0,
            error_responses: 0,
            events: 0,
            dtos: 0,
            unrelated: 0,
            parse_errors: 0,
            commands: HashMap::new(),
        }
    }

    fn record(&mut self, msg: &DecodedMessage) {
        self.total_frames += 1;
        match msg.direction {
            Direction::Request => {
                self.requests += 1;
                if let Some(name) = msg.command {
                    *self.commands.entry(name).or_insert(0) += 1;
                }
            }
            Direction::PositiveResponse => self.positive_responses += 1,
            Direction::ErrorResponse => self.error_responses += 1,
            Direction::Event | Direction::ServiceRequest => self.events += 1,
            Direction::Dto => self.dtos += 1,
            Direction::Unrelated => self.unrelated += 1,
        }
    }

    fn print_summary(&self) {
        println!("\n=== DISSECTION SUMMARY ===");
        println!("Total frames processed: {}", self.total_frames);
        println!("Requests: {}", self.requests);
        println!("Positive responses: {}", self.positive_responses);
        println!("Error responses: {}", self.error_responses);
        println!("Events / service requests: {}", self.events);
        println!("DTOs: {}", self.dtos);
        println!("Unrelated frames: {}", self.unrelated);
        println!("Unparseable lines: {}", self.parse_errors);

        if !self.commands.is_empty() {
            println!("\nTop 10 Most Frequent Commands:");
            let mut sorted: Vec<_> = self.commands.iter().collect();
            sorted.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
            for (name, count) in sorted.iter().take(10) {
                println!("  {}: {} times", name, count);
            }
        }
    }
}

/// Hex id; eight digits mean an extended id
fn parse_id(text: &str) -> Result<(u32, bool), std::num::ParseIntError> {
    let digits = text.trim_start_matches("0x");
    Ok((u32::from_str_radix(digits, 16)?, digits.len() > 7))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "Usage: {} <capture.log> [--master <hex id>] [--slave <hex id>] [--limit <count>] [--verbose]",
            args[0]
        );
        eprintln!("\nExample:");
        eprintln!("  {} session.log --master 7E0 --slave 7E8 --limit 100", args[0]);
        std::process::exit(1);
    }

    let log_file = PathBuf::from(&args[1]);
    let mut master = (0x7E0, false);
    let mut slave = (0x7E8, false);
    let mut limit: Option<usize> = None;
    let mut verbose = false;

    // Parse arguments
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--master" => {
                i += 1;
                if i < args.len() {
                    master = parse_id(&args[i])?;
                }
            }
            "--slave" => {
                i += 1;
                if i < args.len() {
                    slave = parse_id(&args[i])?;
                }
            }
            "--limit" => {
                i += 1;
                if i < args.len() {
                    limit = Some(args[i].parse()?);
                }
            }
            "--verbose" | "-v" => {
                verbose = true;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    println!("=== XCP Capture Decoder ===");
    println!("Capture file: {:?}", log_file);
    println!("Master ID: 0x{:X}", master.0);
    println!("Slave ID: 0x{:X}", slave.0);
    if let Some(n) = limit {
        println!("Limit: {} frames", n);
    }
    println!();

    let mut config = DecoderConfig::new();
    config
        .pairs
        .push(XcpPair::new(master.0, slave.0).with_extended(master.1, slave.1));
    let mut dissector = Dissector::new(&config)?;

    let mut stats = DissectStats::new();
    let mut printed = 0;

    for result in dissector.dissect_file(&log_file)? {
        match result {
            Ok(msg) => {
                stats.record(&msg);

                if let Some(max) = limit {
                    if printed >= max {
                        println!("\n... (limit of {} frames reached)", max);
                        break;
                    }
                }

                // Unrelated traffic only in verbose mode
                if msg.direction != Direction::Unrelated || verbose {
                    println!(
                        "[{:.6}s] 0x{:03X} [{}] {}",
                        msg.timestamp_ns as f64 / 1_000_000_000.0,
                        msg.can_id,
                        msg.dlc,
                        msg.text
                    );
                    printed += 1;
                }
            }
            Err(e) => {
                stats.parse_errors += 1;
                eprintln!("Error reading frame: {}", e);
            }
        }
    }

    stats.print_summary();

    Ok(())
}
