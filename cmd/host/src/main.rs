//! axpipe - interactive front end for the accelerator pipeline.
//!
//! ```text
//! axpipe <device-binary> <device-index>
//! ```
//!
//! `sim` as the device-binary launches the in-process simulated
//! accelerator; any other identifier attaches the POSIX shared-memory
//! backend under `/axpipe-<binary>-<index>-{in,out}` (unix only).
//!
//! The session reads one line at a time: `q` (or end of input) ends the
//! session, anything else must parse as a 32-bit integer and is submitted
//! to the device. Results land in the configured results file
//! (`AXP_RESULTS_FILE`, default `results.txt`), one per line, in
//! completion order.

use std::io::{self, BufRead, Write};
use std::process;

use axpipe_core::error::HostResult;
use axpipe_core::herror;
use axpipe_core::region::DeviceSession;
use axpipe_device::SimDevice;
use axpipe_host::{HostConfig, Pipeline};

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let mut args = std::env::args();
    let prog = args.next().unwrap_or_else(|| "axpipe".to_string());
    let (binary, index) = match (args.next(), args.next()) {
        (Some(binary), Some(index)) => (binary, index),
        _ => {
            eprintln!("Usage: {} <device-binary> <device-index>", prog);
            return 1;
        }
    };
    let index: u32 = match index.parse() {
        Ok(index) => index,
        Err(_) => {
            eprintln!("Usage: {} <device-binary> <device-index>", prog);
            return 1;
        }
    };

    let config = HostConfig::from_env();

    let session = match open_session(&binary, index, &config) {
        Ok(session) => session,
        Err(e) => {
            herror!("device setup failed: {}", e);
            return 1;
        }
    };

    let pipeline = match Pipeline::launch(session, &config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            herror!("pipeline launch failed: {}", e);
            return 1;
        }
    };

    interactive_loop(&pipeline);

    if let Err(e) = pipeline.shutdown() {
        herror!("shutdown failed: {}", e);
    }

    println!(
        "Application finished. Results saved to {}",
        config.results_path.display()
    );
    0
}

fn open_session(binary: &str, index: u32, config: &HostConfig) -> HostResult<DeviceSession> {
    if binary == "sim" {
        return Ok(SimDevice::launch()?);
    }

    #[cfg(unix)]
    {
        Ok(axpipe_device::shm::ShmDevice::attach(
            binary,
            index,
            config.ack_poll_interval,
        )?)
    }
    #[cfg(not(unix))]
    {
        let _ = (index, config);
        Err(axpipe_core::DeviceError::Setup(
            "only the sim backend is available on this platform".to_string(),
        )
        .into())
    }
}

/// What one console line means for the session.
#[derive(Debug, PartialEq, Eq)]
enum Entry {
    Quit,
    Value(i32),
    Invalid,
}

fn parse_entry(line: &str) -> Entry {
    let entry = line.trim();
    if entry == "q" {
        return Entry::Quit;
    }
    match entry.parse::<i32>() {
        Ok(value) => Entry::Value(value),
        Err(_) => Entry::Invalid,
    }
}

fn interactive_loop(pipeline: &Pipeline) {
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("Enter integer (q to quit): ");
        let _ = io::stdout().flush();

        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF quits like "q"
            Ok(_) => {}
            Err(e) => {
                herror!("stdin read failed: {}", e);
                break;
            }
        }

        match parse_entry(&line) {
            Entry::Quit => break,
            Entry::Value(value) => pipeline.submit(value),
            Entry::Invalid => println!("Invalid input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry() {
        assert_eq!(parse_entry("q\n"), Entry::Quit);
        assert_eq!(parse_entry("  42 \n"), Entry::Value(42));
        assert_eq!(parse_entry("-999"), Entry::Value(-999));
        assert_eq!(parse_entry("abc"), Entry::Invalid);
        assert_eq!(parse_entry(""), Entry::Invalid);
        assert_eq!(parse_entry("4.5"), Entry::Invalid);
    }
}
