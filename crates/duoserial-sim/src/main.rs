// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Console channel simulator.
//!
//! Runs the duoserial line reader on the host: stdin plays the operator's
//! keyboard, stdout the terminal. Each completed line is printed back.
//! Type Ctrl-X (CAN) to abandon a line.

mod host;
mod logging;

use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use duoserial::{Budgets, ChannelConfig, ConsoleChannel, LineEnd, LinkError, TimeoutBudget};

use crate::host::{HostClock, StdioUart};
use crate::logging::{LogLevel, init_logging};

#[derive(Parser, Debug)]
#[command(name = "duoserial-sim", version, about = "Console line reader on stdin/stdout")]
struct Cli {
    /// Line buffer capacity in bytes, terminator included.
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u16).range(2..))]
    capacity: u16,

    /// Give up on a silent operator after this many milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 90_000)]
    rx_timeout_ms: u64,

    /// Give up on a stuck transmitter after this many milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 200)]
    tx_timeout_ms: u64,

    /// Deliver LF from stdin unchanged instead of as CR.
    #[arg(long)]
    keep_lf: bool,

    /// Minimum log level when DUOSERIAL_LOG is unset (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,
}

impl Cli {
    fn budgets(&self) -> Budgets {
        Budgets {
            transmit: TimeoutBudget::from_duration(
                Duration::from_millis(self.tx_timeout_ms),
                HostClock::TICK_HZ,
            ),
            receive: TimeoutBudget::from_duration(
                Duration::from_millis(self.rx_timeout_ms),
                HostClock::TICK_HZ,
            ),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let uart = StdioUart::spawn(!cli.keep_lf);
    let mut console = match ConsoleChannel::init(
        uart,
        HostClock::new(),
        &ChannelConfig::console(),
        cli.budgets(),
    ) {
        Ok(console) => console,
        Err(err) => {
            tracing::error!(%err, "console configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!(
        powered = console.channel().uart().is_powered(),
        capacity = cli.capacity,
        "console up"
    );
    match run(&mut console, usize::from(cli.capacity)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "console output failed");
            ExitCode::FAILURE
        }
    }
}

/// Prompt, read, print back, until the input is exhausted.
fn run<W: Write>(
    console: &mut ConsoleChannel<StdioUart<W>, HostClock>,
    capacity: usize,
) -> Result<(), LinkError> {
    let mut buf = vec![0u8; capacity];
    loop {
        console.write_str("> ")?;

        let line = console.read_line(&mut buf);
        let closed = console.channel().uart().is_closed();
        match line.end {
            // End of input on an empty line is not a line.
            LineEnd::Complete | LineEnd::Full if closed && line.len == 0 => {}
            LineEnd::Complete | LineEnd::Full => {
                tracing::info!(len = line.len, full = line.end == LineEnd::Full, "line");
                console.write_str("\r\n= ")?;
                console.write_string(&buf[..line.len])?;
                console.write_str("\r\n")?;
            }
            LineEnd::Cancelled if closed => {}
            LineEnd::Cancelled => {
                tracing::info!("line cancelled");
                console.write_str("^X\r\n")?;
            }
            LineEnd::TimedOut => {
                tracing::warn!("operator idle, line dropped");
                console.write_str("\r\n")?;
            }
        }
        if closed {
            tracing::debug!("input closed");
            return Ok(());
        }
    }
}
