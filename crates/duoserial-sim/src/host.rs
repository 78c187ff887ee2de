// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Host stand-ins for the UART and the tick source.

use std::cell::Cell;
use std::io::{self, Read, Stdout, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use duoserial::config::RegisterSettings;
use duoserial::{CANCEL, Clock, Uart, UartControl};

/// Progress of the stdin stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Open,
    /// Sender gone; one CR has been handed out to flush a partial line.
    Flushed,
    /// Every further read yields CAN.
    Closed,
}

/// UART whose receive side is the process's stdin and whose transmit side
/// is `out` (stdout by default).
///
/// A reader thread feeds stdin bytes through a channel so `can_read` never
/// blocks, just like polling a receive flag. Once stdin is exhausted the
/// receiver reports one CR, so a trailing line without a newline still
/// completes, and CAN from then on.
pub struct StdioUart<W = Stdout> {
    rx: Receiver<u8>,
    pending: Cell<Option<u8>>,
    input: Cell<Input>,
    out: W,
    map_lf: bool,
    powered: bool,
}

impl StdioUart {
    /// Start reading stdin in the background.
    ///
    /// With `map_lf` a line feed from stdin arrives as a carriage return, the
    /// way a terminal sends Enter.
    #[must_use]
    pub fn spawn(map_lf: bool) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for byte in io::stdin().lock().bytes() {
                let Ok(byte) = byte else { break };
                if tx.send(byte).is_err() {
                    break;
                }
            }
        });
        Self::from_receiver(rx, io::stdout(), map_lf)
    }
}

impl<W: Write> StdioUart<W> {
    /// Build from an existing byte channel and output sink.
    #[must_use]
    pub const fn from_receiver(rx: Receiver<u8>, out: W, map_lf: bool) -> Self {
        Self {
            rx,
            pending: Cell::new(None),
            input: Cell::new(Input::Open),
            out,
            map_lf,
            powered: false,
        }
    }

    /// Whether stdin has reached end of file.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.input.get() != Input::Open
    }

    /// Whether the simulated module is powered.
    #[must_use]
    pub const fn is_powered(&self) -> bool {
        self.powered
    }

    /// Everything transmitted so far.
    #[cfg(test)]
    pub const fn output(&self) -> &W {
        &self.out
    }

    fn end_of_input(&self) -> u8 {
        match self.input.get() {
            Input::Open => {
                self.input.set(Input::Flushed);
                b'\r'
            }
            Input::Flushed | Input::Closed => {
                self.input.set(Input::Closed);
                CANCEL
            }
        }
    }
}

impl<W: Write> Uart for StdioUart<W> {
    fn can_write(&self) -> bool {
        true
    }

    fn can_read(&self) -> bool {
        if self.pending.get().is_some() {
            return true;
        }
        let byte = match self.rx.try_recv() {
            Ok(b'\n') if self.map_lf => b'\r',
            Ok(byte) => byte,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => self.end_of_input(),
        };
        self.pending.set(Some(byte));
        true
    }

    fn write_data(&mut self, byte: u8) {
        if let Err(err) = self
            .out
            .write_all(&[byte])
            .and_then(|()| self.out.flush())
        {
            tracing::warn!(%err, "output write failed");
        }
    }

    fn read_data(&mut self) -> u8 {
        self.pending.take().unwrap_or(0)
    }
}

impl<W: Write> UartControl for StdioUart<W> {
    fn configure(&mut self, settings: &RegisterSettings) {
        tracing::debug!(
            brg = settings.brg,
            mode = format_args!("{:#06x}", settings.mode.bits()),
            status = format_args!("{:#06x}", settings.status.bits()),
            "simulated uart configured"
        );
    }

    fn set_powered(&mut self, powered: bool) {
        self.powered = powered;
    }
}

/// Wall-clock tick source counting microseconds since creation.
///
/// Each reading sleeps for a short slice so host polling does not pin a
/// core at 100%.
pub struct HostClock {
    start: Instant,
}

impl HostClock {
    /// Ticks per second.
    pub const TICK_HZ: u64 = 1_000_000;

    /// Pause between polls.
    const POLL_INTERVAL: Duration = Duration::from_micros(200);

    /// Start counting from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for HostClock {
    fn now(&mut self) -> u64 {
        thread::sleep(Self::POLL_INTERVAL);
        u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}
