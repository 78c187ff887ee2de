// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Interactive operator console.
//!
//! The console channel echoes everything the operator types and supports
//! destructive backspace. Lines end on carriage return, on CAN from the
//! operator, when the buffer is full, or when the operator goes quiet for
//! the whole receive budget.


mod line;

pub use line::{Edit, LineEditor, LineEnd, LineRead};

use crate::config::{ChannelConfig, ConfigError};
use crate::timing::Clock;
use crate::uart::{Budgets, Channel, LinkError, Uart, UartControl};
use crate::{BACKSPACE, CANCEL};

/// The echoing, line-edited channel.
pub struct ConsoleChannel<U, C> {
    channel: Channel<U, C>,
}

impl<U: Uart, C: Clock> ConsoleChannel<U, C> {
    /// Wrap an already configured channel.
    #[must_use]
    pub const fn new(channel: Channel<U, C>) -> Self {
        Self { channel }
    }

    /// Power up and configure `uart`, then wrap it.
    pub fn init(
        mut uart: U,
        clock: C,
        config: &ChannelConfig,
        budgets: Budgets,
    ) -> Result<Self, ConfigError>
    where
        U: UartControl,
    {
        let settings = config.register_settings()?;
        uart.set_powered(true);
        uart.configure(&settings);
        tracing::debug!(baud = config.baud, "console channel up");
        Ok(Self::new(Channel::new(uart, clock, budgets)))
    }

    /// Send one byte.
    pub fn transmit(&mut self, byte: u8) -> Result<u8, LinkError> {
        self.channel.transmit(byte)
    }

    /// Receive one byte.
    pub fn receive(&mut self) -> Result<u8, LinkError> {
        self.channel.receive()
    }

    /// Send bytes up to the first NUL (or the end of the slice).
    ///
    /// Stops at the first byte that cannot be sent; the rest of the string
    /// is dropped. Returns the number of bytes sent.
    pub fn write_string(&mut self, bytes: &[u8]) -> Result<usize, LinkError> {
        let mut sent = 0;
        for &byte in bytes.iter().take_while(|&&byte| byte != 0) {
            self.channel.transmit(byte)?;
            sent += 1;
        }
        Ok(sent)
    }

    /// Send a string slice.
    pub fn write_str(&mut self, s: &str) -> Result<usize, LinkError> {
        self.write_string(s.as_bytes())
    }

    /// Send a string slice followed by CR LF.
    pub fn write_line(&mut self, s: &str) -> Result<usize, LinkError> {
        let sent = self.write_str(s)?;
        Ok(sent + self.write_string(b"\r\n")?)
    }

    /// Read one edited line from the operator into `buf`.
    ///
    /// Every received byte except CAN is echoed before it is interpreted, so
    /// the operator also sees the CR and LF they type. The buffer is always
    /// NUL-terminated at `len`, and at most `buf.len() - 1` bytes are stored.
    /// A buffer shorter than two bytes reads nothing.
    pub fn read_line(&mut self, buf: &mut [u8]) -> LineRead {
        let mut editor = LineEditor::new(buf);
        if !editor.wants_more() {
            return editor.finish(LineEnd::Full);
        }

        let end = loop {
            let edit = match self.channel.receive() {
                Ok(byte) => {
                    if byte != CANCEL {
                        self.echo(byte);
                    }
                    let edit = editor.feed(byte);
                    if edit == Edit::Erased {
                        self.echo(b' ');
                        self.echo(BACKSPACE);
                    }
                    tracing::trace!(byte, ?edit, "line input");
                    edit
                }
                Err(_) => editor.time_out(),
            };
            if let Edit::Finished(end) = edit {
                break end;
            }
        };

        let line = editor.finish(end);
        tracing::debug!(len = line.len, end = ?line.end, "line read");
        line
    }

    /// Echo a byte back to the operator. A lost echo does not abort the line.
    fn echo(&mut self, byte: u8) {
        if let Err(err) = self.channel.transmit(byte) {
            tracing::debug!(byte, %err, "echo dropped");
        }
    }

    /// Borrow the underlying channel.
    #[must_use]
    pub const fn channel(&self) -> &Channel<U, C> {
        &self.channel
    }

    /// Mutably borrow the underlying channel.
    pub const fn channel_mut(&mut self) -> &mut Channel<U, C> {
        &mut self.channel
    }

    /// Unwrap the underlying channel.
    pub fn into_inner(self) -> Channel<U, C> {
        self.channel
    }
}

impl<U: Uart, C: Clock> core::fmt::Write for ConsoleChannel<U, C> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        Self::write_str(self, s)
            .map(|_| ())
            .map_err(|_| core::fmt::Error)
    }
}
