// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Instrument link.
//!
//! A raw, polled byte stream to an external instrument. The module can be
//! powered down between exchanges; while it is off every primitive refuses
//! to touch the hardware.


use crate::config::{ChannelConfig, ConfigError};
use crate::timing::Clock;
use crate::uart::{Budgets, Channel, LinkError, Uart, UartControl};

/// The power-gated instrument channel.
pub struct InstrumentChannel<U, C> {
    channel: Channel<U, C>,
    enabled: bool,
}

impl<U: Uart + UartControl, C: Clock> InstrumentChannel<U, C> {
    /// Create a powered-down channel. Call [`enable`](Self::enable) before use.
    #[must_use]
    pub const fn new(uart: U, clock: C, budgets: Budgets) -> Self {
        Self {
            channel: Channel::new(uart, clock, budgets),
            enabled: false,
        }
    }

    /// Power the module up and program it with `config`.
    ///
    /// The channel stays disabled if `config` cannot be turned into register
    /// values.
    pub fn enable(&mut self, config: &ChannelConfig) -> Result<(), ConfigError> {
        let settings = config.register_settings()?;
        let uart = self.channel.uart_mut();
        uart.set_powered(true);
        uart.configure(&settings);
        self.enabled = true;
        tracing::debug!(baud = config.baud, "instrument channel enabled");
        Ok(())
    }

    /// Cut power to the module.
    pub fn disable(&mut self) {
        self.channel.uart_mut().set_powered(false);
        self.enabled = false;
        tracing::debug!("instrument channel disabled");
    }

    /// Whether the module is powered and configured.
    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Send one byte.
    pub fn transmit(&mut self, byte: u8) -> Result<u8, LinkError> {
        self.check_enabled()?;
        self.channel.transmit(byte)
    }

    /// Receive one byte.
    pub fn receive(&mut self) -> Result<u8, LinkError> {
        self.check_enabled()?;
        self.channel.receive()
    }

    /// Check whether the instrument has sent something (non-blocking).
    ///
    /// Always `false` while the channel is disabled.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.enabled && self.channel.has_pending()
    }

    /// Send a whole command, stopping at the first byte that cannot be sent.
    pub fn send(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        self.check_enabled()?;
        for &byte in bytes {
            self.channel.transmit(byte)?;
        }
        Ok(())
    }

    /// Read bytes into `buf` until it is full or the instrument goes quiet
    /// for one receive budget. Returns the number of bytes read.
    ///
    /// Silence after at least one byte ends the reply; silence before any
    /// byte arrives is a timeout.
    pub fn receive_into(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        self.check_enabled()?;
        let mut len = 0;
        for slot in buf.iter_mut() {
            match self.channel.receive() {
                Ok(byte) => {
                    *slot = byte;
                    len += 1;
                }
                Err(LinkError::Timeout) if len > 0 => break,
                Err(err) => return Err(err),
            }
        }
        Ok(len)
    }

    /// Borrow the underlying channel.
    #[must_use]
    pub const fn channel(&self) -> &Channel<U, C> {
        &self.channel
    }

    fn check_enabled(&self) -> Result<(), LinkError> {
        if self.enabled {
            Ok(())
        } else {
            Err(LinkError::Disabled)
        }
    }
}
