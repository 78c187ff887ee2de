// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Channel configuration.
//!
//! Turns a line setting (baud rate, parity, stop bits, flow control) into
//! the three register values a PIC24 UART needs: the baud rate generator
//! divisor (`UxBRG`), the mode register (`UxMODE`) and the status/control
//! register (`UxSTA`). Nothing here touches hardware; backends apply the
//! result through [`UartControl`](crate::UartControl).

#[cfg(test)]
mod mod_test;

use bitflags::bitflags;

bitflags! {
    /// `UxMODE` register bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModeBits: u16 {
        /// UART enable.
        const UARTEN = 1 << 15;
        /// Stop operation when the core idles.
        const USIDL = 1 << 13;
        /// IrDA encoder/decoder enable.
        const IREN = 1 << 12;
        /// `UxRTS` pin in simplex mode.
        const RTSMD = 1 << 11;
        /// `UEN<1>`: with `UEN<0>` clear, RTS and CTS are under hardware control.
        const UEN1 = 1 << 9;
        /// `UEN<0>`.
        const UEN0 = 1 << 8;
        /// Wake from sleep on a start bit.
        const WAKE = 1 << 7;
        /// Loopback mode.
        const LPBACK = 1 << 6;
        /// Auto-baud enable.
        const ABAUD = 1 << 5;
        /// Receive polarity inversion.
        const RXINV = 1 << 4;
        /// High-speed baud rate generator (4 clocks per bit).
        const BRGH = 1 << 3;
        /// `PDSEL<1>`: 8 data bits, odd parity (with `PDSEL<0>` clear: even).
        const PDSEL1 = 1 << 2;
        /// `PDSEL<0>`: 8 data bits, even parity (with `PDSEL<1>` clear).
        const PDSEL0 = 1 << 1;
        /// Two stop bits.
        const STSEL = 1 << 0;
    }
}

bitflags! {
    /// `UxSTA` register bits used by the core.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusBits: u16 {
        /// Transmit enable.
        const UTXEN = 1 << 10;
        /// Transmit buffer full (read-only).
        const UTXBF = 1 << 9;
        /// Receive buffer overrun.
        const OERR = 1 << 1;
        /// Receive buffer has data (read-only).
        const URXDA = 1 << 0;
    }
}

/// Parity with 8 data bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// 8N
    None,
    /// 8E
    Even,
    /// 8O
    Odd,
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    /// One stop bit.
    One,
    /// Two stop bits.
    Two,
}

/// Errors computing register values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A baud rate of zero was requested.
    ZeroBaud,
    /// The requested baud rate is too slow for a 16-bit divisor at this clock.
    DivisorOverflow,
    /// The requested baud rate is faster than the clock can generate.
    BaudTooHigh,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroBaud => write!(f, "baud rate must be non-zero"),
            Self::DivisorOverflow => write!(f, "baud rate divisor does not fit in 16 bits"),
            Self::BaudTooHigh => write!(f, "baud rate is too high for the peripheral clock"),
        }
    }
}

/// Register values for one UART, ready to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSettings {
    /// `UxBRG` divisor.
    pub brg: u16,
    /// `UxMODE`.
    pub mode: ModeBits,
    /// `UxSTA`.
    pub status: StatusBits,
}

/// Line settings for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Bits per second.
    pub baud: u32,
    /// Instruction clock feeding the baud rate generator, in Hz.
    pub peripheral_clock_hz: u32,
    /// Parity.
    pub parity: Parity,
    /// Stop bits.
    pub stop_bits: StopBits,
    /// RTS/CTS hardware flow control.
    pub flow_control: bool,
    /// Wake the core from sleep on a start bit.
    pub wake_on_start: bool,
    /// Stop the module while the core idles.
    pub stop_in_idle: bool,
}

impl ChannelConfig {
    /// Instruction clock of the reference board (32 MHz oscillator, Fosc/2).
    pub const DEFAULT_PERIPHERAL_CLOCK_HZ: u32 = 16_000_000;

    /// Operator console: 9600 8N1, wake on start bit, no flow control.
    #[must_use]
    pub const fn console() -> Self {
        Self {
            baud: 9_600,
            peripheral_clock_hz: Self::DEFAULT_PERIPHERAL_CLOCK_HZ,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: false,
            wake_on_start: true,
            stop_in_idle: false,
        }
    }

    /// Instrument link: 19200 8E1, no flow control.
    #[must_use]
    pub const fn instrument() -> Self {
        Self {
            baud: 19_200,
            peripheral_clock_hz: Self::DEFAULT_PERIPHERAL_CLOCK_HZ,
            parity: Parity::Even,
            stop_bits: StopBits::One,
            flow_control: false,
            wake_on_start: false,
            stop_in_idle: false,
        }
    }

    /// Baud rate generator divisor in high-speed mode.
    ///
    /// `BRG = Fcy / (4 * baud) - 1`, rounded to the nearest integer.
    pub fn brg(&self) -> Result<u16, ConfigError> {
        if self.baud == 0 {
            return Err(ConfigError::ZeroBaud);
        }
        let clocks_per_bit = 4 * u64::from(self.baud);
        let fcy = u64::from(self.peripheral_clock_hz);
        let rounded = (fcy + clocks_per_bit / 2) / clocks_per_bit;
        if rounded == 0 {
            return Err(ConfigError::BaudTooHigh);
        }
        u16::try_from(rounded - 1).map_err(|_| ConfigError::DivisorOverflow)
    }

    /// Actual baud rate the divisor produces.
    pub fn effective_baud(&self) -> Result<u32, ConfigError> {
        let brg = self.brg()?;
        let divisor = 4 * (u32::from(brg) + 1);
        Ok(self.peripheral_clock_hz / divisor)
    }

    /// Mode register value that enables the UART with these settings.
    #[must_use]
    pub fn mode_bits(&self) -> ModeBits {
        let mut mode = ModeBits::UARTEN | ModeBits::BRGH;
        mode.set(ModeBits::USIDL, self.stop_in_idle);
        mode.set(ModeBits::UEN1, self.flow_control);
        mode.set(ModeBits::WAKE, self.wake_on_start);
        match self.parity {
            Parity::None => {}
            Parity::Even => mode |= ModeBits::PDSEL0,
            Parity::Odd => mode |= ModeBits::PDSEL1,
        }
        mode.set(ModeBits::STSEL, self.stop_bits == StopBits::Two);
        mode
    }

    /// All three register values.
    pub fn register_settings(&self) -> Result<RegisterSettings, ConfigError> {
        Ok(RegisterSettings {
            brg: self.brg()?,
            mode: self.mode_bits(),
            status: StatusBits::UTXEN,
        })
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::console()
    }
}
