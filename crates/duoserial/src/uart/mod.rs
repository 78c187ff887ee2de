// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! UART register seam and the bounded transmit/receive primitives.
//!
//! Backends implement [`Uart`] over whatever holds the registers:
//! - `mmio` - PIC24FJ UART register block accessed through volatile MMIO
//! - `mock` - Testing mock backed by `VecDeque`/`Vec`
//!
//! [`Channel`] owns one backend plus a tick source and never waits longer
//! than its [`Budgets`] allow.

#![allow(unsafe_code)] // UART register access requires unsafe MMIO


#[cfg(any(test, feature = "std"))]
mod mock;
mod mmio;

#[cfg(any(test, feature = "std"))]
pub use mock::MockUart;
pub use mmio::{Pic24Uart, RegisterBit, UART1, UART2, UartLayout};

use crate::CANCEL;
use crate::config::RegisterSettings;
use crate::timing::{Clock, TimeoutBudget, wait_until};

/// Raw access to one UART's status flags and data registers.
///
/// None of these methods wait. Waiting is the job of [`Channel`].
pub trait Uart {
    /// Check if the transmit buffer has room for another byte.
    fn can_write(&self) -> bool;

    /// Check if a received byte is waiting in the receive buffer.
    fn can_read(&self) -> bool;

    /// Write a byte to the transmit register.
    fn write_data(&mut self, byte: u8);

    /// Read (and thereby consume) the byte in the receive register.
    fn read_data(&mut self) -> u8;
}

/// One-time setup and power gating of a UART module.
pub trait UartControl {
    /// Program baud divisor, mode and status registers and drive the RTS
    /// pin as an output.
    fn configure(&mut self, settings: &RegisterSettings);

    /// Switch the module's clock on or off.
    fn set_powered(&mut self, powered: bool);
}

/// Why a primitive gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The hardware did not become ready within the budget.
    Timeout,
    /// The channel is powered down.
    Disabled,
}

impl LinkError {
    /// The byte the legacy byte-level protocol used for this condition.
    #[must_use]
    pub const fn to_sentinel(self) -> u8 {
        CANCEL
    }
}

impl core::fmt::Display for LinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Timeout => write!(f, "serial link timed out"),
            Self::Disabled => write!(f, "serial channel is disabled"),
        }
    }
}

/// Collapse a primitive result into a single byte, sentinel on failure.
#[must_use]
pub const fn sentinel_or(result: Result<u8, LinkError>) -> u8 {
    match result {
        Ok(byte) => byte,
        Err(err) => err.to_sentinel(),
    }
}

/// Per-channel timeout budgets for the two primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budgets {
    /// Longest wait for room in the transmit buffer.
    pub transmit: TimeoutBudget,
    /// Longest wait for a received byte.
    pub receive: TimeoutBudget,
}

impl Budgets {
    /// Console defaults in [`PollCounter`](crate::PollCounter) ticks.
    ///
    /// The receive bound tolerates about 90 seconds of operator idle time
    /// on a 16 MIPS core.
    pub const CONSOLE: Self = Self {
        transmit: TimeoutBudget::Ticks(3_333_333),
        receive: TimeoutBudget::Ticks(60_000_000),
    };

    /// Instrument defaults in [`PollCounter`](crate::PollCounter) ticks.
    ///
    /// The instrument answers within a few character times, so the receive
    /// bound is short.
    pub const INSTRUMENT: Self = Self {
        transmit: TimeoutBudget::Ticks(3_333_333),
        receive: TimeoutBudget::Ticks(20_000),
    };

    /// Same budget for both directions.
    #[must_use]
    pub const fn uniform(budget: TimeoutBudget) -> Self {
        Self {
            transmit: budget,
            receive: budget,
        }
    }
}

/// A UART backend paired with the clock that bounds its waits.
pub struct Channel<U, C> {
    uart: U,
    clock: C,
    budgets: Budgets,
}

impl<U: Uart, C: Clock> Channel<U, C> {
    /// Wrap an already configured backend.
    #[must_use]
    pub const fn new(uart: U, clock: C, budgets: Budgets) -> Self {
        Self {
            uart,
            clock,
            budgets,
        }
    }

    /// Send one byte, waiting at most the transmit budget for room.
    ///
    /// Returns the byte that was written. On timeout nothing is written.
    pub fn transmit(&mut self, byte: u8) -> Result<u8, LinkError> {
        let uart = &self.uart;
        if !wait_until(&mut self.clock, self.budgets.transmit, || uart.can_write()) {
            tracing::warn!(byte, "transmit timed out");
            return Err(LinkError::Timeout);
        }
        self.uart.write_data(byte);
        Ok(byte)
    }

    /// Receive one byte, waiting at most the receive budget for it.
    ///
    /// On timeout the receive register is left untouched.
    pub fn receive(&mut self) -> Result<u8, LinkError> {
        let uart = &self.uart;
        if !wait_until(&mut self.clock, self.budgets.receive, || uart.can_read()) {
            tracing::warn!("receive timed out");
            return Err(LinkError::Timeout);
        }
        Ok(self.uart.read_data())
    }

    /// Check whether a received byte is waiting (non-blocking).
    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.uart.can_read()
    }

    /// Current budgets.
    #[must_use]
    pub const fn budgets(&self) -> Budgets {
        self.budgets
    }

    /// Replace the budgets.
    pub const fn set_budgets(&mut self, budgets: Budgets) {
        self.budgets = budgets;
    }

    /// Borrow the backend.
    #[must_use]
    pub const fn uart(&self) -> &U {
        &self.uart
    }

    /// Mutably borrow the backend.
    pub const fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Borrow the clock.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Give back the backend and the clock.
    pub fn into_parts(self) -> (U, C) {
        (self.uart, self.clock)
    }
}
