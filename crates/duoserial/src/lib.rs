// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! # duoserial
//!
//! Polled serial line I/O over two independent UART channels.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │   `ConsoleChannel`       │   │   `InstrumentChannel`    │
//! │  read_line, write_string │   │  enable/disable, probe   │
//! └──────────────────────────┘   └──────────────────────────┘
//!              │                              │
//!              ▼                              ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │        `Channel` (bounded transmit / receive)           │
//! └─────────────────────────────────────────────────────────┘
//!            │                              │
//!            ▼                              ▼
//! ┌─────────────────────┐      ┌─────────────────────────────┐
//! │   `Uart` backend    │      │     `Clock` tick source     │
//! │ (`Pic24Uart`, mock) │      │ (`PollCounter`, host clock) │
//! └─────────────────────┘      └─────────────────────────────┘
//! ```
//!
//! Every busy-wait is bounded by a [`TimeoutBudget`] measured against an
//! injected [`Clock`], so a disconnected link returns control to the caller
//! instead of hanging the processor.
//!
//! ## `no_std` Support
//!
//! Firmware builds disable default features and get a `no_std` crate. The
//! default `std` feature (always on in tests) exposes [`uart::MockUart`] to
//! host builds and integration tests.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(any(test, feature = "std"))]
extern crate std;

#[cfg(test)]
mod lib_test;

pub mod config;
pub mod console;
pub mod instrument;
pub mod timing;
pub mod uart;

pub use config::{ChannelConfig, ConfigError, Parity, RegisterSettings, StopBits};
pub use console::{ConsoleChannel, LineEnd, LineRead};
pub use instrument::InstrumentChannel;
pub use timing::{Clock, PollCounter, TimeoutBudget};
pub use uart::{Budgets, Channel, LinkError, Uart, UartControl};

/// ASCII CAN. Sent by the peer to abandon a line, and the value the
/// legacy byte-level protocol used to report a timed out primitive.
pub const CANCEL: u8 = 0x18;

/// ASCII BS, the erase key recognised by the line reader.
pub const BACKSPACE: u8 = 0x08;

/// Crate version for runtime queries.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
