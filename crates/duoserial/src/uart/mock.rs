// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Mock UART for testing.
//!
//! This provides a UART implementation backed by in-memory buffers,
//! allowing unit tests to verify UART interactions without hardware.
//! Link faults are simulated by holding the status flags low: a byte can be
//! made to arrive only after a number of polls, the transmitter can be kept
//! busy after every write, or it can be stalled for good.

use core::cell::Cell;
use std::collections::VecDeque;
use std::vec::Vec;

use super::{Uart, UartControl};
use crate::config::RegisterSettings;

/// Mock UART backed by in-memory buffers.
#[derive(Debug, Default)]
pub struct MockUart {
    /// Input buffer (data the peer has sent)
    input: VecDeque<u8>,
    /// Output buffer (data that was written)
    output: Vec<u8>,
    /// Polls before each input byte shows up in `can_read`
    rx_latency: u32,
    /// Polls left until the head of `input` becomes visible
    rx_wait: Cell<u32>,
    /// Polls the transmitter stays busy after each write
    tx_latency: u32,
    /// Polls left until the transmitter is free again
    tx_wait: Cell<u32>,
    /// Transmitter never frees up (peer gone, FIFO never drains)
    tx_stalled: bool,
    /// Number of `can_write`/`can_read` calls
    status_reads: Cell<u64>,
    /// Last settings written by `configure`
    settings: Option<RegisterSettings>,
    /// Module power state
    powered: bool,
}

impl MockUart {
    /// Create an empty mock UART.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock UART with pre-loaded input data.
    #[must_use]
    pub fn with_input(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Make every input byte wait `polls` unsuccessful `can_read` calls.
    #[must_use]
    pub fn with_rx_latency(mut self, polls: u32) -> Self {
        self.rx_latency = polls;
        self.rx_wait.set(polls);
        self
    }

    /// Keep the transmitter busy for `polls` `can_write` calls after each write.
    #[must_use]
    pub fn with_tx_latency(mut self, polls: u32) -> Self {
        self.tx_latency = polls;
        self
    }

    /// Stall or release the transmitter.
    pub const fn set_tx_stalled(&mut self, stalled: bool) {
        self.tx_stalled = stalled;
    }

    /// Get the output that has been written.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Clear the output buffer.
    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Add more input data.
    pub fn push_input(&mut self, data: &[u8]) {
        self.input.extend(data);
    }

    /// Bytes the peer sent that have not been read yet.
    #[must_use]
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }

    /// How many times a status flag was polled.
    #[must_use]
    pub fn status_reads(&self) -> u64 {
        self.status_reads.get()
    }

    /// Settings from the last `configure` call.
    #[must_use]
    pub const fn settings(&self) -> Option<&RegisterSettings> {
        self.settings.as_ref()
    }

    /// Whether the module is currently powered.
    #[must_use]
    pub const fn is_powered(&self) -> bool {
        self.powered
    }

    fn count_status_read(&self) {
        self.status_reads.set(self.status_reads.get() + 1);
    }
}

impl Uart for MockUart {
    fn can_write(&self) -> bool {
        self.count_status_read();
        if self.tx_stalled {
            return false;
        }
        let wait = self.tx_wait.get();
        if wait > 0 {
            self.tx_wait.set(wait - 1);
            return false;
        }
        true
    }

    fn can_read(&self) -> bool {
        self.count_status_read();
        if self.input.is_empty() {
            return false;
        }
        let wait = self.rx_wait.get();
        if wait > 0 {
            self.rx_wait.set(wait - 1);
            return false;
        }
        true
    }

    fn write_data(&mut self, byte: u8) {
        self.output.push(byte);
        self.tx_wait.set(self.tx_latency);
    }

    fn read_data(&mut self) -> u8 {
        self.rx_wait.set(self.rx_latency);
        // Reading an empty receive register yields whatever was there last;
        // zero is as good as anything for a mock.
        self.input.pop_front().unwrap_or(0)
    }
}

impl UartControl for MockUart {
    fn configure(&mut self, settings: &RegisterSettings) {
        self.settings = Some(*settings);
    }

    fn set_powered(&mut self, powered: bool) {
        self.powered = powered;
    }
}
